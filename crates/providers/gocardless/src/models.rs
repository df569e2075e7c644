use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingRequestStatus {
    Pending,
    ReadyToFulfil,
    Fulfilling,
    Fulfilled,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for BillingRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BillingRequestStatus::Pending => "pending",
            BillingRequestStatus::ReadyToFulfil => "ready_to_fulfil",
            BillingRequestStatus::Fulfilling => "fulfilling",
            BillingRequestStatus::Fulfilled => "fulfilled",
            BillingRequestStatus::Cancelled => "cancelled",
            BillingRequestStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MandateStatus {
    PendingCustomerApproval,
    PendingSubmission,
    Submitted,
    Active,
    SuspendedByPayer,
    Failed,
    Cancelled,
    Expired,
    Consumed,
    Blocked,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for MandateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MandateStatus::PendingCustomerApproval => "pending_customer_approval",
            MandateStatus::PendingSubmission => "pending_submission",
            MandateStatus::Submitted => "submitted",
            MandateStatus::Active => "active",
            MandateStatus::SuspendedByPayer => "suspended_by_payer",
            MandateStatus::Failed => "failed",
            MandateStatus::Cancelled => "cancelled",
            MandateStatus::Expired => "expired",
            MandateStatus::Consumed => "consumed",
            MandateStatus::Blocked => "blocked",
            MandateStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Ids of the resources a billing request creates as the payer progresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRequestLinks {
    #[serde(default)]
    pub creditor: Option<String>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub mandate_request: Option<String>,
    /// Present once the payer has completed the flow and a mandate exists.
    #[serde(default)]
    pub mandate_request_mandate: Option<String>,
    #[serde(default)]
    pub payment_request: Option<String>,
    #[serde(default)]
    pub payment_request_payment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRequest {
    pub id: String,
    pub status: BillingRequestStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub links: BillingRequestLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRequestFlowLinks {
    #[serde(default)]
    pub billing_request: Option<String>,
}

/// A hosted page where the payer authorises a billing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRequestFlow {
    pub id: String,
    pub authorisation_url: String,
    #[serde(default)]
    pub redirect_uri: Option<String>,
    #[serde(default)]
    pub exit_uri: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub links: BillingRequestFlowLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mandate {
    pub id: String,
    pub status: MandateStatus,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub next_possible_charge_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequestParams {
    /// Amount in the currency's smallest unit, e.g. pence.
    pub amount: i64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MandateRequestParams {
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBillingRequest {
    pub payment_request: PaymentRequestParams,
    pub mandate_request: MandateRequestParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowLinksParams {
    pub billing_request: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBillingRequestFlow {
    pub redirect_uri: String,
    pub exit_uri: String,
    pub links: FlowLinksParams,
}
