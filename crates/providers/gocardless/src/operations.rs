use core_lib::{AuthSession, OAuthProvider};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    api::{ApiClient, ApiError, BillingApi},
    environment::Environment,
    models::{
        BillingRequest, BillingRequestFlow, FlowLinksParams, Mandate, MandateRequestParams,
        NewBillingRequest, NewBillingRequestFlow, PaymentRequestParams,
    },
};

pub const DEFAULT_CURRENCY: &str = "GBP";
/// Mandates are always requested in GBP, whatever currency the payment uses.
pub const MANDATE_CURRENCY: &str = "GBP";
pub const DEFAULT_FLOW_REDIRECT_URI: &str = "https://example.com/redirect";
pub const DEFAULT_FLOW_EXIT_URI: &str = "https://example.com/exit";

#[derive(Error, Debug)]
pub enum OperationsError {
    #[error("Client must be authenticated before performing operations")]
    NotAuthenticated,

    #[error("No billing request ID available")]
    MissingBillingRequestId,

    #[error("mandate_id must be a non-empty string")]
    InvalidMandateId,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Outcome of a status lookup.
///
/// Lookups never fail the caller: a resource that does not exist yet is
/// `NotReady`, anything else that went wrong is `Failed`.
#[derive(Debug)]
pub enum Lookup<T> {
    Ready(T),
    NotReady,
    Failed(ApiError),
}

impl<T> Lookup<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Lookup::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Lookup::Ready(_))
    }

    fn from_result(result: Result<T, ApiError>, what: &str) -> Self {
        match result {
            Ok(value) => Lookup::Ready(value),
            Err(err) if err.is_not_found() => {
                info!("{} not found yet", what);
                Lookup::NotReady
            }
            Err(err) => {
                warn!("Error retrieving {}: {}", what, err);
                Lookup::Failed(err)
            }
        }
    }
}

/// Billing-request operations performed for one authenticated merchant.
pub struct Operations<A = ApiClient> {
    api: A,
    flow_redirect_uri: String,
    flow_exit_uri: String,
    billing_request_id: Option<String>,
    mandate_id: Option<String>,
}

impl Operations<ApiClient> {
    /// Connects to the GoCardless API using the session's access token.
    pub fn connect<P: OAuthProvider>(
        session: &AuthSession<P>,
        environment: Environment,
    ) -> Result<Self, OperationsError> {
        let access_token = authenticated_token(session)?;
        Ok(Self::build(ApiClient::new(access_token, environment)))
    }
}

impl<A: BillingApi> Operations<A> {
    /// Uses a caller-supplied API implementation. The session must still be
    /// authenticated.
    pub fn with_api<P: OAuthProvider>(
        session: &AuthSession<P>,
        api: A,
    ) -> Result<Self, OperationsError> {
        authenticated_token(session)?;
        Ok(Self::build(api))
    }

    fn build(api: A) -> Self {
        Self {
            api,
            flow_redirect_uri: DEFAULT_FLOW_REDIRECT_URI.to_string(),
            flow_exit_uri: DEFAULT_FLOW_EXIT_URI.to_string(),
            billing_request_id: None,
            mandate_id: None,
        }
    }

    pub fn with_flow_urls(
        mut self,
        redirect_uri: impl Into<String>,
        exit_uri: impl Into<String>,
    ) -> Self {
        self.flow_redirect_uri = redirect_uri.into();
        self.flow_exit_uri = exit_uri.into();
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn billing_request_id(&self) -> Option<&str> {
        self.billing_request_id.as_deref()
    }

    pub fn mandate_id(&self) -> Option<&str> {
        self.mandate_id.as_deref()
    }

    /// Creates a billing request collecting a mandate and a one-off payment,
    /// then the hosted flow the payer completes it through.
    ///
    /// `amount` is in the currency's smallest unit and is validated by the
    /// API, not here.
    pub async fn create_billing_request_and_flow(
        &mut self,
        amount: i64,
        currency: &str,
        description: Option<&str>,
    ) -> Result<BillingRequestFlow, OperationsError> {
        let params = NewBillingRequest {
            payment_request: PaymentRequestParams {
                amount,
                currency: currency.to_string(),
                description: description.map(str::to_string),
            },
            mandate_request: MandateRequestParams {
                currency: MANDATE_CURRENCY.to_string(),
            },
        };
        let billing_request = self.api.create_billing_request(&params).await?;
        info!(billing_request_id = %billing_request.id, "billing request created");
        self.billing_request_id = Some(billing_request.id.clone());

        let flow_params = NewBillingRequestFlow {
            redirect_uri: self.flow_redirect_uri.clone(),
            exit_uri: self.flow_exit_uri.clone(),
            links: FlowLinksParams {
                billing_request: billing_request.id,
            },
        };
        let flow = self.api.create_billing_request_flow(&flow_params).await?;
        info!(flow_id = %flow.id, "billing request flow created");
        Ok(flow)
    }

    /// Fetches a billing request, defaulting to the one created last.
    ///
    /// Records the mandate id once the payer has completed the flow.
    pub async fn get_billing_request(
        &mut self,
        billing_request_id: Option<&str>,
    ) -> Result<Lookup<BillingRequest>, OperationsError> {
        let id = billing_request_id
            .or(self.billing_request_id.as_deref())
            .filter(|id| !id.is_empty())
            .ok_or(OperationsError::MissingBillingRequestId)?
            .to_string();

        let lookup = Lookup::from_result(self.api.get_billing_request(&id).await, "billing request");
        if let Lookup::Ready(billing_request) = &lookup {
            if let Some(mandate_id) = &billing_request.links.mandate_request_mandate {
                self.mandate_id = Some(mandate_id.clone());
            }
        }
        Ok(lookup)
    }

    pub async fn get_mandate(&self, mandate_id: &str) -> Result<Lookup<Mandate>, OperationsError> {
        if mandate_id.trim().is_empty() {
            return Err(OperationsError::InvalidMandateId);
        }
        Ok(Lookup::from_result(
            self.api.get_mandate(mandate_id).await,
            "mandate",
        ))
    }
}

fn authenticated_token<P: OAuthProvider>(session: &AuthSession<P>) -> Result<&str, OperationsError> {
    if !session.is_authenticated() {
        return Err(OperationsError::NotAuthenticated);
    }
    session
        .access_token()
        .ok_or(OperationsError::NotAuthenticated)
}
