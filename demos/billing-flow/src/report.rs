use std::io::{self, Write};

use gocardless::models::{BillingRequest, Mandate};

pub const MANDATE_NOT_READY: &str =
    "No mandate ID available yet. The customer may still be completing the flow.";
pub const MANDATE_UNAVAILABLE: &str =
    "Could not retrieve mandate details. The customer may still be completing the flow.";
pub const BILLING_REQUEST_UNAVAILABLE: &str = "Could not retrieve billing request details.";

pub fn billing_request<W: Write>(out: &mut W, billing_request: &BillingRequest) -> io::Result<()> {
    writeln!(out, "\nBilling Request Details:")?;
    writeln!(out, "ID: {}", billing_request.id)?;
    writeln!(out, "Status: {}", billing_request.status)
}

pub fn mandate<W: Write>(out: &mut W, mandate: &Mandate) -> io::Result<()> {
    writeln!(out, "\nMandate Details:")?;
    writeln!(out, "ID: {}", mandate.id)?;
    writeln!(out, "Status: {}", mandate.status)?;
    writeln!(out, "Reference: {}", or_dash(mandate.reference.as_deref()))?;
    writeln!(
        out,
        "Created at: {}",
        mandate
            .created_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string())
    )?;
    writeln!(out, "Scheme: {}", or_dash(mandate.scheme.as_deref()))
}

pub fn hint<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "\n{message}")
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
