use std::io::Write;

use anyhow::Result;
use gocardless::{BillingApi, Lookup, Operations};

use crate::report;

/// Polls the last billing request once and reports whatever is available.
/// Missing data is reported as a hint, never as an error.
pub async fn check_status<W, A>(out: &mut W, operations: &mut Operations<A>) -> Result<()>
where
    W: Write,
    A: BillingApi,
{
    let billing_request = match operations.get_billing_request(None).await? {
        Lookup::Ready(billing_request) => billing_request,
        Lookup::NotReady | Lookup::Failed(_) => {
            report::hint(out, report::BILLING_REQUEST_UNAVAILABLE)?;
            return Ok(());
        }
    };
    report::billing_request(out, &billing_request)?;

    let Some(mandate_id) = operations.mandate_id().map(str::to_owned) else {
        report::hint(out, report::MANDATE_NOT_READY)?;
        return Ok(());
    };

    match operations.get_mandate(&mandate_id).await? {
        Lookup::Ready(mandate) => report::mandate(out, &mandate)?,
        Lookup::NotReady | Lookup::Failed(_) => report::hint(out, report::MANDATE_UNAVAILABLE)?,
    }
    Ok(())
}
