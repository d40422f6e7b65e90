//! Pagination walker: drives a paginated collection endpoint to exhaustion
//! or to a caller-imposed record cap, whichever comes first.

use crate::config::Limits;
use crate::error::Result;
use crate::query::Params;
use crate::transport::{RawRecord, Transport};

/// Fetch up to `maximum_records` raw records from `entity`, page by page.
///
/// Page requests are strictly sequential: the offset cursor advances by the
/// number of records actually returned, so parallel fetches would break
/// ordering. Each request asks for at most the remaining budget and never
/// more than `limits.page_size`.
///
/// The walk stops when the cap is reached, when the server's `more`
/// indicator is false, or when a page comes back short (fewer records than
/// requested). A transport error aborts the walk and discards everything
/// accumulated so far; a truncated audit trail must never look complete.
pub async fn fetch_all(
    transport: &dyn Transport,
    entity: &str,
    params: &Params,
    maximum_records: usize,
    limits: &Limits,
) -> Result<Vec<RawRecord>> {
    let mut records: Vec<RawRecord> = Vec::new();
    let mut offset = 0;
    let mut requests = 0u32;

    while records.len() < maximum_records {
        let remaining = maximum_records - records.len();
        let page_limit = remaining.min(limits.page_size);

        let page = transport.fetch_page(entity, params, page_limit, offset).await?;
        requests += 1;

        let returned = page.records.len();
        offset += returned;
        records.extend(page.records);

        // An over-delivering server must not break the cap guarantee.
        if records.len() > maximum_records {
            records.truncate(maximum_records);
        }

        if !page.more || returned < page_limit || returned == 0 {
            break;
        }
    }

    tracing::debug!(entity, requests, count = records.len(), "Pagination walk complete");
    metrics::counter!("upstream_page_requests_total").increment(requests as u64);

    Ok(records)
}
