use thiserror::Error;

use crate::transport::TransportFailure;

/// A panel query that failed at the transport.
///
/// Carries the panel's correlation id so the host can route the failure to
/// the right error surface without positional bookkeeping.
#[derive(Debug, Clone, Error)]
#[error("query {ref_id}: {failure}")]
pub struct PanelError {
    pub ref_id: String,
    pub failure: TransportFailure,
}
