//! The directory's single domain failure.

use courier_core::RecipientKey;
use thiserror::Error;

/// No route is known for the recipient key.
///
/// This is an expected outcome, not a defect: the recipient simply has
/// not been learned yet. Callers treat it as a routable failure — defer,
/// retry after the next discovery cycle, or surface a delivery error —
/// never as a crash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown recipient {}", .0.fingerprint())]
pub struct UnknownRecipient(pub RecipientKey);
