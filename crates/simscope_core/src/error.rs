//! Error taxonomy for the comparison workflow. Every failure is terminal for
//! the current submission and recoverable by the user re-triggering one.

use crate::slot::SlotId;

#[derive(Debug, Clone, thiserror::Error)]
pub enum CompareError {
    /// A slot was empty at submission time. No network call is made.
    #[error("select {0} before comparing")]
    MissingImage(SlotId),
    /// At most one comparison may be outstanding at a time.
    #[error("a comparison is already in progress")]
    SubmissionInFlight,
    /// The service could not be reached at all.
    #[error("could not reach the comparison service (is it running?): {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("{message}")]
    Service { status: u16, message: String },
    /// The response body was present but not parseable as JSON. The raw body
    /// is embedded verbatim for diagnosis.
    #[error("could not read the service reply: {body}")]
    MalformedResponse { body: String },
    /// The response parsed but lacked expected fields.
    #[error("service reply was missing expected fields: {reason}")]
    IncompleteResponse { reason: String },
}
