//! Client-side workflow for an image similarity comparison service: two
//! upload slots with local previews, a single-in-flight submission state
//! machine, a blocking HTTP client, and a response interpreter. UI-free so
//! every piece is unit-testable; the `app_gui` crate renders on top of this.

pub mod client;
pub mod error;
pub mod form;
pub mod protocol;
pub mod slot;

pub use client::{CompareClient, DEFAULT_SERVICE_URL};
pub use error::CompareError;
pub use form::{
    CompareForm, ComparisonRequest, PendingSubmission, ResultView, SubmissionStatus,
};
pub use protocol::{ComparisonResult, decode_data_uri, format_score, interpret_response};
pub use slot::{PREVIEW_SIZE, Preview, SelectedImage, SlotId, UploadSlot, looks_like_image};
