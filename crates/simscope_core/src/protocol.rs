//! Wire contract with the comparison service and response interpretation.
//!
//! The service speaks one canonical schema: a multipart request with binary
//! fields `file1`/`file2`, and a success body of
//! `{ similarity_score, insights.llm_explanation, images.image_a_uri,
//! images.image_b_uri }`. Failures carry an optional `detail` field.

use base64::Engine as _;
use serde::Deserialize;

use crate::error::CompareError;

pub const COMPARE_PATH: &str = "/compare/";
pub const FIELD_IMAGE_A: &str = "file1";
pub const FIELD_IMAGE_B: &str = "file2";

/// Outcome of a successful comparison round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    /// Finite similarity score as reported by the service.
    pub score: f64,
    /// Natural-language explanation, rendered verbatim.
    pub explanation: String,
    /// Echo of the first processed image, usually a data URI.
    pub image_a_uri: String,
    /// Echo of the second processed image.
    pub image_b_uri: String,
}

#[derive(Debug, Deserialize)]
struct CompareResponse {
    similarity_score: f64,
    insights: Insights,
    images: EchoedImages,
}

#[derive(Debug, Deserialize)]
struct Insights {
    llm_explanation: String,
}

#[derive(Debug, Deserialize)]
struct EchoedImages {
    image_a_uri: String,
    image_b_uri: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Classify a raw response into exactly one result or error. Never panics;
/// the body is inspected as text first so a parse failure can surface the
/// raw content verbatim.
pub fn interpret_response(status: u16, body: &str) -> Result<ComparisonResult, CompareError> {
    let ok = (200..300).contains(&status);

    let parsed: Option<serde_json::Value> = if body.trim().is_empty() {
        None
    } else {
        match serde_json::from_str(body) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(status, %err, "comparison response body is not JSON");
                return Err(CompareError::MalformedResponse {
                    body: body.to_string(),
                });
            }
        }
    };

    if !ok {
        let detail = parsed
            .and_then(|value| serde_json::from_value::<ErrorBody>(value).ok())
            .and_then(|e| e.detail);
        let message = detail.unwrap_or_else(|| {
            format!("comparison service returned status {status}: {}", body.trim())
        });
        return Err(CompareError::Service { status, message });
    }

    let Some(value) = parsed else {
        return Err(CompareError::IncompleteResponse {
            reason: "response body was empty".to_string(),
        });
    };

    let response: CompareResponse =
        serde_json::from_value(value).map_err(|err| CompareError::IncompleteResponse {
            reason: err.to_string(),
        })?;

    if !response.similarity_score.is_finite() {
        return Err(CompareError::IncompleteResponse {
            reason: "similarity_score is not a finite number".to_string(),
        });
    }

    Ok(ComparisonResult {
        score: response.similarity_score,
        explanation: response.insights.llm_explanation,
        image_a_uri: response.images.image_a_uri,
        image_b_uri: response.images.image_b_uri,
    })
}

/// Fixed four-decimal rendering of the score.
pub fn format_score(score: f64) -> String {
    format!("{score:.4}")
}

/// Extract the payload of a base64 data URI. Returns `None` for anything
/// that is not one, so callers can fall back to showing the reference text.
pub fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    if !meta.ends_with(";base64") {
        return None;
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .ok()
}
