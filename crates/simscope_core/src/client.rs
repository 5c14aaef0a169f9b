//! Blocking HTTP client for the comparison service.

use reqwest::blocking::{Client, multipart};

use crate::error::CompareError;
use crate::form::ComparisonRequest;
use crate::protocol::{self, ComparisonResult};

/// Default origin the comparison service listens on.
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000";

/// Issues one comparison request at a time against a configured base origin.
/// No retry and no client-side timeout; the transport's own limits apply.
#[derive(Debug, Clone)]
pub struct CompareClient {
    base_url: String,
    http: Client,
}

impl CompareClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Serialize both images into a multipart body, POST it, and classify
    /// the outcome. Connection-level failures become [`CompareError::Transport`];
    /// everything read off the wire goes through the response interpreter.
    pub fn compare(&self, request: &ComparisonRequest) -> Result<ComparisonResult, CompareError> {
        let form = multipart::Form::new()
            .part(
                protocol::FIELD_IMAGE_A,
                multipart::Part::bytes(request.file_a.to_vec()).file_name(request.name_a.clone()),
            )
            .part(
                protocol::FIELD_IMAGE_B,
                multipart::Part::bytes(request.file_b.to_vec()).file_name(request.name_b.clone()),
            );
        let url = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            protocol::COMPARE_PATH
        );

        tracing::debug!(%url, a = %request.name_a, b = %request.name_b, "submitting comparison");
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|err| CompareError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| CompareError::Transport(err.to_string()))?;
        tracing::debug!(status, bytes = body.len(), "comparison response received");

        protocol::interpret_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::thread;

    fn request() -> ComparisonRequest {
        ComparisonRequest {
            file_a: Arc::from(b"png bytes a".as_slice()),
            name_a: "a.png".to_string(),
            file_b: Arc::from(b"png bytes b".as_slice()),
            name_b: "b.png".to_string(),
        }
    }

    /// Serve exactly one canned HTTP response and hand back the raw request
    /// the client sent.
    fn serve_once(status_line: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut raw = Vec::new();
                let mut chunk = [0u8; 4096];
                loop {
                    let n = stream.read(&mut chunk).unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    raw.extend_from_slice(&chunk[..n]);
                    if let Some(total) = expected_request_len(&raw)
                        && raw.len() >= total
                    {
                        break;
                    }
                }
                let _ = stream.write_all(response.as_bytes());
                let _ = tx.send(String::from_utf8_lossy(&raw).into_owned());
            }
        });
        (format!("http://{addr}"), rx)
    }

    /// Header length plus Content-Length, once the header block is complete.
    fn expected_request_len(raw: &[u8]) -> Option<usize> {
        let text = String::from_utf8_lossy(raw);
        let header_end = text.find("\r\n\r\n")? + 4;
        let content_length = text[..header_end].lines().find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })?;
        Some(header_end + content_length)
    }

    #[test]
    fn happy_path_round_trip() {
        let body = r#"{"similarity_score":0.8421,"insights":{"llm_explanation":"Both show cats."},"images":{"image_a_uri":"u1","image_b_uri":"u2"}}"#;
        let (url, rx) = serve_once("200 OK", body);

        let client = CompareClient::new(url);
        let result = client.compare(&request()).unwrap();
        assert_eq!(result.score, 0.8421);
        assert_eq!(result.explanation, "Both show cats.");
        assert_eq!((result.image_a_uri.as_str(), result.image_b_uri.as_str()), ("u1", "u2"));

        let sent = rx.recv().unwrap();
        assert!(sent.starts_with("POST /compare/ HTTP/1.1\r\n"));
        assert!(sent.contains("name=\"file1\""));
        assert!(sent.contains("name=\"file2\""));
        assert!(sent.contains("filename=\"a.png\""));
        assert!(sent.contains("png bytes b"));
    }

    #[test]
    fn server_detail_surfaces_as_the_error() {
        let (url, _rx) = serve_once("500 Internal Server Error", r#"{"detail":"model unavailable"}"#);
        let err = CompareClient::new(url).compare(&request()).unwrap_err();
        assert_eq!(err.to_string(), "model unavailable");
    }

    #[test]
    fn non_json_body_is_surfaced_verbatim() {
        let (url, _rx) = serve_once("200 OK", "not json");
        let err = CompareClient::new(url).compare(&request()).unwrap_err();
        assert!(matches!(err, CompareError::MalformedResponse { .. }));
        assert!(err.to_string().contains("not json"));
    }

    #[test]
    fn unreachable_service_is_a_transport_error() {
        // Grab a port that nothing is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = CompareClient::new(url).compare(&request()).unwrap_err();
        assert!(matches!(err, CompareError::Transport(_)));
    }

    #[test]
    fn trailing_slash_in_base_url_is_tolerated() {
        let body = r#"{"similarity_score":1.0,"insights":{"llm_explanation":"identical"},"images":{"image_a_uri":"u1","image_b_uri":"u2"}}"#;
        let (url, rx) = serve_once("200 OK", body);

        let client = CompareClient::new(format!("{url}/"));
        client.compare(&request()).unwrap();
        let sent = rx.recv().unwrap();
        assert!(sent.starts_with("POST /compare/ "));
    }
}
