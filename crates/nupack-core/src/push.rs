//! Upload of a built package to a package source.

use std::time::{Duration, Instant};

use reqwest::Client;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Header carrying the publisher's API key.
pub const API_KEY_HEADER: &str = "X-NuGet-ApiKey";

/// Multipart field and file name of the uploaded package.
const PACKAGE_FIELD: &str = "package";
const PACKAGE_FILE_NAME: &str = "package.nupkg";

/// Errors that prevent a push from producing a response.
#[derive(Error, Debug)]
pub enum PushError {
    /// No package source was configured.
    #[error("No package source specified")]
    MissingSource,

    /// The request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// What the source answered and how long it took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushOutcome {
    /// Response status, successful or not.
    pub status: StatusCode,
    /// Wall time from sending the request to receiving the response.
    pub elapsed: Duration,
}

impl PushOutcome {
    /// Whether the source accepted the package (2xx).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// PUT `package` to `source` as a multipart upload.
///
/// A blank `api_key` is treated as absent. Non-2xx responses are returned as
/// an outcome rather than an error; only a missing source or a transport
/// failure is an `Err`.
pub async fn push_package(
    client: &Client,
    package: Vec<u8>,
    api_key: Option<&str>,
    source: &str,
) -> Result<PushOutcome, PushError> {
    let source = source.trim();
    if source.is_empty() {
        return Err(PushError::MissingSource);
    }

    let size = package.len();
    let part = Part::bytes(package)
        .file_name(PACKAGE_FILE_NAME)
        .mime_str("application/octet-stream")?;
    let form = Form::new().part(PACKAGE_FIELD, part);

    let mut request = client
        .put(source)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .multipart(form);
    let api_key = api_key.filter(|k| !k.trim().is_empty());
    if let Some(key) = api_key {
        request = request.header(API_KEY_HEADER, key);
    }

    debug!(source, bytes = size, with_key = api_key.is_some(), "pushing package");
    let started = Instant::now();
    let response = request.send().await?;
    let outcome = PushOutcome {
        status: response.status(),
        elapsed: started.elapsed(),
    };

    if outcome.is_success() {
        info!(source, status = %outcome.status, elapsed_ms = outcome.elapsed.as_millis(), "pushed");
    } else {
        warn!(source, status = %outcome.status, "source rejected package");
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_push_sends_multipart_with_key() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("PUT", "/api/v2/package")
            .match_header(API_KEY_HEADER, "secret")
            .match_header("user-agent", crate::USER_AGENT)
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::Regex(
                r#"name="package"; filename="package.nupkg""#.to_string(),
            ))
            .with_status(201)
            .create_async()
            .await;

        let url = format!("{}/api/v2/package", server.url());
        let outcome = push_package(&Client::new(), b"PK\x03\x04".to_vec(), Some("secret"), &url)
            .await
            .unwrap();

        m.assert_async().await;
        assert_eq!(outcome.status, StatusCode::CREATED);
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_push_without_key_omits_header() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("PUT", "/")
            .match_header(API_KEY_HEADER, Matcher::Missing)
            .with_status(200)
            .create_async()
            .await;

        let outcome = push_package(&Client::new(), vec![1, 2, 3], None, &server.url())
            .await
            .unwrap();

        m.assert_async().await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_blank_key_omits_header() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("PUT", "/")
            .match_header(API_KEY_HEADER, Matcher::Missing)
            .with_status(200)
            .create_async()
            .await;

        let outcome = push_package(&Client::new(), vec![1], Some(""), &server.url())
            .await
            .unwrap();

        m.assert_async().await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_rejection_is_an_outcome() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("PUT", "/")
            .with_status(409)
            .with_body("conflict")
            .create_async()
            .await;

        let outcome = push_package(&Client::new(), vec![0], Some("k"), &server.url())
            .await
            .unwrap();
        assert_eq!(outcome.status, StatusCode::CONFLICT);
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_blank_source_fails_before_io() {
        let err = push_package(&Client::new(), vec![0], None, "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, PushError::MissingSource));
    }

    #[tokio::test]
    async fn test_unreachable_source_is_http_error() {
        let err = push_package(&Client::new(), vec![0], None, "http://127.0.0.1:1/")
            .await
            .unwrap_err();
        assert!(matches!(err, PushError::Http(_)));
    }
}
