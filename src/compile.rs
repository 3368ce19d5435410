//! Submission of assembled documents to the remote LaTeX build service.
//!
//! The service takes a JSON body naming the compiler and a list of
//! resources: the main document plus the logo referenced by the skeleton.
//! It answers with the PDF bytes or with a JSON error object.

use crate::config::CompileSettings;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// File name under which the logo is uploaded; the skeleton includes it
/// with `\includegraphics`.
pub const LOGO_PATH: &str = "cds jnu logo.png";

const LOGO_BASE64: &str = include_str!("../assets/logo.png.b64");

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Failure of a compile request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The request did not finish within the configured timeout.
    #[error("LaTeX API request timed out")]
    Timeout,

    /// The request could not be sent or the response could not be read.
    #[error("LaTeX API request failed: {message}")]
    Transport {
        /// Underlying network error
        message: String,
    },

    /// The service reported a failure, usually a LaTeX error.
    #[error("LaTeX compilation failed (HTTP {status}): {message}")]
    Remote {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response
        message: String,
    },

    /// The service answered with something other than a PDF or an error object.
    #[error("{message}")]
    Protocol {
        /// Description of the anomaly
        message: String,
    },
}

impl CompileError {
    /// Returns true for failures worth retrying unchanged.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Transport { .. })
    }
}

/// One file of a compile request.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Resource<'a> {
    /// The entry document.
    Main { main: bool, content: &'a str },
    /// An auxiliary file, base64 encoded.
    Asset { path: &'a str, file: &'a str },
}

/// Request body of the build service.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CompileRequest<'a> {
    pub compiler: &'a str,
    pub resources: Vec<Resource<'a>>,
}

impl<'a> CompileRequest<'a> {
    /// Packs `document` together with the embedded logo.
    #[must_use]
    pub fn new(compiler: &'a str, document: &'a str) -> Self {
        Self {
            compiler,
            resources: vec![
                Resource::Main {
                    main: true,
                    content: document,
                },
                Resource::Asset {
                    path: LOGO_PATH,
                    file: logo_base64(),
                },
            ],
        }
    }
}

/// The embedded logo as base64 text.
#[must_use]
pub fn logo_base64() -> &'static str {
    LOGO_BASE64.trim()
}

/// JSON error object of the service.
struct ErrorBody {
    message: Option<String>,
}

/// Returns `None` unless `body` is JSON.
fn error_body(body: &[u8]) -> Option<ErrorBody> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let message = match value.get("error") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Null | Value::String(_)) | None => None,
        Some(other) => Some(other.to_string()),
    };
    Some(ErrorBody { message })
}

/// Maps a service response to the PDF bytes or a typed error.
///
/// # Errors
///
/// - [`CompileError::Remote`] when the service reports a failure, either
///   with a non-success status or with an error object
/// - [`CompileError::Protocol`] for a success status whose body is neither
///   a PDF nor JSON
pub fn interpret_response(
    status: u16,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<Vec<u8>, CompileError> {
    let success = (200..300).contains(&status);

    if success {
        if content_type.is_some_and(|ct| ct.contains(PDF_CONTENT_TYPE)) {
            return Ok(body.to_vec());
        }
        return match error_body(body) {
            Some(parsed) => Err(CompileError::Remote {
                status,
                message: parsed
                    .message
                    .unwrap_or_else(|| "Unknown compilation error".to_string()),
            }),
            None => Err(CompileError::Protocol {
                message: format!(
                    "Unexpected response from LaTeX API (content type '{}')",
                    content_type.unwrap_or("none")
                ),
            }),
        };
    }

    let message = error_body(body)
        .and_then(|parsed| parsed.message)
        .unwrap_or_else(|| format!("LaTeX API returned status {status}"));
    Err(CompileError::Remote { status, message })
}

/// Something that turns a LaTeX document into PDF bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Compiles `document`; never retries on its own.
    async fn compile(&self, document: &str) -> Result<Vec<u8>, CompileError>;
}

/// [`Compiler`] backed by the remote build service.
#[derive(Debug, Clone)]
pub struct RemoteCompiler {
    client: reqwest::Client,
    settings: CompileSettings,
}

impl RemoteCompiler {
    /// Creates a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Transport`] if the HTTP client cannot be built.
    pub fn new(settings: &CompileSettings) -> Result<Self, CompileError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            settings: settings.clone(),
        })
    }
}

fn transport_error(err: reqwest::Error) -> CompileError {
    if err.is_timeout() {
        CompileError::Timeout
    } else {
        CompileError::Transport {
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl Compiler for RemoteCompiler {
    #[instrument(skip_all, fields(endpoint = %self.settings.endpoint, bytes = document.len()))]
    async fn compile(&self, document: &str) -> Result<Vec<u8>, CompileError> {
        let started = Instant::now();
        let request = CompileRequest::new(&self.settings.compiler, document);

        debug!("Submitting document to {}", self.settings.endpoint);
        let response = self
            .client
            .post(&self.settings.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await.map_err(transport_error)?;

        info!(
            "LaTeX API answered {} with {} bytes in {:?}",
            status,
            body.len(),
            started.elapsed()
        );

        interpret_response(status, content_type.as_deref(), &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = CompileRequest::new("pdflatex", "\\documentclass{article}");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["compiler"], "pdflatex");
        assert_eq!(json["resources"].as_array().unwrap().len(), 2);
        assert_eq!(
            json["resources"][0],
            serde_json::json!({ "main": true, "content": "\\documentclass{article}" })
        );
        assert_eq!(json["resources"][1]["path"], "cds jnu logo.png");
        assert_eq!(json["resources"][1]["file"], logo_base64());
        assert!(json["resources"][1].get("main").is_none());
    }

    #[test]
    fn test_logo_is_png_base64() {
        let logo = logo_base64();
        assert!(logo.starts_with("iVBORw0KGgo"));
        assert!(!logo.contains(char::is_whitespace));
    }

    #[test]
    fn test_pdf_response() {
        let body = b"%PDF-1.5 ...";
        let pdf = interpret_response(200, Some("application/pdf"), body).unwrap();
        assert_eq!(pdf, body.to_vec());

        let created = interpret_response(201, Some("application/pdf; charset=binary"), body);
        assert!(created.is_ok());
    }

    #[test]
    fn test_success_with_error_object() {
        let err = interpret_response(
            200,
            Some("application/json"),
            br#"{"error": "Undefined control sequence"}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CompileError::Remote {
                status: 200,
                message: "Undefined control sequence".to_string()
            }
        );
    }

    #[test]
    fn test_success_with_json_without_message() {
        let err = interpret_response(200, Some("application/json"), b"{}").unwrap_err();
        assert!(err.to_string().contains("Unknown compilation error"));
    }

    #[test]
    fn test_success_with_garbage() {
        let err = interpret_response(200, Some("text/html"), b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, CompileError::Protocol { .. }));
        assert!(err.to_string().contains("Unexpected response from LaTeX API"));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_missing_content_type_is_not_pdf() {
        let err = interpret_response(200, None, b"%PDF").unwrap_err();
        assert!(matches!(err, CompileError::Protocol { .. }));
    }

    #[test]
    fn test_failure_status_with_message() {
        let err = interpret_response(400, Some("application/json"), br#"{"error": "LaTeX Error"}"#)
            .unwrap_err();
        assert_eq!(
            err,
            CompileError::Remote {
                status: 400,
                message: "LaTeX Error".to_string()
            }
        );
    }

    #[test]
    fn test_failure_status_falls_back_to_code() {
        let err = interpret_response(502, Some("text/html"), b"Bad Gateway").unwrap_err();
        assert_eq!(
            err,
            CompileError::Remote {
                status: 502,
                message: "LaTeX API returned status 502".to_string()
            }
        );

        let err = interpret_response(500, Some("application/json"), br#"{"detail": "x"}"#).unwrap_err();
        assert!(err.to_string().contains("status 500"));
    }

    #[test]
    fn test_transient_kinds() {
        assert!(CompileError::Timeout.is_transient());
        assert!(CompileError::Transport {
            message: "connection refused".to_string()
        }
        .is_transient());
        assert!(!CompileError::Remote {
            status: 400,
            message: String::new()
        }
        .is_transient());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transient() {
        let settings = CompileSettings {
            endpoint: "http://127.0.0.1:9/builds/sync".to_string(),
            timeout: std::time::Duration::from_secs(2),
            ..CompileSettings::default()
        };
        let compiler = RemoteCompiler::new(&settings).unwrap();

        let err = compiler
            .compile("\\documentclass{article}")
            .await
            .unwrap_err();

        assert!(
            matches!(err, CompileError::Transport { .. } | CompileError::Timeout),
            "unexpected error: {err:?}"
        );
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_mock_compiler() {
        let mut compiler = MockCompiler::new();
        compiler
            .expect_compile()
            .withf(|doc| doc.contains("\\begin{document}"))
            .times(1)
            .returning(|_| Ok(b"%PDF".to_vec()));

        let pdf = compiler.compile("\\begin{document}\\end{document}").await.unwrap();
        assert_eq!(pdf, b"%PDF".to_vec());
    }
}
