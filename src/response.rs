//! Outgoing JSON response and the [`IntoResponse`] conversion trait.
//!
//! Every response userd writes is JSON, so a [`Response`] is just a status
//! and the already-serialised body bytes. Errors become responses through
//! [`IntoResponse`]; the dispatcher never builds an error body by hand.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;
use tracing::{debug, error};

use crate::body::BodyError;
use crate::error::{ServiceError, UNEXPECTED_ERROR};

/// Written when serialising a body fails; built by hand so it cannot fail.
const FALLBACK_BODY: &str = r#"{"code":500,"message":"Unexpected error occurred"}"#;

/// Message sent with 413.
pub const PAYLOAD_TOO_LARGE: &str = "Payload too large";

/// Shape of every error body: `{"code": 404, "message": "..."}`.
#[derive(Serialize)]
struct ErrorBody<'a> {
    code: u16,
    message: &'a str,
}

// ── Response ─────────────────────────────────────────────────────────────────

/// A finished response: status plus serialised JSON body.
#[derive(Clone, Debug)]
pub struct Response {
    status: StatusCode,
    body: Bytes,
}

impl Response {
    /// Serialises `value` as the body.
    ///
    /// A value that fails to serialise degrades to a 500 with the generic
    /// error body; the caller always gets a well-formed response back.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self { status, body: body.into() },
            Err(e) => {
                error!("failed to serialise response body: {e}");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: Bytes::from_static(FALLBACK_BODY.as_bytes()),
                }
            }
        }
    }

    /// `{code, message}` body whose `code` mirrors `status`.
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::json(status, &ErrorBody { code: status.as_u16(), message })
    }

    /// Status with no body bytes, e.g. `204 No Content`.
    pub fn empty(status: StatusCode) -> Self {
        Self { status, body: Bytes::new() }
    }

    pub fn status(&self) -> StatusCode { self.status }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Converts into the hyper response written to the wire.
    pub fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status;
        res.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        res
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into a [`Response`].
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

/// Validation and not-found messages are sent verbatim. Everything else is
/// logged and replaced by [`UNEXPECTED_ERROR`].
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(message) => Response::error(StatusCode::BAD_REQUEST, &message),
            Self::NotFound(message) => Response::error(StatusCode::NOT_FOUND, &message),
            Self::Unsupported => {
                debug!("unsupported operation on users collection");
                Response::error(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR)
            }
            Self::Other(message) => {
                error!(error = %message, "unclassified service failure");
                Response::error(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR)
            }
        }
    }
}

impl IntoResponse for BodyError {
    fn into_response(self) -> Response {
        match self {
            Self::TooLarge { .. } => Response::error(StatusCode::PAYLOAD_TOO_LARGE, PAYLOAD_TOO_LARGE),
            Self::Stream(_) => ServiceError::other(self.to_string()).into_response(),
        }
    }
}
