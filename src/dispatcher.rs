//! Request dispatch for the users collection.
//!
//! One request in, one response out:
//!
//! ```text
//! path ──► segments ──► route? ──no──► 404
//!                         │yes
//!                         ▼
//!                   read whole body ──err──► 413 / 500
//!                         │
//!                         ▼
//!       Operation::select(method, id) ──err──► 404 / 500
//!                         │
//!                         ▼
//!                 service call ──err──► 400 / 404 / 500
//!                         │
//!                         ▼
//!                   200 / 201 / 204
//! ```
//!
//! The dispatcher holds no per-request state; it is shared across every
//! connection behind an `Arc`.

use std::sync::Arc;

use http::{Method, Request, StatusCode};
use hyper::body::Body;
use tracing::debug;

use crate::body::{BoxError, read_to_string};
use crate::error::{RESOURCE_NOT_FOUND, ServiceError};
use crate::response::{IntoResponse, Response};
use crate::service::UsersService;

/// Default cap on request bodies: 1 MiB.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

// ── Routing ───────────────────────────────────────────────────────────────────

/// Non-empty path segments, in order.
fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Matches `api/users` and `api/users/{id}`. Anything longer, shorter or
/// differently named is not ours.
///
/// `None` means unmatched; `Some(id)` means the collection, with or without
/// an identifier segment.
fn route<'a>(segments: &[&'a str]) -> Option<Option<&'a str>> {
    match segments {
        ["api", "users"] => Some(None),
        ["api", "users", id] => Some(Some(*id)),
        _ => None,
    }
}

// ── Operation table ───────────────────────────────────────────────────────────

/// A service call selected from the request method and id segment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Operation<'a> {
    FindAll,
    FindOne(&'a str),
    Create,
    Update(Option<&'a str>),
    Remove(Option<&'a str>),
}

impl<'a> Operation<'a> {
    /// The full (method, id-presence) table.
    ///
    /// `POST` with an id is rejected outright; `PUT` and `DELETE` hand a
    /// missing id to the service, which rejects it.
    fn select(method: &Method, id: Option<&'a str>) -> Result<Self, ServiceError> {
        match (method, id) {
            (&Method::GET, None) => Ok(Self::FindAll),
            (&Method::GET, Some(id)) => Ok(Self::FindOne(id)),
            (&Method::POST, None) => Ok(Self::Create),
            (&Method::POST, Some(_)) => Err(ServiceError::not_found(RESOURCE_NOT_FOUND)),
            (&Method::PUT, id) => Ok(Self::Update(id)),
            (&Method::DELETE, id) => Ok(Self::Remove(id)),
            _ => Err(ServiceError::Unsupported),
        }
    }

    const fn success_status(self) -> StatusCode {
        match self {
            Self::FindAll | Self::FindOne(_) | Self::Update(_) => StatusCode::OK,
            Self::Create => StatusCode::CREATED,
            Self::Remove(_) => StatusCode::NO_CONTENT,
        }
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// Routes requests on `/api/users` to a [`UsersService`].
pub struct Dispatcher<S> {
    service: Arc<S>,
    max_body_size: usize,
}

impl<S> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self { service: Arc::clone(&self.service), max_body_size: self.max_body_size }
    }
}

impl<S: UsersService> Dispatcher<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service, max_body_size: DEFAULT_MAX_BODY_SIZE }
    }

    /// Bodies longer than `limit` bytes are answered with 413.
    pub fn max_body_size(mut self, limit: usize) -> Self {
        self.max_body_size = limit;
        self
    }

    /// Handles one request. Never fails: every error becomes a JSON response.
    pub async fn handle<B>(&self, req: Request<B>) -> Response
    where
        B: Body,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = req.into_parts();
        // The query stays attached: `users?x=1` is not `users`, and the
        // collection takes no query parameters.
        let path = parts.uri.path_and_query().map_or(parts.uri.path(), |pq| pq.as_str());

        let response = match route(&segments(path)) {
            Some(id) => self.dispatch(&parts.method, id, body).await,
            None => Response::error(StatusCode::NOT_FOUND, RESOURCE_NOT_FOUND),
        };

        debug!(method = %parts.method, path, status = response.status().as_u16(), "request handled");
        response
    }

    async fn dispatch<B>(&self, method: &Method, id: Option<&str>, body: B) -> Response
    where
        B: Body,
        B::Error: Into<BoxError>,
    {
        // Drained before anything else, whatever the method.
        let text = match read_to_string(body, self.max_body_size).await {
            Ok(text) => text,
            Err(e) => return e.into_response(),
        };

        let result = match Operation::select(method, id) {
            Ok(op) => self.invoke(op, &text).await,
            Err(e) => Err(e),
        };
        result.unwrap_or_else(|e| e.into_response())
    }

    async fn invoke(&self, op: Operation<'_>, body: &str) -> Result<Response, ServiceError> {
        let status = op.success_status();
        let response = match op {
            Operation::FindAll => Response::json(status, &self.service.find_all().await?),
            Operation::FindOne(id) => Response::json(status, &self.service.find_one(id).await?),
            Operation::Create => Response::json(status, &self.service.create(body).await?),
            Operation::Update(id) => Response::json(status, &self.service.update(id, body).await?),
            Operation::Remove(id) => {
                self.service.remove(id).await?;
                Response::empty(status)
            }
        };
        Ok(response)
    }
}
