//! # userd
//!
//! A minimal JSON service for one collection: `/api/users`.
//!
//! ## The contract
//!
//! | Request | Service call | Success |
//! |---|---|---|
//! | `GET /api/users` | `find_all()` | 200 |
//! | `GET /api/users/{id}` | `find_one(id)` | 200 |
//! | `POST /api/users` | `create(body)` | 201 |
//! | `PUT /api/users/{id}` | `update(id, body)` | 200 |
//! | `DELETE /api/users/{id}` | `remove(id)` | 204 |
//!
//! Every other path is a 404. Failures come back as `{"code", "message"}`:
//! validation → 400, not found → 404, oversized body → 413, anything else →
//! 500 with a generic message. Internal error text is logged, never sent.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use userd::{Dispatcher, Server, Users, UsersRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), userd::Error> {
//!     let users = Users::new(Arc::new(UsersRepository::new()));
//!     let app = Dispatcher::new(Arc::new(users));
//!
//!     Server::bind("0.0.0.0:3000".parse().unwrap()).serve(app).await
//! }
//! ```
//!
//! The dispatcher only knows the [`UsersService`] trait; swap in any
//! implementation, including a fake in tests.

mod body;
mod config;
mod dispatcher;
mod error;
mod response;
mod server;
mod service;

pub mod users;

pub use body::{BodyError, BoxError, read_to_string};
pub use crate::config::{Config, HttpConfig, LoggingConfig, ServerConfig};
pub use dispatcher::{DEFAULT_MAX_BODY_SIZE, Dispatcher};
pub use error::{Error, RESOURCE_NOT_FOUND, ServiceError, UNEXPECTED_ERROR};
pub use response::{IntoResponse, PAYLOAD_TOO_LARGE, Response};
pub use server::{Server, serve_with_shutdown};
pub use service::UsersService;
pub use users::{User, UserInput, Users, UsersRepository};
