//! The seam between the dispatcher and whatever stores users.
//!
//! The dispatcher is generic over [`UsersService`], so tests hand it a fake
//! and the binary hands it [`Users`](crate::Users). Implementations are
//! shared across concurrent requests and synchronise themselves.

use std::future::Future;

use crate::error::ServiceError;
use crate::users::User;

/// CRUD operations on the users collection.
///
/// Bodies arrive as raw text; parsing and validating them is the service's
/// job. `update` and `remove` receive `None` when the request path carried
/// no id, and must reject it.
pub trait UsersService: Send + Sync + 'static {
    fn find_all(&self) -> impl Future<Output = Result<Vec<User>, ServiceError>> + Send;

    fn find_one(&self, id: &str) -> impl Future<Output = Result<User, ServiceError>> + Send;

    fn create(&self, body: &str) -> impl Future<Output = Result<User, ServiceError>> + Send;

    fn update(
        &self,
        id: Option<&str>,
        body: &str,
    ) -> impl Future<Output = Result<User, ServiceError>> + Send;

    fn remove(&self, id: Option<&str>) -> impl Future<Output = Result<(), ServiceError>> + Send;
}
