//! [`UsersService`] backed by [`UsersRepository`].

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::model::{User, UserInput};
use super::repository::UsersRepository;
use crate::error::ServiceError;
use crate::service::UsersService;

const INVALID_ID: &str = "Invalid user id";
const USER_NOT_FOUND: &str = "User not found";

/// The users service: id and payload validation in front of a repository.
#[derive(Clone, Debug)]
pub struct Users {
    repository: Arc<UsersRepository>,
}

impl Users {
    pub fn new(repository: Arc<UsersRepository>) -> Self {
        Self { repository }
    }
}

/// A missing id is as invalid as a malformed one.
fn parse_id(id: Option<&str>) -> Result<Uuid, ServiceError> {
    id.and_then(|raw| Uuid::try_parse(raw).ok())
        .ok_or_else(|| ServiceError::validation(INVALID_ID))
}

impl UsersService for Users {
    async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.repository.find_all().await)
    }

    async fn find_one(&self, id: &str) -> Result<User, ServiceError> {
        let id = parse_id(Some(id))?;
        self.repository
            .find_one(id)
            .await
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))
    }

    async fn create(&self, body: &str) -> Result<User, ServiceError> {
        let input = UserInput::parse(body)?;
        let user = self.repository.insert(User::new(Uuid::new_v4(), input)).await;
        debug!(id = %user.id, "user created");
        Ok(user)
    }

    async fn update(&self, id: Option<&str>, body: &str) -> Result<User, ServiceError> {
        let id = parse_id(id)?;
        let input = UserInput::parse(body)?;
        self.repository
            .replace(User::new(id, input))
            .await
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))
    }

    async fn remove(&self, id: Option<&str>) -> Result<(), ServiceError> {
        let id = parse_id(id)?;
        if self.repository.delete(id).await {
            debug!(%id, "user removed");
            Ok(())
        } else {
            Err(ServiceError::not_found(USER_NOT_FOUND))
        }
    }
}
