//! The user entity and the payload accepted to create or replace one.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServiceError;

/// A stored user.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub age: u32,
    pub hobbies: Vec<String>,
}

impl User {
    pub fn new(id: Uuid, input: UserInput) -> Self {
        let UserInput { username, age, hobbies } = input;
        Self { id, username, age, hobbies }
    }
}

/// Fields a client supplies on `POST` and `PUT`. All are required.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UserInput {
    pub username: String,
    pub age: u32,
    pub hobbies: Vec<String>,
}

impl UserInput {
    /// Parses and validates a request body.
    pub fn parse(body: &str) -> Result<Self, ServiceError> {
        let input: Self = serde_json::from_str(body)
            .map_err(|e| ServiceError::validation(format!("Invalid request body: {e}")))?;

        if input.username.trim().is_empty() {
            return Err(ServiceError::validation("Invalid request body: username must not be empty"));
        }
        Ok(input)
    }
}
