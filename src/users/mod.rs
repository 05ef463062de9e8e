//! The users collection: entity, in-memory repository and service.

mod model;
mod repository;
mod service;

pub use model::{User, UserInput};
pub use repository::UsersRepository;
pub use service::Users;
