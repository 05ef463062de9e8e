//! userd binary.
//!
//! Run with:
//!   RUST_LOG=userd=debug cargo run
//!
//! Try:
//!   curl http://localhost:3000/api/users
//!   curl -X POST http://localhost:3000/api/users \
//!        -d '{"username":"ann","age":31,"hobbies":["chess"]}'
//!   curl -X DELETE http://localhost:3000/api/users/<id>

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use userd::{Config, Dispatcher, Server, Users, UsersRepository};

#[tokio::main]
async fn main() -> Result<(), userd::Error> {
    let config = Config::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let repository = Arc::new(UsersRepository::new());
    let service = Arc::new(Users::new(repository));
    let app = Dispatcher::new(service).max_body_size(config.http.max_body_size);

    Server::bind(config.socket_addr()?).serve(app).await
}
