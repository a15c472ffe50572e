//! REST API over a table of emails: list, search, fetch by id and create.

pub mod config;
pub mod error;
pub mod routes;
pub mod seed;
pub mod store;

pub use config::Config;
pub use error::ApiError;
pub use routes::router;
pub use store::{EmailStore, MemoryEmailStore, PgEmailStore, StoreError};
