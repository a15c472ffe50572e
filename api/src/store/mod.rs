//! Persistence for email records.

use uuid::Uuid;
use webmail_types::{Email, NewEmail};

mod memory;
mod postgres;

pub use memory::MemoryEmailStore;
pub use postgres::PgEmailStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// List, search, fetch and create operations over the email table.
///
/// Every listing is ordered by `created_at`, newest first.
pub trait EmailStore: Clone + Send + Sync + 'static {
    fn list_all(&self) -> impl Future<Output = Result<Vec<Email>, StoreError>> + Send;

    /// Records where `term` is a substring of `to`, `cc`, `bcc`, `subject`
    /// or `body`. Matching is literal and case-sensitive.
    fn search(&self, term: &str) -> impl Future<Output = Result<Vec<Email>, StoreError>> + Send;

    fn get_by_id(&self, id: Uuid)
    -> impl Future<Output = Result<Option<Email>, StoreError>> + Send;

    /// Assigns the id and timestamps, persists, and returns the stored record.
    fn create(&self, email: NewEmail) -> impl Future<Output = Result<Email, StoreError>> + Send;

    fn close(&self) -> impl Future<Output = ()> + Send;
}
