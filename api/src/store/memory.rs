use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;
use webmail_types::{Email, NewEmail};

use super::{EmailStore, StoreError};
use crate::seed;

/// Process-local store, used when no database is configured.
#[derive(Clone, Default)]
pub struct MemoryEmailStore {
    emails: Arc<RwLock<Vec<Email>>>,
}

impl MemoryEmailStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the same five records the seed migration inserts.
    pub fn seeded() -> Self {
        let emails = seed::fixtures()
            .into_iter()
            .map(|(sent_at, email)| stored(email, sent_at))
            .collect();

        Self {
            emails: Arc::new(RwLock::new(emails)),
        }
    }

    async fn newest_first(&self, filter: impl Fn(&Email) -> bool) -> Vec<Email> {
        let mut emails: Vec<Email> = self
            .emails
            .read()
            .await
            .iter()
            .filter(|email| filter(*email))
            .cloned()
            .collect();
        emails.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        emails
    }
}

fn stored(email: NewEmail, at: DateTime<Utc>) -> Email {
    Email {
        id: Uuid::new_v4(),
        to: email.to,
        cc: email.cc,
        bcc: email.bcc,
        subject: email.subject,
        body: email.body,
        created_at: at,
        updated_at: at,
    }
}

impl EmailStore for MemoryEmailStore {
    async fn list_all(&self) -> Result<Vec<Email>, StoreError> {
        Ok(self.newest_first(|_| true).await)
    }

    async fn search(&self, term: &str) -> Result<Vec<Email>, StoreError> {
        Ok(self.newest_first(|email| email.contains(term)).await)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Email>, StoreError> {
        let emails = self.emails.read().await;
        Ok(emails.iter().find(|email| email.id == id).cloned())
    }

    async fn create(&self, email: NewEmail) -> Result<Email, StoreError> {
        // Postgres keeps microseconds
        let email = stored(email, Utc::now().trunc_subsecs(6));
        self.emails.write().await.push(email.clone());
        Ok(email)
    }

    async fn close(&self) {}
}
