use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;
use webmail_types::{Email, NewEmail};

use super::{EmailStore, StoreError};

#[derive(Debug, sqlx::FromRow)]
struct EmailRow {
    id: Uuid,
    to: String,
    cc: String,
    bcc: String,
    subject: String,
    body: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EmailRow> for Email {
    fn from(row: EmailRow) -> Self {
        Email {
            id: row.id,
            to: row.to,
            cc: row.cc,
            bcc: row.bcc,
            subject: row.subject,
            body: row.body,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgEmailStore {
    db: sqlx::Pool<sqlx::Postgres>,
}

impl PgEmailStore {
    pub fn new(db: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self { db }
    }

    /// Opens the pool and brings the schema (and seed rows) up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&db).await?;
        tracing::info!("Connected to postgres, migrations applied");

        Ok(Self::new(db))
    }
}

impl EmailStore for PgEmailStore {
    async fn list_all(&self) -> Result<Vec<Email>, StoreError> {
        let rows = sqlx::query_as::<_, EmailRow>(
            r#"
            SELECT id, "to", cc, bcc, subject, body, created_at, updated_at
            FROM emails
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Email::from).collect())
    }

    async fn search(&self, term: &str) -> Result<Vec<Email>, StoreError> {
        // strpos keeps the match literal, LIKE would treat % and _ as wildcards
        let rows = sqlx::query_as::<_, EmailRow>(
            r#"
            SELECT id, "to", cc, bcc, subject, body, created_at, updated_at
            FROM emails
            WHERE (
                strpos("to", $1) > 0
                OR strpos(cc, $1) > 0
                OR strpos(bcc, $1) > 0
                OR strpos(subject, $1) > 0
                OR strpos(body, $1) > 0
            )
            ORDER BY created_at DESC
            "#,
        )
        .bind(term)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Email::from).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Email>, StoreError> {
        let row = sqlx::query_as::<_, EmailRow>(
            r#"
            SELECT id, "to", cc, bcc, subject, body, created_at, updated_at
            FROM emails
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Email::from))
    }

    async fn create(&self, email: NewEmail) -> Result<Email, StoreError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, EmailRow>(
            r#"
            INSERT INTO emails ("to", cc, bcc, subject, body, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, "to", cc, bcc, subject, body, created_at, updated_at
            "#,
        )
        .bind(email.to)
        .bind(email.cc)
        .bind(email.bcc)
        .bind(email.subject)
        .bind(email.body)
        .bind(now)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn close(&self) {
        self.db.close().await;
    }
}
