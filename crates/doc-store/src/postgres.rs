use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use uuid::Uuid;

use common::AggregateId;

use crate::{DocumentRecord, Result, store::DocumentStore};

/// PostgreSQL-backed document store.
///
/// Documents live in a single `documents` table keyed by
/// `(collection, id)` with a JSONB body; sessions map directly onto
/// database transactions, so isolation and conflict detection are the
/// database's.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new PostgreSQL document store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_record(row: PgRow) -> Result<DocumentRecord> {
        Ok(DocumentRecord {
            id: AggregateId::from_uuid(row.try_get::<Uuid, _>("id")?),
            body: row.try_get("body")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    type Session = Transaction<'static, Postgres>;

    async fn begin(&self) -> Result<Self::Session> {
        Ok(self.pool.begin().await?)
    }

    async fn commit(&self, session: Self::Session) -> Result<()> {
        session.commit().await?;
        Ok(())
    }

    async fn abort(&self, session: Self::Session) -> Result<()> {
        session.rollback().await?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: AggregateId,
        session: &mut Self::Session,
    ) -> Result<Option<DocumentRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, body, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id.as_uuid())
        .fetch_optional(&mut **session)
        .await?;

        row.map(Self::row_to_record).transpose()
    }

    #[tracing::instrument(skip(self, record, session), fields(id = %record.id))]
    async fn upsert(
        &self,
        collection: &str,
        record: DocumentRecord,
        session: &mut Self::Session,
    ) -> Result<DocumentRecord> {
        let row = sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (collection, id)
            DO UPDATE SET body = EXCLUDED.body, updated_at = EXCLUDED.updated_at
            RETURNING id, body, created_at, updated_at
            "#,
        )
        .bind(collection)
        .bind(record.id.as_uuid())
        .bind(&record.body)
        .bind(record.created_at)
        .bind(Utc::now())
        .fetch_one(&mut **session)
        .await?;

        metrics::counter!("documents_upserted", "collection" => collection.to_string())
            .increment(1);
        Self::row_to_record(row)
    }

    #[tracing::instrument(skip(self, session), fields(id = %id))]
    async fn delete(
        &self,
        collection: &str,
        id: AggregateId,
        session: &mut Self::Session,
    ) -> Result<()> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_uuid())
            .execute(&mut **session)
            .await?;
        metrics::counter!("documents_deleted", "collection" => collection.to_string())
            .increment(1);
        Ok(())
    }
}
