//! Claims repository implementation
//!
//! Database access for claims and their supporting documents. Documents are
//! written in the same transaction as their claim and removed with it by the
//! `ON DELETE CASCADE` foreign key.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::error::DatabaseError;

const CLAIM_COLUMNS: &str = "claim_id, lecturer_id, period, hours_worked, rate, currency, \
     status, submitted_at, processed_at, processed_by, paid_at, paid_by, note";

const DOCUMENT_COLUMNS: &str = "document_id, claim_id, file_name, stored_file_name, \
     content_type, file_size, uploaded_at, description";

/// Repository for claims data
#[derive(Debug, Clone)]
pub struct ClaimRepository {
    pool: PgPool,
}

impl ClaimRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a claim by its identifier
    pub async fn get_by_id(&self, claim_id: Uuid) -> Result<ClaimRow, DatabaseError> {
        let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = $1");
        sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Claim", claim_id))
    }

    /// Finds claims matching the filter
    pub async fn find(&self, filter: &ClaimFilter) -> Result<Vec<ClaimRow>, DatabaseError> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE TRUE"
        ));
        push_filters(&mut query, filter);
        query.push(match filter.order {
            ClaimSort::SubmittedDesc => " ORDER BY submitted_at DESC, claim_id",
            ClaimSort::SubmittedAsc => " ORDER BY submitted_at ASC, claim_id",
        });
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        let rows = query.build_query_as::<ClaimRow>().fetch_all(&self.pool).await?;
        debug!(count = rows.len(), "Loaded claims");
        Ok(rows)
    }

    /// Counts claims matching the filter; ordering and limit are ignored
    pub async fn count(&self, filter: &ClaimFilter) -> Result<i64, DatabaseError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM claims WHERE TRUE");
        push_filters(&mut query, filter);
        Ok(query.build_query_scalar::<i64>().fetch_one(&self.pool).await?)
    }

    /// Loads the documents of several claims
    pub async fn documents_for(&self, claim_ids: &[Uuid]) -> Result<Vec<DocumentRow>, DatabaseError> {
        if claim_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM supporting_documents \
             WHERE claim_id = ANY($1) ORDER BY uploaded_at, document_id"
        );
        Ok(sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(claim_ids)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Inserts a claim and its documents in one transaction
    pub async fn insert(&self, claim: &ClaimRow, documents: &[DocumentRow]) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO claims (
                claim_id, lecturer_id, period, hours_worked, rate, currency,
                status, submitted_at, processed_at, processed_by, paid_at, paid_by, note
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(claim.claim_id)
        .bind(claim.lecturer_id)
        .bind(claim.period)
        .bind(claim.hours_worked)
        .bind(claim.rate)
        .bind(&claim.currency)
        .bind(claim.status)
        .bind(claim.submitted_at)
        .bind(claim.processed_at)
        .bind(&claim.processed_by)
        .bind(claim.paid_at)
        .bind(&claim.paid_by)
        .bind(&claim.note)
        .execute(&mut *tx)
        .await?;

        for doc in documents {
            sqlx::query(
                r#"
                INSERT INTO supporting_documents (
                    document_id, claim_id, file_name, stored_file_name,
                    content_type, file_size, uploaded_at, description
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(doc.document_id)
            .bind(doc.claim_id)
            .bind(&doc.file_name)
            .bind(&doc.stored_file_name)
            .bind(&doc.content_type)
            .bind(doc.file_size)
            .bind(doc.uploaded_at)
            .bind(&doc.description)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Writes the status, decision and payment columns of one claim
    pub async fn update_state(&self, claim: &ClaimRow) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        update_state_in(&mut tx, claim).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Writes several claims in one transaction; any failure rolls back all of them
    pub async fn update_state_batch(&self, claims: &[ClaimRow]) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        for claim in claims {
            update_state_in(&mut tx, claim).await?;
        }
        tx.commit().await?;
        debug!(count = claims.len(), "Committed claim batch");
        Ok(())
    }

    /// Deletes a claim; its documents go with it
    pub async fn delete(&self, claim_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM claims WHERE claim_id = $1")
            .bind(claim_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Claim", claim_id));
        }
        Ok(())
    }

    /// Round trip used by health checks
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &ClaimFilter) {
    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status);
    }
    if let Some(lecturer_id) = filter.lecturer_id {
        query.push(" AND lecturer_id = ").push_bind(lecturer_id);
    }
    if let Some(from) = filter.period_from {
        query.push(" AND period >= ").push_bind(from);
    }
    if let Some(to) = filter.period_to {
        query.push(" AND period <= ").push_bind(to);
    }
    match filter.paid {
        Some(true) => {
            query.push(" AND paid_at IS NOT NULL");
        }
        Some(false) => {
            query.push(" AND paid_at IS NULL");
        }
        None => {}
    }
}

async fn update_state_in(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    claim: &ClaimRow,
) -> Result<(), DatabaseError> {
    let result = sqlx::query(
        r#"
        UPDATE claims
        SET status = $2, processed_at = $3, processed_by = $4, paid_at = $5, paid_by = $6
        WHERE claim_id = $1
        "#,
    )
    .bind(claim.claim_id)
    .bind(claim.status)
    .bind(claim.processed_at)
    .bind(&claim.processed_by)
    .bind(claim.paid_at)
    .bind(&claim.paid_by)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Claim", claim.claim_id));
    }
    Ok(())
}

/// Row filter for claim queries
#[derive(Debug, Clone, Default)]
pub struct ClaimFilter {
    pub status: Option<ClaimStatus>,
    pub lecturer_id: Option<Uuid>,
    pub period_from: Option<NaiveDate>,
    pub period_to: Option<NaiveDate>,
    pub paid: Option<bool>,
    pub order: ClaimSort,
    pub limit: Option<i64>,
}

/// Row ordering for claim queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClaimSort {
    #[default]
    SubmittedDesc,
    SubmittedAsc,
}

/// Claim status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_status", rename_all = "snake_case")]
pub enum ClaimStatus {
    Submitted,
    Approved,
    Rejected,
}

/// Database row for a claim
#[derive(Debug, Clone, FromRow)]
pub struct ClaimRow {
    pub claim_id: Uuid,
    pub lecturer_id: Uuid,
    pub period: NaiveDate,
    pub hours_worked: Decimal,
    pub rate: Decimal,
    pub currency: String,
    pub status: ClaimStatus,
    pub submitted_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub paid_by: Option<String>,
    pub note: Option<String>,
}

/// Database row for a supporting document
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub document_id: Uuid,
    pub claim_id: Uuid,
    pub file_name: String,
    pub stored_file_name: String,
    pub content_type: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
    pub description: Option<String>,
}
