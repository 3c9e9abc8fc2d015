//! PostgreSQL Claim Store Adapter
//!
//! Implements `ClaimStore` on top of `ClaimRepository`, converting between
//! row types and the `Claim` aggregate. Rows that break the claim
//! invariants surface as `PortError::Internal` instead of being loaded.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresClaimStore;
//! use domain_claims::ClaimStore;
//! use std::sync::Arc;
//!
//! let store: Arc<dyn ClaimStore> = Arc::new(PostgresClaimStore::new(pool));
//! let claim = store.get_claim(claim_id).await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    AdapterHealth, ClaimId, ClaimPeriod, Currency, DocumentId, DomainPort, HealthCheckResult,
    HealthCheckable, PortError, UserId,
};
use domain_claims::{
    Claim, ClaimOrder, ClaimParts, ClaimQuery, ClaimStatus, ClaimStore, PaymentStamp,
    SupportingDocument,
};

use crate::repositories::claims::{
    ClaimFilter, ClaimRepository, ClaimRow, ClaimSort, ClaimStatus as DbClaimStatus, DocumentRow,
};

/// PostgreSQL-backed implementation of `ClaimStore`
#[derive(Debug, Clone)]
pub struct PostgresClaimStore {
    repository: ClaimRepository,
}

impl PostgresClaimStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimRepository::new(pool),
        }
    }

    /// The underlying repository, for operations the port does not expose
    pub fn repository(&self) -> &ClaimRepository {
        &self.repository
    }

    async fn with_documents(&self, rows: Vec<ClaimRow>) -> Result<Vec<Claim>, PortError> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.claim_id).collect();
        let mut documents: HashMap<Uuid, Vec<DocumentRow>> = HashMap::new();
        for doc in self.repository.documents_for(&ids).await? {
            documents.entry(doc.claim_id).or_default().push(doc);
        }

        rows.into_iter()
            .map(|row| {
                let docs = documents.remove(&row.claim_id).unwrap_or_default();
                row_to_claim(row, docs)
            })
            .collect()
    }
}

impl DomainPort for PostgresClaimStore {}

#[async_trait]
impl HealthCheckable for PostgresClaimStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();
        let result = self.repository.ping().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(()) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
        };
        HealthCheckResult {
            adapter_id: "postgres-claim-store".to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl ClaimStore for PostgresClaimStore {
    #[instrument(skip(self, claim), fields(claim_id = %claim.id))]
    async fn insert_claim(&self, claim: &Claim) -> Result<(), PortError> {
        let documents: Vec<DocumentRow> = claim.documents.iter().map(document_to_row).collect();
        self.repository
            .insert(&claim_to_row(claim), &documents)
            .await?;
        debug!(documents = documents.len(), "Inserted claim");
        Ok(())
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
        let row = self.repository.get_by_id(*id.as_uuid()).await?;
        let mut claims = self.with_documents(vec![row]).await?;
        claims
            .pop()
            .ok_or_else(|| PortError::not_found("Claim", id))
    }

    #[instrument(skip(self, claim), fields(claim_id = %claim.id))]
    async fn update_claim(&self, claim: &Claim) -> Result<(), PortError> {
        Ok(self.repository.update_state(&claim_to_row(claim)).await?)
    }

    #[instrument(skip(self, claims), fields(count = claims.len()))]
    async fn update_claims_atomically(&self, claims: &[Claim]) -> Result<(), PortError> {
        let rows: Vec<ClaimRow> = claims.iter().map(claim_to_row).collect();
        Ok(self.repository.update_state_batch(&rows).await?)
    }

    #[instrument(skip(self, query))]
    async fn find_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, PortError> {
        let rows = self.repository.find(&query_to_filter(query)).await?;
        self.with_documents(rows).await
    }

    async fn count_claims(&self, query: &ClaimQuery) -> Result<u64, PortError> {
        let count = self.repository.count(&query_to_filter(query)).await?;
        Ok(count.max(0) as u64)
    }
}

// =============================================================================
// Conversion Functions
// =============================================================================

fn query_to_filter(query: &ClaimQuery) -> ClaimFilter {
    ClaimFilter {
        status: query.status.map(status_to_db),
        lecturer_id: query.lecturer_id.map(|id| *id.as_uuid()),
        period_from: query.period_from.map(|p| p.first_day()),
        period_to: query.period_to.map(|p| p.first_day()),
        paid: query.paid,
        order: match query.order {
            ClaimOrder::SubmittedDesc => ClaimSort::SubmittedDesc,
            ClaimOrder::SubmittedAsc => ClaimSort::SubmittedAsc,
        },
        limit: query.limit.map(i64::from),
    }
}

fn status_to_db(status: ClaimStatus) -> DbClaimStatus {
    match status {
        ClaimStatus::Submitted => DbClaimStatus::Submitted,
        ClaimStatus::Approved => DbClaimStatus::Approved,
        ClaimStatus::Rejected => DbClaimStatus::Rejected,
    }
}

fn status_from_db(status: DbClaimStatus) -> ClaimStatus {
    match status {
        DbClaimStatus::Submitted => ClaimStatus::Submitted,
        DbClaimStatus::Approved => ClaimStatus::Approved,
        DbClaimStatus::Rejected => ClaimStatus::Rejected,
    }
}

fn claim_to_row(claim: &Claim) -> ClaimRow {
    ClaimRow {
        claim_id: *claim.id.as_uuid(),
        lecturer_id: *claim.lecturer_id.as_uuid(),
        period: claim.period.first_day(),
        hours_worked: claim.hours_worked,
        rate: claim.rate,
        currency: claim.currency.code().to_string(),
        status: status_to_db(claim.status()),
        submitted_at: claim.submitted_at,
        processed_at: claim.processed_at(),
        processed_by: claim.processed_by().map(str::to_string),
        paid_at: claim.payment().map(|p| p.paid_at),
        paid_by: claim.payment().map(|p| p.paid_by.clone()),
        note: claim.note.clone(),
    }
}

fn document_to_row(doc: &SupportingDocument) -> DocumentRow {
    DocumentRow {
        document_id: *doc.id.as_uuid(),
        claim_id: *doc.claim_id.as_uuid(),
        file_name: doc.file_name.clone(),
        stored_file_name: doc.stored_file_name.clone(),
        content_type: doc.content_type.clone(),
        file_size: doc.file_size,
        uploaded_at: doc.uploaded_at,
        description: doc.description.clone(),
    }
}

fn row_to_document(row: DocumentRow) -> SupportingDocument {
    SupportingDocument {
        id: DocumentId::from_uuid(row.document_id),
        claim_id: ClaimId::from_uuid(row.claim_id),
        file_name: row.file_name,
        stored_file_name: row.stored_file_name,
        content_type: row.content_type,
        file_size: row.file_size,
        uploaded_at: row.uploaded_at,
        description: row.description,
    }
}

fn row_to_claim(row: ClaimRow, documents: Vec<DocumentRow>) -> Result<Claim, PortError> {
    let period = ClaimPeriod::try_from(row.period)
        .map_err(|e| PortError::internal(format!("Claim {}: {}", row.claim_id, e)))?;
    let currency: Currency = row
        .currency
        .trim()
        .parse()
        .map_err(|e| PortError::internal(format!("Claim {}: {}", row.claim_id, e)))?;
    let payment = match (row.paid_at, row.paid_by) {
        (Some(paid_at), Some(paid_by)) => Some(PaymentStamp { paid_at, paid_by }),
        _ => None,
    };

    Claim::from_parts(ClaimParts {
        id: ClaimId::from_uuid(row.claim_id),
        lecturer_id: UserId::from_uuid(row.lecturer_id),
        period,
        hours_worked: row.hours_worked,
        rate: row.rate,
        currency,
        status: status_from_db(row.status),
        submitted_at: row.submitted_at,
        processed_at: row.processed_at,
        processed_by: row.processed_by,
        payment,
        note: row.note,
        documents: documents.into_iter().map(row_to_document).collect(),
    })
    .map_err(|e| PortError::internal(e.to_string()))
}
