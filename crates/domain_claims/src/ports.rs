//! Claims domain ports
//!
//! `ClaimStore` is the only way the lifecycle and aggregation engines reach
//! claim data. The PostgreSQL adapter lives in `infra_db`; the in-memory
//! adapter below backs tests and the database-less development server.

use async_trait::async_trait;

use core_kernel::{ClaimId, ClaimPeriod, DomainPort, HealthCheckable, PortError, UserId};

use crate::claim::{Claim, ClaimStatus};

/// Result ordering for claim queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClaimOrder {
    /// Newest submission first
    #[default]
    SubmittedDesc,
    /// Oldest submission first
    SubmittedAsc,
}

/// Query parameters for finding claims
#[derive(Debug, Clone, Default)]
pub struct ClaimQuery {
    /// Filter by status
    pub status: Option<ClaimStatus>,
    /// Filter by submitting lecturer
    pub lecturer_id: Option<UserId>,
    /// Earliest period (inclusive)
    pub period_from: Option<ClaimPeriod>,
    /// Latest period (inclusive)
    pub period_to: Option<ClaimPeriod>,
    /// Filter by payment state
    pub paid: Option<bool>,
    /// Ordering
    pub order: ClaimOrder,
    /// Limit results
    pub limit: Option<u32>,
}

impl ClaimQuery {
    /// Every claim, newest submission first
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_status(status: ClaimStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn by_lecturer(lecturer_id: UserId) -> Self {
        Self {
            lecturer_id: Some(lecturer_id),
            ..Default::default()
        }
    }

    /// Approved claims no payment run has processed yet
    pub fn awaiting_payment() -> Self {
        Self {
            status: Some(ClaimStatus::Approved),
            paid: Some(false),
            order: ClaimOrder::SubmittedAsc,
            ..Default::default()
        }
    }

    /// Restricts to periods between `from` and `to`, inclusive
    pub fn in_periods(mut self, from: ClaimPeriod, to: ClaimPeriod) -> Self {
        self.period_from = Some(from);
        self.period_to = Some(to);
        self
    }

    pub fn ordered(mut self, order: ClaimOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if the claim satisfies every set filter
    pub fn matches(&self, claim: &Claim) -> bool {
        self.status.map_or(true, |s| claim.status() == s)
            && self.lecturer_id.map_or(true, |id| claim.lecturer_id == id)
            && self.period_from.map_or(true, |p| claim.period >= p)
            && self.period_to.map_or(true, |p| claim.period <= p)
            && self.paid.map_or(true, |paid| claim.is_paid() == paid)
    }
}

/// Storage port for claims and their supporting documents
#[async_trait]
pub trait ClaimStore: DomainPort + HealthCheckable {
    /// Inserts a new claim together with its documents
    async fn insert_claim(&self, claim: &Claim) -> Result<(), PortError>;

    /// Retrieves a claim by ID, or `PortError::NotFound`
    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError>;

    /// Persists the status, decision and payment fields of an existing claim
    async fn update_claim(&self, claim: &Claim) -> Result<(), PortError>;

    /// Persists several claims as one unit: either all updates land or none
    async fn update_claims_atomically(&self, claims: &[Claim]) -> Result<(), PortError>;

    /// Finds claims matching the query
    async fn find_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, PortError>;

    /// Counts claims matching the query
    async fn count_claims(&self, query: &ClaimQuery) -> Result<u64, PortError> {
        Ok(self.find_claims(query).await?.len() as u64)
    }
}

pub mod memory {
    use super::*;
    use core_kernel::HealthCheckResult;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory implementation of `ClaimStore`
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryClaimStore {
        claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
    }

    impl InMemoryClaimStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with claims
        pub async fn with_claims(claims: Vec<Claim>) -> Self {
            let store = Self::new();
            {
                let mut map = store.claims.write().await;
                for claim in claims {
                    map.insert(claim.id, claim);
                }
            }
            store
        }
    }

    impl DomainPort for InMemoryClaimStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryClaimStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("memory-claim-store")
        }
    }

    #[async_trait]
    impl ClaimStore for InMemoryClaimStore {
        async fn insert_claim(&self, claim: &Claim) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            if claims.contains_key(&claim.id) {
                return Err(PortError::conflict(format!("Claim {} already exists", claim.id)));
            }
            claims.insert(claim.id, claim.clone());
            Ok(())
        }

        async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
            self.claims
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))
        }

        async fn update_claim(&self, claim: &Claim) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            match claims.get_mut(&claim.id) {
                Some(stored) => {
                    *stored = claim.clone();
                    Ok(())
                }
                None => Err(PortError::not_found("Claim", claim.id)),
            }
        }

        async fn update_claims_atomically(&self, batch: &[Claim]) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            if let Some(missing) = batch.iter().find(|c| !claims.contains_key(&c.id)) {
                return Err(PortError::not_found("Claim", missing.id));
            }
            for claim in batch {
                claims.insert(claim.id, claim.clone());
            }
            Ok(())
        }

        async fn find_claims(&self, query: &ClaimQuery) -> Result<Vec<Claim>, PortError> {
            let mut found: Vec<Claim> = self
                .claims
                .read()
                .await
                .values()
                .filter(|c| query.matches(c))
                .cloned()
                .collect();

            match query.order {
                ClaimOrder::SubmittedDesc => found.sort_by(|a, b| {
                    b.submitted_at.cmp(&a.submitted_at).then(a.id.cmp(&b.id))
                }),
                ClaimOrder::SubmittedAsc => found.sort_by(|a, b| {
                    a.submitted_at.cmp(&b.submitted_at).then(a.id.cmp(&b.id))
                }),
            }
            if let Some(limit) = query.limit {
                found.truncate(limit as usize);
            }
            Ok(found)
        }
    }
}
