//! Claim lifecycle engine
//!
//! The only writer of claim status, decision and payment fields. Every
//! operation authorizes the caller, loads through the `ClaimStore`, applies
//! the transition on the aggregate and writes it back.
//!
//! ```text
//! Submitted -> Approved -> Approved + paid
//!           \-> Rejected
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use core_kernel::{ClaimId, ClaimPeriod, Clock, Currency, Money};
use domain_identity::{authorize, Actor, Capability};

use crate::claim::{Claim, ClaimStatus, PaymentOutcome};
use crate::error::ClaimError;
use crate::ports::{ClaimOrder, ClaimQuery, ClaimStore};
use crate::submission::{ClaimSubmission, SubmissionRules};

/// Name recorded on payments when the caller has none
pub const PAYMENT_ACTOR_FALLBACK: &str = "HR System";

/// Outcome of a bulk payment run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRunSummary {
    /// Claims paid by this run
    pub processed: usize,
    /// Approved claims left unpaid because their currency differs from the run's
    pub held: usize,
    /// Sum of the totals paid by this run
    pub amount: Money,
}

/// Claim counters for the home view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClaimCounts {
    pub total: u64,
    pub pending: u64,
}

/// Enforces claim state transitions
#[derive(Clone)]
pub struct LifecycleEngine {
    store: Arc<dyn ClaimStore>,
    clock: Arc<dyn Clock>,
    rules: SubmissionRules,
    currency: Currency,
}

impl LifecycleEngine {
    /// Creates an engine with the default submission rules, paying in ZAR
    pub fn new(store: Arc<dyn ClaimStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            rules: SubmissionRules::default(),
            currency: Currency::default(),
        }
    }

    pub fn with_rules(mut self, rules: SubmissionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Validates and stores a new claim for the calling lecturer
    ///
    /// # Errors
    ///
    /// * `ClaimError::Forbidden` - the caller is not a lecturer
    /// * `ClaimError::Validation` - one message per failed submission rule
    #[instrument(skip(self, submission), fields(lecturer = %actor.user_id))]
    pub async fn submit(
        &self,
        actor: &Actor,
        submission: ClaimSubmission,
    ) -> Result<Claim, ClaimError> {
        authorize(actor, Capability::SubmitClaim)?;

        let now = self.clock.utc();
        self.rules.validate(&submission, now.date_naive())?;

        let mut claim = Claim::submitted(
            actor.user_id,
            ClaimPeriod::containing(submission.period),
            submission.hours_worked,
            submission.rate,
            self.currency,
            now,
        );
        claim.note = submission.note.filter(|n| !n.trim().is_empty());
        claim.documents = submission
            .documents
            .into_iter()
            .map(|doc| doc.attach_to(claim.id, now))
            .collect();

        self.store.insert_claim(&claim).await?;

        info!(
            claim_id = %claim.id,
            period = %claim.period,
            total = %claim.total(),
            "Claim submitted"
        );
        Ok(claim)
    }

    /// Approves a submitted claim
    #[instrument(skip(self), fields(actor = %actor.name))]
    pub async fn approve(&self, actor: &Actor, claim_id: ClaimId) -> Result<Claim, ClaimError> {
        authorize(actor, Capability::ReviewClaims)?;
        let mut claim = self.load(claim_id).await?;
        claim.approve(&actor.name, self.clock.utc())?;
        self.store.update_claim(&claim).await?;
        info!(%claim_id, "Claim approved");
        Ok(claim)
    }

    /// Rejects a submitted claim
    #[instrument(skip(self), fields(actor = %actor.name))]
    pub async fn reject(&self, actor: &Actor, claim_id: ClaimId) -> Result<Claim, ClaimError> {
        authorize(actor, Capability::ReviewClaims)?;
        let mut claim = self.load(claim_id).await?;
        claim.reject(&actor.name, self.clock.utc())?;
        self.store.update_claim(&claim).await?;
        info!(%claim_id, "Claim rejected");
        Ok(claim)
    }

    /// Marks one approved claim as paid
    ///
    /// Returns `PaymentOutcome::AlreadyProcessed` without writing when a
    /// previous call already paid the claim.
    #[instrument(skip(self), fields(actor = %actor.name))]
    pub async fn mark_processed(
        &self,
        actor: &Actor,
        claim_id: ClaimId,
    ) -> Result<PaymentOutcome, ClaimError> {
        authorize(actor, Capability::ProcessPayments)?;
        let mut claim = self.load(claim_id).await?;
        let outcome = claim.mark_paid(
            &actor.recorded_name(PAYMENT_ACTOR_FALLBACK),
            self.clock.utc(),
        )?;
        if outcome == PaymentOutcome::Processed {
            self.store.update_claim(&claim).await?;
            info!(%claim_id, "Claim processed for payment");
        }
        Ok(outcome)
    }

    /// Pays every approved, unpaid claim in one atomic store update
    ///
    /// Only claims in the engine's currency are paid; claims in any other
    /// currency stay unpaid and are reported as held.
    #[instrument(skip(self), fields(actor = %actor.name))]
    pub async fn process_payments(&self, actor: &Actor) -> Result<PaymentRunSummary, ClaimError> {
        authorize(actor, Capability::ProcessPayments)?;

        let paid_by = actor.recorded_name(PAYMENT_ACTOR_FALLBACK);
        let now = self.clock.utc();
        let awaiting = self.store.find_claims(&ClaimQuery::awaiting_payment()).await?;

        let mut batch = Vec::with_capacity(awaiting.len());
        let mut held = 0;
        for mut claim in awaiting {
            if claim.currency != self.currency {
                warn!(claim_id = %claim.id, currency = %claim.currency, "Claim held from payment run");
                held += 1;
                continue;
            }
            if claim.mark_paid(&paid_by, now)? == PaymentOutcome::Processed {
                batch.push(claim);
            }
        }

        let totals: Vec<Money> = batch.iter().map(Claim::total).collect();
        let amount = Money::sum(self.currency, &totals)?;

        if !batch.is_empty() {
            self.store.update_claims_atomically(&batch).await?;
        }

        info!(processed = batch.len(), held, %amount, "Payment run complete");
        Ok(PaymentRunSummary {
            processed: batch.len(),
            held,
            amount,
        })
    }

    /// Looks up one claim
    pub async fn claim(&self, claim_id: ClaimId) -> Result<Claim, ClaimError> {
        self.load(claim_id).await
    }

    /// The caller's own claims, newest first
    pub async fn history_for(&self, actor: &Actor) -> Result<Vec<Claim>, ClaimError> {
        authorize(actor, Capability::ViewOwnClaims)?;
        Ok(self
            .store
            .find_claims(&ClaimQuery::by_lecturer(actor.user_id))
            .await?)
    }

    /// Claims awaiting a decision, oldest first
    pub async fn pending_queue(&self, actor: &Actor) -> Result<Vec<Claim>, ClaimError> {
        authorize(actor, Capability::ReviewClaims)?;
        Ok(self
            .store
            .find_claims(&ClaimQuery::by_status(ClaimStatus::Submitted).ordered(ClaimOrder::SubmittedAsc))
            .await?)
    }

    /// The most recently submitted claims
    pub async fn recent(&self, limit: u32) -> Result<Vec<Claim>, ClaimError> {
        Ok(self.store.find_claims(&ClaimQuery::all().limit(limit)).await?)
    }

    pub async fn counts(&self) -> Result<ClaimCounts, ClaimError> {
        let total = self.store.count_claims(&ClaimQuery::all()).await?;
        let pending = self
            .store
            .count_claims(&ClaimQuery::by_status(ClaimStatus::Submitted))
            .await?;
        Ok(ClaimCounts { total, pending })
    }

    async fn load(&self, claim_id: ClaimId) -> Result<Claim, ClaimError> {
        self.store.get_claim(claim_id).await.map_err(|e| {
            if !e.is_not_found() {
                warn!(%claim_id, error = %e, "Claim lookup failed");
            }
            ClaimError::from_lookup(claim_id, e)
        })
    }
}
