//! Claims DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, Money, UserId};
use domain_claims::{
    Claim, ClaimCounts, ClaimStatus, ClaimSubmission, NewDocument, PaymentOutcome,
    PaymentRunSummary, SupportingDocument,
};

#[derive(Debug, Deserialize)]
pub struct SubmitClaimRequest {
    /// Any date in the month claimed for
    pub period: NaiveDate,
    pub hours_worked: Decimal,
    pub rate: Decimal,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub documents: Vec<DocumentRequest>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    pub file_name: String,
    pub stored_file_name: String,
    pub content_type: String,
    pub file_size: i64,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<SubmitClaimRequest> for ClaimSubmission {
    fn from(request: SubmitClaimRequest) -> Self {
        ClaimSubmission {
            period: request.period,
            hours_worked: request.hours_worked,
            rate: request.rate,
            note: request.note,
            documents: request
                .documents
                .into_iter()
                .map(|doc| NewDocument {
                    file_name: doc.file_name,
                    stored_file_name: doc.stored_file_name,
                    content_type: doc.content_type,
                    file_size: doc.file_size,
                    description: doc.description,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub id: ClaimId,
    pub lecturer_id: UserId,
    pub period: NaiveDate,
    pub period_label: String,
    pub hours_worked: Decimal,
    pub rate: Decimal,
    pub total: Money,
    pub status: ClaimStatus,
    pub submitted_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub paid_by: Option<String>,
    pub note: Option<String>,
    pub documents: Vec<SupportingDocument>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: claim.id,
            lecturer_id: claim.lecturer_id,
            period: claim.period.first_day(),
            period_label: claim.period.long_label(),
            hours_worked: claim.hours_worked,
            rate: claim.rate,
            total: claim.total(),
            status: claim.status(),
            submitted_at: claim.submitted_at,
            processed_at: claim.processed_at(),
            processed_by: claim.processed_by().map(str::to_string),
            paid_at: claim.payment().map(|p| p.paid_at),
            paid_by: claim.payment().map(|p| p.paid_by.clone()),
            note: claim.note,
            documents: claim.documents,
        }
    }
}

/// A queued claim with the submitting lecturer's name
#[derive(Debug, Serialize)]
pub struct PendingClaimResponse {
    pub lecturer_name: String,
    #[serde(flatten)]
    pub claim: ClaimResponse,
}

#[derive(Debug, Serialize)]
pub struct HomeCountsResponse {
    pub total_users: u64,
    pub total_claims: u64,
    pub pending_claims: u64,
}

impl HomeCountsResponse {
    pub fn new(total_users: u64, counts: ClaimCounts) -> Self {
        Self {
            total_users,
            total_claims: counts.total,
            pending_claims: counts.pending,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentRunResponse {
    pub processed: usize,
    pub held: usize,
    pub amount: Money,
    pub message: String,
}

impl From<PaymentRunSummary> for PaymentRunResponse {
    fn from(summary: PaymentRunSummary) -> Self {
        Self {
            message: format!("{} approved claims processed for payment", summary.processed),
            processed: summary.processed,
            held: summary.held,
            amount: summary.amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MarkProcessedResponse {
    pub claim_id: ClaimId,
    pub already_processed: bool,
}

impl MarkProcessedResponse {
    pub fn new(claim_id: ClaimId, outcome: PaymentOutcome) -> Self {
        Self {
            claim_id,
            already_processed: outcome == PaymentOutcome::AlreadyProcessed,
        }
    }
}
