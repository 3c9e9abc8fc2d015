//! Aggregation engine
//!
//! Read-only statistics over the claim store. Nothing is cached: every call
//! re-reads the store. Store or arithmetic failures are logged and answered
//! with an empty or zero result so a dashboard can always render. Money
//! totals only cover claims priced in the engine's currency; claims in any
//! other currency still count toward claim counts and report rows.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, error, warn};

use core_kernel::{ClaimPeriod, Currency, Money, UserId};
use domain_claims::{Claim, ClaimQuery, ClaimStatus, ClaimStore};
use domain_identity::{Role, UserDirectory, UserQuery};

use crate::error::AggregationFault;
use crate::report::{ReportData, ReportRow, ReportType, PLACEHOLDER_DEPARTMENT, UNKNOWN_LECTURER};

/// Default number of months in the payout trend
pub const DEFAULT_TREND_MONTHS: u32 = 6;

/// Default number of lecturers in the performance chart
pub const DEFAULT_PERFORMANCE_LIMIT: usize = 8;

/// Headline numbers for the HR dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStatistics {
    /// Active lecturers
    pub lecturer_count: u64,
    /// Claims awaiting a decision
    pub active_claim_count: u64,
    /// Approved totals for the current month
    pub monthly_payout: Money,
    /// Approved claims as a percentage of all claims, one decimal place
    pub approval_rate: Decimal,
}

impl DashboardStatistics {
    pub fn zero(currency: Currency) -> Self {
        Self {
            lecturer_count: 0,
            active_claim_count: 0,
            monthly_payout: Money::zero(currency),
            approval_rate: Decimal::ZERO,
        }
    }
}

/// Approved payout for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub period: ClaimPeriod,
    /// Abbreviated month and year, e.g. "Oct 2026"
    pub label: String,
    pub amount: Money,
}

/// Approved payout for one lecturer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LecturerTotal {
    pub lecturer_id: UserId,
    pub name: String,
    pub total: Money,
}

/// Share of claims per department, in percent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentShare {
    pub department: &'static str,
    pub share: u32,
}

const DEPARTMENT_SHARES: [(&str, u32); 5] = [
    ("IT", 35),
    ("Business", 25),
    ("Engineering", 20),
    ("Health", 15),
    ("Arts", 5),
];

/// Computes dashboard statistics and report datasets
#[derive(Clone)]
pub struct AggregationEngine {
    claims: Arc<dyn ClaimStore>,
    users: Arc<dyn UserDirectory>,
    currency: Currency,
}

impl AggregationEngine {
    pub fn new(claims: Arc<dyn ClaimStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self {
            claims,
            users,
            currency: Currency::default(),
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Headline numbers as of `now`; all zero on any fault
    pub async fn dashboard_statistics(&self, now: DateTime<Utc>) -> DashboardStatistics {
        self.try_dashboard_statistics(now)
            .await
            .unwrap_or_else(|fault| {
                error!(error = %fault, "Dashboard statistics unavailable");
                DashboardStatistics::zero(self.currency)
            })
    }

    /// Approved payout per month for the trailing `months_back` months
    ///
    /// The window ends at `now`'s month, inclusive. Months without an
    /// approved claim are left out rather than reported as zero.
    pub async fn monthly_trend(&self, now: DateTime<Utc>, months_back: u32) -> Vec<TrendPoint> {
        self.try_monthly_trend(now, months_back)
            .await
            .unwrap_or_else(|fault| {
                error!(error = %fault, "Monthly trend unavailable");
                Vec::new()
            })
    }

    /// Lecturers with a positive approved total, highest first
    pub async fn lecturer_performance(&self, limit: usize) -> Vec<LecturerTotal> {
        self.try_lecturer_performance(limit)
            .await
            .unwrap_or_else(|fault| {
                error!(error = %fault, "Lecturer performance unavailable");
                Vec::new()
            })
    }

    /// Fixed distribution; claims carry no department yet
    pub fn department_breakdown(&self) -> Vec<DepartmentShare> {
        DEPARTMENT_SHARES
            .iter()
            .map(|&(department, share)| DepartmentShare { department, share })
            .collect()
    }

    /// Report rows for `report_type`; an empty report on any fault
    pub async fn report_data(&self, report_type: ReportType, now: DateTime<Utc>) -> ReportData {
        match self.try_report_data(&report_type, now).await {
            Ok(report) => report,
            Err(fault) => {
                error!(error = %fault, report_type = %report_type, "Report data unavailable");
                ReportData::empty(report_type, now, Money::zero(self.currency))
            }
        }
    }

    async fn try_dashboard_statistics(
        &self,
        now: DateTime<Utc>,
    ) -> Result<DashboardStatistics, AggregationFault> {
        const OP: &str = "dashboard_statistics";

        let lecturer_count = self
            .users
            .count_users(UserQuery::active(Role::Lecturer))
            .await
            .map_err(AggregationFault::store(OP))?;

        let claims = self
            .claims
            .find_claims(&ClaimQuery::all())
            .await
            .map_err(AggregationFault::store(OP))?;

        let this_month = ClaimPeriod::containing(now.date_naive());
        let active_claim_count = count_status(&claims, ClaimStatus::Submitted);
        let approved = count_status(&claims, ClaimStatus::Approved);

        let monthly: Vec<Money> = priced_in(&claims, self.currency, OP)
            .into_iter()
            .filter(|c| c.status() == ClaimStatus::Approved && c.period == this_month)
            .map(Claim::total)
            .collect();
        let monthly_payout = Money::sum(self.currency, &monthly).map_err(AggregationFault::money(OP))?;

        debug!(claims = claims.len(), approved, "Computed dashboard statistics");

        Ok(DashboardStatistics {
            lecturer_count,
            active_claim_count,
            monthly_payout,
            approval_rate: approval_rate(approved, claims.len() as u64),
        })
    }

    async fn try_monthly_trend(
        &self,
        now: DateTime<Utc>,
        months_back: u32,
    ) -> Result<Vec<TrendPoint>, AggregationFault> {
        const OP: &str = "monthly_trend";

        if months_back == 0 {
            return Ok(Vec::new());
        }
        let last = ClaimPeriod::containing(now.date_naive());
        let Ok(first) = last.months_back(months_back - 1) else {
            return Ok(Vec::new());
        };

        let approved = self
            .claims
            .find_claims(&ClaimQuery::by_status(ClaimStatus::Approved).in_periods(first, last))
            .await
            .map_err(AggregationFault::store(OP))?;

        let mut by_month: BTreeMap<ClaimPeriod, Money> = BTreeMap::new();
        for claim in priced_in(&approved, self.currency, OP) {
            let entry = by_month
                .entry(claim.period)
                .or_insert_with(|| Money::zero(self.currency));
            *entry = entry
                .checked_add(&claim.total())
                .map_err(AggregationFault::money(OP))?;
        }

        Ok(by_month
            .into_iter()
            .map(|(period, amount)| TrendPoint {
                label: period.short_label(),
                period,
                amount,
            })
            .collect())
    }

    async fn try_lecturer_performance(
        &self,
        limit: usize,
    ) -> Result<Vec<LecturerTotal>, AggregationFault> {
        const OP: &str = "lecturer_performance";

        let lecturers = self
            .users
            .list_users(UserQuery::by_role(Role::Lecturer))
            .await
            .map_err(AggregationFault::store(OP))?;
        let approved = self
            .claims
            .find_claims(&ClaimQuery::by_status(ClaimStatus::Approved))
            .await
            .map_err(AggregationFault::store(OP))?;

        let mut sums: HashMap<UserId, Money> = HashMap::new();
        for claim in priced_in(&approved, self.currency, OP) {
            let entry = sums
                .entry(claim.lecturer_id)
                .or_insert_with(|| Money::zero(self.currency));
            *entry = entry
                .checked_add(&claim.total())
                .map_err(AggregationFault::money(OP))?;
        }

        let mut totals: Vec<LecturerTotal> = lecturers
            .into_iter()
            .filter_map(|user| {
                let total = sums.get(&user.id).copied()?;
                total.is_positive().then(|| LecturerTotal {
                    lecturer_id: user.id,
                    name: user.name,
                    total,
                })
            })
            .collect();

        totals.sort_by(|a, b| {
            b.total
                .amount()
                .cmp(&a.total.amount())
                .then_with(|| a.name.cmp(&b.name))
        });
        totals.truncate(limit);
        Ok(totals)
    }

    async fn try_report_data(
        &self,
        report_type: &ReportType,
        now: DateTime<Utc>,
    ) -> Result<ReportData, AggregationFault> {
        const OP: &str = "report_data";

        let query = match report_type {
            ReportType::Monthly => {
                let month = ClaimPeriod::containing(now.date_naive());
                ClaimQuery::all().in_periods(month, month)
            }
            ReportType::Pending => ClaimQuery::by_status(ClaimStatus::Submitted),
            ReportType::All(_) => ClaimQuery::all(),
        };
        let claims = self
            .claims
            .find_claims(&query)
            .await
            .map_err(AggregationFault::store(OP))?;

        let names: HashMap<UserId, String> = self
            .users
            .list_users(UserQuery::default())
            .await
            .map_err(AggregationFault::store(OP))?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();

        let approved: Vec<Money> = priced_in(&claims, self.currency, OP)
            .into_iter()
            .filter(|c| c.status() == ClaimStatus::Approved)
            .map(Claim::total)
            .collect();
        let total_amount = Money::sum(self.currency, &approved).map_err(AggregationFault::money(OP))?;

        let mut rows: Vec<ReportRow> = claims
            .iter()
            .map(|claim| ReportRow {
                claim_id: claim.id,
                period: claim.period,
                lecturer: names
                    .get(&claim.lecturer_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_LECTURER.to_string()),
                department: PLACEHOLDER_DEPARTMENT.to_string(),
                hours: claim.hours_worked,
                amount: claim.total(),
                status: claim.status(),
                submitted_at: claim.submitted_at,
            })
            .collect();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

        Ok(ReportData {
            report_type: report_type.clone(),
            generated_at: now,
            total_amount,
            total_claims: rows.len(),
            rows,
        })
    }
}

/// Claims priced in `currency`; the rest are logged and left out
fn priced_in<'a>(claims: &'a [Claim], currency: Currency, op: &'static str) -> Vec<&'a Claim> {
    let (kept, foreign): (Vec<&Claim>, Vec<&Claim>) =
        claims.iter().partition(|c| c.currency == currency);
    if !foreign.is_empty() {
        warn!(
            operation = op,
            excluded = foreign.len(),
            %currency,
            "Claims in other currencies left out of totals"
        );
    }
    kept
}

fn count_status(claims: &[Claim], status: ClaimStatus) -> u64 {
    claims.iter().filter(|c| c.status() == status).count() as u64
}

/// `approved × 100 / total`, rounded to one place; zero when there are no claims
pub fn approval_rate(approved: u64, total: u64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(approved) * Decimal::ONE_HUNDRED / Decimal::from(total)).round_dp(1)
}
