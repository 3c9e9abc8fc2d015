//! Comprehensive tests for domain_reporting

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{
    ClaimId, ClaimPeriod, Currency, DomainPort, HealthCheckResult, HealthCheckable, PortError,
    UserId,
};
use domain_claims::{Claim, ClaimQuery, ClaimStatus, ClaimStore, InMemoryClaimStore};
use domain_identity::{InMemoryUserDirectory, Role, User};

use domain_reporting::{AggregationEngine, ReportType, COLUMNS};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).unwrap()
}

fn user(name: &str, role: Role, active: bool) -> User {
    User {
        id: UserId::new(),
        name: name.to_string(),
        email: format!("{}@cmcs.test", name.to_lowercase().replace(' ', ".")),
        password_hash: String::new(),
        role,
        phone_number: None,
        registered_at: now() - Duration::days(90),
        is_active: active,
    }
}

/// A claim for `hours × rate` in the given month, moved to `status`
fn claim(
    lecturer: &User,
    year: i32,
    month: u32,
    hours: Decimal,
    rate: Decimal,
    status: ClaimStatus,
    age_hours: i64,
) -> Claim {
    let submitted_at = now() - Duration::hours(age_hours);
    let mut claim = Claim::submitted(
        lecturer.id,
        ClaimPeriod::new(year, month).unwrap(),
        hours,
        rate,
        Currency::ZAR,
        submitted_at,
    );
    match status {
        ClaimStatus::Submitted => {}
        ClaimStatus::Approved => claim.approve("Sarah Coordinator", submitted_at).unwrap(),
        ClaimStatus::Rejected => claim.reject("Sarah Coordinator", submitted_at).unwrap(),
    }
    claim
}

async fn engine(users: Vec<User>, claims: Vec<Claim>) -> AggregationEngine {
    let claims = Arc::new(InMemoryClaimStore::with_claims(claims).await);
    let users = Arc::new(InMemoryUserDirectory::with_users(users).await);
    AggregationEngine::new(claims, users)
}

/// Store whose reads always fail
struct UnreachableStore;

impl DomainPort for UnreachableStore {}

#[async_trait]
impl HealthCheckable for UnreachableStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("unreachable")
    }
}

#[async_trait]
impl ClaimStore for UnreachableStore {
    async fn insert_claim(&self, _claim: &Claim) -> Result<(), PortError> {
        Err(PortError::connection("store offline"))
    }

    async fn get_claim(&self, _id: ClaimId) -> Result<Claim, PortError> {
        Err(PortError::connection("store offline"))
    }

    async fn update_claim(&self, _claim: &Claim) -> Result<(), PortError> {
        Err(PortError::connection("store offline"))
    }

    async fn update_claims_atomically(&self, _claims: &[Claim]) -> Result<(), PortError> {
        Err(PortError::connection("store offline"))
    }

    async fn find_claims(&self, _query: &ClaimQuery) -> Result<Vec<Claim>, PortError> {
        Err(PortError::connection("store offline"))
    }
}

// ============================================================================
// Dashboard Statistics Tests
// ============================================================================

mod dashboard_tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_store_is_all_zero() {
        let engine = engine(vec![], vec![]).await;
        let stats = engine.dashboard_statistics(now()).await;

        assert_eq!(stats.lecturer_count, 0);
        assert_eq!(stats.active_claim_count, 0);
        assert!(stats.monthly_payout.is_zero());
        assert_eq!(stats.approval_rate, dec!(0));
    }

    #[tokio::test]
    async fn test_payout_counts_and_rate() {
        let lecturer = user("John Lecturer", Role::Lecturer, true);
        let claims = vec![
            claim(&lecturer, 2026, 10, dec!(1), dec!(100), ClaimStatus::Approved, 1),
            claim(&lecturer, 2026, 9, dec!(2), dec!(100), ClaimStatus::Approved, 2),
            claim(&lecturer, 2026, 10, dec!(1), dec!(50), ClaimStatus::Submitted, 3),
        ];
        let engine = engine(vec![lecturer], claims).await;

        let stats = engine.dashboard_statistics(now()).await;

        assert_eq!(stats.monthly_payout.amount(), dec!(100));
        assert_eq!(stats.active_claim_count, 1);
        assert_eq!(stats.approval_rate, dec!(66.7));
        assert_eq!(stats.lecturer_count, 1);
    }

    #[tokio::test]
    async fn test_lecturer_count_ignores_inactive_and_other_roles() {
        let users = vec![
            user("Active Lecturer", Role::Lecturer, true),
            user("Former Lecturer", Role::Lecturer, false),
            user("Sarah Coordinator", Role::Coordinator, true),
        ];
        let engine = engine(users, vec![]).await;
        assert_eq!(engine.dashboard_statistics(now()).await.lecturer_count, 1);
    }

    #[tokio::test]
    async fn test_paid_claims_count_once() {
        let lecturer = user("John Lecturer", Role::Lecturer, true);
        let mut paid = claim(&lecturer, 2026, 10, dec!(1), dec!(100), ClaimStatus::Approved, 1);
        paid.mark_paid("HR System", now()).unwrap();
        paid.mark_paid("HR System", now()).unwrap();
        let engine = engine(vec![lecturer], vec![paid]).await;

        assert_eq!(
            engine.dashboard_statistics(now()).await.monthly_payout.amount(),
            dec!(100)
        );
    }

    #[tokio::test]
    async fn test_foreign_currency_claims_stay_out_of_totals() {
        let lecturer = user("John Lecturer", Role::Lecturer, true);
        let mut dollars = Claim::submitted(
            lecturer.id,
            ClaimPeriod::new(2026, 10).unwrap(),
            dec!(4),
            dec!(25),
            Currency::USD,
            now() - Duration::hours(6),
        );
        dollars.approve("Mike Manager", now()).unwrap();
        let claims = vec![
            claim(&lecturer, 2026, 10, dec!(2), dec!(150), ClaimStatus::Approved, 1),
            dollars,
        ];
        let engine = engine(vec![lecturer], claims).await;

        let stats = engine.dashboard_statistics(now()).await;
        assert_eq!(stats.monthly_payout.amount(), dec!(300));
        assert_eq!(stats.approval_rate, dec!(100));

        let trend = engine.monthly_trend(now(), 6).await;
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].amount.amount(), dec!(300));

        let performance = engine.lecturer_performance(8).await;
        assert_eq!(performance[0].total.amount(), dec!(300));

        let report = engine.report_data(ReportType::Monthly, now()).await;
        assert_eq!(report.total_claims, 2);
        assert_eq!(report.total_amount.amount(), dec!(300));
        assert_eq!(report.total_amount.currency(), Currency::ZAR);
    }

    #[tokio::test]
    async fn test_store_fault_degrades_to_zero() {
        let users = Arc::new(InMemoryUserDirectory::with_users(vec![user(
            "John Lecturer",
            Role::Lecturer,
            true,
        )])
        .await);
        let engine = AggregationEngine::new(Arc::new(UnreachableStore), users);

        let stats = engine.dashboard_statistics(now()).await;
        assert_eq!(stats.lecturer_count, 0);
        assert!(stats.monthly_payout.is_zero());
        assert!(engine.monthly_trend(now(), 6).await.is_empty());
        assert!(engine.lecturer_performance(8).await.is_empty());
        assert!(engine.report_data(ReportType::Pending, now()).await.rows.is_empty());
    }
}

// ============================================================================
// Trend and Performance Tests
// ============================================================================

mod trend_tests {
    use super::*;

    #[tokio::test]
    async fn test_trend_is_oldest_first_and_omits_empty_months() {
        let lecturer = user("John Lecturer", Role::Lecturer, true);
        let claims = vec![
            claim(&lecturer, 2026, 10, dec!(1), dec!(100), ClaimStatus::Approved, 1),
            claim(&lecturer, 2026, 10, dec!(1), dec!(20), ClaimStatus::Approved, 2),
            claim(&lecturer, 2026, 7, dec!(3), dec!(100), ClaimStatus::Approved, 3),
            claim(&lecturer, 2026, 8, dec!(9), dec!(100), ClaimStatus::Rejected, 4),
            claim(&lecturer, 2026, 4, dec!(9), dec!(100), ClaimStatus::Approved, 5),
        ];
        let engine = engine(vec![lecturer], claims).await;

        let trend = engine.monthly_trend(now(), 6).await;

        let labels: Vec<&str> = trend.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Jul 2026", "Oct 2026"]);
        assert_eq!(trend[0].amount.amount(), dec!(300));
        assert_eq!(trend[1].amount.amount(), dec!(120));
    }

    #[tokio::test]
    async fn test_trend_window_includes_oldest_month() {
        let lecturer = user("John Lecturer", Role::Lecturer, true);
        let claims = vec![claim(&lecturer, 2026, 5, dec!(1), dec!(10), ClaimStatus::Approved, 1)];
        let engine = engine(vec![lecturer], claims).await;

        assert_eq!(engine.monthly_trend(now(), 6).await.len(), 1);
        assert!(engine.monthly_trend(now(), 5).await.is_empty());
        assert!(engine.monthly_trend(now(), 0).await.is_empty());
    }

    #[tokio::test]
    async fn test_performance_excludes_zero_totals() {
        let earner = user("Amy Earner", Role::Lecturer, true);
        let idle = user("Ian Idle", Role::Lecturer, true);
        let claims = vec![
            claim(&earner, 2026, 10, dec!(2), dec!(100), ClaimStatus::Approved, 1),
            claim(&earner, 2026, 9, dec!(1), dec!(100), ClaimStatus::Approved, 2),
            claim(&idle, 2026, 10, dec!(5), dec!(100), ClaimStatus::Rejected, 3),
            claim(&idle, 2026, 10, dec!(5), dec!(100), ClaimStatus::Submitted, 4),
        ];
        let engine = engine(vec![earner.clone(), idle], claims).await;

        let performance = engine.lecturer_performance(8).await;

        assert_eq!(performance.len(), 1);
        assert_eq!(performance[0].lecturer_id, earner.id);
        assert_eq!(performance[0].name, "Amy Earner");
        assert_eq!(performance[0].total.amount(), dec!(300));
    }

    #[tokio::test]
    async fn test_performance_sorted_and_truncated() {
        let lecturers: Vec<User> = (1..=4)
            .map(|i| user(&format!("Lecturer {i}"), Role::Lecturer, true))
            .collect();
        let claims: Vec<Claim> = lecturers
            .iter()
            .enumerate()
            .map(|(i, l)| {
                claim(l, 2026, 10, Decimal::from(i as u32 + 1), dec!(100), ClaimStatus::Approved, 1)
            })
            .collect();
        let engine = engine(lecturers, claims).await;

        let performance = engine.lecturer_performance(2).await;
        let names: Vec<&str> = performance.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Lecturer 4", "Lecturer 3"]);
    }

    #[tokio::test]
    async fn test_department_breakdown_is_static() {
        let engine = engine(vec![], vec![]).await;
        let breakdown = engine.department_breakdown();
        assert_eq!(breakdown.len(), 5);
        assert_eq!(breakdown[0].department, "IT");
        assert_eq!(breakdown[0].share, 35);
    }
}

// ============================================================================
// Report Data Tests
// ============================================================================

mod report_tests {
    use super::*;

    async fn mixed() -> AggregationEngine {
        let lecturer = user("John Lecturer", Role::Lecturer, true);
        let ghost = user("Ghost", Role::Lecturer, true);
        let claims = vec![
            claim(&lecturer, 2026, 10, dec!(1), dec!(100), ClaimStatus::Approved, 5),
            claim(&lecturer, 2026, 10, dec!(1), dec!(40), ClaimStatus::Submitted, 1),
            claim(&lecturer, 2026, 10, dec!(1), dec!(70), ClaimStatus::Rejected, 3),
            claim(&lecturer, 2026, 8, dec!(2), dec!(100), ClaimStatus::Approved, 48),
            claim(&ghost, 2026, 8, dec!(1), dec!(10), ClaimStatus::Submitted, 72),
        ];
        // The ghost's user record is missing from the directory
        engine(vec![lecturer], claims).await
    }

    #[tokio::test]
    async fn test_pending_report_ignores_period() {
        let report = mixed().await.report_data(ReportType::Pending, now()).await;

        assert_eq!(report.total_claims, 2);
        assert!(report.rows.iter().all(|r| r.status == ClaimStatus::Submitted));
        assert!(report.total_amount.is_zero());
    }

    #[tokio::test]
    async fn test_monthly_report_filters_to_current_month() {
        let report = mixed().await.report_data(ReportType::Monthly, now()).await;

        assert_eq!(report.total_claims, 3);
        assert!(report
            .rows
            .iter()
            .all(|r| r.period == ClaimPeriod::new(2026, 10).unwrap()));
        assert_eq!(report.total_amount.amount(), dec!(100));
    }

    #[tokio::test]
    async fn test_other_report_returns_everything_newest_first() {
        let report = mixed()
            .await
            .report_data(ReportType::from_label("other"), now())
            .await;

        assert_eq!(report.total_claims, 5);
        assert_eq!(report.report_type.label(), "other");
        let amounts: Vec<Decimal> = report.rows.iter().map(|r| r.amount.amount()).collect();
        assert_eq!(amounts, vec![dec!(40), dec!(70), dec!(100), dec!(200), dec!(10)]);
        assert_eq!(report.total_amount.amount(), dec!(300));
    }

    #[tokio::test]
    async fn test_report_labels_match_exactly() {
        let engine = mixed().await;

        let capitalised = engine
            .report_data(ReportType::from_label("Monthly"), now())
            .await;
        assert_eq!(capitalised.total_claims, 5);
        assert_eq!(capitalised.report_type.label(), "Monthly");

        let padded = engine
            .report_data(ReportType::from_label(" pending "), now())
            .await;
        assert_eq!(padded.total_claims, 5);
        assert_eq!(padded.report_type.label(), " pending ");
    }

    #[tokio::test]
    async fn test_rows_carry_placeholders() {
        let report = mixed().await.report_data(ReportType::Pending, now()).await;

        assert!(report.rows.iter().all(|r| r.department == "IT"));
        assert_eq!(report.rows[0].lecturer, "John Lecturer");
        assert_eq!(report.rows[1].lecturer, "Unknown");
    }

    #[tokio::test]
    async fn test_report_exports_to_xlsx() {
        let report = mixed().await.report_data(ReportType::Monthly, now()).await;
        let bytes = domain_reporting::to_xlsx(&report).unwrap();

        assert_eq!(COLUMNS.len(), 6);
        // xlsx files are zip archives
        assert!(bytes.starts_with(b"PK"));
    }
}
