//! Comprehensive tests for domain_claims

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{ClaimId, ClaimPeriod, Clock, Currency, UserId};
use domain_identity::{Actor, Role};

use domain_claims::{
    Claim, ClaimError, ClaimOrder, ClaimQuery, ClaimStatus, ClaimStore, ClaimSubmission,
    InMemoryClaimStore, LifecycleEngine, NewDocument, PaymentOutcome,
};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn lecturer() -> Actor {
    Actor::new(UserId::new(), "John Lecturer", Role::Lecturer)
}

fn coordinator() -> Actor {
    Actor::new(UserId::new(), "Sarah Coordinator", Role::Coordinator)
}

fn hr() -> Actor {
    Actor::new(UserId::new(), "Thandi HR", Role::Hr)
}

fn engine() -> (LifecycleEngine, Arc<InMemoryClaimStore>) {
    let store = Arc::new(InMemoryClaimStore::new());
    let clock = Arc::new(FixtureClock { utc_now: fixture_now() });
    (LifecycleEngine::new(store.clone(), clock), store)
}

fn document(name: &str) -> NewDocument {
    NewDocument {
        file_name: name.to_string(),
        stored_file_name: format!("{name}-stored"),
        content_type: "application/pdf".to_string(),
        file_size: 1024,
        description: None,
    }
}

// ============================================================================
// Submission Tests
// ============================================================================

mod submission_tests {
    use super::*;

    #[tokio::test]
    async fn test_submit_creates_submitted_claim() {
        let (engine, store) = engine();
        let actor = lecturer();

        let claim = engine
            .submit(&actor, ClaimSubmission::new(date(2026, 10, 9), dec!(40), dec!(110)))
            .await
            .unwrap();

        assert_eq!(claim.status(), ClaimStatus::Submitted);
        assert_eq!(claim.lecturer_id, actor.user_id);
        assert_eq!(claim.submitted_at, fixture_now());
        assert_eq!(claim.period, ClaimPeriod::new(2026, 10).unwrap());
        assert_eq!(claim.total().amount(), dec!(4400));
        assert!(claim.processed_at().is_none());
        assert!(claim.processed_by().is_none());

        let stored = store.get_claim(claim.id).await.unwrap();
        assert_eq!(stored, claim);
    }

    #[tokio::test]
    async fn test_submit_stores_first_of_month() {
        let (engine, _) = engine();
        let claim = engine
            .submit(&lecturer(), ClaimSubmission::new(date(2026, 8, 27), dec!(10), dec!(100)))
            .await
            .unwrap();
        assert_eq!(claim.period.first_day(), date(2026, 8, 1));
    }

    #[tokio::test]
    async fn test_submit_rejects_out_of_range_inputs() {
        let (engine, store) = engine();
        let actor = lecturer();
        let cases = [
            (date(2026, 10, 1), dec!(0), dec!(100), "Hours worked must be greater than 0"),
            (date(2026, 10, 1), dec!(200.1), dec!(100), "cannot exceed 200"),
            (date(2026, 10, 1), dec!(10), dec!(500.1), "cannot exceed R500"),
            (date(2026, 10, 1), dec!(10), dec!(0), "Hourly rate must be greater than 0"),
            (date(2026, 10, 16), dec!(10), dec!(100), "cannot be in the future"),
            (date(2026, 7, 14), dec!(10), dec!(100), "older than 3 months"),
        ];

        for (period, hours, rate, message) in cases {
            let err = engine
                .submit(&actor, ClaimSubmission::new(period, hours, rate))
                .await
                .unwrap_err();
            match err {
                ClaimError::Validation(errors) => {
                    assert!(errors.mentions(message), "{message} not in {errors}")
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }

        assert_eq!(store.count_claims(&ClaimQuery::all()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_submit_accepts_boundaries() {
        let (engine, _) = engine();
        let actor = lecturer();

        assert!(engine
            .submit(&actor, ClaimSubmission::new(date(2026, 7, 15), dec!(200), dec!(500)))
            .await
            .is_ok());
        assert!(engine
            .submit(&actor, ClaimSubmission::new(date(2026, 10, 15), dec!(0.5), dec!(0.01)))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_submit_collects_every_failure() {
        let (engine, _) = engine();
        let err = engine
            .submit(&lecturer(), ClaimSubmission::new(date(2027, 1, 1), dec!(0), dec!(600)))
            .await
            .unwrap_err();
        let ClaimError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.messages().len(), 3);
    }

    #[tokio::test]
    async fn test_submit_attaches_documents_and_note() {
        let (engine, _) = engine();
        let submission = ClaimSubmission::new(date(2026, 10, 1), dec!(12), dec!(250))
            .with_note("Marking for COMP101")
            .with_document(document("timesheet.pdf"))
            .with_document(document("schedule.pdf"));

        let claim = engine.submit(&lecturer(), submission).await.unwrap();

        assert_eq!(claim.note.as_deref(), Some("Marking for COMP101"));
        assert_eq!(claim.documents.len(), 2);
        assert!(claim.documents.iter().all(|d| d.claim_id == claim.id));
    }

    #[tokio::test]
    async fn test_submit_rejects_sixth_document() {
        let (engine, _) = engine();
        let mut submission = ClaimSubmission::new(date(2026, 10, 1), dec!(12), dec!(250));
        for i in 0..6 {
            submission = submission.with_document(document(&format!("doc{i}.pdf")));
        }

        let err = engine.submit(&lecturer(), submission).await.unwrap_err();
        assert!(matches!(err, ClaimError::Validation(ref e) if e.mentions("Maximum 5")));
    }

    #[tokio::test]
    async fn test_submit_rejects_extra_precision() {
        let (engine, _) = engine();
        let err = engine
            .submit(&lecturer(), ClaimSubmission::new(date(2026, 10, 1), dec!(1.005), dec!(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::Validation(_)));
    }

    #[tokio::test]
    async fn test_only_lecturers_submit() {
        let (engine, _) = engine();
        let err = engine
            .submit(&coordinator(), ClaimSubmission::new(date(2026, 10, 1), dec!(1), dec!(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::Forbidden(_)));
    }
}

// ============================================================================
// Decision Tests
// ============================================================================

mod decision_tests {
    use super::*;

    async fn submitted(engine: &LifecycleEngine) -> Claim {
        engine
            .submit(&lecturer(), ClaimSubmission::new(date(2026, 10, 1), dec!(10), dec!(100)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_approve_records_decision() {
        let (engine, store) = engine();
        let claim = submitted(&engine).await;

        let approved = engine.approve(&coordinator(), claim.id).await.unwrap();

        assert_eq!(approved.status(), ClaimStatus::Approved);
        assert_eq!(approved.processed_at(), Some(fixture_now()));
        assert_eq!(approved.processed_by(), Some("Sarah Coordinator"));
        assert!(!approved.is_paid());
        assert_eq!(store.get_claim(claim.id).await.unwrap(), approved);
    }

    #[tokio::test]
    async fn test_reject_records_decision() {
        let (engine, _) = engine();
        let claim = submitted(&engine).await;

        let rejected = engine.reject(&coordinator(), claim.id).await.unwrap();

        assert_eq!(rejected.status(), ClaimStatus::Rejected);
        assert_eq!(rejected.processed_by(), Some("Sarah Coordinator"));
    }

    #[tokio::test]
    async fn test_second_decision_is_invalid_transition() {
        let (engine, store) = engine();
        let claim = submitted(&engine).await;
        engine.reject(&coordinator(), claim.id).await.unwrap();

        let manager = Actor::new(UserId::new(), "Mike Manager", Role::Manager);
        let err = engine.approve(&manager, claim.id).await.unwrap_err();

        assert!(matches!(
            err,
            ClaimError::InvalidTransition { from: ClaimStatus::Rejected, .. }
        ));
        let stored = store.get_claim(claim.id).await.unwrap();
        assert_eq!(stored.status(), ClaimStatus::Rejected);
        assert_eq!(stored.processed_by(), Some("Sarah Coordinator"));
    }

    #[tokio::test]
    async fn test_unknown_claim_is_not_found() {
        let (engine, _) = engine();
        let id = ClaimId::new();

        assert!(matches!(
            engine.approve(&coordinator(), id).await,
            Err(ClaimError::NotFound(missing)) if missing == id
        ));
        assert!(matches!(
            engine.reject(&coordinator(), id).await,
            Err(ClaimError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_hr_cannot_review() {
        let (engine, _) = engine();
        let claim = submitted(&engine).await;
        assert!(matches!(
            engine.approve(&hr(), claim.id).await,
            Err(ClaimError::Forbidden(_))
        ));
    }
}

// ============================================================================
// Payment Tests
// ============================================================================

mod payment_tests {
    use super::*;

    async fn approved(engine: &LifecycleEngine, hours: Decimal, rate: Decimal) -> Claim {
        let claim = engine
            .submit(&lecturer(), ClaimSubmission::new(date(2026, 10, 1), hours, rate))
            .await
            .unwrap();
        engine.approve(&coordinator(), claim.id).await.unwrap()
    }

    #[tokio::test]
    async fn test_mark_processed_twice_is_noop() {
        let (engine, store) = engine();
        let claim = approved(&engine, dec!(10), dec!(100)).await;

        assert_eq!(
            engine.mark_processed(&hr(), claim.id).await.unwrap(),
            PaymentOutcome::Processed
        );
        let first = store.get_claim(claim.id).await.unwrap();

        assert_eq!(
            engine.mark_processed(&hr(), claim.id).await.unwrap(),
            PaymentOutcome::AlreadyProcessed
        );
        assert_eq!(store.get_claim(claim.id).await.unwrap(), first);
        assert_eq!(first.payment().map(|p| p.paid_by.as_str()), Some("Thandi HR"));
    }

    #[tokio::test]
    async fn test_mark_processed_requires_approval() {
        let (engine, _) = engine();
        let claim = engine
            .submit(&lecturer(), ClaimSubmission::new(date(2026, 10, 1), dec!(1), dec!(1)))
            .await
            .unwrap();

        assert!(matches!(
            engine.mark_processed(&hr(), claim.id).await,
            Err(ClaimError::InvalidTransition { from: ClaimStatus::Submitted, .. })
        ));
    }

    #[tokio::test]
    async fn test_payment_run_pays_approved_claims_once() {
        let (engine, store) = engine();
        approved(&engine, dec!(10), dec!(100)).await;
        approved(&engine, dec!(5), dec!(200)).await;
        engine
            .submit(&lecturer(), ClaimSubmission::new(date(2026, 10, 1), dec!(3), dec!(50)))
            .await
            .unwrap();

        let summary = engine.process_payments(&hr()).await.unwrap();
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.held, 0);
        assert_eq!(summary.amount.amount(), dec!(2000));

        let again = engine.process_payments(&hr()).await.unwrap();
        assert_eq!(again.processed, 0);
        assert_eq!(again.held, 0);
        assert!(again.amount.is_zero());

        let unpaid = ClaimQuery {
            paid: Some(false),
            ..ClaimQuery::by_status(ClaimStatus::Approved)
        };
        assert_eq!(store.count_claims(&unpaid).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_payment_run_holds_claims_in_other_currencies() {
        let (engine, store) = engine();
        let local = approved(&engine, dec!(2), dec!(100)).await;

        let mut foreign = Claim::submitted(
            UserId::new(),
            ClaimPeriod::new(2026, 9).unwrap(),
            dec!(3),
            dec!(50),
            Currency::USD,
            fixture_now(),
        );
        foreign.approve("Mike Manager", fixture_now()).unwrap();
        store.insert_claim(&foreign).await.unwrap();

        let summary = engine.process_payments(&hr()).await.unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.held, 1);
        assert_eq!(summary.amount.amount(), dec!(200));
        assert_eq!(summary.amount.currency(), Currency::ZAR);

        assert!(store.get_claim(local.id).await.unwrap().is_paid());
        assert!(store.get_claim(foreign.id).await.unwrap().is_awaiting_payment());
    }

    #[tokio::test]
    async fn test_payment_run_falls_back_to_system_name() {
        let (engine, store) = engine();
        let claim = approved(&engine, dec!(1), dec!(1)).await;

        let nameless = Actor::new(UserId::new(), "  ", Role::Manager);
        engine.process_payments(&nameless).await.unwrap();

        let stored = store.get_claim(claim.id).await.unwrap();
        assert_eq!(stored.payment().map(|p| p.paid_by.as_str()), Some("HR System"));
    }

    #[tokio::test]
    async fn test_lecturer_cannot_run_payments() {
        let (engine, _) = engine();
        assert!(matches!(
            engine.process_payments(&lecturer()).await,
            Err(ClaimError::Forbidden(_))
        ));
    }
}

// ============================================================================
// Query Tests
// ============================================================================

mod query_tests {
    use super::*;
    use chrono::Duration;

    fn claim_at(lecturer_id: UserId, submitted_at: DateTime<Utc>) -> Claim {
        Claim::submitted(
            lecturer_id,
            ClaimPeriod::new(2026, 10).unwrap(),
            dec!(1),
            dec!(100),
            Currency::ZAR,
            submitted_at,
        )
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_own_only() {
        let actor = lecturer();
        let older = claim_at(actor.user_id, fixture_now() - Duration::days(3));
        let newer = claim_at(actor.user_id, fixture_now() - Duration::days(1));
        let other = claim_at(UserId::new(), fixture_now());
        let store = Arc::new(
            InMemoryClaimStore::with_claims(vec![older.clone(), other, newer.clone()]).await,
        );
        let engine = LifecycleEngine::new(store, Arc::new(FixtureClock { utc_now: fixture_now() }));

        let history = engine.history_for(&actor).await.unwrap();
        let ids: Vec<_> = history.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[tokio::test]
    async fn test_pending_queue_is_oldest_first() {
        let older = claim_at(UserId::new(), fixture_now() - Duration::days(3));
        let newer = claim_at(UserId::new(), fixture_now() - Duration::days(1));
        let store = Arc::new(InMemoryClaimStore::with_claims(vec![newer.clone(), older.clone()]).await);
        let engine = LifecycleEngine::new(store, Arc::new(FixtureClock { utc_now: fixture_now() }));

        let queue = engine.pending_queue(&coordinator()).await.unwrap();
        let ids: Vec<_> = queue.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![older.id, newer.id]);
    }

    #[tokio::test]
    async fn test_equal_submit_times_order_by_id() {
        let claims: Vec<Claim> = (0..6)
            .map(|_| claim_at(UserId::new(), fixture_now()))
            .collect();
        let mut expected: Vec<ClaimId> = claims.iter().map(|c| c.id).collect();
        expected.sort();
        let store = InMemoryClaimStore::with_claims(claims).await;

        let newest_first = store.find_claims(&ClaimQuery::all()).await.unwrap();
        let ids: Vec<ClaimId> = newest_first.iter().map(|c| c.id).collect();
        assert_eq!(ids, expected);

        let oldest_first = store
            .find_claims(&ClaimQuery::all().ordered(ClaimOrder::SubmittedAsc))
            .await
            .unwrap();
        let ids: Vec<ClaimId> = oldest_first.iter().map(|c| c.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_recent_and_counts() {
        let claims: Vec<Claim> = (0..7)
            .map(|i| claim_at(UserId::new(), fixture_now() - Duration::hours(i)))
            .collect();
        let newest = claims[0].id;
        let store = Arc::new(InMemoryClaimStore::with_claims(claims).await);
        let engine = LifecycleEngine::new(store, Arc::new(FixtureClock { utc_now: fixture_now() }));

        let recent = engine.recent(5).await.unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].id, newest);

        let counts = engine.counts().await.unwrap();
        assert_eq!(counts.total, 7);
        assert_eq!(counts.pending, 7);
    }

    #[tokio::test]
    async fn test_period_range_query() {
        let lecturer_id = UserId::new();
        let mut september = claim_at(lecturer_id, fixture_now());
        september.period = ClaimPeriod::new(2026, 9).unwrap();
        let october = claim_at(lecturer_id, fixture_now());
        let store = InMemoryClaimStore::with_claims(vec![september, october.clone()]).await;

        let october_period = ClaimPeriod::new(2026, 10).unwrap();
        let found = store
            .find_claims(&ClaimQuery::all().in_periods(october_period, october_period))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, october.id);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_total_is_exact_product(hours_cents in 1i64..=20_000, rate_cents in 1i64..=50_000) {
            let hours = Decimal::new(hours_cents, 2);
            let rate = Decimal::new(rate_cents, 2);
            let claim = Claim::submitted(
                UserId::new(),
                ClaimPeriod::new(2026, 10).unwrap(),
                hours,
                rate,
                Currency::ZAR,
                fixture_now(),
            );
            prop_assert_eq!(claim.total().amount(), hours * rate);
        }

        #[test]
        fn test_valid_submissions_pass_rules(
            hours_cents in 1i64..=20_000,
            rate_cents in 1i64..=50_000,
            day in 1u32..=15,
        ) {
            let submission = ClaimSubmission::new(
                date(2026, 10, day),
                Decimal::new(hours_cents, 2),
                Decimal::new(rate_cents, 2),
            );
            let rules = domain_claims::SubmissionRules::default();
            prop_assert!(rules.validate(&submission, fixture_now().date_naive()).is_ok());
        }
    }
}
