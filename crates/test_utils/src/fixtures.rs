//! Pre-built Test Fixtures
//!
//! Consistent, predictable data for tests: a fixed "now", a clock pinned to
//! it, and one user per role.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Clock, Currency, Money, UserId};
use domain_claims::{ClaimSubmission, NewDocument};
use domain_identity::{hash_password, Actor, Role, User};

/// Password every fixture user is created with
pub const FIXTURE_PASSWORD: &str = "password123";

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The instant tests treat as "now": 15 Oct 2026, 09:00 UTC
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).unwrap()
    }

    pub fn today() -> NaiveDate {
        Self::now().date_naive()
    }

    /// A date in the month before "now"
    pub fn last_month() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 10).unwrap()
    }

    /// `hours` before "now"
    pub fn hours_ago(hours: i64) -> DateTime<Utc> {
        Self::now() - Duration::hours(hours)
    }
}

/// Clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    utc_now: DateTime<Utc>,
}

impl FixedClock {
    pub fn at(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }

    /// A clock at [`TemporalFixtures::now`]
    pub fn shared() -> Arc<dyn Clock> {
        Arc::new(Self::at(TemporalFixtures::now()))
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn zar(amount: Decimal) -> Money {
        Money::new(amount, Currency::ZAR)
    }

    pub fn zar_zero() -> Money {
        Money::zero(Currency::ZAR)
    }
}

/// Claim submissions that pass the default rules at [`TemporalFixtures::now`]
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// 10 hours at R100 in the current month
    pub fn submission() -> ClaimSubmission {
        ClaimSubmission::new(TemporalFixtures::today(), dec!(10), dec!(100))
    }

    /// 12.5 hours at R320 last month, with a note and a timesheet
    pub fn documented_submission() -> ClaimSubmission {
        ClaimSubmission::new(TemporalFixtures::last_month(), dec!(12.5), dec!(320))
            .with_note("Extra tutorials")
            .with_document(Self::timesheet())
    }

    pub fn timesheet() -> NewDocument {
        NewDocument {
            file_name: "timesheet.pdf".to_string(),
            stored_file_name: "timesheet_20260915.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            file_size: 48_213,
            description: Some("Signed timesheet".to_string()),
        }
    }
}

/// The demo users, one per role, all with [`FIXTURE_PASSWORD`]
pub struct UserFixtures;

impl UserFixtures {
    pub fn lecturer() -> User {
        Self::user("John Lecturer", "lecturer@cmcs.com", Role::Lecturer)
    }

    pub fn coordinator() -> User {
        Self::user("Sarah Coordinator", "coordinator@cmcs.com", Role::Coordinator)
    }

    pub fn manager() -> User {
        Self::user("Mike Manager", "manager@cmcs.com", Role::Manager)
    }

    pub fn hr() -> User {
        Self::user("Thandi HR", "hr@cmcs.com", Role::Hr)
    }

    /// All four demo users
    pub fn all() -> Vec<User> {
        vec![Self::lecturer(), Self::coordinator(), Self::manager(), Self::hr()]
    }

    /// The caller identity for a user
    pub fn actor(user: &User) -> Actor {
        Actor::new(user.id, user.name.clone(), user.role)
    }

    fn user(name: &str, email: &str, role: Role) -> User {
        User {
            id: UserId::new(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(FIXTURE_PASSWORD).expect("hash fixture password"),
            role,
            phone_number: None,
            registered_at: TemporalFixtures::now() - Duration::days(365),
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_identity::verify_password;

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::shared();
        assert_eq!(clock.utc(), TemporalFixtures::now());
    }

    #[test]
    fn test_claim_fixtures_are_valid() {
        let rules = domain_claims::SubmissionRules::default();
        assert!(rules.validate(&ClaimFixtures::submission(), TemporalFixtures::today()).is_ok());
        assert!(rules
            .validate(&ClaimFixtures::documented_submission(), TemporalFixtures::today())
            .is_ok());
    }

    #[test]
    fn test_fixture_users_verify() {
        let user = UserFixtures::lecturer();
        assert!(verify_password(FIXTURE_PASSWORD, &user.password_hash).is_ok());
        assert_eq!(UserFixtures::actor(&user).role, Role::Lecturer);
    }
}
