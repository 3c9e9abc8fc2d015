//! Property-Based Test Generators
//!
//! Proptest strategies that produce claim input inside the submission rules.

use chrono::{Datelike, Months, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_claims::ClaimSubmission;

use crate::fixtures::TemporalFixtures;

/// Hours in (0, 200] with at most two decimal places
pub fn valid_hours_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=20_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Rates in (0, 500] with at most two decimal places
pub fn valid_rate_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=50_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Hours above the monthly cap
pub fn excessive_hours_strategy() -> impl Strategy<Value = Decimal> {
    (20_001i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// A date no later than the fixture date, in its month or one of the two before it
pub fn recent_period_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u32..=2, 1u32..=28).prop_map(|(back, day)| {
        let today = TemporalFixtures::today();
        let month = today - Months::new(back);
        let day = if back == 0 { day.min(today.day()) } else { day };
        NaiveDate::from_ymd_opt(month.year(), month.month(), day)
            .expect("day 1-28 exists in every month")
    })
}

/// Submissions that pass the default rules on the fixture date
pub fn valid_submission_strategy() -> impl Strategy<Value = ClaimSubmission> {
    (
        recent_period_date_strategy(),
        valid_hours_strategy(),
        valid_rate_strategy(),
    )
        .prop_map(|(period, hours, rate)| ClaimSubmission::new(period, hours, rate))
}
