//! Unit tests for claim periods

use chrono::NaiveDate;
use core_kernel::{ClaimPeriod, PeriodError};

mod period_construction {
    use super::*;

    #[test]
    fn test_new_rejects_month_thirteen() {
        assert_eq!(
            ClaimPeriod::new(2026, 13),
            Err(PeriodError::InvalidMonth { year: 2026, month: 13 })
        );
    }

    #[test]
    fn test_ordering_follows_calendar() {
        let sep = ClaimPeriod::new(2026, 9).unwrap();
        let oct = ClaimPeriod::new(2026, 10).unwrap();
        assert!(sep < oct);
        assert_eq!(sep.next().unwrap(), oct);
    }

    #[test]
    fn test_serializes_as_first_day() {
        let period = ClaimPeriod::new(2026, 7).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, "\"2026-07-01\"");

        let back: ClaimPeriod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, period);
    }

    #[test]
    fn test_deserialize_rejects_mid_month() {
        let result: Result<ClaimPeriod, _> = serde_json::from_str("\"2026-07-15\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_contains_only_same_month_and_year() {
        let period = ClaimPeriod::new(2026, 10).unwrap();
        assert!(period.contains(NaiveDate::from_ymd_opt(2026, 10, 31).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 10, 31).unwrap()));
    }
}
