//! Unit tests for money sums and currency parsing

use core_kernel::{Currency, Money, MoneyError};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod sums {
    use super::*;

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let total = Money::sum(Currency::ZAR, &Vec::new()).unwrap();
        assert!(total.is_zero());
        assert_eq!(total.currency(), Currency::ZAR);
    }

    #[test]
    fn test_sum_rejects_mixed_currencies() {
        let amounts = vec![
            Money::new(dec!(100), Currency::ZAR),
            Money::new(dec!(50), Currency::USD),
        ];
        assert!(matches!(
            Money::sum(Currency::ZAR, &amounts),
            Err(MoneyError::CurrencyMismatch(_, _))
        ));
    }

    #[test]
    fn test_sum_keeps_exact_cents() {
        let amounts = vec![
            Money::new(dec!(0.10), Currency::ZAR),
            Money::new(dec!(0.20), Currency::ZAR),
        ];
        assert_eq!(Money::sum(Currency::ZAR, &amounts).unwrap().amount(), dec!(0.30));
    }

    proptest! {
        #[test]
        fn test_sum_matches_decimal_sum(cents in proptest::collection::vec(0i64..10_000_000, 0..20)) {
            let amounts: Vec<Money> = cents
                .iter()
                .map(|c| Money::new(Decimal::new(*c, 2), Currency::ZAR))
                .collect();
            let expected: Decimal = cents.iter().map(|c| Decimal::new(*c, 2)).sum();
            prop_assert_eq!(Money::sum(Currency::ZAR, &amounts).unwrap().amount(), expected);
        }
    }
}

mod currency {
    use super::*;

    #[test]
    fn test_currency_parse_is_case_insensitive() {
        assert_eq!("zar".parse::<Currency>().unwrap(), Currency::ZAR);
        assert!("XYZ".parse::<Currency>().is_err());
    }
}
