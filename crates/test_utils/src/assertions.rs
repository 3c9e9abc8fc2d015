//! Custom Test Assertions
//!
//! Assertion helpers for domain types that give more meaningful failure
//! messages than `assert_eq!` on the raw values.

use rust_decimal::Decimal;

use core_kernel::Money;
use domain_claims::{ClaimAction, ClaimError, ClaimStatus};

/// Asserts an exact amount, with currency in the failure message
pub fn assert_money_eq(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "Expected {} {}, got {} {}",
        actual.currency().symbol(),
        expected,
        actual.currency().symbol(),
        actual.amount()
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts a validation failure with a message containing `fragment`
pub fn assert_validation_error<T: std::fmt::Debug>(result: Result<T, ClaimError>, fragment: &str) {
    match result {
        Err(ClaimError::Validation(errors)) => assert!(
            errors.mentions(fragment),
            "No validation message mentions {:?}: {:?}",
            fragment,
            errors.messages()
        ),
        other => panic!("Expected validation error mentioning {:?}, got {:?}", fragment, other),
    }
}

/// Asserts that `action` was refused because the claim was in `from`
pub fn assert_invalid_transition<T: std::fmt::Debug>(
    result: Result<T, ClaimError>,
    from: ClaimStatus,
    action: ClaimAction,
) {
    match result {
        Err(ClaimError::InvalidTransition { from: f, action: a }) => {
            assert_eq!((f, a), (from, action), "Wrong transition refused");
        }
        other => panic!("Expected {} from {} to be refused, got {:?}", action, from, other),
    }
}

/// Asserts that the caller's role was refused
pub fn assert_forbidden<T: std::fmt::Debug>(result: Result<T, ClaimError>) {
    assert!(
        matches!(result, Err(ClaimError::Forbidden(_))),
        "Expected forbidden, got {:?}",
        result
    );
}
