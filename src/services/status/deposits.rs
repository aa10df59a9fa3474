use crate::models::{DepositState, DepositStatus, PackagePolicy};

/// Classify a customer's deposit position against the resolved package
/// policy. Inputs are already coerced (absent/non-numeric amounts arrive
/// as 0), so this never fails.
pub fn evaluate(
    validation_deposit: f64,
    confirmation_deposit: f64,
    policy: Option<&PackagePolicy>,
) -> DepositStatus {
    let total_paid = validation_deposit + confirmation_deposit;

    // Unresolved package comes first: a zero balance against an unknown
    // policy is not the same fact as a zero balance against a quoted one.
    let Some(policy) = policy else {
        return DepositStatus {
            state: DepositState::UnknownPackage,
            total_paid,
            expected: None,
            remaining: 0.0,
        };
    };

    let expected = policy.expected_deposit;
    let state = if total_paid == 0.0 {
        DepositState::None
    } else if total_paid >= expected {
        DepositState::Complete
    } else {
        DepositState::Partial
    };

    DepositStatus {
        state,
        total_paid,
        expected: Some(expected),
        remaining: (expected - total_paid).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivationMethod;

    fn policy(expected: f64) -> PackagePolicy {
        PackagePolicy {
            expected_deposit: expected,
            activation: ActivationMethod::Online,
        }
    }

    #[test]
    fn test_no_deposits() {
        let result = evaluate(0.0, 0.0, Some(&policy(500.0)));
        assert_eq!(result.state, DepositState::None);
        assert_eq!(result.total_paid, 0.0);
        assert_eq!(result.remaining, 500.0);
    }

    #[test]
    fn test_complete_when_total_meets_expected() {
        let result = evaluate(250.0, 250.0, Some(&policy(500.0)));
        assert_eq!(result.state, DepositState::Complete);
        assert_eq!(result.total_paid, 500.0);
        assert_eq!(result.remaining, 0.0);
    }

    #[test]
    fn test_overpayment_is_still_complete() {
        let result = evaluate(500.0, 100.0, Some(&policy(500.0)));
        assert_eq!(result.state, DepositState::Complete);
        assert_eq!(result.remaining, 0.0);
    }

    #[test]
    fn test_partial_reports_remaining() {
        let result = evaluate(100.0, 0.0, Some(&policy(500.0)));
        assert_eq!(result.state, DepositState::Partial);
        assert_eq!(result.remaining, 400.0);
    }

    #[test]
    fn test_unknown_package_beats_amount_checks() {
        // Even a fully-paid-looking balance is unknown_package without a
        // policy, and expected stays unavailable rather than zero.
        for (a, b) in [(0.0, 0.0), (250.0, 250.0), (10_000.0, 0.0)] {
            let result = evaluate(a, b, None);
            assert_eq!(result.state, DepositState::UnknownPackage);
            assert_eq!(result.expected, None);
        }
    }
}
