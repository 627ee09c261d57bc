//! Property-based tests for unlatch-core using proptest
//!
//! These tests verify invariants that should hold for every combination of
//! options, enrollment and platform answer.

use std::sync::Arc;

use futures::executor::block_on;
use proptest::prelude::*;
use unlatch_core::{
    AuthController, AuthOptions, Enrollment, Evaluation, Notice, PolicyKind, SessionState,
    SimulatedAuthenticator, Toggle,
};

// ============================================
// Strategies
// ============================================

fn arb_options() -> impl Strategy<Value = AuthOptions> {
    (any::<bool>(), any::<bool>()).prop_map(|(companion, biometric)| {
        AuthOptions::new(companion, biometric)
    })
}

fn arb_enrollment() -> impl Strategy<Value = Enrollment> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(biometric, companion, disabled)| {
        Enrollment {
            biometric_enrolled: biometric,
            companion_device_reachable: companion,
            disabled_by_policy: disabled,
        }
    })
}

fn arb_evaluation() -> impl Strategy<Value = Evaluation> {
    (any::<bool>(), any::<bool>()).prop_map(|(succeeded, system_error)| Evaluation {
        succeeded,
        system_error,
    })
}

fn expected_policy(options: &AuthOptions) -> Option<PolicyKind> {
    match (options.allow_companion_device, options.allow_biometric) {
        (true, true) => Some(PolicyKind::BiometricsOrCompanionDevice),
        (false, true) => Some(PolicyKind::BiometricsOnly),
        (true, false) => Some(PolicyKind::CompanionDeviceOnly),
        (false, false) => None,
    }
}

// ============================================
// Properties
// ============================================

proptest! {
    /// The evaluated policy always matches the selection table
    #[test]
    fn prop_policy_follows_options(options in arb_options()) {
        let platform = Arc::new(SimulatedAuthenticator::default());
        let controller = AuthController::new(platform.clone());
        controller.set_options(options);

        match controller.toggle_authentication().unwrap() {
            Toggle::Started(attempt) => {
                prop_assert_eq!(Some(attempt.policy()), expected_policy(&options));
                block_on(attempt);
                prop_assert_eq!(platform.evaluated_policies(), vec![attempt_policy(&options)]);
            }
            Toggle::Unavailable => {
                prop_assert_eq!(expected_policy(&options), None);
                prop_assert_eq!(platform.evaluate_calls(), 0);
            }
            Toggle::SignedOut => prop_assert!(false, "signed out from a signed-out session"),
        }
    }

    /// A resolved attempt produces exactly one of: signed in, failed, errored
    #[test]
    fn prop_exactly_one_outcome(
        options in arb_options(),
        enrollment in arb_enrollment(),
        evaluation in arb_evaluation(),
    ) {
        let platform = Arc::new(SimulatedAuthenticator::always(enrollment, evaluation));
        let controller = AuthController::new(platform.clone());
        controller.set_options(options);

        if let Toggle::Started(attempt) = controller.toggle_authentication().unwrap() {
            block_on(attempt);
            let snapshot = controller.snapshot();

            let signals = [
                snapshot.is_authenticated(),
                snapshot.is_failed(),
                snapshot.is_errored(),
            ];
            prop_assert_eq!(signals.iter().filter(|s| **s).count(), 1);
            prop_assert!(!snapshot.is_unavailable());
            prop_assert_eq!(platform.evaluate_calls(), 1);
        } else {
            let snapshot = controller.snapshot();
            prop_assert_eq!(snapshot.notice, Some(Notice::Unavailable));
            prop_assert_eq!(snapshot.session, SessionState::SignedOut);
            prop_assert_eq!(platform.evaluate_calls(), 0);
        }
    }

    /// Signing in requires at least one allowed factor
    #[test]
    fn prop_sign_in_requires_a_factor(
        options in arb_options(),
        enrollment in arb_enrollment(),
    ) {
        let platform = Arc::new(SimulatedAuthenticator::new(enrollment));
        let controller = AuthController::new(platform);
        controller.set_options(options);

        if let Toggle::Started(attempt) = controller.toggle_authentication().unwrap() {
            block_on(attempt);
        }

        if controller.snapshot().is_authenticated() {
            prop_assert!(options.any_allowed());
        }
    }

    /// Signing out always lands in SignedOut with no new notice
    #[test]
    fn prop_sign_out_is_idempotent(options in arb_options()) {
        let platform = Arc::new(SimulatedAuthenticator::default());
        let controller = AuthController::new(platform.clone());

        if let Toggle::Started(attempt) = controller.toggle_authentication().unwrap() {
            block_on(attempt);
        }
        prop_assert!(controller.snapshot().is_authenticated());

        controller.set_options(options);
        let toggle = controller.toggle_authentication().unwrap();
        prop_assert!(matches!(toggle, Toggle::SignedOut));

        let snapshot = controller.snapshot();
        prop_assert_eq!(snapshot.session, SessionState::SignedOut);
        prop_assert_eq!(snapshot.notice, None);
        prop_assert_eq!(platform.evaluate_calls(), 1);
    }
}

fn attempt_policy(options: &AuthOptions) -> PolicyKind {
    expected_policy(options).expect("attempt started without a policy")
}
