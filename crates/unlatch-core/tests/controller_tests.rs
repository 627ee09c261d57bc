//! Controller behaviour against a scripted platform
//!
//! Covers the sign-in scenarios end to end: policy selection, capability
//! short-circuit, outcome mapping, sign-out and re-entrancy.

use std::sync::Arc;

use unlatch_core::{
    AttemptOutcome, AuthController, AuthOptions, Enrollment, Evaluation, EvaluationRequest,
    Notice, PolicyKind, SessionState, SimulatedAuthenticator, Toggle, UnlatchError,
};

fn setup(evaluation: Evaluation) -> (AuthController, Arc<SimulatedAuthenticator>) {
    let platform = Arc::new(SimulatedAuthenticator::always(
        Enrollment::default(),
        evaluation,
    ));
    (AuthController::new(platform.clone()), platform)
}

async fn run_attempt(controller: &AuthController) -> AttemptOutcome {
    match controller.toggle_authentication().unwrap() {
        Toggle::Started(attempt) => attempt.await,
        other => panic!("expected an attempt, got {:?}", other),
    }
}

// ============================================
// Scenarios
// ============================================

#[tokio::test]
async fn test_success_signs_in() {
    let (controller, platform) = setup(Evaluation::success());

    let outcome = run_attempt(&controller).await;

    assert_eq!(outcome, AttemptOutcome::SignedIn);
    let snapshot = controller.snapshot();
    assert!(snapshot.is_authenticated());
    assert_eq!(snapshot.notice, None);
    assert_eq!(
        platform.evaluated_policies(),
        vec![PolicyKind::BiometricsOrCompanionDevice]
    );
}

#[tokio::test]
async fn test_failure_raises_failed_notice() {
    let (controller, _) = setup(Evaluation::failure());

    let outcome = run_attempt(&controller).await;

    assert_eq!(outcome, AttemptOutcome::Failed);
    let snapshot = controller.snapshot();
    assert!(!snapshot.is_authenticated());
    assert!(snapshot.is_failed());
    assert!(!snapshot.is_errored());
    assert!(!snapshot.is_unavailable());
}

#[tokio::test]
async fn test_system_error_raises_errored_notice() {
    let (controller, _) = setup(Evaluation::system_error());

    let outcome = run_attempt(&controller).await;

    assert_eq!(outcome, AttemptOutcome::Errored);
    let snapshot = controller.snapshot();
    assert!(!snapshot.is_authenticated());
    assert!(snapshot.is_errored());
    assert!(!snapshot.is_failed());
}

#[tokio::test]
async fn test_no_factor_is_unavailable_without_evaluating() {
    let (controller, platform) = setup(Evaluation::success());
    controller.set_options(AuthOptions::new(false, false));

    let toggle = controller.toggle_authentication().unwrap();

    assert!(matches!(toggle, Toggle::Unavailable));
    let snapshot = controller.snapshot();
    assert!(snapshot.is_unavailable());
    assert_eq!(snapshot.session, SessionState::SignedOut);
    assert_eq!(platform.evaluate_calls(), 0);
}

#[tokio::test]
async fn test_sign_out_is_synchronous() {
    let (controller, platform) = setup(Evaluation::success());
    run_attempt(&controller).await;
    controller.set_options(AuthOptions::new(false, false));

    let toggle = controller.toggle_authentication().unwrap();

    assert!(matches!(toggle, Toggle::SignedOut));
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.session, SessionState::SignedOut);
    assert_eq!(snapshot.notice, None);
    assert_eq!(platform.evaluate_calls(), 1);
}

// ============================================
// Capability and policy
// ============================================

#[tokio::test]
async fn test_missing_enrollment_is_unavailable() {
    let (controller, platform) = setup(Evaluation::success());
    platform.set_enrollment(Enrollment {
        biometric_enrolled: false,
        ..Enrollment::default()
    });
    controller.set_allow_companion_device(false);

    let toggle = controller.toggle_authentication().unwrap();

    assert!(matches!(toggle, Toggle::Unavailable));
    assert!(controller.snapshot().is_unavailable());
    assert_eq!(platform.evaluate_calls(), 0);
}

#[tokio::test]
async fn test_single_factor_policies() {
    let (controller, platform) = setup(Evaluation::failure());

    controller.set_options(AuthOptions::new(false, true));
    run_attempt(&controller).await;
    controller.dismiss_notice();

    controller.set_options(AuthOptions::new(true, false));
    run_attempt(&controller).await;

    assert_eq!(
        platform.evaluated_policies(),
        vec![PolicyKind::BiometricsOnly, PolicyKind::CompanionDeviceOnly]
    );
}

#[tokio::test]
async fn test_options_changed_mid_attempt_do_not_affect_policy() {
    let (controller, platform) = setup(Evaluation::success());

    let attempt = match controller.toggle_authentication().unwrap() {
        Toggle::Started(attempt) => attempt,
        other => panic!("expected an attempt, got {:?}", other),
    };
    controller.set_options(AuthOptions::new(false, true));

    assert_eq!(attempt.policy(), PolicyKind::BiometricsOrCompanionDevice);
    attempt.await;

    assert_eq!(
        platform.evaluated_policies(),
        vec![PolicyKind::BiometricsOrCompanionDevice]
    );
    assert!(controller.snapshot().is_authenticated());
}

#[tokio::test]
async fn test_prompt_text_is_forwarded() {
    let platform = Arc::new(SimulatedAuthenticator::default());
    let controller = AuthController::with_request(
        platform.clone(),
        EvaluationRequest::new("Unlock the vault.", "Not now"),
    );

    run_attempt(&controller).await;

    let request = platform.last_request().unwrap();
    assert_eq!(request.reason, "Unlock the vault.");
    assert_eq!(request.cancel_label, "Not now");
}

// ============================================
// Re-entrancy and notices
// ============================================

#[tokio::test]
async fn test_second_toggle_while_authenticating_is_rejected() {
    let (controller, platform) = setup(Evaluation::success());

    let attempt = match controller.toggle_authentication().unwrap() {
        Toggle::Started(attempt) => attempt,
        other => panic!("expected an attempt, got {:?}", other),
    };
    assert!(!controller.can_trigger());

    let second = controller.toggle_authentication();
    assert_eq!(second.unwrap_err(), UnlatchError::AttemptInProgress);
    assert_eq!(
        controller.snapshot().session,
        SessionState::Authenticating(PolicyKind::BiometricsOrCompanionDevice)
    );

    attempt.await;
    assert_eq!(platform.evaluate_calls(), 1);
    assert!(controller.snapshot().is_authenticated());
}

#[tokio::test]
async fn test_new_attempt_clears_stale_notice() {
    let (controller, platform) = setup(Evaluation::failure());
    run_attempt(&controller).await;
    assert!(controller.snapshot().is_failed());

    platform.set_fallback(Evaluation::success());
    run_attempt(&controller).await;

    let snapshot = controller.snapshot();
    assert!(snapshot.is_authenticated());
    assert_eq!(snapshot.notice, None);
}

#[tokio::test]
async fn test_newer_outcome_replaces_notice() {
    let (controller, platform) = setup(Evaluation::failure());
    run_attempt(&controller).await;
    assert_eq!(controller.snapshot().notice, Some(Notice::Failed));

    // Capability lost: unavailable replaces failed without evaluating
    platform.set_enrollment(Enrollment::none());
    assert!(matches!(
        controller.toggle_authentication().unwrap(),
        Toggle::Unavailable
    ));
    assert_eq!(controller.snapshot().notice, Some(Notice::Unavailable));
    assert_eq!(platform.evaluate_calls(), 1);

    // Back to failed, then a platform error replaces it
    platform.set_enrollment(Enrollment::default());
    run_attempt(&controller).await;
    assert_eq!(controller.snapshot().notice, Some(Notice::Failed));

    platform.set_fallback(Evaluation::system_error());
    assert_eq!(run_attempt(&controller).await, AttemptOutcome::Errored);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.notice, Some(Notice::Errored));
    assert_eq!(snapshot.session, SessionState::SignedOut);
}

#[tokio::test]
async fn test_dismiss_clears_only_the_notice() {
    let (controller, _) = setup(Evaluation::system_error());
    controller.set_allow_biometric(false);
    run_attempt(&controller).await;

    controller.dismiss_notice();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.notice, None);
    assert_eq!(snapshot.session, SessionState::SignedOut);
    assert_eq!(snapshot.options, AuthOptions::new(true, false));
}

#[tokio::test]
async fn test_subscribers_see_each_transition() {
    let (controller, _) = setup(Evaluation::success());
    let mut rx = controller.subscribe();

    let attempt = match controller.toggle_authentication().unwrap() {
        Toggle::Started(attempt) => attempt,
        other => panic!("expected an attempt, got {:?}", other),
    };
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().session.is_authenticating());

    let handle = tokio::spawn(attempt);
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_authenticated());
    handle.await.unwrap();
}
