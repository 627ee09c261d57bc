//! Authenticator controller
//!
//! Owns the user options, the session state and the active notice, and
//! publishes every change through a `tokio::sync::watch` channel so any
//! number of front ends can render it.
//!
//! # Attempt lifecycle
//!
//! `toggle_authentication` never blocks. When it starts an attempt it moves
//! the session to `Authenticating` and hands back an [`Attempt`] future.
//! The caller drives that future (await it or spawn it); when it resolves it
//! applies exactly one outcome. Dropping it before it resolves puts the
//! session back to `SignedOut` with no notice.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::{Result, UnlatchError};
use crate::{
    AuthOptions, AuthSnapshot, Evaluation, EvaluationRequest, Notice, PlatformAuthenticator,
    PolicyKind, SessionState,
};

/// What a call to [`AuthController::toggle_authentication`] did
#[derive(Debug)]
pub enum Toggle {
    /// The user was signed in and is now signed out
    SignedOut,
    /// No attempt was made; the "unavailable" notice is now active
    Unavailable,
    /// An attempt is outstanding; drive the future to resolve it
    Started(Attempt),
}

/// Resolution of a single attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The user is now signed in
    SignedIn,
    /// The user did not authenticate
    Failed,
    /// The platform malfunctioned
    Errored,
}

impl AttemptOutcome {
    /// Notice raised by this outcome
    pub fn notice(&self) -> Option<Notice> {
        match self {
            AttemptOutcome::SignedIn => None,
            AttemptOutcome::Failed => Some(Notice::Failed),
            AttemptOutcome::Errored => Some(Notice::Errored),
        }
    }
}

impl From<Evaluation> for AttemptOutcome {
    fn from(evaluation: Evaluation) -> Self {
        // A system error wins even if the platform also claims success
        if evaluation.system_error {
            AttemptOutcome::Errored
        } else if evaluation.succeeded {
            AttemptOutcome::SignedIn
        } else {
            AttemptOutcome::Failed
        }
    }
}

/// Outstanding authentication attempt
pub struct Attempt {
    policy: PolicyKind,
    future: BoxFuture<'static, AttemptOutcome>,
}

impl Attempt {
    /// Policy snapshotted when the attempt started
    pub fn policy(&self) -> PolicyKind {
        self.policy
    }
}

impl Future for Attempt {
    type Output = AttemptOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

impl fmt::Debug for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attempt")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Applies the outcome of an attempt, or rolls the session back if the
/// attempt is dropped first.
struct AttemptGuard {
    state: Arc<watch::Sender<AuthSnapshot>>,
    policy: PolicyKind,
    armed: bool,
}

impl AttemptGuard {
    fn resolve(mut self, outcome: AttemptOutcome) -> AttemptOutcome {
        self.armed = false;
        let policy = self.policy;

        self.state.send_modify(|snapshot| {
            snapshot.session = match outcome {
                AttemptOutcome::SignedIn => SessionState::SignedIn,
                AttemptOutcome::Failed | AttemptOutcome::Errored => SessionState::SignedOut,
            };
            snapshot.notice = outcome.notice();
        });

        match outcome {
            AttemptOutcome::SignedIn => info!("Signed in with {}", policy),
            AttemptOutcome::Failed => warn!("Authentication with {} failed or was canceled", policy),
            AttemptOutcome::Errored => error!("Platform error while evaluating {}", policy),
        }

        outcome
    }
}

impl Drop for AttemptGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let policy = self.policy;
        let rolled_back = self.state.send_if_modified(|snapshot| {
            if snapshot.session == SessionState::Authenticating(policy) {
                snapshot.session = SessionState::SignedOut;
                true
            } else {
                false
            }
        });

        if rolled_back {
            debug!("Attempt with {} dropped before resolving", policy);
        }
    }
}

/// Gates the signed-in state behind a platform authentication capability
#[derive(Clone)]
pub struct AuthController {
    platform: Arc<dyn PlatformAuthenticator>,
    request: EvaluationRequest,
    state: Arc<watch::Sender<AuthSnapshot>>,
}

impl AuthController {
    /// Create a controller with default options and prompt text
    pub fn new(platform: Arc<dyn PlatformAuthenticator>) -> Self {
        Self::with_request(platform, EvaluationRequest::default())
    }

    /// Create a controller with custom prompt text
    pub fn with_request(platform: Arc<dyn PlatformAuthenticator>, request: EvaluationRequest) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::default());
        Self {
            platform,
            request,
            state: Arc::new(state),
        }
    }

    /// Current state
    pub fn snapshot(&self) -> AuthSnapshot {
        *self.state.borrow()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.state.subscribe()
    }

    /// Prompt text passed to the platform
    pub fn request(&self) -> &EvaluationRequest {
        &self.request
    }

    /// Name of the platform backend
    pub fn platform_name(&self) -> &'static str {
        self.platform.name()
    }

    /// Whether the authenticate / sign-out trigger should be enabled
    pub fn can_trigger(&self) -> bool {
        self.snapshot().can_trigger()
    }

    /// Allow or forbid the companion device factor
    pub fn set_allow_companion_device(&self, allow: bool) {
        self.update_options(|options| options.allow_companion_device = allow);
    }

    /// Allow or forbid the biometric factor
    pub fn set_allow_biometric(&self, allow: bool) {
        self.update_options(|options| options.allow_biometric = allow);
    }

    /// Replace both options at once
    pub fn set_options(&self, new_options: AuthOptions) {
        self.update_options(|options| *options = new_options);
    }

    fn update_options(&self, apply: impl FnOnce(&mut AuthOptions)) {
        self.state.send_if_modified(|snapshot| {
            let before = snapshot.options;
            apply(&mut snapshot.options);
            if before != snapshot.options {
                debug!(options = ?snapshot.options, "Authentication options changed");
                true
            } else {
                false
            }
        });
    }

    /// Clear the active notice. Has no other effect.
    pub fn dismiss_notice(&self) {
        self.state.send_if_modified(|snapshot| snapshot.notice.take().is_some());
    }

    /// Sign out, or start an authentication attempt.
    ///
    /// - Signed in: signs out synchronously.
    /// - Signed out: selects the policy from the current options, checks the
    ///   platform can satisfy it and, if so, starts an attempt.
    /// - Authenticating: rejected with [`UnlatchError::AttemptInProgress`].
    pub fn toggle_authentication(&self) -> Result<Toggle> {
        let snapshot = self.snapshot();
        match snapshot.session {
            SessionState::SignedIn => {
                self.sign_out();
                Ok(Toggle::SignedOut)
            }
            SessionState::Authenticating(policy) => {
                debug!("Ignoring toggle while {} is being evaluated", policy);
                Err(UnlatchError::AttemptInProgress)
            }
            SessionState::SignedOut => self.begin_attempt(snapshot.options),
        }
    }

    /// Sign out if signed in. Local and infallible.
    pub fn sign_out(&self) {
        let signed_out = self.state.send_if_modified(|snapshot| {
            if snapshot.session.is_signed_in() {
                snapshot.session = SessionState::SignedOut;
                true
            } else {
                false
            }
        });

        if signed_out {
            info!("Signed out");
        }
    }

    fn begin_attempt(&self, options: AuthOptions) -> Result<Toggle> {
        let Some(policy) = PolicyKind::select(&options) else {
            warn!("No authentication factor selected");
            self.raise_unavailable();
            return Ok(Toggle::Unavailable);
        };

        if !self.platform.can_satisfy(policy) {
            warn!(
                "{} cannot satisfy {} on this machine",
                self.platform.name(),
                policy
            );
            self.raise_unavailable();
            return Ok(Toggle::Unavailable);
        }

        // Claim the session atomically so two callers cannot both start
        let claimed = self.state.send_if_modified(|snapshot| {
            if snapshot.session == SessionState::SignedOut {
                snapshot.session = SessionState::Authenticating(policy);
                snapshot.notice = None;
                true
            } else {
                false
            }
        });

        if !claimed {
            return Err(UnlatchError::AttemptInProgress);
        }

        debug!("Evaluating {} via {}", policy, self.platform.name());

        let guard = AttemptGuard {
            state: Arc::clone(&self.state),
            policy,
            armed: true,
        };
        let platform = Arc::clone(&self.platform);
        let request = self.request.clone();

        let future = async move {
            let evaluation = platform.evaluate(policy, &request).await;
            guard.resolve(AttemptOutcome::from(evaluation))
        }
        .boxed();

        Ok(Toggle::Started(Attempt { policy, future }))
    }

    fn raise_unavailable(&self) {
        self.state.send_modify(|snapshot| snapshot.notice = Some(Notice::Unavailable));
    }
}

impl fmt::Debug for AuthController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthController")
            .field("platform", &self.platform.name())
            .field("request", &self.request)
            .field("state", &*self.state.borrow())
            .finish()
    }
}
