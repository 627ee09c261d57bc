//! Observable authentication state

use crate::{AuthOptions, Notice, PolicyKind};

/// Signed-in state of the current process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not authenticated
    #[default]
    SignedOut,
    /// An evaluation is outstanding for the given policy
    Authenticating(PolicyKind),
    /// Authenticated
    SignedIn,
}

impl SessionState {
    /// Whether the user is signed in
    pub fn is_signed_in(&self) -> bool {
        matches!(self, SessionState::SignedIn)
    }

    /// Whether an attempt is outstanding
    pub fn is_authenticating(&self) -> bool {
        matches!(self, SessionState::Authenticating(_))
    }
}

/// Everything a front end needs to render the authenticator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthSnapshot {
    /// Current user options
    pub options: AuthOptions,
    /// Session state
    pub session: SessionState,
    /// Active notice, if any
    pub notice: Option<Notice>,
}

impl AuthSnapshot {
    /// Whether the user is signed in
    pub fn is_authenticated(&self) -> bool {
        self.session.is_signed_in()
    }

    /// "No authentication" notice is showing
    pub fn is_unavailable(&self) -> bool {
        self.notice == Some(Notice::Unavailable)
    }

    /// "Authentication failed" notice is showing
    pub fn is_failed(&self) -> bool {
        self.notice == Some(Notice::Failed)
    }

    /// "Authentication error" notice is showing
    pub fn is_errored(&self) -> bool {
        self.notice == Some(Notice::Errored)
    }

    /// Whether the authenticate / sign-out trigger should be enabled.
    ///
    /// Disabled while an attempt is outstanding, and while signed out with
    /// no factor allowed.
    pub fn can_trigger(&self) -> bool {
        match self.session {
            SessionState::SignedIn => true,
            SessionState::Authenticating(_) => false,
            SessionState::SignedOut => self.options.any_allowed(),
        }
    }
}
