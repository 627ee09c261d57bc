//! Presentation state that is not owned by the controller

use unlatch_core::{AuthSnapshot, PromptRequest};

/// Focusable control on the authenticator screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Authenticate / Sign Out button
    #[default]
    Trigger,
    /// "Apple Watch" toggle
    CompanionDevice,
    /// "Touch ID" toggle
    Biometric,
}

impl Focus {
    /// Controls visible for the given state, in tab order
    pub fn visible(snapshot: &AuthSnapshot) -> &'static [Focus] {
        // Options are hidden once signed in
        if snapshot.is_authenticated() {
            &[Focus::Trigger]
        } else {
            &[Focus::Trigger, Focus::CompanionDevice, Focus::Biometric]
        }
    }
}

/// UI state
#[derive(Debug, Default)]
pub struct UiState {
    /// Focused control
    pub focus: Focus,

    /// Prompt waiting for the user's answer
    pub prompt: Option<PromptRequest>,

    /// Transient hint shown under the controls
    pub status_message: Option<String>,
}

impl UiState {
    /// Create new UI state
    pub fn new() -> Self {
        Self::default()
    }

    /// Move focus forward (or backward) among visible controls
    pub fn cycle_focus(&mut self, snapshot: &AuthSnapshot, forward: bool) {
        let visible = Focus::visible(snapshot);
        let index = visible.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (index + 1) % visible.len()
        } else {
            (index + visible.len() - 1) % visible.len()
        };
        self.focus = visible[next];
    }

    /// Put focus back on a visible control after the layout changed
    pub fn clamp_focus(&mut self, snapshot: &AuthSnapshot) {
        if !Focus::visible(snapshot).contains(&self.focus) {
            self.focus = Focus::Trigger;
        }
    }

    /// Drop a prompt whose attempt no longer exists
    pub fn discard_abandoned_prompt(&mut self) {
        if self.prompt.as_ref().is_some_and(PromptRequest::is_abandoned) {
            self.prompt = None;
        }
    }

    /// Clear status message
    pub fn clear_messages(&mut self) {
        self.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unlatch_core::SessionState;

    #[test]
    fn test_focus_cycles_through_options() {
        let snapshot = AuthSnapshot::default();
        let mut state = UiState::new();

        state.cycle_focus(&snapshot, true);
        assert_eq!(state.focus, Focus::CompanionDevice);
        state.cycle_focus(&snapshot, true);
        assert_eq!(state.focus, Focus::Biometric);
        state.cycle_focus(&snapshot, true);
        assert_eq!(state.focus, Focus::Trigger);
        state.cycle_focus(&snapshot, false);
        assert_eq!(state.focus, Focus::Biometric);
    }

    #[test]
    fn test_signed_in_only_shows_trigger() {
        let snapshot = AuthSnapshot {
            session: SessionState::SignedIn,
            ..AuthSnapshot::default()
        };
        let mut state = UiState {
            focus: Focus::Biometric,
            ..UiState::default()
        };

        state.clamp_focus(&snapshot);
        assert_eq!(state.focus, Focus::Trigger);

        state.cycle_focus(&snapshot, true);
        assert_eq!(state.focus, Focus::Trigger);
    }
}
