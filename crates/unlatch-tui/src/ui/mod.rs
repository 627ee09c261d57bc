//! UI rendering

pub mod components;
pub mod layout;
pub mod screens;
pub mod theme;

pub use theme::Theme;

use ratatui::prelude::*;

use crate::app::App;

/// Main render function
///
/// Draws the authenticator screen, then the modal layers on top: the
/// platform prompt while an attempt is outstanding, and the active notice.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let snapshot = app.snapshot();

    screens::authenticator::draw(frame, area, app, &snapshot);

    if let Some(prompt) = &app.state.prompt {
        components::prompt::render(frame, area, prompt, &app.theme);
    } else if let unlatch_core::SessionState::Authenticating(policy) = snapshot.session {
        components::prompt::render_waiting(frame, area, policy, &app.theme);
    }

    if let Some(notice) = snapshot.notice {
        components::alert::render(frame, area, notice, &app.theme);
    }
}
