//! Authenticator screen: sign-in button, factor toggles, signed-in banner

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use unlatch_core::AuthSnapshot;

use crate::app::{App, Focus};
use crate::ui::components::toggle;
use crate::ui::layout::{centered_rect_fixed, render_footer, render_header, ScreenLayout};

/// Width of the centered control column
const COLUMN_WIDTH: u16 = 44;

/// Draw the authenticator screen
pub fn draw(frame: &mut Frame, area: Rect, app: &App, snapshot: &AuthSnapshot) {
    let theme = &app.theme;
    let layout = ScreenLayout::new(area);

    render_header(frame, layout.header, "Authenticator", theme);

    let signed_in = snapshot.is_authenticated();
    let column_height = 3 + if signed_in { 4 } else { 5 } + 1;
    let column = centered_rect_fixed(COLUMN_WIDTH, column_height, layout.content);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if signed_in { 4 } else { 0 }), // Banner
            Constraint::Length(3),                             // Trigger
            Constraint::Length(if signed_in { 0 } else { 5 }), // Options
            Constraint::Length(1),                             // Status
        ])
        .split(column);

    if signed_in {
        render_banner(frame, chunks[0], app);
    }

    render_trigger(frame, chunks[1], app, snapshot);

    if !signed_in {
        render_options(frame, chunks[2], app, snapshot);
    }

    if let Some(message) = &app.state.status_message {
        let status = Paragraph::new(message.as_str())
            .style(theme.warning())
            .alignment(Alignment::Center);
        frame.render_widget(status, chunks[3]);
    }

    let hints: &[(&str, &str)] = if signed_in {
        &[("Enter", "Sign out"), ("q", "Quit")]
    } else {
        &[
            ("Tab", "Move"),
            ("Enter", "Select"),
            ("c/b", "Watch/Touch ID"),
            ("q", "Quit"),
        ]
    };
    render_footer(frame, layout.footer, hints, theme);
}

fn render_banner(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let lines = vec![
        Line::from(Span::styled("\u{2714}", theme.success())),
        Line::from(Span::styled(
            "Signed in!",
            theme.success().add_modifier(Modifier::BOLD),
        )),
    ];

    let banner = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(banner, area);
}

fn render_trigger(frame: &mut Frame, area: Rect, app: &App, snapshot: &AuthSnapshot) {
    let theme = &app.theme;
    let focused = app.state.focus == Focus::Trigger;
    let enabled = snapshot.can_trigger();

    let label = if snapshot.is_authenticated() {
        "Sign Out"
    } else {
        "Authenticate"
    };

    let border_style = if focused && enabled {
        theme.border_focused()
    } else {
        theme.border()
    };

    let button = Paragraph::new(label)
        .style(theme.control(focused, enabled))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        );
    frame.render_widget(button, centered_rect_fixed(20, 3, area));
}

fn render_options(frame: &mut Frame, area: Rect, app: &App, snapshot: &AuthSnapshot) {
    let theme = &app.theme;
    let focus = app.state.focus;

    let heading = Line::from(Span::styled(
        "Authentication Options:",
        theme.text().add_modifier(Modifier::BOLD),
    ));

    let mut toggles = toggle::spans(
        "Apple Watch",
        snapshot.options.allow_companion_device,
        focus == Focus::CompanionDevice,
        theme,
    );
    toggles.push(Span::raw("    "));
    toggles.extend(toggle::spans(
        "Touch ID",
        snapshot.options.allow_biometric,
        focus == Focus::Biometric,
        theme,
    ));

    let content = Paragraph::new(vec![
        Line::from(""),
        heading,
        Line::from(""),
        Line::from(toggles),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(content, area);
}
