//! Platform authentication prompt
//!
//! Stands in for the system sheet that asks for a fingerprint or a tap on
//! the companion device.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unlatch_core::{PolicyKind, PromptRequest};

use crate::ui::{layout::centered_rect_fixed, Theme};

const PROMPT_WIDTH: u16 = 56;

/// Render a prompt waiting for the user's answer
pub fn render(frame: &mut Frame, area: Rect, prompt: &PromptRequest, theme: &Theme) {
    let dialog_area = centered_rect_fixed(PROMPT_WIDTH, 11, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(format!(" {} ", prompt.policy))
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Glyph
            Constraint::Length(1), // Instruction
            Constraint::Min(2),    // Reason
            Constraint::Length(1), // Help
        ])
        .split(inner);

    let glyph = Paragraph::new(glyph(prompt.policy))
        .style(theme.text_highlight())
        .alignment(Alignment::Center);
    frame.render_widget(glyph, chunks[0]);

    let instruction = Paragraph::new(instruction(prompt.policy))
        .style(theme.text_secondary())
        .alignment(Alignment::Center);
    frame.render_widget(instruction, chunks[1]);

    let reason = Paragraph::new(prompt.request.reason.as_str())
        .style(theme.text())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(reason, chunks[2]);

    let help = format!(
        "[Enter] Match  [n] No match  [e] Error  [Esc] {}",
        prompt.request.cancel_label
    );
    let help = Paragraph::new(help)
        .style(theme.text_muted())
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

/// Render the placeholder shown before the platform raises its prompt
pub fn render_waiting(frame: &mut Frame, area: Rect, policy: PolicyKind, theme: &Theme) {
    let dialog_area = centered_rect_fixed(PROMPT_WIDTH, 3, area);
    frame.render_widget(Clear, dialog_area);

    let waiting = Paragraph::new(format!("Waiting for {}...", policy))
        .style(theme.info())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border()),
        );
    frame.render_widget(waiting, dialog_area);
}

fn glyph(policy: PolicyKind) -> &'static str {
    match policy {
        PolicyKind::BiometricsOrCompanionDevice => "\u{25CE}  \u{231A}",
        PolicyKind::BiometricsOnly => "\u{25CE}",
        PolicyKind::CompanionDeviceOnly => "\u{231A}",
    }
}

fn instruction(policy: PolicyKind) -> &'static str {
    match policy {
        PolicyKind::BiometricsOrCompanionDevice => {
            "Touch the sensor or double-click your watch"
        }
        PolicyKind::BiometricsOnly => "Touch the sensor",
        PolicyKind::CompanionDeviceOnly => "Double-click the side button on your watch",
    }
}
