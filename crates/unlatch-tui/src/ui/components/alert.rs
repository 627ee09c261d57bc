//! Modal alert for the active notice

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unlatch_core::Notice;

use crate::ui::{layout::centered_rect_fixed, Theme};

/// Render `notice` as a dismissible alert
pub fn render(frame: &mut Frame, area: Rect, notice: Notice, theme: &Theme) {
    let dialog_area = centered_rect_fixed(52, 9, area);

    frame.render_widget(Clear, dialog_area);

    let accent = match notice {
        Notice::Unavailable => theme.warning(),
        Notice::Failed | Notice::Errored => theme.danger(),
    };

    let block = Block::default()
        .title(format!(" {} ", notice.title()))
        .title_style(accent)
        .borders(Borders::ALL)
        .border_style(accent);

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(2),    // Message
            Constraint::Length(1), // Button
        ])
        .split(inner);

    let message = Paragraph::new(notice.description())
        .style(theme.text())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(message, chunks[0]);

    let button = Paragraph::new("[ OK ]")
        .style(theme.text_highlight())
        .alignment(Alignment::Center);
    frame.render_widget(button, chunks[1]);
}
