//! Checkbox-style toggle

use ratatui::prelude::*;

use crate::ui::Theme;

/// Spans for one labelled toggle, e.g. `[x] Touch ID`
pub fn spans(label: &'static str, on: bool, focused: bool, theme: &Theme) -> Vec<Span<'static>> {
    let mark = if on { "[x]" } else { "[ ]" };
    let mark_style = if on { theme.success() } else { theme.text_muted() };

    vec![
        Span::styled(mark, mark_style),
        Span::raw(" "),
        Span::styled(label, theme.control(focused, true)),
    ]
}
