use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::InputState;
use crate::theme::ThemeColors;

/// Single-line search prompt drawn over the listing.
pub struct SearchPrompt<'a> {
    input: &'a InputState,
    theme: &'a ThemeColors,
}

impl<'a> SearchPrompt<'a> {
    pub fn new(input: &'a InputState, theme: &'a ThemeColors) -> Self {
        Self { input, theme }
    }

    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let w = width.min(area.width);
        let h = height.min(area.height);
        let x = area.x + area.width.saturating_sub(w) / 2;
        let y = area.y + area.height.saturating_sub(h) / 2;
        Rect::new(x, y, w, h)
    }

    /// Split the input around the cursor: text before, the cursor cell, text after.
    fn split_at_cursor(&self) -> (&'a str, &'a str, &'a str) {
        let text = self.input.input.as_str();
        let pos = self.input.cursor_position.min(text.len());
        match text[pos..].chars().next() {
            Some(c) => {
                let end = pos + c.len_utf8();
                (&text[..pos], &text[pos..end], &text[end..])
            }
            None => (text, " ", ""),
        }
    }
}

impl Widget for SearchPrompt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 4 || area.width < 20 {
            return;
        }

        let width = (area.width * 6 / 10).clamp(30, 60);
        let rect = Self::centered_rect(width, 4, area);
        Clear.render(rect, buf);

        let block = Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));
        let inner = block.inner(rect);
        block.render(rect, buf);

        let (before, cursor, after) = self.split_at_cursor();
        let input_style = Style::default().fg(self.theme.file_fg);
        let input_line = Line::from(vec![
            Span::styled(
                "🔍 ",
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(before, input_style),
            Span::styled(
                cursor,
                Style::default()
                    .bg(self.theme.selected_fg)
                    .fg(self.theme.dialog_bg),
            ),
            Span::styled(after, input_style),
        ]);
        buf.set_line(inner.x, inner.y, &input_line, inner.width);

        if inner.height > 1 {
            let hint = Line::from(Span::styled(
                "Enter: search │ Esc: cancel",
                Style::default().fg(self.theme.dim_fg),
            ));
            buf.set_line(inner.x, inner.y + 1, &hint, inner.width);
        }
    }
}
