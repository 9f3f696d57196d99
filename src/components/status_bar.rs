use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " s:search  .:hidden  S:sort  ?:help  q:quit ";

/// Bottom bar: a transient message, the active search, or listing info.
pub struct StatusBarWidget<'a> {
    theme: &'a ThemeColors,
    position: String,
    sort_label: &'a str,
    show_hidden: bool,
    status_message: Option<(&'a str, bool)>,
    search: Option<(&'a str, usize)>,
}

impl<'a> StatusBarWidget<'a> {
    /// `selected` is zero-based; `total` is the number of visible entries.
    pub fn new(theme: &'a ThemeColors, selected: usize, total: usize, sort_label: &'a str) -> Self {
        let position = if total == 0 {
            "0/0".to_string()
        } else {
            format!("{}/{}", selected + 1, total)
        };
        Self {
            theme,
            position,
            sort_label,
            show_hidden: false,
            status_message: None,
            search: None,
        }
    }

    pub fn show_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some((msg, is_error));
        self
    }

    pub fn search(mut self, query: &'a str, matches: usize) -> Self {
        self.search = Some((query, matches));
        self
    }

    fn info_spans(&self) -> Vec<Span<'a>> {
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.position),
                Style::default()
                    .fg(self.theme.info_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("│ Sort: {} ", self.sort_label),
                Style::default().fg(self.theme.status_fg),
            ),
        ];
        if self.show_hidden {
            spans.push(Span::styled(
                "│ Hidden ",
                Style::default().fg(self.theme.warning_fg),
            ));
        }
        spans
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        if let Some((msg, is_error)) = self.status_message {
            let style = if is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_bg)
            } else {
                Style::default()
                    .bg(self.theme.status_bg)
                    .fg(self.theme.success_fg)
            };
            buf.set_style(area, style);
            let line = Line::from(Span::styled(format!(" {msg}"), style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        buf.set_style(area, Style::default().bg(self.theme.status_bg));

        if let Some((query, matches)) = self.search {
            let line = Line::from(vec![
                Span::styled(
                    format!(" 🔍 Filter: {query} "),
                    Style::default()
                        .fg(self.theme.accent_fg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("│ {matches} matches │ Esc: clear"),
                    Style::default().fg(self.theme.status_fg),
                ),
            ]);
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let info = Line::from(self.info_spans());
        let hints = Span::styled(
            KEY_HINTS,
            Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::DIM),
        );
        let info_width = info.width() as u16;
        buf.set_line(area.x, area.y, &info, area.width);

        let hints_width = hints.width() as u16;
        if info_width + hints_width <= area.width {
            let x = area.x + area.width - hints_width;
            buf.set_span(x, area.y, &hints, hints_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;
    use ratatui::style::Color;

    fn render(widget: StatusBarWidget, width: u16) -> Buffer {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buf
    }

    fn content(buf: &Buffer) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn normal_bar_shows_position_sort_and_hints() {
        let tc = theme::dark_theme();
        let buf = render(StatusBarWidget::new(&tc, 2, 12, "Name"), 100);
        let text = content(&buf);
        assert!(text.contains("3/12"));
        assert!(text.contains("Sort: Name"));
        assert!(text.contains("?:help"));
        assert!(!text.contains("Hidden"));
    }

    #[test]
    fn empty_listing_position() {
        let tc = theme::dark_theme();
        let buf = render(StatusBarWidget::new(&tc, 0, 0, "Size").show_hidden(true), 100);
        let text = content(&buf);
        assert!(text.contains("0/0"));
        assert!(text.contains("Hidden"));
    }

    #[test]
    fn hints_dropped_when_narrow() {
        let tc = theme::dark_theme();
        let buf = render(StatusBarWidget::new(&tc, 0, 5, "Name"), 30);
        assert!(!content(&buf).contains("q:quit"));
    }

    #[test]
    fn status_message_success() {
        let tc = theme::dark_theme();
        let buf = render(
            StatusBarWidget::new(&tc, 0, 1, "Name").status_message("Reloaded", false),
            80,
        );
        assert!(content(&buf).contains("Reloaded"));
        assert_eq!(buf.cell((1, 0)).unwrap().fg, Color::Rgb(166, 227, 161));
    }

    #[test]
    fn status_message_error_fills_row() {
        let tc = theme::dark_theme();
        let buf = render(
            StatusBarWidget::new(&tc, 0, 1, "Name").status_message("No matches found", true),
            80,
        );
        assert!(content(&buf).contains("No matches found"));
        assert_eq!(buf.cell((79, 0)).unwrap().bg, Color::Rgb(243, 139, 168));
    }

    #[test]
    fn message_takes_priority_over_search() {
        let tc = theme::dark_theme();
        let buf = render(
            StatusBarWidget::new(&tc, 0, 1, "Name")
                .search("rs", 4)
                .status_message("Found 4 matches", false),
            80,
        );
        let text = content(&buf);
        assert!(text.contains("Found 4 matches"));
        assert!(!text.contains("Filter"));
    }

    #[test]
    fn search_summary() {
        let tc = theme::dark_theme();
        let buf = render(StatusBarWidget::new(&tc, 0, 4, "Name").search("rs", 4), 80);
        let text = content(&buf);
        assert!(text.contains("Filter: rs"));
        assert!(text.contains("4 matches"));
    }

    #[test]
    fn zero_area_does_not_panic() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new(&tc, 0, 0, "Name").render(area, &mut buf);
    }
}
