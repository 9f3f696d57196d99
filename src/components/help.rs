use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::theme::ThemeColors;

struct KeyEntry {
    key: &'static str,
    description: &'static str,
}

struct KeyCategory {
    name: &'static str,
    entries: &'static [KeyEntry],
}

const MOVEMENT_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "j / ↓ / wheel",
        description: "Move down",
    },
    KeyEntry {
        key: "k / ↑ / wheel",
        description: "Move up",
    },
    KeyEntry {
        key: "PgDn / PgUp",
        description: "Move ten entries",
    },
    KeyEntry {
        key: "g / Home",
        description: "Jump to first entry",
    },
    KeyEntry {
        key: "G / End",
        description: "Jump to last entry",
    },
];

const DIRECTORY_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "Enter / l / →",
        description: "Open directory or file",
    },
    KeyEntry {
        key: "Backspace / h / ←",
        description: "Go to parent directory",
    },
    KeyEntry {
        key: "Esc",
        description: "Clear search, else go to parent",
    },
    KeyEntry {
        key: "~",
        description: "Go to home directory",
    },
    KeyEntry {
        key: "/",
        description: "Go to filesystem root",
    },
    KeyEntry {
        key: "r",
        description: "Reload directory",
    },
];

const VIEW_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: ".",
        description: "Toggle hidden files",
    },
    KeyEntry {
        key: "s",
        description: "Search current directory",
    },
    KeyEntry {
        key: "S",
        description: "Cycle sort (name → size → modified)",
    },
    KeyEntry {
        key: "J / K",
        description: "Scroll preview",
    },
];

const GENERAL_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "?",
        description: "Toggle this help overlay",
    },
    KeyEntry {
        key: "q / Ctrl+C",
        description: "Quit",
    },
];

const CATEGORIES: &[KeyCategory] = &[
    KeyCategory {
        name: "Movement",
        entries: MOVEMENT_KEYS,
    },
    KeyCategory {
        name: "Directories",
        entries: DIRECTORY_KEYS,
    },
    KeyCategory {
        name: "View",
        entries: VIEW_KEYS,
    },
    KeyCategory {
        name: "General",
        entries: GENERAL_KEYS,
    },
];

/// Help overlay widget listing every key binding.
pub struct HelpOverlay<'a> {
    theme: &'a ThemeColors,
    scroll_offset: usize,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a ThemeColors, scroll_offset: usize) -> Self {
        Self {
            theme,
            scroll_offset,
        }
    }

    fn build_content_lines(&self) -> Vec<Line<'static>> {
        let heading = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);
        let mut lines: Vec<Line<'static>> = vec![
            Line::from(Span::styled(" Key Bindings ", heading)),
            Line::from(""),
        ];

        for category in CATEGORIES {
            lines.push(Line::from(vec![
                Span::styled(format!("── {} ", category.name), heading),
                Span::styled("─".repeat(30), Style::default().fg(self.theme.dim_fg)),
            ]));

            for entry in category.entries {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<20}", entry.key),
                        Style::default()
                            .fg(self.theme.warning_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(entry.description, Style::default().fg(self.theme.file_fg)),
                ]));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(self.theme.dim_fg),
        )));
        lines
    }

    /// Number of content lines, for scroll bounds.
    pub fn total_lines() -> usize {
        // title + blank, then header + entries + blank per category, then footer
        3 + CATEGORIES
            .iter()
            .map(|category| category.entries.len() + 2)
            .sum::<usize>()
    }
}

impl Widget for HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = (area.width * 7 / 10).clamp(area.width.min(40), 72);
        let height = (area.height * 8 / 10).min(40);
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let overlay_area = Rect::new(x, y, width, height);

        Clear.render(overlay_area, buf);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused_fg))
            .style(Style::default().bg(self.theme.dialog_bg));
        let inner = block.inner(overlay_area);
        block.render(overlay_area, buf);

        let lines = self.build_content_lines();
        let visible_height = inner.height as usize;
        for (i, line) in lines
            .iter()
            .skip(self.scroll_offset)
            .take(visible_height)
            .enumerate()
        {
            buf.set_line(
                inner.x + 1,
                inner.y + i as u16,
                line,
                inner.width.saturating_sub(2),
            );
        }

        if lines.len() > visible_height && overlay_area.height > 0 {
            let total = lines.len();
            let indicator = Span::styled(
                format!(" {}/{} ", (self.scroll_offset + 1).min(total), total),
                Style::default().fg(self.theme.dim_fg),
            );
            let ind_x = overlay_area.x
                + overlay_area
                    .width
                    .saturating_sub(indicator.width() as u16 + 1);
            let ind_y = overlay_area.y + overlay_area.height - 1;
            buf.set_span(ind_x, ind_y, &indicator, indicator.width() as u16);
        }
    }
}
