use std::collections::HashMap;
use std::path::PathBuf;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::format::format_size;
use crate::fs::listing::DirectoryEntry;
use crate::theme::ThemeColors;

/// One directory column: the parent pane or the current listing.
pub struct EntryListWidget<'a> {
    entries: &'a [&'a DirectoryEntry],
    selected: Option<usize>,
    scroll_offset: usize,
    theme: &'a ThemeColors,
    show_details: bool,
    child_counts: Option<&'a HashMap<PathBuf, usize>>,
    empty_message: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> EntryListWidget<'a> {
    pub fn new(entries: &'a [&'a DirectoryEntry], theme: &'a ThemeColors) -> Self {
        Self {
            entries,
            selected: None,
            scroll_offset: 0,
            theme,
            show_details: false,
            child_counts: None,
            empty_message: "(empty)",
            block: None,
        }
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn scroll_offset(mut self, scroll_offset: usize) -> Self {
        self.scroll_offset = scroll_offset;
        self
    }

    /// Right-align item counts for directories and sizes for files.
    pub fn show_details(mut self, show_details: bool) -> Self {
        self.show_details = show_details;
        self
    }

    /// Item counts shown next to directory rows.
    pub fn child_counts(mut self, counts: &'a HashMap<PathBuf, usize>) -> Self {
        self.child_counts = Some(counts);
        self
    }

    pub fn empty_message(mut self, message: &'a str) -> Self {
        self.empty_message = message;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn icon(entry: &DirectoryEntry) -> &'static str {
        if entry.is_symlink {
            "🔗"
        } else if entry.is_dir {
            "📁"
        } else {
            "📄"
        }
    }

    fn details(&self, entry: &DirectoryEntry) -> Option<String> {
        if !entry.is_dir {
            return Some(format_size(entry.size));
        }
        match self.child_counts?.get(&entry.path)? {
            1 => Some("1 item".to_string()),
            n => Some(format!("{n} items")),
        }
    }

    fn entry_style(&self, entry: &DirectoryEntry, is_selected: bool) -> Style {
        if is_selected {
            return Style::default()
                .bg(self.theme.selected_bg)
                .fg(self.theme.selected_fg)
                .add_modifier(Modifier::BOLD);
        }
        if entry.is_hidden() {
            Style::default().fg(self.theme.hidden_fg)
        } else if entry.is_symlink {
            Style::default().fg(self.theme.symlink_fg)
        } else if entry.is_dir {
            Style::default()
                .fg(self.theme.dir_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.file_fg)
        }
    }
}

impl Widget for EntryListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.entries.is_empty() {
            let line = Line::from(Span::styled(
                self.empty_message,
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::ITALIC),
            ));
            buf.set_line(inner.x + 1, inner.y, &line, inner.width.saturating_sub(1));
            return;
        }

        let rows = self
            .entries
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(inner.height as usize);

        for (row, (idx, entry)) in rows.enumerate() {
            let y = inner.y + row as u16;
            let is_selected = self.selected == Some(idx);
            let style = self.entry_style(entry, is_selected);
            if is_selected {
                buf.set_style(Rect::new(inner.x, y, inner.width, 1), style);
            }

            let name = Line::from(Span::styled(
                format!(" {} {}", Self::icon(entry), entry.name),
                style,
            ));
            let name_width = name.width() as u16;
            buf.set_line(inner.x, y, &name, inner.width);

            if !self.show_details {
                continue;
            }
            let Some(details) = self.details(entry) else {
                continue;
            };
            let details = Span::styled(format!("{details} "), style);
            let details_width = details.width() as u16;
            // Only when there is a gap between the name and the details.
            if name_width + details_width < inner.width {
                let x = inner.x + inner.width - details_width;
                buf.set_span(x, y, &details, details_width);
            }
        }
    }
}
