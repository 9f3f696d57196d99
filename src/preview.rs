use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

use crate::config::DEFAULT_SYNTAX_THEME;
use crate::format::{format_modified, format_permissions, format_size};
use crate::fs::listing::{self, DirectoryEntry};
use crate::theme::ThemeColors;

/// Bytes scanned for NUL when deciding whether a file is binary.
const BINARY_SCAN_BYTES: usize = 8192;

/// Extensions treated as binary without looking at the content.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "pdf", "zip", "tar", "gz", "bz2", "xz",
    "7z", "rar", "so", "dylib", "dll", "exe", "bin", "img", "iso", "o", "a", "class", "jar",
];

/// Cached preview for the entry at `path`.
#[derive(Debug, Default)]
pub struct PreviewState {
    pub path: Option<PathBuf>,
    pub lines: Vec<Line<'static>>,
    pub scroll_offset: usize,
}

impl PreviewState {
    pub fn clear(&mut self) {
        self.path = None;
        self.lines.clear();
        self.scroll_offset = 0;
    }

    pub fn scroll_down(&mut self, amount: usize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + amount).min(max);
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }
}

/// Syntax highlighting resources, loaded once per session.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Self {
        let themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .get(theme_name)
            .or_else(|| themes.themes.get(DEFAULT_SYNTAX_THEME))
            .cloned()
            .unwrap_or_default();
        Self {
            syntaxes: SyntaxSet::load_defaults_nonewlines(),
            theme,
        }
    }

    /// Highlight `text` using the syntax implied by `path` or its first line.
    fn highlight(&self, path: &Path, text: &str) -> Vec<Line<'static>> {
        let first_line = text.lines().next().unwrap_or("");
        let syntax = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.syntaxes.find_syntax_by_extension(ext))
            .or_else(|| self.syntaxes.find_syntax_by_first_line(first_line))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        text.lines()
            .map(|raw| {
                let line = raw.replace('\t', "    ");
                match highlighter.highlight_line(&line, &self.syntaxes) {
                    Ok(ranges) => Line::from(
                        ranges
                            .into_iter()
                            .map(|(style, piece)| {
                                let fg = style.foreground;
                                Span::styled(
                                    piece.to_string(),
                                    Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
                                )
                            })
                            .collect::<Vec<_>>(),
                    ),
                    Err(_) => Line::from(line),
                }
            })
            .collect()
    }
}

/// Build the preview pane content for `entry`.
///
/// Never fails: read errors become a line in the pane.
pub fn build_preview(
    entry: &DirectoryEntry,
    max_bytes: usize,
    highlighter: &Highlighter,
    theme: &ThemeColors,
) -> Vec<Line<'static>> {
    let label = Style::default().fg(theme.dim_fg);
    let value = Style::default().fg(theme.file_fg);
    let field = |name: &str, text: String| {
        Line::from(vec![
            Span::styled(format!("{name:<12}"), label),
            Span::styled(text, value),
        ])
    };

    let mut lines = Vec::new();
    if entry.is_dir {
        lines.push(Line::from(Span::styled(
            "📁 Directory",
            Style::default()
                .fg(theme.dir_fg)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(field("Name:", entry.name.clone()));
        lines.push(field("Path:", entry.path.display().to_string()));
        lines.push(field(
            "Items:",
            listing::count_children(&entry.path).to_string(),
        ));
        lines.push(field("Modified:", format_modified(entry.modified)));
        lines.push(field(
            "Mode:",
            format_permissions(entry.permissions, true),
        ));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Enter to open",
            Style::default().fg(theme.warning_fg),
        )));
        return lines;
    }

    lines.push(Line::from(Span::styled(
        "📄 File",
        Style::default()
            .fg(theme.info_fg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(field("Name:", entry.name.clone()));
    lines.push(field("Size:", format_size(entry.size)));
    lines.push(field("Modified:", format_modified(entry.modified)));
    lines.push(field(
        "Mode:",
        format_permissions(entry.permissions, false),
    ));
    lines.push(field("Path:", entry.path.display().to_string()));
    if let Ok(target) = std::fs::read_link(&entry.path) {
        lines.push(field("Target:", target.display().to_string()));
    }
    lines.push(Line::from(""));

    let dim = Style::default().fg(theme.dim_fg);
    match read_head(&entry.path, max_bytes.max(BINARY_SCAN_BYTES) + 1) {
        Err(e) => lines.push(Line::from(Span::styled(
            format!("Error reading file: {e}"),
            Style::default().fg(theme.error_fg),
        ))),
        Ok(bytes) if is_binary(&entry.path, &bytes) => {
            lines.push(Line::from(Span::styled("(Binary file - no preview)", dim)));
        }
        Ok(bytes) if bytes.is_empty() => {
            lines.push(Line::from(Span::styled("(empty file)", dim)));
        }
        Ok(bytes) => {
            lines.push(Line::from(Span::styled(
                "━━━ Preview ━━━",
                Style::default().fg(theme.accent_fg),
            )));
            let shown = &bytes[..bytes.len().min(max_bytes)];
            let text = decode_prefix(shown);
            lines.extend(highlighter.highlight(&entry.path, &text));
            if bytes.len() > max_bytes {
                lines.push(Line::from(Span::styled("... (truncated)", dim)));
            }
        }
    }
    lines
}

/// Read at most `limit` bytes from the start of `path`.
fn read_head(path: &Path, limit: usize) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(limit.min(64 * 1024));
    File::open(path)?
        .take(limit as u64)
        .read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Known binary extension, or a NUL byte near the start.
fn is_binary(path: &Path, head: &[u8]) -> bool {
    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| BINARY_EXTENSIONS.iter().any(|b| b.eq_ignore_ascii_case(ext)));
    by_extension || head[..head.len().min(BINARY_SCAN_BYTES)].contains(&0)
}

/// Decode a byte prefix, dropping a multi-byte character cut at the end.
fn decode_prefix(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(e) if e.error_len().is_none() => String::from_utf8_lossy(&bytes[..e.valid_up_to()]),
        Err(_) => String::from_utf8_lossy(bytes),
    }
}
