use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::AppConfig;
use crate::error::{NavigationError, OpenError, Result};
use crate::format::display_path;
use crate::fs::listing;
use crate::fs::navigation::{Activation, NavigationState};
use crate::preview::{self, Highlighter, PreviewState};
use crate::theme::{self, ThemeColors};

/// Rows moved by PageUp / PageDown.
pub const PAGE_STEP: isize = 10;

/// Seconds a status message stays on screen.
const STATUS_TTL_SECS: u64 = 3;

/// Application mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    /// Typing a search query.
    Search,
    Help,
}

/// Text being typed into the search prompt. The cursor is a byte offset.
#[derive(Debug, Default)]
pub struct InputState {
    pub input: String,
    pub cursor_position: usize,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub created: Instant,
}

/// Presentation state wrapped around the navigation model.
pub struct App {
    pub nav: NavigationState,
    pub mode: AppMode,
    pub search_input: InputState,
    pub help_scroll: usize,
    pub status_message: Option<StatusMessage>,
    pub preview: PreviewState,
    pub preview_enabled: bool,
    pub preview_max_bytes: usize,
    /// First visible row of the current listing.
    pub list_scroll: usize,
    /// Item counts of directory rows already drawn, for `counts_dir`.
    pub child_counts: HashMap<PathBuf, usize>,
    counts_dir: PathBuf,
    /// File waiting to be handed to the external opener.
    pub pending_open: Option<PathBuf>,
    pub should_quit: bool,
    pub theme: ThemeColors,
    pub highlighter: Highlighter,
    pub home: Option<PathBuf>,
}

impl App {
    pub fn new(nav: NavigationState, config: &AppConfig) -> Self {
        Self {
            nav,
            mode: AppMode::Normal,
            search_input: InputState::default(),
            help_scroll: 0,
            status_message: None,
            preview: PreviewState::default(),
            preview_enabled: config.preview_enabled(),
            preview_max_bytes: config.preview_max_bytes(),
            list_scroll: 0,
            child_counts: HashMap::new(),
            counts_dir: PathBuf::new(),
            pending_open: None,
            should_quit: false,
            theme: theme::resolve_theme(&config.theme),
            highlighter: Highlighter::new(config.syntax_theme_name()),
            home: dirs::home_dir(),
        }
    }

    /// Open at the configured start directory, else home, else the root.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let start = config.start_path().unwrap_or_else(listing::home_dir);
        let open = |path: &std::path::Path| {
            NavigationState::with_options(path, config.show_hidden(), config.sort_key())
        };

        let nav = match open(start.as_path()) {
            Ok(nav) => nav,
            Err(e) => {
                tracing::warn!(start = %start.display(), error = %e, "falling back to root");
                open(listing::filesystem_root().as_path())?
            }
        };
        tracing::info!(
            path = %nav.current_path().display(),
            entries = nav.entries().len(),
            parent_entries = nav.parent_entries().len(),
            "browser opened"
        );
        Ok(Self::new(nav, config))
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ── Status line ─────────────────────────────────────────────────────────

    pub fn set_status_message(&mut self, text: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            is_error: false,
            created: Instant::now(),
        });
    }

    pub fn set_error_message(&mut self, text: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            is_error: true,
            created: Instant::now(),
        });
    }

    /// Drop the status message once it has been shown long enough.
    pub fn clear_expired_status(&mut self) {
        if let Some(msg) = &self.status_message {
            if msg.created.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
            }
        }
    }

    fn report(&mut self, result: std::result::Result<(), NavigationError>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "navigation failed");
            self.set_error_message(format!("✗ Error: {e}"));
        }
    }

    // ── Navigation ──────────────────────────────────────────────────────────

    pub fn move_selection(&mut self, delta: isize) {
        self.nav.move_selection(delta);
    }

    pub fn jump_to_top(&mut self) {
        self.nav.jump_to_top();
    }

    pub fn jump_to_bottom(&mut self) {
        self.nav.jump_to_bottom();
    }

    /// Enter the selected directory or queue the selected file for opening.
    pub fn enter_selected(&mut self) {
        match self.nav.enter_selected() {
            Ok(Activation::OpenFile(path)) => self.pending_open = Some(path),
            Ok(Activation::Entered | Activation::Nothing) => {}
            Err(e) => self.report(Err(e)),
        }
    }

    pub fn go_to_parent(&mut self) {
        let result = self.nav.go_to_parent();
        self.report(result);
    }

    pub fn go_home(&mut self) {
        let result = self.nav.enter(listing::home_dir());
        self.report(result);
    }

    pub fn go_root(&mut self) {
        let result = self.nav.enter(listing::filesystem_root());
        self.report(result);
    }

    pub fn reload(&mut self) {
        self.preview.clear();
        self.child_counts.clear();
        match self.nav.reload() {
            Ok(()) => self.set_status_message("Reloaded"),
            Err(e) => self.report(Err(e)),
        }
    }

    pub fn toggle_hidden(&mut self) {
        self.nav.toggle_hidden();
        let state = if self.nav.show_hidden() { "ON" } else { "OFF" };
        self.set_status_message(format!("Hidden files {state}"));
    }

    pub fn cycle_sort(&mut self) {
        self.nav.cycle_sort();
        self.set_status_message(format!("Sort: {}", self.nav.sort_key().label()));
    }

    /// Esc in normal mode: drop the filter if one is active, else go up.
    pub fn escape(&mut self) {
        if self.nav.search_query().is_some() {
            self.nav.clear_search();
        } else {
            self.go_to_parent();
        }
    }

    // ── Search prompt ───────────────────────────────────────────────────────

    /// Open the search prompt, pre-filled with the active query.
    pub fn start_search(&mut self) {
        let input = self.nav.search_query().unwrap_or_default().to_string();
        self.search_input = InputState {
            cursor_position: input.len(),
            input,
        };
        self.mode = AppMode::Search;
    }

    pub fn cancel_search(&mut self) {
        self.mode = AppMode::Normal;
        self.search_input = InputState::default();
    }

    /// Apply the typed query and report how many entries matched.
    pub fn submit_search(&mut self) {
        let query = std::mem::take(&mut self.search_input).input;
        self.mode = AppMode::Normal;
        self.nav.apply_search(&query);

        if self.nav.search_query().is_none() {
            self.status_message = None;
            return;
        }
        match self.nav.visible_entries().len() {
            0 => self.set_error_message("No matches found"),
            n => self.set_status_message(format!("Found {n} matches")),
        }
    }

    /// Insert a character at the cursor.
    pub fn search_input_char(&mut self, c: char) {
        self.search_input
            .input
            .insert(self.search_input.cursor_position, c);
        self.search_input.cursor_position += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace).
    pub fn search_delete_char(&mut self) {
        let pos = self.search_input.cursor_position;
        if let Some(prev) = self.search_input.input[..pos].chars().next_back() {
            self.search_input.cursor_position -= prev.len_utf8();
            self.search_input
                .input
                .remove(self.search_input.cursor_position);
        }
    }

    pub fn search_cursor_left(&mut self) {
        let pos = self.search_input.cursor_position;
        if let Some(prev) = self.search_input.input[..pos].chars().next_back() {
            self.search_input.cursor_position -= prev.len_utf8();
        }
    }

    pub fn search_cursor_right(&mut self) {
        let pos = self.search_input.cursor_position;
        if let Some(next) = self.search_input.input[pos..].chars().next() {
            self.search_input.cursor_position += next.len_utf8();
        }
    }

    pub fn search_cursor_home(&mut self) {
        self.search_input.cursor_position = 0;
    }

    pub fn search_cursor_end(&mut self) {
        self.search_input.cursor_position = self.search_input.input.len();
    }

    // ── Help overlay ────────────────────────────────────────────────────────

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            AppMode::Help => AppMode::Normal,
            _ => {
                self.help_scroll = 0;
                AppMode::Help
            }
        };
    }

    pub fn help_scroll_down(&mut self, total_lines: usize) {
        if self.help_scroll + 1 < total_lines {
            self.help_scroll += 1;
        }
    }

    pub fn help_scroll_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    // ── External open ───────────────────────────────────────────────────────

    pub fn take_pending_open(&mut self) -> Option<PathBuf> {
        self.pending_open.take()
    }

    /// Record the outcome of an external open. The listing is refreshed
    /// since the program may have changed the file.
    pub fn finish_open(&mut self, outcome: std::result::Result<(), OpenError>) {
        self.preview.clear();
        self.child_counts.clear();
        if let Err(e) = outcome {
            self.set_error_message(format!("✗ {e}"));
            return;
        }
        if let Err(e) = self.nav.reload() {
            self.report(Err(e));
        }
    }

    // ── Render helpers ──────────────────────────────────────────────────────

    /// Rebuild the preview when the selection moved to another entry.
    pub fn sync_preview(&mut self) {
        if !self.preview_enabled {
            return;
        }
        let Some(entry) = self.nav.selected_entry() else {
            self.preview.clear();
            return;
        };
        if self.preview.path.as_deref() == Some(entry.path.as_path()) {
            return;
        }
        let lines = preview::build_preview(
            entry,
            self.preview_max_bytes,
            &self.highlighter,
            &self.theme,
        );
        self.preview.path = Some(entry.path.clone());
        self.preview.lines = lines;
        self.preview.scroll_offset = 0;
    }

    /// Keep the selected row inside a window of `visible_height` rows.
    pub fn update_list_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        let selected = self.nav.selected_index();
        if selected < self.list_scroll {
            self.list_scroll = selected;
        } else if selected >= self.list_scroll + visible_height {
            self.list_scroll = selected + 1 - visible_height;
        }
    }

    /// Count the children of directory rows in view. Each directory is
    /// read once per listing; `reload` starts over.
    pub fn update_child_counts(&mut self, visible_height: usize) {
        if self.counts_dir != self.nav.current_path() {
            self.child_counts.clear();
            self.counts_dir = self.nav.current_path().to_path_buf();
        }
        let rows = self.nav.visible_entries();
        for entry in rows.iter().skip(self.list_scroll).take(visible_height) {
            if entry.is_dir && !self.child_counts.contains_key(&entry.path) {
                let count = listing::count_children(&entry.path);
                self.child_counts.insert(entry.path.clone(), count);
            }
        }
    }

    /// Current path with the home prefix shown as `~`.
    pub fn display_path(&self) -> String {
        display_path(self.nav.current_path(), self.home.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::path::Path;
    use tempfile::TempDir;

    fn setup_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::create_dir(dir.path().join("beta")).unwrap();
        File::create(dir.path().join("file_a.txt")).unwrap();
        File::create(dir.path().join("file_b.rs")).unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        let nav = NavigationState::open(dir.path()).unwrap();
        let app = App::new(nav, &AppConfig::default());
        (dir, app)
    }

    #[test]
    fn from_config_uses_start_path() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            general: crate::config::GeneralConfig {
                start_path: Some(dir.path().to_string_lossy().into_owned()),
                show_hidden: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        let app = App::from_config(&config).unwrap();
        assert_eq!(app.nav.current_path(), dir.path());
        assert!(app.nav.show_hidden());
    }

    #[test]
    fn from_config_falls_back_to_root() {
        let config = AppConfig {
            general: crate::config::GeneralConfig {
                start_path: Some("/definitely/not/here".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let app = App::from_config(&config).unwrap();
        assert_eq!(app.nav.current_path(), listing::filesystem_root());
    }

    #[test]
    fn quit_sets_flag() {
        let (_dir, mut app) = setup_app();
        assert!(!app.should_quit);
        app.quit();
        assert!(app.should_quit);
    }

    #[test]
    fn enter_selected_file_queues_open() {
        let (dir, mut app) = setup_app();
        app.jump_to_bottom();
        app.enter_selected();
        assert_eq!(app.take_pending_open(), Some(dir.path().join("file_b.rs")));
        assert!(app.take_pending_open().is_none());
    }

    #[test]
    fn enter_selected_directory_navigates() {
        let (dir, mut app) = setup_app();
        app.move_selection(1);
        app.enter_selected();
        assert_eq!(app.nav.current_path(), dir.path().join("beta"));
        assert!(app.pending_open.is_none());
    }

    #[test]
    fn failed_navigation_sets_error_status() {
        let (dir, mut app) = setup_app();
        fs::remove_dir(dir.path().join("alpha")).unwrap();
        app.enter_selected();
        assert_eq!(app.nav.current_path(), dir.path());
        let msg = app.status_message.as_ref().unwrap();
        assert!(msg.is_error);
        assert!(msg.text.contains("does not exist"));
    }

    #[test]
    fn escape_clears_search_before_going_up() {
        let (dir, mut app) = setup_app();
        app.nav.enter(dir.path().join("alpha")).unwrap();
        app.nav.apply_search("x");
        app.escape();
        assert!(app.nav.search_query().is_none());
        assert_eq!(app.nav.current_path(), dir.path().join("alpha"));
        app.escape();
        assert_eq!(app.nav.current_path(), dir.path());
    }

    #[test]
    fn toggle_hidden_reports_state() {
        let (_dir, mut app) = setup_app();
        app.toggle_hidden();
        assert_eq!(app.status_message.as_ref().unwrap().text, "Hidden files ON");
        assert_eq!(app.nav.visible_entries().len(), 5);
    }

    #[test]
    fn cycle_sort_reports_label() {
        let (_dir, mut app) = setup_app();
        app.cycle_sort();
        assert_eq!(app.status_message.as_ref().unwrap().text, "Sort: Size");
    }

    #[test]
    fn search_prompt_round_trip() {
        let (_dir, mut app) = setup_app();
        app.start_search();
        assert_eq!(app.mode, AppMode::Search);
        for c in "FILE".chars() {
            app.search_input_char(c);
        }
        app.submit_search();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.nav.search_query(), Some("FILE"));
        assert_eq!(app.nav.visible_entries().len(), 2);
        assert_eq!(app.status_message.as_ref().unwrap().text, "Found 2 matches");
    }

    #[test]
    fn search_without_matches_reports_error() {
        let (_dir, mut app) = setup_app();
        app.start_search();
        app.search_input_char('z');
        app.submit_search();
        let msg = app.status_message.as_ref().unwrap();
        assert!(msg.is_error);
        assert_eq!(msg.text, "No matches found");
    }

    #[test]
    fn empty_search_submission_clears_filter() {
        let (_dir, mut app) = setup_app();
        app.nav.apply_search("alpha");
        app.start_search();
        assert_eq!(app.search_input.input, "alpha");
        app.search_cursor_home();
        app.search_cursor_end();
        for _ in 0..5 {
            app.search_delete_char();
        }
        app.submit_search();
        assert!(app.nav.search_query().is_none());
        assert_eq!(app.nav.visible_entries().len(), 4);
    }

    #[test]
    fn cancel_search_keeps_previous_filter() {
        let (_dir, mut app) = setup_app();
        app.nav.apply_search("beta");
        app.start_search();
        app.search_input_char('!');
        app.cancel_search();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.nav.search_query(), Some("beta"));
    }

    #[test]
    fn search_input_cursor_editing() {
        let (_dir, mut app) = setup_app();
        app.start_search();
        app.search_input_char('a');
        app.search_input_char('c');
        app.search_cursor_left();
        app.search_input_char('b');
        assert_eq!(app.search_input.input, "abc");
        assert_eq!(app.search_input.cursor_position, 2);
        app.search_cursor_right();
        app.search_cursor_right();
        assert_eq!(app.search_input.cursor_position, 3);
        app.search_cursor_home();
        app.search_delete_char();
        assert_eq!(app.search_input.input, "abc");
    }

    #[test]
    fn search_input_handles_multibyte() {
        let (_dir, mut app) = setup_app();
        app.start_search();
        app.search_input_char('é');
        app.search_input_char('x');
        app.search_cursor_left();
        app.search_cursor_left();
        assert_eq!(app.search_input.cursor_position, 0);
        app.search_cursor_end();
        app.search_delete_char();
        app.search_delete_char();
        assert!(app.search_input.input.is_empty());
    }

    #[test]
    fn help_toggle_and_scroll() {
        let (_dir, mut app) = setup_app();
        app.toggle_help();
        assert_eq!(app.mode, AppMode::Help);
        app.help_scroll_down(3);
        app.help_scroll_down(3);
        app.help_scroll_down(3);
        assert_eq!(app.help_scroll, 2);
        app.help_scroll_up();
        assert_eq!(app.help_scroll, 1);
        app.toggle_help();
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn clear_expired_status_keeps_recent() {
        let (_dir, mut app) = setup_app();
        app.set_status_message("fresh");
        app.clear_expired_status();
        assert!(app.status_message.is_some());
    }

    #[test]
    fn clear_expired_status_removes_old() {
        let (_dir, mut app) = setup_app();
        app.status_message = Some(StatusMessage {
            text: "old".into(),
            is_error: false,
            created: Instant::now() - std::time::Duration::from_secs(5),
        });
        app.clear_expired_status();
        assert!(app.status_message.is_none());
    }

    #[test]
    fn finish_open_failure_is_reported() {
        let (_dir, mut app) = setup_app();
        app.finish_open(Err(OpenError::NoProgram {
            path: PathBuf::from("/tmp/x"),
        }));
        let msg = app.status_message.as_ref().unwrap();
        assert!(msg.is_error);
        assert!(msg.text.contains("no program could open"));
    }

    #[test]
    fn finish_open_success_reloads_listing() {
        let (dir, mut app) = setup_app();
        File::create(dir.path().join("new.txt")).unwrap();
        app.finish_open(Ok(()));
        assert!(app.nav.entries().iter().any(|e| e.name == "new.txt"));
        assert!(app.status_message.is_none());
    }

    #[test]
    fn sync_preview_follows_selection() {
        let (dir, mut app) = setup_app();
        app.sync_preview();
        assert_eq!(app.preview.path.as_deref(), Some(dir.path().join("alpha").as_path()));
        app.move_selection(2);
        app.sync_preview();
        assert_eq!(
            app.preview.path.as_deref(),
            Some(dir.path().join("file_a.txt").as_path())
        );
        assert!(!app.preview.lines.is_empty());
    }

    #[test]
    fn sync_preview_clears_on_empty_listing() {
        let (dir, mut app) = setup_app();
        app.sync_preview();
        app.nav.enter(dir.path().join("beta")).unwrap();
        app.sync_preview();
        assert!(app.preview.path.is_none());
        assert!(app.preview.lines.is_empty());
    }

    #[test]
    fn list_scroll_keeps_selection_visible() {
        let (_dir, mut app) = setup_app();
        app.jump_to_bottom();
        app.update_list_scroll(2);
        assert_eq!(app.list_scroll, 2);
        app.jump_to_top();
        app.update_list_scroll(2);
        assert_eq!(app.list_scroll, 0);
    }

    #[test]
    fn child_counts_are_read_once_per_listing() {
        let (dir, mut app) = setup_app();
        File::create(dir.path().join("alpha").join("one")).unwrap();
        app.update_child_counts(10);
        assert_eq!(app.child_counts.get(&dir.path().join("alpha")), Some(&1));
        assert_eq!(app.child_counts.get(&dir.path().join("beta")), Some(&0));
        assert_eq!(app.child_counts.len(), 2);

        // Cached: a new child is not seen until the listing is reloaded.
        File::create(dir.path().join("alpha").join("two")).unwrap();
        app.update_child_counts(10);
        assert_eq!(app.child_counts.get(&dir.path().join("alpha")), Some(&1));

        app.reload();
        app.update_child_counts(10);
        assert_eq!(app.child_counts.get(&dir.path().join("alpha")), Some(&2));
    }

    #[test]
    fn child_counts_cover_only_rows_in_view() {
        let (dir, mut app) = setup_app();
        app.update_child_counts(1);
        assert!(app.child_counts.contains_key(&dir.path().join("alpha")));
        assert!(!app.child_counts.contains_key(&dir.path().join("beta")));
    }

    #[test]
    fn child_counts_reset_on_directory_change() {
        let (dir, mut app) = setup_app();
        app.update_child_counts(10);
        app.nav.enter(dir.path().join("alpha")).unwrap();
        app.update_child_counts(10);
        assert!(app.child_counts.is_empty());
    }

    #[test]
    fn display_path_abbreviates_home() {
        let (dir, mut app) = setup_app();
        app.home = Some(dir.path().to_path_buf());
        assert_eq!(app.display_path(), "~");
        app.home = Some(Path::new("/elsewhere").to_path_buf());
        assert_eq!(app.display_path(), dir.path().display().to_string());
    }
}
