use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, AppMode, PAGE_STEP};
use crate::components::help::HelpOverlay;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Search => handle_search_mode(app, key),
        AppMode::Help => handle_help_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),
        KeyCode::PageDown => app.move_selection(PAGE_STEP),
        KeyCode::PageUp => app.move_selection(-PAGE_STEP),
        KeyCode::Char('g') | KeyCode::Home => app.jump_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.jump_to_bottom(),
        KeyCode::Char('l') | KeyCode::Enter | KeyCode::Right => app.enter_selected(),
        KeyCode::Char('h') | KeyCode::Backspace | KeyCode::Left => app.go_to_parent(),
        KeyCode::Esc => app.escape(),
        KeyCode::Char('.') => app.toggle_hidden(),
        KeyCode::Char('~') => app.go_home(),
        KeyCode::Char('/') => app.go_root(),
        KeyCode::Char('s') => app.start_search(),
        KeyCode::Char('S') => app.cycle_sort(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('J') => app.preview.scroll_down(1),
        KeyCode::Char('K') => app.preview.scroll_up(1),
        KeyCode::Char('?') => app.toggle_help(),
        _ => {}
    }
}

fn handle_search_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Enter => app.submit_search(),
        KeyCode::Backspace => app.search_delete_char(),
        KeyCode::Left => app.search_cursor_left(),
        KeyCode::Right => app.search_cursor_right(),
        KeyCode::Home => app.search_cursor_home(),
        KeyCode::End => app.search_cursor_end(),
        KeyCode::Char(c) => app.search_input_char(c),
        _ => {}
    }
}

fn handle_help_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => app.toggle_help(),
        KeyCode::Char('j') | KeyCode::Down => app.help_scroll_down(HelpOverlay::total_lines()),
        KeyCode::Char('k') | KeyCode::Up => app.help_scroll_up(),
        _ => {}
    }
}

/// Handle a mouse event. Only the wheel is bound, and only in normal mode.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.mode != AppMode::Normal {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => app.move_selection(1),
        MouseEventKind::ScrollUp => app.move_selection(-1),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::fs::navigation::NavigationState;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        File::create(dir.path().join(".env")).unwrap();
        let nav = NavigationState::open(dir.path()).unwrap();
        (dir, App::new(nav, &AppConfig::default()))
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn mouse(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn q_and_ctrl_c_quit() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let (_dir, mut app) = setup_app();
        app.start_search();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn movement_keys() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.nav.selected_index(), 2);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.nav.selected_index(), 1);
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.nav.selected_index(), 2);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.nav.selected_index(), 0);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.nav.selected_index(), 2);
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.nav.selected_index(), 0);
    }

    #[test]
    fn enter_and_leave_directory() {
        let (dir, mut app) = setup_app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.nav.current_path(), dir.path().join("docs"));
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.nav.current_path(), dir.path());
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.nav.current_path(), dir.path());
    }

    #[test]
    fn enter_on_file_queues_open() {
        let (dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.pending_open, Some(dir.path().join("a.txt")));
    }

    #[test]
    fn dot_toggles_hidden() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char('.'));
        assert_eq!(app.nav.visible_entries().len(), 4);
        press(&mut app, KeyCode::Char('.'));
        assert_eq!(app.nav.visible_entries().len(), 3);
    }

    #[test]
    fn slash_goes_to_root() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.nav.current_path(), crate::fs::listing::filesystem_root());
    }

    #[test]
    fn search_typing_flow() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.mode, AppMode::Search);
        // Normal-mode bindings are plain text while typing.
        for c in ['b', 'q', '.'] {
            press(&mut app, KeyCode::Char(c));
        }
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.nav.search_query(), Some("b"));
        assert_eq!(app.nav.visible_entries().len(), 1);

        press(&mut app, KeyCode::Esc);
        assert!(app.nav.search_query().is_none());
    }

    #[test]
    fn search_escape_cancels() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.nav.search_query().is_none());
    }

    #[test]
    fn sort_and_reload_keys() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char('S'));
        assert_eq!(app.nav.sort_key(), crate::fs::listing::SortKey::BySize);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.status_message.as_ref().unwrap().text, "Reloaded");
    }

    #[test]
    fn help_mode_keys() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.help_scroll, 1);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.nav.selected_index(), 0);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn mouse_wheel_moves_selection() {
        let (_dir, mut app) = setup_app();
        handle_mouse_event(&mut app, mouse(MouseEventKind::ScrollDown));
        handle_mouse_event(&mut app, mouse(MouseEventKind::ScrollDown));
        assert_eq!(app.nav.selected_index(), 2);
        handle_mouse_event(&mut app, mouse(MouseEventKind::ScrollUp));
        assert_eq!(app.nav.selected_index(), 1);
    }

    #[test]
    fn mouse_ignored_outside_normal_mode() {
        let (_dir, mut app) = setup_app();
        app.toggle_help();
        handle_mouse_event(&mut app, mouse(MouseEventKind::ScrollDown));
        assert_eq!(app.nav.selected_index(), 0);
    }
}
