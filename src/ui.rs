use std::path::Path;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::entry_list::EntryListWidget;
use crate::components::help::HelpOverlay;
use crate::components::preview::PreviewWidget;
use crate::components::search::SearchPrompt;
use crate::components::status_bar::StatusBarWidget;
use crate::theme::ThemeColors;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let [path_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let columns = if app.preview_enabled {
        Layout::horizontal([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(2, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(main_area)
    } else {
        Layout::horizontal([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)]).split(main_area)
    };

    // Borders take two rows.
    let list_height = columns[1].height.saturating_sub(2) as usize;
    app.update_list_scroll(list_height);
    app.update_child_counts(list_height);
    app.sync_preview();

    let theme = &app.theme;
    render_path_bar(app, frame, path_area);
    render_parent_pane(app, frame, columns[0]);
    render_current_pane(app, frame, columns[1]);
    if let Some(&preview_area) = columns.get(2) {
        let block = pane_block(" Preview ".to_string(), theme, false);
        frame.render_widget(PreviewWidget::new(&app.preview, theme).block(block), preview_area);
    }
    render_status_bar(app, frame, status_area);

    match app.mode {
        AppMode::Normal => {}
        AppMode::Search => {
            frame.render_widget(SearchPrompt::new(&app.search_input, theme), main_area)
        }
        AppMode::Help => frame.render_widget(HelpOverlay::new(theme, app.help_scroll), area),
    }
}

fn pane_block(title: String, theme: &ThemeColors, focused: bool) -> Block<'static> {
    let border = if focused {
        theme.border_focused_fg
    } else {
        theme.border_fg
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn dir_title(path: &Path) -> String {
    match path.file_name() {
        Some(name) => format!(" {} ", name.to_string_lossy()),
        None => format!(" {} ", path.display()),
    }
}

fn render_path_bar(app: &App, frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::raw(" 📂 "),
        Span::styled(
            app.display_path(),
            Style::default()
                .fg(app.theme.path_fg)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_parent_pane(app: &App, frame: &mut Frame, area: Rect) {
    let current = app.nav.current_path();
    let entries = app.nav.visible_parent_entries();
    let highlighted = entries.iter().position(|e| e.path == current);
    let height = area.height.saturating_sub(2) as usize;
    let scroll = highlighted
        .map(|i| i.saturating_sub(height / 2))
        .unwrap_or(0);

    let title = match current.parent() {
        Some(parent) => dir_title(parent),
        None => String::new(),
    };
    let widget = EntryListWidget::new(&entries, &app.theme)
        .selected(highlighted)
        .scroll_offset(scroll)
        .empty_message("")
        .block(pane_block(title, &app.theme, false));
    frame.render_widget(widget, area);
}

fn render_current_pane(app: &App, frame: &mut Frame, area: Rect) {
    let entries = app.nav.visible_entries();
    let empty = if app.nav.search_query().is_some() {
        "No matches"
    } else {
        "(empty)"
    };
    let widget = EntryListWidget::new(&entries, &app.theme)
        .selected(Some(app.nav.selected_index()))
        .scroll_offset(app.list_scroll)
        .show_details(true)
        .child_counts(&app.child_counts)
        .empty_message(empty)
        .block(pane_block(dir_title(app.nav.current_path()), &app.theme, true));
    frame.render_widget(widget, area);
}

fn render_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let total = app.nav.visible_entries().len();
    let mut widget = StatusBarWidget::new(
        &app.theme,
        app.nav.selected_index(),
        total,
        app.nav.sort_key().label(),
    )
    .show_hidden(app.nav.show_hidden());
    if let Some(query) = app.nav.search_query() {
        widget = widget.search(query, total);
    }
    if let Some(msg) = &app.status_message {
        widget = widget.status_message(&msg.text, msg.is_error);
    }
    frame.render_widget(widget, area);
}
