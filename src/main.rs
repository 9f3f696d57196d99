mod app;
mod components;
mod config;
mod error;
mod event;
mod format;
mod fs;
mod handler;
mod logging;
mod opener;
mod preview;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::config::AppConfig;
use crate::event::{Event, EventHandler};
use crate::opener::{CommandOpener, Opener};
use crate::tui::{install_panic_hook, Tui};

/// A three-pane terminal file browser.
#[derive(Parser, Debug)]
#[command(name = "explorer", version, about)]
struct Cli {
    /// Config file to load instead of the default locations
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref());
    let log_path = logging::init(&config);
    tracing::info!(log = ?log_path, theme = config.theme_scheme(), "starting explorer");

    let mut app = App::from_config(&config)?;
    let opener = CommandOpener::from_config(&config);
    tracing::debug!(programs = ?opener.programs(), "open chain");
    let events = EventHandler::new(Duration::from_millis(250));

    install_panic_hook();
    let mut tui = Tui::new(config.mouse_enabled())?;
    let result = run_loop(&mut tui, &mut app, &events, &opener);
    tui.restore()?;

    tracing::info!("exiting explorer");
    result
}

fn run_loop(
    tui: &mut Tui,
    app: &mut App,
    events: &EventHandler,
    opener: &impl Opener,
) -> error::Result<()> {
    while !app.should_quit {
        tui.terminal_mut().draw(|frame| ui::render(app, frame))?;

        match events.next()? {
            Event::Key(key) => handler::handle_key_event(app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(app, mouse),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
        }

        if let Some(path) = app.take_pending_open() {
            tui.suspend()?;
            let outcome = opener.open(&path);
            tui.resume()?;
            app.finish_open(outcome);
        }
    }
    Ok(())
}
