use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};

use crate::error::Result;

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// A key press. Release and repeat events are dropped.
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// No input arrived within the tick rate.
    Tick,
    Resize(u16, u16),
}

/// Blocking event source polled from the main loop.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Wait up to one tick for terminal input.
    pub fn next(&self) -> Result<Event> {
        if !event::poll(self.tick_rate)? {
            return Ok(Event::Tick);
        }
        Ok(translate(event::read()?))
    }
}

fn translate(event: CrosstermEvent) -> Event {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
        CrosstermEvent::Mouse(mouse) => Event::Mouse(mouse),
        CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
        _ => Event::Tick,
    }
}
