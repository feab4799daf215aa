//! Input handling for the TUI.
//!
//! The render tick owns the thread, so input is polled without blocking at
//! the top of every tick rather than awaited.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use eyre::Result;
use std::time::Duration;

/// Input event relevant to the display.
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// Collects pending terminal events without blocking.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Every event already buffered by the terminal.
    pub fn pending(&self) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                // Only handle key press events, not release
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => events.push(Event::Key(key)),
                CrosstermEvent::Resize(w, h) => events.push(Event::Resize(w, h)),
                _ => {}
            }
        }
        Ok(events)
    }
}

/// Esc, `q` and Ctrl-C close the display.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
