//! Terminal front end for the lane display.
//!
//! The scheduler and the terminal share one thread: every tick drains input
//! events, advances the scheduler against the in-memory stage, and redraws.
//! A headless runner drives the same tick loop without a terminal.

mod events;
mod headless;
mod runner;

pub use events::{Event, EventHandler, is_quit_key};
pub use headless::HeadlessRunner;
pub use runner::TuiRunner;

use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use eyre::Result;
use ratatui::prelude::*;
use std::io::{Stdout, stdout};

/// Type alias for our terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode.
///
/// Enables raw mode, switches to the alternate screen and hides the cursor.
pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?.execute(Hide)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(Show)?.execute(LeaveAlternateScreen)?;
    Ok(())
}
