//! TUI Runner - main display loop.
//!
//! The `TuiRunner` owns the terminal, the scheduler and the stage. It runs
//! the main loop: handle input → tick scheduler → draw → repeat.

use super::Tui;
use super::events::{Event, EventHandler, is_quit_key};
use crate::admission::AdmissionScheduler;
use crate::render::{StageRenderer, TerminalStage};
use eyre::Result;
use log::info;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Main TUI runner that owns the display loop.
pub struct TuiRunner {
    /// The terminal instance
    terminal: Tui,
    /// Lane scheduler
    scheduler: AdmissionScheduler,
    /// Visual state the scheduler renders into
    stage: StageRenderer,
    /// Draws the stage
    view: TerminalStage,
    /// Keyboard and resize events
    event_handler: EventHandler,
}

impl TuiRunner {
    /// Create a runner whose stage spans the terminal width.
    pub fn new(terminal: Tui, scheduler: AdmissionScheduler, view: TerminalStage) -> Result<Self> {
        let size = terminal.size()?;
        Ok(Self {
            terminal,
            scheduler,
            stage: StageRenderer::new(size.width),
            view,
            event_handler: EventHandler::new(),
        })
    }

    /// Run until a quit key is pressed or `shutdown` turns true.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!("Starting display loop with {} lanes", self.scheduler.lanes().capacity());
        let mut ticker = tokio::time::interval(self.scheduler.config().tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            // 1. Handle input
            if self.handle_events()? {
                info!("Quit requested");
                break;
            }

            // 2. Advance the lanes
            self.scheduler.tick(&mut self.stage);

            // 3. Draw
            self.terminal.draw(|f| self.view.draw(f, &self.stage))?;
        }

        let totals = self.scheduler.state();
        info!(
            "Display loop ended after {} ticks: {} received, {} shown, {} discarded",
            totals.tick_count, totals.total_received, totals.total_retired, totals.total_discarded
        );
        Ok(())
    }

    /// Returns true if the user asked to quit.
    fn handle_events(&mut self) -> Result<bool> {
        for event in self.event_handler.pending()? {
            match event {
                Event::Key(key) if is_quit_key(&key) => return Ok(true),
                Event::Key(_) => {}
                Event::Resize(width, _) => self.stage.resize(width),
            }
        }
        Ok(false)
    }
}
