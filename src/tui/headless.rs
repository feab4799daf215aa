//! Display loop without a terminal.
//!
//! Drives the scheduler against an in-memory stage of fixed width. Useful
//! on machines without a tty and for watching lane activity in the log.

use crate::admission::{AdmissionScheduler, TickState};
use crate::render::StageRenderer;
use eyre::Result;
use log::{debug, info};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Tick loop over a [`StageRenderer`].
pub struct HeadlessRunner {
    scheduler: AdmissionScheduler,
    stage: StageRenderer,
    exit_when_idle: bool,
}

impl HeadlessRunner {
    /// Create a runner with a stage `width` columns wide.
    pub fn new(scheduler: AdmissionScheduler, width: u16) -> Self {
        Self {
            scheduler,
            stage: StageRenderer::new(width),
            exit_when_idle: false,
        }
    }

    /// Stop on its own once every message has left the stage.
    pub fn exit_when_idle(mut self, exit: bool) -> Self {
        self.exit_when_idle = exit;
        self
    }

    /// Run until `shutdown` turns true, or until idle when configured to.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<TickState> {
        info!("Starting headless display loop with {} lanes", self.scheduler.lanes().capacity());
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

            let report = self.scheduler.tick(&mut self.stage);
            if report.admitted > 0 || report.retired > 0 {
                debug!(
                    "Tick {}: admitted {}, retired {}, {} waiting",
                    self.scheduler.state().tick_count,
                    report.admitted,
                    report.retired,
                    self.scheduler.waiting().count()
                );
            }

            if self.exit_when_idle && self.scheduler.is_idle() && self.scheduler.state().total_received > 0 {
                info!("All messages shown, stopping");
                break;
            }
        }

        Ok(self.scheduler.state().clone())
    }
}
