//! Lane-constrained admission scheduler.
//!
//! The scheduler owns every `MessageRecord`, the wait list and the lane pool.
//! It is single-threaded: the only state shared with producers is the
//! [`IntakeQueue`], which is drained at the start of every tick.

use std::collections::VecDeque;

use log::{debug, info};

use super::lanes::LanePool;
use super::message::{MessageRecord, MessageState, preview};
use super::tick::{TickConfig, TickReport, TickState};
use crate::intake::IntakeQueue;
use crate::render::Renderer;

const LOG_PREVIEW_CHARS: usize = 30;

/// Moves queued messages into a fixed set of lanes, one per lane, in arrival
/// order.
#[derive(Debug)]
pub struct AdmissionScheduler {
    config: TickConfig,
    intake: IntakeQueue,
    lanes: LanePool,
    waiting: VecDeque<MessageRecord>,
    active: Vec<MessageRecord>,
    next_seq: u64,
    state: TickState,
}

impl AdmissionScheduler {
    /// Create a scheduler over `lane_count` lanes fed by `intake`.
    pub fn new(lane_count: usize, intake: IntakeQueue, config: TickConfig) -> Self {
        Self {
            config,
            intake,
            lanes: LanePool::new(lane_count),
            waiting: VecDeque::new(),
            active: Vec::with_capacity(lane_count),
            next_seq: 0,
            state: TickState::new(),
        }
    }

    /// Tick configuration.
    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    /// Handle to the intake queue feeding this scheduler.
    pub fn intake(&self) -> &IntakeQueue {
        &self.intake
    }

    /// Lane pool state.
    pub fn lanes(&self) -> &LanePool {
        &self.lanes
    }

    /// Messages waiting for a lane, head first.
    pub fn waiting(&self) -> impl Iterator<Item = &MessageRecord> {
        self.waiting.iter()
    }

    /// Messages currently holding a lane, in admission order.
    pub fn active(&self) -> &[MessageRecord] {
        &self.active
    }

    /// Cumulative counters.
    pub fn state(&self) -> &TickState {
        &self.state
    }

    /// Returns true when nothing is queued, waiting or on stage.
    pub fn is_idle(&self) -> bool {
        self.waiting.is_empty() && self.active.is_empty() && self.intake.is_empty()
    }

    /// Run one tick: drain, advance, retire, admit.
    pub fn tick<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> TickReport {
        let mut report = TickReport::default();
        self.drain_intake(&mut report);
        self.advance(renderer, &mut report);
        self.retire(renderer, &mut report);
        self.admit(renderer, &mut report);
        self.state.record(&report);
        report
    }

    fn drain_intake(&mut self, report: &mut TickReport) {
        for text in self.intake.drain_all() {
            let record = MessageRecord::queued(self.next_seq, text);
            self.next_seq += 1;
            debug!("Queued message {}: '{}'", record.seq, record.preview(50));
            self.waiting.push_back(record);
            report.drained += 1;
        }
    }

    fn advance<R: Renderer + ?Sized>(&mut self, renderer: &mut R, report: &mut TickReport) {
        let speed = self.config.speed;
        for record in self.active.iter_mut().filter(|r| r.state == MessageState::Active) {
            report.advanced += 1;
            if record.advance(speed) {
                continue;
            }
            let Some(handle) = record.visual else {
                continue;
            };
            if let Err(e) = renderer.update_visual_position(handle, record.position) {
                report.render_failures += 1;
                tracing::warn!(seq = record.seq, position = record.position, error = %e, "Failed to move visual");
            }
        }
    }

    fn retire<R: Renderer + ?Sized>(&mut self, renderer: &mut R, report: &mut TickReport) {
        let max_attempts = self.config.max_render_attempts;
        let records = std::mem::take(&mut self.active);
        for mut record in records {
            if !record.state.is_terminal() {
                self.active.push(record);
                continue;
            }

            let removed = match record.visual {
                Some(handle) => renderer.remove_visual(handle),
                None => Ok(()),
            };

            match removed {
                Ok(()) => {
                    if let Some(lane) = record.lane {
                        self.lanes.release(lane);
                        info!("Lane {} freed: '{}'", lane, record.preview(LOG_PREVIEW_CHARS));
                    }
                    report.retired += 1;
                }
                Err(e) => {
                    report.render_failures += 1;
                    record.render_failures += 1;
                    tracing::warn!(
                        seq = record.seq,
                        attempt = record.render_failures,
                        error = %e,
                        "Failed to remove visual"
                    );
                    if record.render_failures >= max_attempts {
                        if let Some(lane) = record.lane {
                            self.lanes.release(lane);
                        }
                        log::warn!(
                            "Giving up on removing message {} after {} attempts, lane released",
                            record.seq,
                            record.render_failures
                        );
                        report.discarded += 1;
                    } else {
                        self.active.push(record);
                    }
                }
            }
        }
    }

    fn admit<R: Renderer + ?Sized>(&mut self, renderer: &mut R, report: &mut TickReport) {
        let max_attempts = self.config.max_render_attempts;
        while !self.waiting.is_empty() {
            let Some(lane) = self.lanes.acquire() else {
                break;
            };
            let Some(mut record) = self.waiting.pop_front() else {
                self.lanes.release(lane);
                break;
            };

            let start = renderer.start_position();
            match renderer.create_visual(&record.text, start, lane) {
                Ok(visual) => {
                    record.admit(lane, start, visual);
                    info!("Lane {} spawned: '{}'", lane, record.preview(LOG_PREVIEW_CHARS));
                    self.active.push(record);
                    report.admitted += 1;
                }
                Err(e) => {
                    self.lanes.release(lane);
                    report.render_failures += 1;
                    record.render_failures += 1;
                    tracing::warn!(
                        seq = record.seq,
                        attempt = record.render_failures,
                        error = %e,
                        "Failed to create visual"
                    );
                    if record.render_failures >= max_attempts {
                        log::warn!(
                            "Discarding message {} after {} failed attempts: '{}'",
                            record.seq,
                            record.render_failures,
                            preview(&record.text, LOG_PREVIEW_CHARS)
                        );
                        report.discarded += 1;
                        continue;
                    }
                    // Keep its place at the head and retry next tick
                    self.waiting.push_front(record);
                    break;
                }
            }
        }
    }
}
