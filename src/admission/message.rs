//! Message lifecycle records.
//!
//! A `MessageRecord` is created when text is pulled off the intake queue and
//! lives until its visual leaves the stage. It moves through
//! `Queued -> Active -> Retired` exactly once and never goes back.

use super::lanes::LaneId;
use crate::render::{Visual, VisualHandle};

/// Lifecycle state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageState {
    /// Waiting for a free lane
    Queued,
    /// Scrolling across its lane
    Active,
    /// Traversal complete, waiting for its visual to be removed
    Retired,
}

impl MessageState {
    /// Returns true once the message has left its lane for good
    pub fn is_terminal(&self) -> bool {
        matches!(self, MessageState::Retired)
    }
}

/// One queued or in-flight message, owned by the scheduler.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    /// Creation order, unique per scheduler
    pub seq: u64,
    /// Text to display
    pub text: String,
    /// Lane assigned at admission
    pub lane: Option<LaneId>,
    /// Horizontal offset of the visual's left edge
    pub position: f64,
    /// Current lifecycle state
    pub state: MessageState,
    /// Rendered width, the exit threshold is `-width`
    pub width: f64,
    /// Renderer handle while active
    pub visual: Option<VisualHandle>,
    /// Consecutive renderer failures on create or remove
    pub render_failures: u32,
}

impl MessageRecord {
    /// Create a freshly queued record.
    pub fn queued(seq: u64, text: impl Into<String>) -> Self {
        Self {
            seq,
            text: text.into(),
            lane: None,
            position: 0.0,
            state: MessageState::Queued,
            width: 0.0,
            visual: None,
            render_failures: 0,
        }
    }

    /// Move a queued record into its lane.
    pub fn admit(&mut self, lane: LaneId, start_position: f64, visual: Visual) {
        debug_assert_eq!(self.state, MessageState::Queued, "message {} admitted twice", self.seq);
        debug_assert!(self.lane.is_none(), "message {} already has a lane", self.seq);
        self.lane = Some(lane);
        self.position = start_position;
        self.width = visual.width;
        self.visual = Some(visual.handle);
        self.state = MessageState::Active;
        self.render_failures = 0;
    }

    /// Move by `speed` toward the exit edge. Returns true if the message has
    /// now fully left the stage.
    pub fn advance(&mut self, speed: f64) -> bool {
        debug_assert_eq!(self.state, MessageState::Active);
        self.position -= speed;
        if self.has_exited() {
            self.state = MessageState::Retired;
            true
        } else {
            false
        }
    }

    /// Returns true once the trailing edge has passed the left edge.
    pub fn has_exited(&self) -> bool {
        self.position < -self.width
    }

    /// Text truncated for log lines.
    pub fn preview(&self, max_chars: usize) -> String {
        preview(&self.text, max_chars)
    }
}

/// Truncate `text` to `max_chars` characters for logging.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visual(width: f64) -> Visual {
        Visual {
            handle: VisualHandle(1),
            width,
        }
    }

    #[test]
    fn test_queued_record() {
        let record = MessageRecord::queued(4, "hello");
        assert_eq!(record.seq, 4);
        assert_eq!(record.text, "hello");
        assert_eq!(record.state, MessageState::Queued);
        assert!(record.lane.is_none());
        assert!(record.visual.is_none());
    }

    #[test]
    fn test_admit_sets_lane_and_position() {
        let mut record = MessageRecord::queued(0, "hello");
        record.admit(LaneId(2), 80.0, visual(5.0));
        assert_eq!(record.state, MessageState::Active);
        assert_eq!(record.lane, Some(LaneId(2)));
        assert_eq!(record.position, 80.0);
        assert_eq!(record.width, 5.0);
        assert_eq!(record.visual, Some(VisualHandle(1)));
    }

    #[test]
    fn test_advance_until_exit() {
        let mut record = MessageRecord::queued(0, "abc");
        record.admit(LaneId(0), 4.0, visual(3.0));

        // 4 -> 2 -> 0 -> -2 stay on stage, -4 is past -3
        assert!(!record.advance(2.0));
        assert!(!record.advance(2.0));
        assert!(!record.advance(2.0));
        assert_eq!(record.state, MessageState::Active);
        assert!(record.advance(2.0));
        assert_eq!(record.state, MessageState::Retired);
        assert!(record.state.is_terminal());
    }

    #[test]
    fn test_exit_threshold_is_strict() {
        let mut record = MessageRecord::queued(0, "abc");
        record.admit(LaneId(0), 0.0, visual(3.0));
        // Exactly at -width is still visible by one column edge
        assert!(!record.advance(3.0));
        assert!(record.advance(0.5));
    }

    #[test]
    fn test_preview_truncates_by_chars() {
        assert_eq!(preview("short", 30), "short");
        assert_eq!(preview("最初のメッセージです", 4), "最初のメ...");
        let record = MessageRecord::queued(0, "abcdef");
        assert_eq!(record.preview(3), "abc...");
    }
}
