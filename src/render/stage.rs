//! In-memory stage.
//!
//! Keeps every live visual with its lane and position. The terminal view
//! draws from it; headless runs and tests use it directly.

use std::collections::BTreeMap;

use super::terminal::display_width;
use super::{Renderer, Visual, VisualHandle};
use crate::admission::LaneId;
use crate::error::{LanescrollError, Result};

/// A visual as the stage knows it.
#[derive(Debug, Clone, PartialEq)]
pub struct StageVisual {
    pub text: String,
    pub lane: LaneId,
    pub position: f64,
    pub width: f64,
}

/// Renderer that only records state.
#[derive(Debug)]
pub struct StageRenderer {
    width: u16,
    next_handle: u64,
    visuals: BTreeMap<VisualHandle, StageVisual>,
}

impl StageRenderer {
    /// Create an empty stage `width` columns wide.
    pub fn new(width: u16) -> Self {
        Self {
            width,
            next_handle: 0,
            visuals: BTreeMap::new(),
        }
    }

    /// Stage width in columns.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Resize the stage. Live visuals keep their positions; only messages
    /// admitted afterwards start from the new edge.
    pub fn resize(&mut self, width: u16) {
        if width != self.width {
            log::debug!("Stage resized from {} to {} columns", self.width, width);
            self.width = width;
        }
    }

    /// Look up a live visual.
    pub fn visual(&self, handle: VisualHandle) -> Option<&StageVisual> {
        self.visuals.get(&handle)
    }

    /// All live visuals in creation order.
    pub fn visuals(&self) -> impl Iterator<Item = (&VisualHandle, &StageVisual)> {
        self.visuals.iter()
    }

    /// Number of live visuals.
    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    /// Returns true when nothing is on stage.
    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    fn unknown(handle: VisualHandle) -> LanescrollError {
        LanescrollError::Render(format!("unknown visual {}", handle.0))
    }
}

impl Renderer for StageRenderer {
    fn start_position(&self) -> f64 {
        f64::from(self.width)
    }

    fn create_visual(&mut self, text: &str, start_position: f64, lane: LaneId) -> Result<Visual> {
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;

        let width = display_width(text) as f64;
        self.visuals.insert(
            handle,
            StageVisual {
                text: text.to_string(),
                lane,
                position: start_position,
                width,
            },
        );
        Ok(Visual { handle, width })
    }

    fn update_visual_position(&mut self, handle: VisualHandle, position: f64) -> Result<()> {
        let visual = self.visuals.get_mut(&handle).ok_or_else(|| Self::unknown(handle))?;
        visual.position = position;
        Ok(())
    }

    fn remove_visual(&mut self, handle: VisualHandle) -> Result<()> {
        self.visuals.remove(&handle).map(|_| ()).ok_or_else(|| Self::unknown(handle))
    }
}
