//! Rendering collaborator for the admission scheduler.
//!
//! The scheduler never draws anything itself. It asks a [`Renderer`] to
//! create a visual when a message is admitted, to move it every tick, and to
//! remove it at retirement. Visuals are identified by opaque handles.

mod stage;
mod terminal;

pub use stage::{StageRenderer, StageVisual};
pub use terminal::{LaneLayout, TerminalStage, display_width};

use crate::admission::LaneId;
use crate::error::Result;

/// Opaque identifier of a visual owned by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VisualHandle(pub u64);

/// A freshly created visual together with its measured width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub handle: VisualHandle,
    pub width: f64,
}

/// Operations the scheduler needs from whatever owns on-screen state.
pub trait Renderer {
    /// Position of the off-screen entry edge; new visuals start here.
    fn start_position(&self) -> f64;

    /// Create a visual for `text` in `lane` at `start_position`.
    fn create_visual(&mut self, text: &str, start_position: f64, lane: LaneId) -> Result<Visual>;

    /// Move an existing visual.
    fn update_visual_position(&mut self, handle: VisualHandle, position: f64) -> Result<()>;

    /// Remove a visual from the stage.
    fn remove_visual(&mut self, handle: VisualHandle) -> Result<()>;
}
