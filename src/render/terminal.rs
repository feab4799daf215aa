//! Terminal view of the stage.
//!
//! Each lane is a row; a visual at column `x` is drawn clipped to the
//! screen, scrolled left when `x` is negative.

use std::borrow::Cow;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
};

use super::stage::{StageRenderer, StageVisual};
use crate::admission::LaneId;

/// Vertical placement of lanes on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneLayout {
    /// Row of lane 0
    pub start_row: u16,
    /// Rows between consecutive lanes
    pub spacing: u16,
}

impl LaneLayout {
    /// Screen row for a lane, relative to the drawing area.
    pub fn row(&self, lane: LaneId) -> u16 {
        let offset = (lane.index() as u16).saturating_mul(self.spacing);
        self.start_row.saturating_add(offset)
    }
}

impl Default for LaneLayout {
    fn default() -> Self {
        Self {
            start_row: 2,
            spacing: 2,
        }
    }
}

/// Display width of `text` in terminal columns.
pub fn display_width(text: &str) -> usize {
    Line::raw(single_line(text)).width()
}

fn single_line(text: &str) -> Cow<'_, str> {
    if text.contains(char::is_control) {
        Cow::Owned(text.chars().map(|c| if c.is_control() { ' ' } else { c }).collect())
    } else {
        Cow::Borrowed(text)
    }
}

/// Draws a [`StageRenderer`] into a ratatui frame.
#[derive(Debug, Clone)]
pub struct TerminalStage {
    layout: LaneLayout,
    style: Style,
}

impl TerminalStage {
    pub fn new(layout: LaneLayout) -> Self {
        Self {
            layout,
            style: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        }
    }

    /// Draw every live visual into `frame`.
    pub fn draw(&self, frame: &mut Frame, stage: &StageRenderer) {
        let area = frame.area();
        for (_, visual) in stage.visuals() {
            if let Some((rect, skip)) = self.placement(area, visual) {
                let text = single_line(&visual.text).into_owned();
                let paragraph = Paragraph::new(Line::raw(text)).style(self.style).scroll((0, skip));
                frame.render_widget(paragraph, rect);
            }
        }
    }

    /// Visible rectangle and number of leading columns scrolled off, or
    /// `None` if nothing of the visual is on screen.
    fn placement(&self, area: Rect, visual: &StageVisual) -> Option<(Rect, u16)> {
        let row = self.layout.row(visual.lane);
        if row >= area.height {
            return None;
        }

        let col = visual.position.floor() as i64;
        let width = visual.width.ceil() as i64;
        let area_width = i64::from(area.width);
        if col >= area_width || col + width <= 0 {
            return None;
        }

        let (x, skip) = if col >= 0 { (col, 0) } else { (0, -col) };
        let visible = (width - skip).min(area_width - x);
        if visible <= 0 {
            return None;
        }

        let rect = Rect::new(area.x + x as u16, area.y + row, visible as u16, 1);
        Some((rect, skip as u16))
    }
}
