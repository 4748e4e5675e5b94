//! Staging of line annotations that have not been committed yet.

use crate::core::error::EditorResult;
use crate::core::types::{Color, Rgb};
use crate::filters::builtin::draw_line;
use crate::history::stack::HistoryStack;
use log::debug;
use serde::{Deserialize, Serialize};

/// A pending line annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRequest {
    /// First endpoint, canvas pixels
    pub start: (i32, i32),
    /// Second endpoint, canvas pixels
    pub end: (i32, i32),
    /// Stroke width as recorded. See [`stroke_width`](Self::stroke_width).
    pub width: f64,
    /// Stroke color, decoded at commit
    pub color: Color,
}

impl LineRequest {
    /// Width handed to the rasterizer: truncated toward zero, never clamped.
    pub fn stroke_width(&self) -> i32 {
        self.width.trunc() as i32
    }
}

/// Ordered buffer of [`LineRequest`]s awaiting a commit.
#[derive(Debug, Clone, Default)]
pub struct OverlayStagingBuffer {
    lines: Vec<LineRequest>,
}

impl OverlayStagingBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a line. Coordinates are not checked against the canvas.
    pub fn record_line(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        width: impl Into<f64>,
        color: impl Into<Color>,
    ) {
        self.lines.push(LineRequest {
            start: (x1, y1),
            end: (x2, y2),
            width: width.into(),
            color: color.into(),
        });
    }

    /// Rasterize every staged line onto a copy of the current image, push the
    /// result and clear the buffer. Returns the number of lines flushed.
    ///
    /// Lines are drawn in the order they were recorded, so later lines win where
    /// they overlap. An empty buffer still pushes an unchanged copy.
    ///
    /// All colors are decoded before anything is drawn: a malformed hex color fails
    /// the commit with the history and the buffer left as they were.
    pub fn commit(&mut self, history: &mut HistoryStack) -> EditorResult<usize> {
        let colors = self
            .lines
            .iter()
            .map(|line| line.color.resolve())
            .collect::<Result<Vec<Rgb>, _>>()?;

        let mut canvas = history.current().clone();
        for (line, color) in self.lines.iter().zip(colors) {
            draw_line(&mut canvas, line.start, line.end, line.stroke_width(), color);
        }

        history.push(canvas);
        let flushed = self.lines.len();
        self.lines.clear();
        debug!("overlay committed, {} line(s)", flushed);
        Ok(flushed)
    }

    /// Drop every staged line without drawing anything.
    pub fn discard(&mut self) -> usize {
        let dropped = self.lines.len();
        self.lines.clear();
        dropped
    }

    /// Staged lines in recording order.
    pub fn lines(&self) -> &[LineRequest] {
        &self.lines
    }

    /// Number of staged lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
