use crate::playground::{Cell, Playground};
use std::fmt;

/// A grid coordinate, `x` in `[0, width)` and `y` in `[0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Position {
        Position { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Decides the next state of a single cell.
///
/// Called concurrently for every cell of the playground. Implementations may
/// read any cell but must only write the next state of `cell`.
pub trait Rule: Send + Sync + 'static {
    fn evaluate(&self, playground: &Playground, cell: &Cell, position: Position);
}

/// Something that shows the playground.
pub trait Surface: Send + Sync + 'static {
    /// Requests a redraw. Must not block on the drawing itself.
    fn repaint(&self, playground: &Playground, generation: u64);

    /// Makes sure the last generation is on screen. Called once when a run
    /// ends and may block until it is drawn.
    fn flush(&self, _playground: &Playground, _generation: u64) {}
}
