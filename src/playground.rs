use crate::common::Position;
use crate::error::{Error, Result};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};

/// One cell of the playground: the current state plus the state computed for
/// the next generation.
///
/// Both flags are atomic so cells can be shared between workers without
/// locks. Ordering between the evaluate and commit phases comes from the pool
/// barrier, not from these loads and stores.
#[derive(Debug, Default)]
pub struct Cell {
    alive: AtomicBool,
    next: AtomicBool,
}

impl Cell {
    pub fn new(alive: bool) -> Cell {
        Cell {
            alive: AtomicBool::new(alive),
            next: AtomicBool::new(alive),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    pub fn next_state(&self) -> bool {
        self.next.load(Ordering::Relaxed)
    }

    pub fn set_next(&self, alive: bool) {
        self.next.store(alive, Ordering::Relaxed);
    }

    /// Moves the cell to the state computed for the next generation.
    pub fn next_gen(&self) {
        self.alive.store(self.next_state(), Ordering::Relaxed);
    }
}

/// Fixed size grid of cells.
///
/// Cells are stored x-major: the cell at `(x, y)` lives at `x * height + y`.
/// Positions outside the grid are always dead.
#[derive(Debug)]
pub struct Playground {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Playground {
    /// Builds a playground from the first `width * height` cells of `cells`.
    pub fn new<I>(width: usize, height: usize, cells: I) -> Result<Playground>
    where
        I: IntoIterator<Item = Cell>,
    {
        let expected = width.checked_mul(height).ok_or_else(|| {
            Error::invalid_pattern(format!("{}x{} playground is too large", width, height))
        })?;
        let cells: Vec<Cell> = cells.into_iter().take(expected).collect();
        if cells.len() < expected {
            return Err(Error::invalid_pattern(format!(
                "{}x{} playground needs {} cells, got {}",
                width,
                height,
                expected,
                cells.len()
            )));
        }

        Ok(Playground {
            width,
            height,
            cells,
        })
    }

    /// Every cell is alive with probability `p`. `width * height` must fit in
    /// a `usize`; `Config::validate` checks that.
    pub fn random<R: Rng>(width: usize, height: usize, p: f32, rng: &mut R) -> Playground {
        let cells = (0..width * height)
            .map(|_| Cell::new(rng.gen::<f32>() < p))
            .collect();
        Playground {
            width,
            height,
            cells,
        }
    }

    /// Parses rows of `#` (alive) and `.` (dead). Row `i` holds the cells
    /// with `x == i`.
    pub fn from_rows(rows: &[&str]) -> Result<Playground> {
        let width = rows.len();
        let height = rows.first().map(|row| row.len()).unwrap_or(0);
        let mut cells = Vec::with_capacity(width * height);

        for (x, row) in rows.iter().enumerate() {
            if row.len() != height {
                return Err(Error::invalid_pattern(format!(
                    "row {} has {} cells, expected {}",
                    x,
                    row.len(),
                    height
                )));
            }
            for ch in row.bytes() {
                let alive = match ch {
                    b'#' => true,
                    b'.' => false,
                    other => {
                        return Err(Error::invalid_pattern(format!(
                            "unexpected {:?} in row {}",
                            other as char, x
                        )))
                    }
                };
                cells.push(Cell::new(alive));
            }
        }

        Playground::new(width, height, cells)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All cells in storage order, one per position.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        if position.x < self.width && position.y < self.height {
            self.cells.get(position.x * self.height + position.y)
        } else {
            None
        }
    }

    pub fn is_alive(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.cell(Position::new(x as usize, y as usize))
            .map(Cell::is_alive)
            .unwrap_or(false)
    }

    /// Positions in storage order, x outer.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let height = self.height;
        (0..self.width).flat_map(move |x| (0..height).map(move |y| Position::new(x, y)))
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.width * (self.height + 1));
        for row in self.cells.chunks(self.height.max(1)) {
            for cell in row {
                out.push(if cell.is_alive() { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}
