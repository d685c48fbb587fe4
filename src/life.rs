use crate::common::{Position, Rule};
use crate::playground::{Cell, Playground};

/// Conway's Game of Life (B3/S23) on a bounded playground.
#[derive(Debug, Default, Clone, Copy)]
pub struct Life;

impl Life {
    pub fn live_neighbours(playground: &Playground, position: Position) -> usize {
        let x = position.x as isize;
        let y = position.y as isize;
        let mut count = 0;
        for dx in -1..=1 {
            for dy in -1..=1 {
                if (dx, dy) != (0, 0) && playground.is_alive(x + dx, y + dy) {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn next_state(alive: bool, neighbours: usize) -> bool {
        matches!((alive, neighbours), (true, 2) | (_, 3))
    }
}

impl Rule for Life {
    fn evaluate(&self, playground: &Playground, cell: &Cell, position: Position) {
        let neighbours = Life::live_neighbours(playground, position);
        cell.set_next(Life::next_state(cell.is_alive(), neighbours));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn birth_survival_death() {
        assert!(Life::next_state(false, 3));
        assert!(!Life::next_state(false, 2));
        assert!(Life::next_state(true, 2));
        assert!(Life::next_state(true, 3));
        assert!(!Life::next_state(true, 1));
        assert!(!Life::next_state(true, 4));
    }

    #[test]
    fn counts_neighbours_at_edges() {
        let playground = Playground::from_rows(&["###", "###", "###"]).unwrap();
        assert_eq!(Life::live_neighbours(&playground, Position::new(0, 0)), 3);
        assert_eq!(Life::live_neighbours(&playground, Position::new(0, 1)), 5);
        assert_eq!(Life::live_neighbours(&playground, Position::new(1, 1)), 8);
    }

    #[test]
    fn evaluate_only_touches_next_state() {
        let playground = Playground::from_rows(&["...", "###", "..."]).unwrap();
        let position = Position::new(0, 1);
        let cell = playground.cell(position).unwrap();

        Life.evaluate(&playground, cell, position);

        assert!(!cell.is_alive());
        assert!(cell.next_state());
    }
}
