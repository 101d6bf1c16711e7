// Grid and occupancy utilities shared by the pathfinder and the survival advisor
//
// Occupancy is a flat table indexed by `y * width + x` so lookups never hash
// or allocate per query.

use crate::types::{Coord, Direction, GridBounds};

/// Whether the tail segment counts as an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailPolicy {
    /// Tail is about to move away and does not block
    Vacating,
    /// Every segment blocks, tail included
    Blocking,
}

/// Snapshot of which cells are covered by the snake
#[derive(Debug, Clone)]
pub struct Occupancy {
    bounds: GridBounds,
    blocked: Vec<bool>,
}

impl Occupancy {
    /// Builds the occupancy table for a snake body (head first)
    /// Segments outside the grid are ignored
    pub fn from_snake(snake: &[Coord], bounds: GridBounds, tail: TailPolicy) -> Self {
        let mut blocked = vec![false; bounds.area()];
        let check_len = match tail {
            TailPolicy::Vacating => snake.len().saturating_sub(1),
            TailPolicy::Blocking => snake.len(),
        };

        for segment in &snake[..check_len] {
            if let Some(idx) = bounds.index_of(segment) {
                blocked[idx] = true;
            }
        }

        Occupancy { bounds, blocked }
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// True when the cell holds a blocking segment
    /// Out-of-bounds cells are reported as not blocked; check bounds separately
    pub fn is_blocked(&self, coord: &Coord) -> bool {
        self.bounds
            .index_of(coord)
            .map(|idx| self.blocked[idx])
            .unwrap_or(false)
    }

    /// True when the cell is on the grid and not blocked
    pub fn is_free(&self, coord: &Coord) -> bool {
        match self.bounds.index_of(coord) {
            Some(idx) => !self.blocked[idx],
            None => false,
        }
    }
}

/// In-bounds neighbors in the order up, down, left, right
pub fn neighbors(coord: &Coord, bounds: &GridBounds) -> impl Iterator<Item = Coord> {
    let origin = *coord;
    let bounds = *bounds;
    IntoIterator::into_iter(Direction::all())
        .map(move |dir| dir.apply(&origin))
        .filter(move |next| bounds.contains(next))
}

/// Checks if a snake segment (tail optional) covers the coordinate
/// Linear scan used for one-off checks where building a table is not worth it
pub fn is_occupied_by_snake(coord: &Coord, snake: &[Coord], tail: TailPolicy) -> bool {
    let check_len = match tail {
        TailPolicy::Vacating => snake.len().saturating_sub(1),
        TailPolicy::Blocking => snake.len(),
    };
    snake[..check_len].contains(coord)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake() -> Vec<Coord> {
        vec![Coord::new(2, 2), Coord::new(1, 2), Coord::new(0, 2)]
    }

    #[test]
    fn test_tail_vacates() {
        let occ = Occupancy::from_snake(&snake(), GridBounds::new(5, 5), TailPolicy::Vacating);
        assert!(occ.is_blocked(&Coord::new(2, 2)));
        assert!(occ.is_blocked(&Coord::new(1, 2)));
        assert!(!occ.is_blocked(&Coord::new(0, 2)), "Tail should not block");
    }

    #[test]
    fn test_tail_blocks() {
        let occ = Occupancy::from_snake(&snake(), GridBounds::new(5, 5), TailPolicy::Blocking);
        assert!(occ.is_blocked(&Coord::new(0, 2)));
    }

    #[test]
    fn test_out_of_bounds_is_not_free() {
        let occ = Occupancy::from_snake(&[], GridBounds::new(3, 3), TailPolicy::Blocking);
        assert!(occ.is_free(&Coord::new(0, 0)));
        assert!(!occ.is_free(&Coord::new(-1, 0)));
        assert!(!occ.is_free(&Coord::new(3, 0)));
    }

    #[test]
    fn test_neighbors_filtered_at_corner() {
        let bounds = GridBounds::new(3, 3);
        let corner: Vec<Coord> = neighbors(&Coord::new(0, 0), &bounds).collect();
        assert_eq!(corner, vec![Coord::new(0, 1), Coord::new(1, 0)]);

        let center: Vec<Coord> = neighbors(&Coord::new(1, 1), &bounds).collect();
        assert_eq!(
            center,
            vec![
                Coord::new(1, 0),
                Coord::new(1, 2),
                Coord::new(0, 1),
                Coord::new(2, 1)
            ]
        );
    }

    #[test]
    fn test_is_occupied_by_snake_single_segment() {
        let body = vec![Coord::new(1, 1)];
        assert!(!is_occupied_by_snake(&Coord::new(1, 1), &body, TailPolicy::Vacating));
        assert!(is_occupied_by_snake(&Coord::new(1, 1), &body, TailPolicy::Blocking));
        assert!(!is_occupied_by_snake(&Coord::new(1, 1), &[], TailPolicy::Vacating));
    }
}
