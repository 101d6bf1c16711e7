// Survival fallback: pick the move that keeps the most open space reachable
//
// Used when no route to food exists. Each candidate move is scored by a flood
// fill from the cell it lands on; larger reachable regions are less likely to
// trap the snake.

use log::debug;
use std::collections::VecDeque;

use crate::grid::{neighbors, Occupancy, TailPolicy};
use crate::types::{Coord, Direction, GridBounds};

/// Flood-fill based move selection
#[derive(Debug, Default, Clone, Copy)]
pub struct SurvivalAdvisor;

impl SurvivalAdvisor {
    pub fn new() -> Self {
        SurvivalAdvisor
    }

    /// Chooses the direction that maximizes reachable open space
    ///
    /// # Arguments
    /// * `snake` - Body segments, head first
    /// * `heading` - Current heading; its reverse is never considered
    /// * `bounds` - Grid dimensions
    ///
    /// # Returns
    /// The best direction, or None when every candidate hits a wall or the body
    pub fn choose_safe_direction(
        &self,
        snake: &[Coord],
        heading: Direction,
        bounds: GridBounds,
    ) -> Option<Direction> {
        let head = *snake.first()?;
        let occupancy = Occupancy::from_snake(snake, bounds, TailPolicy::Vacating);
        let reverse = heading.opposite();

        let mut best: Option<(Direction, usize)> = None;

        for dir in Direction::all() {
            if dir == reverse {
                continue;
            }

            let next = dir.apply(&head);
            if !occupancy.is_free(&next) {
                continue;
            }

            let space = flood_fill(next, &occupancy);
            debug!("Survival candidate {}: {} reachable cells", dir.as_str(), space);

            let better = match best {
                Some((_, best_space)) => space > best_space,
                None => true,
            };
            if better {
                best = Some((dir, space));
            }
        }

        best.map(|(dir, _)| dir)
    }
}

/// Counts cells reachable from `start` through free cells, `start` included
/// Every segment except the tail blocks
pub fn count_reachable_space(start: Coord, snake: &[Coord], bounds: GridBounds) -> usize {
    if !bounds.contains(&start) {
        return 0;
    }
    let occupancy = Occupancy::from_snake(snake, bounds, TailPolicy::Vacating);
    flood_fill(start, &occupancy)
}

/// BFS over 4-connected free cells; the start cell is counted even if blocked
fn flood_fill(start: Coord, occupancy: &Occupancy) -> usize {
    let bounds = occupancy.bounds();
    let start_idx = match bounds.index_of(&start) {
        Some(idx) => idx,
        None => return 0,
    };

    let mut visited = vec![false; bounds.area()];
    let mut queue = VecDeque::new();
    visited[start_idx] = true;
    queue.push_back(start);
    let mut count = 0;

    while let Some(current) = queue.pop_front() {
        count += 1;

        for neighbor in neighbors(&current, &bounds) {
            let idx = match bounds.index_of(&neighbor) {
                Some(idx) => idx,
                None => continue,
            };
            if visited[idx] || occupancy.is_blocked(&neighbor) {
                continue;
            }
            visited[idx] = true;
            queue.push_back(neighbor);
        }
    }

    count
}

/// Checks that following `route` to the food leaves room to keep moving
///
/// Simulates the snake walking the route without dropping its tail (it grows
/// on arrival), then requires the region reachable from the new head to be at
/// least as large as the grown snake. The whole grown body blocks, tail
/// included, since it has just eaten.
pub fn can_survive_after_eating(snake: &[Coord], route: &[Coord], bounds: GridBounds) -> bool {
    if route.is_empty() {
        return false;
    }

    let mut grown: Vec<Coord> = route.iter().rev().copied().collect();
    grown.extend_from_slice(snake);

    let head = grown[0];
    let occupancy = Occupancy::from_snake(&grown, bounds, TailPolicy::Blocking);
    let space = flood_fill(head, &occupancy);

    debug!(
        "Post-meal check: {} reachable cells for length {}",
        space,
        grown.len()
    );
    space >= grown.len()
}
