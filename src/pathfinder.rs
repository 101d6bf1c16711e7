// A* route search from the snake's head to a goal cell
//
// The frontier is a binary heap ordered by (f, entry order). Entry order is the
// moment a cell joined the frontier; a cell whose cost improves while it is
// still open keeps its original entry order, and a cell that re-enters after
// being expanded gets a fresh one. This reproduces "lowest f, first entered
// wins" from a linear scan over an insertion-ordered list, so tie-breaking is
// deterministic. It is not guaranteed to pick the same shortest route as
// other tie-breaking schemes.

use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::grid::{neighbors, Occupancy, TailPolicy};
use crate::types::{Coord, GridBounds};

/// Default cap on node expansions per search
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Hooks invoked at fixed points of the search loop
///
/// All methods default to no-ops so implementors only override what they need.
pub trait SearchObserver {
    /// A cell was taken off the frontier for expansion
    fn on_expand(&mut self, _cell: Coord, _g: i32, _f: i32, _frontier_len: usize) {}

    /// The goal was expanded; `route_len` excludes the start cell
    fn on_goal_found(&mut self, _goal: Coord, _route_len: usize, _iterations: usize) {}

    /// The frontier ran dry before reaching the goal
    fn on_frontier_exhausted(&mut self, _iterations: usize) {}

    /// The expansion cap was hit before reaching the goal
    fn on_cap_exceeded(&mut self, _max_iterations: usize) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Observer that forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SearchObserver for LogObserver {
    fn on_expand(&mut self, cell: Coord, g: i32, f: i32, frontier_len: usize) {
        trace!(
            "expand ({}, {}) g={} f={} frontier={}",
            cell.x,
            cell.y,
            g,
            f,
            frontier_len
        );
    }

    fn on_goal_found(&mut self, goal: Coord, route_len: usize, iterations: usize) {
        debug!(
            "Route to ({}, {}) found: {} steps after {} expansions",
            goal.x, goal.y, route_len, iterations
        );
    }

    fn on_frontier_exhausted(&mut self, iterations: usize) {
        debug!("No route: frontier exhausted after {} expansions", iterations);
    }

    fn on_cap_exceeded(&mut self, max_iterations: usize) {
        debug!("No route: expansion cap of {} reached", max_iterations);
    }
}

/// Frontier entry; ordered so the max-heap pops lowest f, then earliest entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierEntry {
    f: i32,
    order: u64,
    idx: usize,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Grid A* search with a bounded number of expansions
#[derive(Debug, Clone, Copy)]
pub struct PathFinder {
    max_iterations: usize,
}

impl Default for PathFinder {
    fn default() -> Self {
        PathFinder::new(DEFAULT_MAX_ITERATIONS)
    }
}

impl PathFinder {
    pub fn new(max_iterations: usize) -> Self {
        PathFinder { max_iterations }
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Finds a route from the snake's head to `goal`
    ///
    /// # Arguments
    /// * `snake` - Body segments, head first
    /// * `goal` - Target cell
    /// * `bounds` - Grid dimensions
    ///
    /// # Returns
    /// Cells to step through, excluding the head and ending at `goal`.
    /// Empty when no route exists, the cap is hit, or the input is malformed.
    pub fn find_route(&self, snake: &[Coord], goal: Coord, bounds: GridBounds) -> Vec<Coord> {
        self.find_route_observed(snake, goal, bounds, &mut NoopObserver)
    }

    /// Same as `find_route`, reporting search events to `observer`
    pub fn find_route_observed(
        &self,
        snake: &[Coord],
        goal: Coord,
        bounds: GridBounds,
        observer: &mut dyn SearchObserver,
    ) -> Vec<Coord> {
        let start = match snake.first() {
            Some(head) => *head,
            None => return vec![],
        };
        let (start_idx, goal_idx) = match (bounds.index_of(&start), bounds.index_of(&goal)) {
            (Some(s), Some(g)) => (s, g),
            _ => return vec![],
        };

        let occupancy = Occupancy::from_snake(snake, bounds, TailPolicy::Vacating);
        let area = bounds.area();

        let mut g_score = vec![i32::MAX; area];
        let mut f_score = vec![i32::MAX; area];
        let mut came_from: Vec<Option<usize>> = vec![None; area];
        // Some(order) while the cell sits on the frontier
        let mut open_order: Vec<Option<u64>> = vec![None; area];

        let mut heap = BinaryHeap::new();
        let mut next_order: u64 = 0;
        let mut open_len: usize = 0;

        g_score[start_idx] = 0;
        f_score[start_idx] = start.manhattan(&goal);
        open_order[start_idx] = Some(next_order);
        heap.push(FrontierEntry {
            f: f_score[start_idx],
            order: next_order,
            idx: start_idx,
        });
        next_order += 1;
        open_len += 1;

        let mut iterations = 0;

        while let Some(entry) = heap.pop() {
            if open_order[entry.idx] != Some(entry.order) || f_score[entry.idx] != entry.f {
                continue;
            }

            if iterations >= self.max_iterations {
                observer.on_cap_exceeded(self.max_iterations);
                return vec![];
            }
            iterations += 1;

            open_order[entry.idx] = None;
            open_len -= 1;

            let current = Self::coord_at(entry.idx, &bounds);
            observer.on_expand(current, g_score[entry.idx], entry.f, open_len);

            if entry.idx == goal_idx {
                let route = Self::reconstruct_route(&came_from, goal_idx, &bounds);
                observer.on_goal_found(goal, route.len(), iterations);
                return route;
            }

            let tentative_g = g_score[entry.idx] + 1;

            for neighbor in neighbors(&current, &bounds) {
                if occupancy.is_blocked(&neighbor) {
                    continue;
                }

                let n_idx = match bounds.index_of(&neighbor) {
                    Some(idx) => idx,
                    None => continue,
                };

                if tentative_g >= g_score[n_idx] {
                    continue;
                }

                came_from[n_idx] = Some(entry.idx);
                g_score[n_idx] = tentative_g;
                f_score[n_idx] = tentative_g + neighbor.manhattan(&goal);

                let order = match open_order[n_idx] {
                    Some(order) => order,
                    None => {
                        let order = next_order;
                        next_order += 1;
                        open_order[n_idx] = Some(order);
                        open_len += 1;
                        order
                    }
                };

                heap.push(FrontierEntry {
                    f: f_score[n_idx],
                    order,
                    idx: n_idx,
                });
            }
        }

        observer.on_frontier_exhausted(iterations);
        vec![]
    }

    fn coord_at(idx: usize, bounds: &GridBounds) -> Coord {
        let width = bounds.width as usize;
        Coord {
            x: (idx % width) as i32,
            y: (idx / width) as i32,
        }
    }

    /// Walks predecessors back from the goal, dropping the start cell
    fn reconstruct_route(
        came_from: &[Option<usize>],
        goal_idx: usize,
        bounds: &GridBounds,
    ) -> Vec<Coord> {
        let mut route = vec![Self::coord_at(goal_idx, bounds)];
        let mut current = goal_idx;

        while let Some(prev) = came_from[current] {
            route.push(Self::coord_at(prev, bounds));
            current = prev;
        }

        route.pop();
        route.reverse();
        route
    }
}

/// Finds a route with the default expansion cap
pub fn find_route(snake: &[Coord], goal: Coord, bounds: GridBounds) -> Vec<Coord> {
    PathFinder::default().find_route(snake, goal, bounds)
}
