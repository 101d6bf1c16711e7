// Autopilot decision engine
//
// One Bot drives one snake. Each tick it routes to the food with A*, emits the
// direction of the first step, and falls back to the flood-fill survival
// advisor when no route exists. A held route is reused across ticks only when
// a fresh search is certain to start the same way, so caching never changes
// the emitted directions.

use log::{debug, info};
use std::collections::VecDeque;

use crate::config::Config;
use crate::grid::{is_occupied_by_snake, TailPolicy};
use crate::pathfinder::{LogObserver, PathFinder};
use crate::survival::{can_survive_after_eating, SurvivalAdvisor};
use crate::types::{Coord, Decision, Direction, GridBounds};

/// Lifecycle state of the autopilot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    /// Switched off; decisions return `Decision::Disabled`
    Disabled,
    /// Enabled with no route held
    Idle,
    /// Enabled and stepping along a route to food
    FollowingRoute,
}

pub struct Bot {
    bounds: GridBounds,
    pathfinder: PathFinder,
    advisor: SurvivalAdvisor,
    cache_enabled: bool,
    check_after_eating: bool,
    state: BotState,
    route: VecDeque<Coord>,
    last_snake_length: usize,
    last_food: Option<Coord>,
    searches: u64,
}

impl Bot {
    /// Creates a new, disabled Bot
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot {
            bounds: config.grid.bounds(),
            pathfinder: PathFinder::new(config.search.max_iterations),
            advisor: SurvivalAdvisor::new(),
            cache_enabled: config.cache.enabled,
            check_after_eating: config.survival.check_after_eating,
            state: BotState::Disabled,
            route: VecDeque::new(),
            last_snake_length: 0,
            last_food: None,
            searches: 0,
        }
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn state(&self) -> BotState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state != BotState::Disabled
    }

    /// Number of route searches run since construction
    pub fn route_searches(&self) -> u64 {
        self.searches
    }

    /// Remaining steps of the held route
    pub fn held_route(&self) -> Vec<Coord> {
        self.route.iter().copied().collect()
    }

    /// Switches the bot on, dropping any held route and cached observations
    pub fn enable(&mut self) {
        self.forget();
        self.state = BotState::Idle;
        info!("Autopilot enabled");
    }

    /// Switches the bot off, dropping any held route and cached observations
    pub fn disable(&mut self) {
        self.forget();
        self.state = BotState::Disabled;
        info!("Autopilot disabled");
    }

    /// Flips between disabled and enabled
    ///
    /// # Returns
    /// * `bool` - True when the bot is enabled afterwards
    pub fn toggle(&mut self) -> bool {
        if self.is_enabled() {
            self.disable();
        } else {
            self.enable();
        }
        self.is_enabled()
    }

    fn forget(&mut self) {
        self.route.clear();
        self.last_snake_length = 0;
        self.last_food = None;
    }

    /// Computes the next move
    ///
    /// # Arguments
    /// * `snake` - Body segments, head first
    /// * `food` - Current food cell
    /// * `heading` - Direction the snake moved last tick
    ///
    /// # Returns
    /// * `Decision` - A direction, `NoSafeMove` when trapped, or `Disabled`
    pub fn next_direction(&mut self, snake: &[Coord], food: Coord, heading: Direction) -> Decision {
        if self.state == BotState::Disabled {
            return Decision::Disabled;
        }

        let reuse = self.cache_enabled && self.is_route_valid(snake, food);
        if !reuse {
            self.recompute_route(snake, food);
        }

        if let (Some(head), Some(next)) = (snake.first(), self.route.pop_front()) {
            if let Some(dir) = Direction::between(head, &next) {
                self.state = BotState::FollowingRoute;
                debug!(
                    "Following route to ({}, {}): {} ({} steps left, reused={})",
                    food.x,
                    food.y,
                    dir.as_str(),
                    self.route.len(),
                    reuse
                );
                return Decision::Move(dir);
            }
        }

        self.route.clear();
        self.state = BotState::Idle;

        match self.advisor.choose_safe_direction(snake, heading, self.bounds) {
            Some(dir) => {
                debug!("No route to food, survival move {}", dir.as_str());
                Decision::Move(dir)
            }
            None => {
                info!("No safe move available");
                Decision::NoSafeMove
            }
        }
    }

    fn recompute_route(&mut self, snake: &[Coord], food: Coord) {
        self.searches += 1;
        let mut route =
            self.pathfinder
                .find_route_observed(snake, food, self.bounds, &mut LogObserver);

        if self.check_after_eating
            && !route.is_empty()
            && !can_survive_after_eating(snake, &route, self.bounds)
        {
            debug!("Route to food would trap the snake, discarding it");
            route.clear();
        }

        self.route = route.into_iter().collect();
        self.last_snake_length = snake.len();
        self.last_food = Some(food);
    }

    /// Checks whether the held route can be followed this tick without recomputing
    ///
    /// The route is stale if the snake grew or the food moved. Beyond that it is
    /// only reused when it is the single shortest route left: a straight, free
    /// line from the head to the food. Any search then returns exactly that line,
    /// whatever its tie-breaking, and reaches the goal within `length + 1`
    /// expansions. Bent routes have equally short alternatives a fresh search
    /// may prefer, so they are always recomputed. Missing data counts as stale.
    fn is_route_valid(&self, snake: &[Coord], food: Coord) -> bool {
        let head = match snake.first() {
            Some(head) => *head,
            None => return false,
        };
        if self.route.is_empty() || !self.bounds.contains(&head) {
            return false;
        }

        if snake.len() > self.last_snake_length || self.last_food != Some(food) {
            return false;
        }
        if self.route.back() != Some(&food) {
            return false;
        }

        let length = self.route.len();
        if length >= self.pathfinder.max_iterations() {
            return false;
        }
        if head.x != food.x && head.y != food.y {
            return false;
        }
        if head.manhattan(&food) as usize != length {
            return false;
        }

        let mut prev = head;
        for cell in &self.route {
            if !prev.is_adjacent(cell)
                || !self.bounds.contains(cell)
                || is_occupied_by_snake(cell, snake, TailPolicy::Vacating)
            {
                return false;
            }
            prev = *cell;
        }

        if self.check_after_eating {
            let held: Vec<Coord> = self.route.iter().copied().collect();
            if !can_survive_after_eating(snake, &held, self.bounds) {
                return false;
            }
        }

        true
    }
}
