// Headless snake game used to drive the autopilot outside a renderer
//
// Rules: the head advances one cell per tick; leaving the grid or running into
// the body ends the game; eating food grows the snake by one, adds score and
// respawns food on a random free cell. Filling the grid wins.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::types::{Coord, Direction, GridBounds};

/// Outcome of the game so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Running,
    Lost,
    Won,
}

/// Everything the autopilot needs to decide one move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub bounds: GridBounds,
    pub snake: Vec<Coord>,
    pub food: Coord,
    pub heading: Direction,
}

pub struct Game {
    bounds: GridBounds,
    snake: Vec<Coord>,
    heading: Direction,
    food: Coord,
    score: u32,
    food_score: u32,
    tick: u32,
    status: GameStatus,
    rng: StdRng,
}

impl Game {
    /// Starts a game with a horizontal snake heading right
    ///
    /// The head sits at the grid center (shifted right if the body would not fit)
    /// and the body trails to the left.
    pub fn new(bounds: GridBounds, rules: &GameConfig, seed: u64) -> Self {
        let length = rules.initial_length.max(1) as i32;
        let head = Coord::new(
            (bounds.width / 2).max(length - 1),
            bounds.height / 2,
        );
        let snake = (0..length).map(|i| Coord::new(head.x - i, head.y)).collect();

        Self::from_parts(bounds, snake, Direction::Right, rules.food_score, seed)
    }

    /// Builds a game from an explicit body, spawning food at random
    pub fn from_parts(
        bounds: GridBounds,
        snake: Vec<Coord>,
        heading: Direction,
        food_score: u32,
        seed: u64,
    ) -> Self {
        let mut game = Game {
            bounds,
            snake,
            heading,
            food: Coord::new(0, 0),
            score: 0,
            food_score,
            tick: 0,
            status: GameStatus::Running,
            rng: StdRng::seed_from_u64(seed),
        };
        game.spawn_food();
        game
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn snake(&self) -> &[Coord] {
        &self.snake
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn food(&self) -> Coord {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            bounds: self.bounds,
            snake: self.snake.clone(),
            food: self.food,
            heading: self.heading,
        }
    }

    /// Places food manually, e.g. for scripted scenarios
    pub fn set_food(&mut self, food: Coord) {
        self.food = food;
    }

    /// Advances one tick in `heading`
    ///
    /// A reversal onto the neck is ignored and the snake keeps its current
    /// heading, as keyboard input would.
    pub fn step(&mut self, heading: Direction) -> GameStatus {
        if self.status != GameStatus::Running {
            return self.status;
        }

        if heading != self.heading.opposite() || self.snake.len() == 1 {
            self.heading = heading;
        }
        self.tick += 1;

        let head = self.heading.apply(&self.snake[0]);

        if !self.bounds.contains(&head) {
            info!("Tick {}: hit the wall at ({}, {})", self.tick, head.x, head.y);
            self.status = GameStatus::Lost;
            return self.status;
        }

        if self.snake.contains(&head) {
            info!("Tick {}: ran into itself at ({}, {})", self.tick, head.x, head.y);
            self.status = GameStatus::Lost;
            return self.status;
        }

        self.snake.insert(0, head);

        if head == self.food {
            self.score += self.food_score;
            debug!("Tick {}: ate food, length {}", self.tick, self.snake.len());
            if !self.spawn_food() {
                info!("Tick {}: grid filled", self.tick);
                self.status = GameStatus::Won;
            }
        } else {
            self.snake.pop();
        }

        self.status
    }

    /// Moves the food to a random free cell; false when no cell is free
    fn spawn_food(&mut self) -> bool {
        let free: Vec<Coord> = (0..self.bounds.height)
            .flat_map(|y| (0..self.bounds.width).map(move |x| Coord::new(x, y)))
            .filter(|c| !self.snake.contains(c))
            .collect();

        if free.is_empty() {
            return false;
        }

        self.food = free[self.rng.random_range(0..free.len())];
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> GameConfig {
        GameConfig {
            initial_length: 3,
            food_score: 10,
            max_ticks: 100,
        }
    }

    #[test]
    fn test_initial_layout() {
        let game = Game::new(GridBounds::new(20, 30), &rules(), 1);
        assert_eq!(
            game.snake(),
            &[Coord::new(10, 15), Coord::new(9, 15), Coord::new(8, 15)]
        );
        assert_eq!(game.heading(), Direction::Right);
        assert!(!game.snake().contains(&game.food()));
        assert_eq!(game.status(), GameStatus::Running);
    }

    #[test]
    fn test_same_seed_same_food() {
        let a = Game::new(GridBounds::new(20, 30), &rules(), 42);
        let b = Game::new(GridBounds::new(20, 30), &rules(), 42);
        assert_eq!(a.food(), b.food());
    }

    #[test]
    fn test_step_moves_and_drops_tail() {
        let mut game = Game::new(GridBounds::new(10, 10), &rules(), 3);
        game.set_food(Coord::new(0, 0));
        game.step(Direction::Up);
        assert_eq!(
            game.snake(),
            &[Coord::new(5, 4), Coord::new(5, 5), Coord::new(4, 5)]
        );
        assert_eq!(game.tick(), 1);
    }

    #[test]
    fn test_reverse_is_ignored() {
        let mut game = Game::new(GridBounds::new(10, 10), &rules(), 3);
        game.set_food(Coord::new(0, 0));
        game.step(Direction::Left);
        assert_eq!(game.heading(), Direction::Right);
        assert_eq!(game.snake()[0], Coord::new(6, 5));
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut game = Game::new(GridBounds::new(10, 10), &rules(), 3);
        game.set_food(Coord::new(6, 5));
        game.step(Direction::Right);
        assert_eq!(game.snake().len(), 4);
        assert_eq!(game.score(), 10);
        assert!(!game.snake().contains(&game.food()));
    }

    #[test]
    fn test_wall_ends_game() {
        let mut game = Game::from_parts(
            GridBounds::new(3, 3),
            vec![Coord::new(2, 1), Coord::new(1, 1)],
            Direction::Right,
            10,
            0,
        );
        assert_eq!(game.step(Direction::Right), GameStatus::Lost);
        assert_eq!(game.step(Direction::Up), GameStatus::Lost, "Lost games stay lost");
    }

    #[test]
    fn test_filling_the_grid_wins() {
        let mut game = Game::from_parts(
            GridBounds::new(2, 1),
            vec![Coord::new(0, 0)],
            Direction::Right,
            10,
            0,
        );
        assert_eq!(game.food(), Coord::new(1, 0));
        assert_eq!(game.step(Direction::Right), GameStatus::Won);
    }
}
