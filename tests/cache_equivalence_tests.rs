// Route caching must not change behavior
//
// Seeded headless games are played with a cached and an uncached bot asked
// about every identical snapshot; the game advances with the shared answer.

use snake_autopilot::bot::Bot;
use snake_autopilot::config::Config;
use snake_autopilot::game::{Game, GameStatus};
use snake_autopilot::types::{Decision, GridBounds};

fn config_for(width: i32, height: i32, cache: bool, check_after_eating: bool) -> Config {
    let mut config = Config::default_hardcoded();
    config.grid.width = width;
    config.grid.height = height;
    config.cache.enabled = cache;
    config.survival.check_after_eating = check_after_eating;
    config
}

/// Total route searches run by (cached, uncached) over the game
struct SearchCounts {
    cached: u64,
    uncached: u64,
    decisions: usize,
}

/// Plays one game, panicking on the first tick where the two bots disagree
fn play_side_by_side(
    width: i32,
    height: i32,
    seed: u64,
    max_ticks: u32,
    check_after_eating: bool,
) -> SearchCounts {
    let cached_config = config_for(width, height, true, check_after_eating);
    let mut game = Game::new(GridBounds::new(width, height), &cached_config.game, seed);

    let mut cached = Bot::new(cached_config);
    let mut uncached = Bot::new(config_for(width, height, false, check_after_eating));
    cached.enable();
    uncached.enable();

    let mut decisions = 0;

    while game.status() == GameStatus::Running && game.tick() < max_ticks {
        let snapshot = game.snapshot();
        let a = cached.next_direction(&snapshot.snake, snapshot.food, snapshot.heading);
        let b = uncached.next_direction(&snapshot.snake, snapshot.food, snapshot.heading);
        decisions += 1;

        assert_eq!(
            a,
            b,
            "seed {} tick {}: head {:?} food {:?} length {} cached={:?} uncached={:?}",
            seed,
            game.tick(),
            snapshot.snake[0],
            snapshot.food,
            snapshot.snake.len(),
            a,
            b
        );

        match a {
            Decision::Move(dir) => {
                game.step(dir);
            }
            _ => break,
        }
    }

    SearchCounts {
        cached: cached.route_searches(),
        uncached: uncached.route_searches(),
        decisions,
    }
}

#[test]
fn test_cached_and_uncached_agree_over_seeded_games() {
    let mut cached_searches = 0;
    let mut uncached_searches = 0;
    let mut decisions = 0;

    for seed in 0..50 {
        let counts = play_side_by_side(10, 10, seed, 400, false);
        cached_searches += counts.cached;
        uncached_searches += counts.uncached;
        decisions += counts.decisions;
    }

    assert_eq!(uncached_searches as usize, decisions, "Uncached bot searches every tick");
    assert!(
        cached_searches < uncached_searches,
        "Cache never reused a route: {} vs {} searches",
        cached_searches,
        uncached_searches
    );
}

#[test]
fn test_agreement_on_narrow_grid() {
    for seed in 100..120 {
        play_side_by_side(12, 5, seed, 400, false);
    }
}

#[test]
fn test_agreement_with_post_meal_check() {
    for seed in 200..230 {
        play_side_by_side(10, 10, seed, 400, true);
    }
}
