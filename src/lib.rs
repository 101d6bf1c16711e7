// Library exports for the snake autopilot
// This allows the simulator, the replay tool and integration tests to share the core logic

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod game;
pub mod grid;
pub mod pathfinder;
pub mod replay;
pub mod simulation;
pub mod survival;
pub mod types;
