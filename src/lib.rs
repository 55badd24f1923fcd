//! Shared library for the Stickrun platformer.
//! Contains the fixed-step simulation: player physics, projectiles, monsters,
//! camera, levels and the game state machine. Terminal drawing lives in the binary.

pub mod camera;
pub mod config;
pub mod error;
pub mod game;
pub mod geom;
pub mod input;
pub mod level;
pub mod monster;
pub mod particles;
pub mod player;
pub mod projectile;
pub mod rng;

pub use config::Config;
pub use error::{GameError, Result};
pub use game::{Game, GameState, Outcome, World};
pub use input::{Action, Input};
pub use level::{builtin_levels, load_levels, parse_levels, Level};

/// Loads levels from `path`, or the built-in courses when none is given.
pub fn levels_from(path: Option<&str>) -> Result<Vec<Level>> {
    match path {
        Some(p) => load_levels(p),
        None => Ok(builtin_levels()),
    }
}
