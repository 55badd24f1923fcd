use std::fs;
use std::path::Path;

use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::input::Action;

/// Default location of the config file, relative to the working directory.
pub const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub jump_vy: f32,
    pub move_speed: f32,
    pub coyote_time: f32,
    pub jump_buffer_time: f32,
    /// Horizontal slack when testing whether the feet rest on a platform.
    pub platform_margin: f32,
    /// Vertical distance within which the feet snap onto a platform top.
    pub platform_snap: f32,
    /// Distance below the lowest surface at which the player respawns.
    pub fall_limit: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: 800.0,
            jump_vy: -600.0,
            move_speed: 300.0,
            coyote_time: 0.1,
            jump_buffer_time: 0.1,
            platform_margin: 5.0,
            platform_snap: 6.0,
            fall_limit: 500.0,
        }
    }
}

impl PhysicsConfig {
    /// Peak height of a jump from standing.
    pub fn jump_height(&self) -> f32 {
        self.jump_vy * self.jump_vy / (2.0 * self.gravity)
    }

    /// Horizontal distance covered by a jump that lands `rise` pixels above
    /// the take-off surface (negative `rise` lands lower). `None` when the
    /// arc never gets that high.
    pub fn jump_reach(&self, rise: f32) -> Option<f32> {
        let v = -self.jump_vy;
        let disc = v * v - 2.0 * self.gravity * rise;
        if disc < 0.0 {
            return None;
        }
        let airtime = (v + disc.sqrt()) / self.gravity;
        Some(self.move_speed * airtime)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PlayerConfig {
    pub head_radius: f32,
    pub body_height: f32,
    pub leg_height: f32,
    pub lives: u32,
    pub invuln_time: f32,
    pub stamina_max: f32,
    pub stamina_regen: f32,
    pub dash_cost: f32,
    pub dash_time: f32,
    pub dash_multiplier: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            head_radius: 20.0,
            body_height: 40.0,
            leg_height: 30.0,
            lives: 3,
            invuln_time: 1.5,
            stamina_max: 100.0,
            stamina_regen: 25.0,
            dash_cost: 35.0,
            dash_time: 0.18,
            dash_multiplier: 3.0,
        }
    }
}

impl PlayerConfig {
    /// Distance from the head centre down to the feet.
    pub fn feet_offset(&self) -> f32 {
        self.head_radius + self.body_height + self.leg_height
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CombatConfig {
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    /// Projectiles further than this outside the view are dropped.
    pub projectile_margin: f32,
    pub shoot_cooldown: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        CombatConfig {
            projectile_speed: 600.0,
            projectile_radius: 8.0,
            projectile_margin: 100.0,
            shoot_cooldown: 0.15,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CameraConfig {
    pub lag: f32,
    pub view_width: f32,
    pub view_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig { lag: 0.05, view_width: 1366.0, view_height: 769.0 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct MonsterProps {
    pub radius: f32,
    pub speed: f32,
    pub score: u32,
    /// Hover height above the ground line.
    pub y_offset: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MonsterConfig {
    pub basic: MonsterProps,
    pub flyer: MonsterProps,
    pub tank: MonsterProps,
    pub flyer_amplitude: f32,
    pub flyer_frequency: f32,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        MonsterConfig {
            basic: MonsterProps { radius: 25.0, speed: 80.0, score: 1, y_offset: 0.0 },
            flyer: MonsterProps { radius: 15.0, speed: 150.0, score: 2, y_offset: 150.0 },
            tank: MonsterProps { radius: 40.0, speed: 50.0, score: 3, y_offset: 0.0 },
            flyer_amplitude: 50.0,
            flyer_frequency: 4.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    pub fps: u32,
    pub game_over_delay: f32,
    pub victory_delay: f32,
    pub seed: u32,
    /// Without key release events, a key stays held this long after its last
    /// press or repeat.
    pub key_hold: f32,
    /// Optional JSON level set; the built-in courses are used when unset.
    pub levels: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            fps: 60,
            game_over_delay: 1.5,
            victory_delay: 2.5,
            seed: 1,
            key_hold: 0.6,
            levels: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct KeysConfig {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
    pub shoot: Vec<String>,
    pub dash: Vec<String>,
    pub pause: Vec<String>,
    pub confirm: Vec<String>,
    pub quit: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for KeysConfig {
    fn default() -> Self {
        KeysConfig {
            left: keys(&["Left", "a", "q"]),
            right: keys(&["Right", "d"]),
            jump: keys(&["Up", "w", "z", "Space"]),
            shoot: keys(&["f", "j"]),
            dash: keys(&["s", "k"]),
            pause: keys(&["p", "Tab"]),
            confirm: keys(&["Enter"]),
            quit: keys(&["Esc"]),
        }
    }
}

impl KeysConfig {
    pub fn key_matches(code: KeyCode, key_list: &[String]) -> bool {
        for k in key_list {
            let matches = match k.as_str() {
                "Left" => code == KeyCode::Left,
                "Right" => code == KeyCode::Right,
                "Up" => code == KeyCode::Up,
                "Down" => code == KeyCode::Down,
                "Enter" => code == KeyCode::Enter,
                "Esc" => code == KeyCode::Esc,
                "Tab" => code == KeyCode::Tab,
                "Space" => code == KeyCode::Char(' '),
                s => {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next(), code) {
                        (Some(c), None, KeyCode::Char(pressed)) => c.eq_ignore_ascii_case(&pressed),
                        _ => false,
                    }
                }
            };
            if matches { return true; }
        }
        false
    }

    /// All actions bound to `code`.
    pub fn actions_for(&self, code: KeyCode) -> Vec<Action> {
        let bindings: [(&[String], Action); 8] = [
            (self.left.as_slice(), Action::Left),
            (self.right.as_slice(), Action::Right),
            (self.jump.as_slice(), Action::Jump),
            (self.shoot.as_slice(), Action::Shoot),
            (self.dash.as_slice(), Action::Dash),
            (self.pause.as_slice(), Action::Pause),
            (self.confirm.as_slice(), Action::Confirm),
            (self.quit.as_slice(), Action::Quit),
        ];
        bindings
            .iter()
            .filter(|(list, _)| Self::key_matches(code, list))
            .map(|(_, action)| *action)
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub combat: CombatConfig,
    pub camera: CameraConfig,
    pub monsters: MonsterConfig,
    pub game: GameConfig,
    pub keys: KeysConfig,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Reads `path`, falling back to defaults when it is missing or broken.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Config::default();
        }
        match Self::from_path(path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e}; using default config");
                Config::default()
            }
        }
    }

    /// Fixed simulation step in seconds.
    pub fn tick(&self) -> f32 {
        1.0 / self.game.fps.max(1) as f32
    }
}
