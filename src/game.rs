//! The simulation world for one level, and the state machine around it.

use crate::camera::Camera;
use crate::config::Config;
use crate::error::{GameError, Result};
use crate::geom::circles_overlap;
use crate::input::{Action, Input};
use crate::level::Level;
use crate::monster::{self, Monster};
use crate::particles::{ParticleKind, ParticleSystem};
use crate::player::Player;
use crate::projectile::{self, Projectile};
use crate::rng::SimpleRng;

/// Result of one world tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Running,
    ReachedGoal,
    OutOfLives,
}

/// Everything that moves inside one level.
#[derive(Debug, Clone)]
pub struct World {
    pub level: Level,
    pub player: Player,
    pub monsters: Vec<Monster>,
    pub projectiles: Vec<Projectile>,
    pub particles: ParticleSystem,
    pub camera: Camera,
    pub score: u32,
    pub lives: u32,
    /// Simulation clock in seconds.
    pub clock: f32,
    rng: SimpleRng,
}

impl World {
    pub fn new(level: Level, config: &Config, seed: u32, score: u32, lives: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let mut monsters = Vec::with_capacity(level.max_monsters);
        monster::refill(&mut monsters, &level, &mut rng, &config.monsters);
        World {
            player: Player::new(level.spawn, config),
            monsters,
            projectiles: Vec::new(),
            particles: ParticleSystem::new(),
            camera: Camera::new(&config.camera),
            score,
            lives,
            clock: 0.0,
            rng,
            level,
        }
    }

    pub fn update(&mut self, input: &Input, config: &Config, dt: f32) -> Outcome {
        self.clock += dt;

        if input.pressed(Action::Shoot) && self.player.can_shoot() {
            self.projectiles.push(Projectile::fire(self.player.pos, self.player.facing, config.player.head_radius));
            self.player.shoot_timer = config.combat.shoot_cooldown;
        }

        let step = self.player.update(input, &self.level, config, dt);
        let feet = glam::Vec2::new(self.player.pos.x, self.player.feet_y(config));
        if step.dashed || step.landed {
            self.particles.burst(feet, ParticleKind::Dust, &mut self.rng);
        }
        if step.fell_out {
            log::debug!("player fell out of '{}'", self.level.name);
        }

        self.camera.follow(self.player.pos);

        projectile::advance_all(&mut self.projectiles, &self.camera, &config.combat, dt);
        let kills = projectile::resolve_hits(&mut self.projectiles, &mut self.monsters, &config.combat, &config.monsters);
        for kill in kills {
            self.score += kill.score;
            self.particles.burst(kill.pos, ParticleKind::Spark, &mut self.rng);
            log::debug!("killed {:?} at {:.0},{:.0} (+{})", kill.kind, kill.pos.x, kill.pos.y, kill.score);
        }

        monster::refill(&mut self.monsters, &self.level, &mut self.rng, &config.monsters);
        for m in &mut self.monsters {
            m.update(dt, self.clock, self.level.patrol_range, &config.monsters);
        }

        if !self.player.is_invulnerable() {
            let head = self.player.pos;
            let touching = self
                .monsters
                .iter()
                .any(|m| circles_overlap(head, config.player.head_radius, m.pos, m.radius(&config.monsters)));
            if touching && self.player.hit(self.level.spawn, config) {
                self.lives = self.lives.saturating_sub(1);
                self.particles.burst(head, ParticleKind::Hurt, &mut self.rng);
                log::info!("player hit, {} lives left", self.lives);
            }
        }

        let outcome = if self.lives == 0 {
            Outcome::OutOfLives
        } else if self.player.head_rect(config).intersects(&self.level.goal) {
            Outcome::ReachedGoal
        } else {
            Outcome::Running
        };

        self.particles.update(dt);
        outcome
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    LevelComplete,
    Victory,
    GameOver,
}

/// The main game state and engine.
pub struct Game {
    pub config: Config,
    levels: Vec<Level>,
    pub state: GameState,
    pub level_index: usize,
    pub world: World,
    /// Whether the game loop should keep going.
    pub running: bool,
    /// Status line shown under the playfield.
    pub message: String,
    /// Time spent in the current state.
    state_timer: f32,
    /// Bumped on every world rebuild so each attempt spawns differently.
    attempt: u32,
}

impl Game {
    pub fn new(config: Config, levels: Vec<Level>) -> Result<Self> {
        let first = levels.first().cloned().ok_or(GameError::NoLevels)?;
        let world = World::new(first, &config, config.game.seed, 0, config.player.lives);
        Ok(Game {
            config,
            levels,
            state: GameState::Menu,
            level_index: 0,
            world,
            running: true,
            message: "Press ENTER to start".to_string(),
            state_timer: 0.0,
            attempt: 0,
        })
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    fn set_state(&mut self, state: GameState) {
        log::info!("state {:?} -> {:?}", self.state, state);
        self.state = state;
        self.state_timer = 0.0;
    }

    /// Rebuilds the world for `index`, carrying score and lives.
    fn load_level(&mut self, index: usize, score: u32, lives: u32) {
        self.level_index = index.min(self.levels.len() - 1);
        self.attempt = self.attempt.wrapping_add(1);
        let level = self.levels[self.level_index].clone();
        let seed = self.config.game.seed.wrapping_add(self.attempt);
        log::info!("starting level {} '{}'", self.level_index + 1, level.name);
        self.world = World::new(level, &self.config, seed, score, lives);
        self.message = format!("Level {}: {} - reach the door!", self.level_index + 1, self.world.level.name);
    }

    /// Starts a new run at `index` with fresh score and lives.
    pub fn start(&mut self, index: usize) {
        self.load_level(index, 0, self.config.player.lives);
        self.set_state(GameState::Playing);
    }

    pub fn is_last_level(&self) -> bool {
        self.level_index + 1 >= self.levels.len()
    }

    pub fn update(&mut self, input: &Input, dt: f32) {
        if input.pressed(Action::Quit) {
            self.running = false;
            return;
        }
        self.state_timer += dt;

        match self.state {
            GameState::Menu => {
                if input.pressed(Action::Confirm) {
                    self.start(0);
                }
            }
            GameState::Playing => {
                if input.pressed(Action::Pause) {
                    self.set_state(GameState::Paused);
                    self.message = match self.config.keys.pause.first() {
                        Some(key) => format!("Paused - press {key} to resume"),
                        None => "Paused".to_string(),
                    };
                    return;
                }
                match self.world.update(input, &self.config, dt) {
                    Outcome::Running => {}
                    Outcome::ReachedGoal if self.is_last_level() => {
                        self.set_state(GameState::Victory);
                        self.message = format!("VICTORY! Final score {}", self.world.score);
                    }
                    Outcome::ReachedGoal => {
                        self.set_state(GameState::LevelComplete);
                        self.message = "Level complete! Press ENTER for the next level.".to_string();
                    }
                    Outcome::OutOfLives => {
                        self.set_state(GameState::GameOver);
                        self.message = "GAME OVER".to_string();
                    }
                }
            }
            GameState::Paused => {
                if input.pressed(Action::Pause) || input.pressed(Action::Confirm) {
                    self.set_state(GameState::Playing);
                    self.message = format!("Level {}: {}", self.level_index + 1, self.world.level.name);
                }
            }
            GameState::LevelComplete => {
                if input.pressed(Action::Confirm) {
                    let (score, lives) = (self.world.score, self.world.lives);
                    self.load_level(self.level_index + 1, score, lives);
                    self.set_state(GameState::Playing);
                }
            }
            GameState::Victory => {
                if self.state_timer >= self.config.game.victory_delay {
                    self.message = "You finished the course! Press ENTER for the menu.".to_string();
                    if input.pressed(Action::Confirm) {
                        self.set_state(GameState::Menu);
                        self.message = "Press ENTER to start".to_string();
                    }
                }
            }
            GameState::GameOver => {
                if self.state_timer >= self.config.game.game_over_delay {
                    self.start(self.level_index);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::builtin_levels;

    const DT: f32 = 1.0 / 60.0;

    fn tap(action: Action) -> Input {
        let mut input = Input::new();
        input.tap(action);
        input
    }

    fn playing_game() -> Game {
        let mut game = Game::new(Config::default(), builtin_levels()).unwrap();
        game.update(&tap(Action::Confirm), DT);
        assert_eq!(game.state, GameState::Playing);
        game
    }

    /// Parks the player on the goal of the current level.
    fn stand_on_goal(game: &mut Game) {
        let goal = game.world.level.goal;
        game.world.player.pos = goal.center();
        game.world.monsters.clear();
        game.world.level.max_monsters = 0;
    }

    #[test]
    fn empty_level_list_is_rejected() {
        assert!(matches!(Game::new(Config::default(), vec![]), Err(GameError::NoLevels)));
    }

    #[test]
    fn menu_waits_for_confirm() {
        let mut game = Game::new(Config::default(), builtin_levels()).unwrap();
        game.update(&Input::new(), DT);
        assert_eq!(game.state, GameState::Menu);
        game.update(&tap(Action::Confirm), DT);
        assert_eq!(game.state, GameState::Playing);
        assert_eq!(game.world.lives, 3);
        assert_eq!(game.world.monsters.len(), 3);
    }

    #[test]
    fn quit_stops_from_any_state() {
        let mut game = playing_game();
        game.update(&tap(Action::Quit), DT);
        assert!(!game.running);
    }

    #[test]
    fn pause_freezes_world() {
        let mut game = playing_game();
        game.update(&tap(Action::Pause), DT);
        assert_eq!(game.state, GameState::Paused);
        let clock = game.world.clock;
        for _ in 0..10 {
            game.update(&Input::new(), DT);
        }
        assert_eq!(game.world.clock, clock);
        game.update(&tap(Action::Pause), DT);
        assert_eq!(game.state, GameState::Playing);
    }

    #[test]
    fn shooting_scores_a_kill() {
        let mut game = playing_game();
        let config = game.config.clone();
        let world = &mut game.world;
        let head = world.player.pos;
        world.monsters = vec![Monster::new(
            crate::monster::MonsterKind::Flyer,
            head.x + 120.0,
            1.0,
            0.0,
            world.level.ground_y,
            &config.monsters,
        )];
        // Park the flyer at head height, away from its patrol wave.
        world.monsters[0].pos.y = head.y;
        world.monsters[0].base_y = head.y;
        world.level.max_monsters = 1;
        let mut config = config;
        config.monsters.flyer_amplitude = 0.0;
        config.monsters.flyer.speed = 0.0;
        game.config = config;

        game.update(&tap(Action::Shoot), DT);
        assert_eq!(game.world.projectiles.len(), 1);
        let mut ticks = 0;
        while game.world.score == 0 && ticks < 30 {
            game.update(&Input::new(), DT);
            ticks += 1;
        }
        assert_eq!(game.world.score, 2);
        assert!(game.world.projectiles.is_empty());
        // Refilled back to the level limit.
        assert_eq!(game.world.monsters.len(), 1);
        assert!(!game.world.particles.is_empty());
    }

    #[test]
    fn monster_contact_costs_a_life() {
        let mut game = playing_game();
        let config = game.config.clone();
        let head = game.world.player.pos;
        let mut m = Monster::new(crate::monster::MonsterKind::Tank, head.x, 1.0, 0.0, 680.0, &config.monsters);
        m.pos = head;
        game.world.monsters = vec![m];
        game.update(&Input::new(), DT);
        assert_eq!(game.world.lives, 2);
        assert!(game.world.player.is_invulnerable());
        assert_eq!(game.world.player.pos, game.world.level.spawn);
    }

    #[test]
    fn losing_all_lives_restarts_level() {
        let mut game = playing_game();
        game.world.lives = 1;
        game.world.score = 7;
        let head = game.world.player.pos;
        let mut m = game.world.monsters[0].clone();
        m.pos = head;
        game.world.monsters.push(m);
        game.update(&Input::new(), DT);
        assert_eq!(game.state, GameState::GameOver);

        let mut ticks = 0;
        while game.state == GameState::GameOver && ticks < 200 {
            game.update(&Input::new(), DT);
            ticks += 1;
        }
        assert_eq!(game.state, GameState::Playing);
        assert!(ticks as f32 * DT >= 1.5 - 1e-3);
        assert_eq!(game.world.lives, 3);
        assert_eq!(game.world.score, 0);
        assert_eq!(game.world.camera.offset, glam::Vec2::ZERO);
        assert_eq!(game.level_index, 0);
    }

    #[test]
    fn goal_advances_then_wins() {
        let mut game = playing_game();
        game.world.score = 4;
        stand_on_goal(&mut game);
        game.update(&Input::new(), DT);
        assert_eq!(game.state, GameState::LevelComplete);

        game.update(&tap(Action::Confirm), DT);
        assert_eq!(game.state, GameState::Playing);
        assert_eq!(game.level_index, 1);
        assert_eq!(game.world.score, 4);
        assert_eq!(game.world.monsters.len(), 5);

        stand_on_goal(&mut game);
        game.update(&Input::new(), DT);
        assert_eq!(game.state, GameState::Victory);

        // Confirm is ignored until the victory screen has been shown.
        game.update(&tap(Action::Confirm), DT);
        assert_eq!(game.state, GameState::Victory);
        for _ in 0..(2.6 / DT) as usize {
            game.update(&Input::new(), DT);
        }
        game.update(&tap(Action::Confirm), DT);
        assert_eq!(game.state, GameState::Menu);
    }

    #[test]
    fn invulnerable_player_ignores_contact() {
        let mut game = playing_game();
        let config = game.config.clone();
        let head = game.world.player.pos;
        let mut m = Monster::new(crate::monster::MonsterKind::Tank, head.x, 1.0, 0.0, 680.0, &config.monsters);
        m.pos = head;
        game.world.monsters = vec![m];
        game.world.level.max_monsters = 1;
        game.world.player.invuln_timer = 1.0;

        for _ in 0..10 {
            game.update(&Input::new(), DT);
            game.world.monsters[0].pos = game.world.player.pos;
        }
        assert_eq!(game.world.lives, 3);

        game.world.player.invuln_timer = 0.0;
        game.update(&Input::new(), DT);
        assert_eq!(game.world.lives, 2);
        game.world.monsters[0].pos = game.world.player.pos;
        game.update(&Input::new(), DT);
        assert_eq!(game.world.lives, 2);
    }

    #[test]
    fn goal_tick_still_ages_particles() {
        let mut game = playing_game();
        stand_on_goal(&mut game);
        let mut rng = SimpleRng::new(5);
        game.world.particles.burst(glam::Vec2::new(100.0, 100.0), ParticleKind::Spark, &mut rng);
        game.update(&Input::new(), DT);
        assert_eq!(game.state, GameState::LevelComplete);
        assert!(game.world.particles.particles().iter().all(|p| p.age() > 0.0));
    }

    #[test]
    fn pause_message_names_configured_key() {
        let mut config = Config::default();
        config.keys.pause = vec!["Tab".to_string()];
        let mut game = Game::new(config, builtin_levels()).unwrap();
        game.update(&tap(Action::Confirm), DT);
        game.update(&tap(Action::Pause), DT);
        assert_eq!(game.state, GameState::Paused);
        assert_eq!(game.message, "Paused - press Tab to resume");

        game.config.keys.pause.clear();
        game.update(&tap(Action::Pause), DT);
        game.update(&tap(Action::Pause), DT);
        assert_eq!(game.message, "Paused");
    }
}
