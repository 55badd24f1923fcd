use glam::Vec2;

use crate::config::Config;
use crate::geom::Rect;
use crate::input::{Action, Input};
use crate::level::Level;

/// Represents the stick figure the player controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Centre of the head, world pixels.
    pub pos: Vec2,
    pub vel_y: f32,
    /// -1.0 facing left, 1.0 facing right.
    pub facing: f32,
    /// Whether the feet rest on solid ground or a platform.
    pub on_ground: bool,
    /// Drives the limb swing animation.
    pub walk_cycle: f32,
    /// Timer for coyote time (jumping after leaving a platform).
    pub coyote_timer: f32,
    /// Timer for jump buffering (inputting jump before landing).
    pub jump_buffer_timer: f32,
    pub stamina: f32,
    /// Remaining dash time; dashing while positive.
    pub dash_timer: f32,
    pub shoot_timer: f32,
    pub invuln_timer: f32,
}

/// What happened to the player during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Step {
    pub jumped: bool,
    pub landed: bool,
    pub dashed: bool,
    pub fell_out: bool,
}

impl Player {
    pub fn new(spawn: Vec2, config: &Config) -> Self {
        Player {
            pos: spawn,
            vel_y: 0.0,
            facing: 1.0,
            on_ground: false,
            walk_cycle: 0.0,
            coyote_timer: 0.0,
            jump_buffer_timer: 0.0,
            stamina: config.player.stamina_max,
            dash_timer: 0.0,
            shoot_timer: 0.0,
            invuln_timer: 0.0,
        }
    }

    pub fn feet_y(&self, config: &Config) -> f32 {
        self.pos.y + config.player.feet_offset()
    }

    /// Full-height box used for platform landings.
    pub fn body_rect(&self, config: &Config) -> Rect {
        let p = &config.player;
        Rect::new(
            self.pos.x - p.head_radius,
            self.pos.y - p.head_radius,
            p.head_radius * 2.0,
            p.head_radius * 2.0 + p.body_height + p.leg_height,
        )
    }

    /// Head-only box used for the goal check.
    pub fn head_rect(&self, config: &Config) -> Rect {
        let r = config.player.head_radius;
        Rect::new(self.pos.x - r, self.pos.y - r, r * 2.0, r * 2.0)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invuln_timer > 0.0
    }

    pub fn is_dashing(&self) -> bool {
        self.dash_timer > 0.0
    }

    /// Blink phase while invulnerable.
    pub fn visible(&self) -> bool {
        !self.is_invulnerable() || (self.invuln_timer * 10.0) as i32 % 2 == 0
    }

    pub fn can_shoot(&self) -> bool {
        self.shoot_timer <= 0.0
    }

    pub fn respawn(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel_y = 0.0;
        self.dash_timer = 0.0;
        self.on_ground = false;
    }

    /// Takes a monster hit unless invulnerable. Returns whether it landed.
    pub fn hit(&mut self, spawn: Vec2, config: &Config) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.invuln_timer = config.player.invuln_time;
        self.respawn(spawn);
        true
    }

    /// Advances movement, jumping and platform collision by `dt` seconds.
    pub fn update(&mut self, input: &Input, level: &Level, config: &Config, dt: f32) -> Step {
        let physics = &config.physics;
        let dims = &config.player;
        let feet_offset = dims.feet_offset();
        let mut step = Step::default();
        let was_on_ground = self.on_ground;

        // Update timers
        self.coyote_timer -= dt;
        self.jump_buffer_timer -= dt;
        self.shoot_timer = (self.shoot_timer - dt).max(0.0);
        self.dash_timer = (self.dash_timer - dt).max(0.0);
        if self.invuln_timer > 0.0 {
            self.invuln_timer = (self.invuln_timer - dt).max(0.0);
        }

        // Horizontal movement
        let mut dir = 0.0;
        if input.held(Action::Left) {
            dir -= 1.0;
            self.facing = -1.0;
        }
        if input.held(Action::Right) {
            dir += 1.0;
            self.facing = 1.0;
        }

        if input.pressed(Action::Dash) && !self.is_dashing() && self.stamina >= dims.dash_cost {
            self.stamina -= dims.dash_cost;
            self.dash_timer = dims.dash_time;
            step.dashed = true;
        }

        let moving = if self.is_dashing() {
            self.pos.x += self.facing * physics.move_speed * dims.dash_multiplier * dt;
            true
        } else {
            self.stamina = (self.stamina + dims.stamina_regen * dt).min(dims.stamina_max);
            self.pos.x += dir * physics.move_speed * dt;
            input.held(Action::Left) || input.held(Action::Right)
        };
        if moving {
            self.walk_cycle += 10.0 * dt;
        } else {
            self.walk_cycle = 0.0;
        }
        let half = dims.head_radius;
        self.pos.x = self.pos.x.clamp(half, (level.world_width - half).max(half));

        // Support check before gravity
        let feet = self.feet_y(config);
        self.on_ground = false;
        if level.solid_ground && feet >= level.ground_y - 0.1 {
            self.on_ground = true;
        } else if self.vel_y >= 0.0 {
            for plat in &level.platforms {
                let over = plat.left() - physics.platform_margin < self.pos.x
                    && self.pos.x < plat.right() + physics.platform_margin;
                if over && (feet - plat.top()).abs() <= physics.platform_snap {
                    self.on_ground = true;
                    self.pos.y = plat.top() - feet_offset;
                    self.vel_y = 0.0;
                    break;
                }
            }
        }

        // Jump logic (Coyote time and Buffer)
        if self.on_ground {
            self.coyote_timer = physics.coyote_time;
        }
        if input.held(Action::Jump) {
            self.jump_buffer_timer = physics.jump_buffer_time;
        }
        if self.jump_buffer_timer > 0.0 && self.coyote_timer > 0.0 {
            self.vel_y = physics.jump_vy;
            self.on_ground = false;
            self.coyote_timer = 0.0;
            self.jump_buffer_timer = 0.0;
            step.jumped = true;
        }

        // Gravity and vertical movement
        let prev_feet = self.feet_y(config);
        self.vel_y += physics.gravity * dt;
        self.pos.y += self.vel_y * dt;

        let mut supported = false;
        if level.solid_ground && self.feet_y(config) > level.ground_y {
            self.pos.y = level.ground_y - feet_offset;
            self.vel_y = 0.0;
            supported = true;
        }

        // One-way platforms only catch a falling player
        if self.vel_y >= 0.0 && !supported {
            let body = self.body_rect(config);
            if let Some(plat) = level
                .platforms
                .iter()
                .find(|plat| body.intersects(plat) && prev_feet <= plat.top())
            {
                self.pos.y = plat.top() - feet_offset;
                self.vel_y = 0.0;
                supported = true;
            }
        }
        if supported {
            self.on_ground = true;
            step.landed = !was_on_ground;
        }

        self.pos.y = self.pos.y.max(half);

        if self.pos.y > level.kill_y(physics.fall_limit) {
            self.respawn(level.spawn);
            step.fell_out = true;
        }
        step
    }
}
