use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{MonsterConfig, MonsterProps};
use crate::level::Level;
use crate::rng::SimpleRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonsterKind {
    /// Walks the ground.
    Basic,
    /// Hovers above the ground on a sine wave.
    Flyer,
    /// Big, slow, worth more.
    Tank,
}

impl MonsterKind {
    pub fn props(self, config: &MonsterConfig) -> MonsterProps {
        match self {
            MonsterKind::Basic => config.basic,
            MonsterKind::Flyer => config.flyer,
            MonsterKind::Tank => config.tank,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Monster {
    pub kind: MonsterKind,
    pub pos: Vec2,
    /// -1.0 or 1.0
    pub dir: f32,
    /// Resting height the flyer oscillates around.
    pub base_y: f32,
    pub phase: f32,
}

impl Monster {
    /// Places a monster of `kind` at `x`, resting on the level's ground line.
    pub fn new(kind: MonsterKind, x: f32, dir: f32, phase: f32, ground_y: f32, config: &MonsterConfig) -> Self {
        let props = kind.props(config);
        let y = ground_y - props.radius * 2.0 - props.y_offset;
        Monster { kind, pos: Vec2::new(x, y), dir, base_y: y, phase }
    }

    /// A random monster drawn from the kinds the level allows.
    pub fn spawn(level: &Level, rng: &mut SimpleRng, config: &MonsterConfig) -> Option<Self> {
        let kind = *rng.pick(&level.monster_kinds)?;
        let [min_x, max_x] = level.spawn_range;
        let x = rng.range_f32(min_x, max_x);
        let dir = rng.sign();
        let phase = rng.range_f32(0.0, TAU);
        Some(Monster::new(kind, x, dir, phase, level.ground_y, config))
    }

    pub fn radius(&self, config: &MonsterConfig) -> f32 {
        self.kind.props(config).radius
    }

    pub fn score(&self, config: &MonsterConfig) -> u32 {
        self.kind.props(config).score
    }

    /// Patrols between `patrol` bounds; flyers also bob around `base_y`.
    /// `clock` is the simulation time in seconds.
    pub fn update(&mut self, dt: f32, clock: f32, patrol: [f32; 2], config: &MonsterConfig) {
        let props = self.kind.props(config);
        self.pos.x += self.dir * props.speed * dt;
        if self.pos.x < patrol[0] {
            self.dir = 1.0;
        }
        if self.pos.x > patrol[1] {
            self.dir = -1.0;
        }

        if self.kind == MonsterKind::Flyer {
            let wave = (clock * config.flyer_frequency + self.phase).sin();
            self.pos.y = self.base_y + wave * config.flyer_amplitude;
        }
    }
}

/// Tops the population back up to the level's limit.
pub fn refill(monsters: &mut Vec<Monster>, level: &Level, rng: &mut SimpleRng, config: &MonsterConfig) {
    while monsters.len() < level.max_monsters {
        match Monster::spawn(level, rng, config) {
            Some(monster) => monsters.push(monster),
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::builtin_levels;

    #[test]
    fn spawn_height_depends_on_kind() {
        let config = MonsterConfig::default();
        let basic = Monster::new(MonsterKind::Basic, 500.0, 1.0, 0.0, 680.0, &config);
        let flyer = Monster::new(MonsterKind::Flyer, 500.0, 1.0, 0.0, 680.0, &config);
        let tank = Monster::new(MonsterKind::Tank, 500.0, 1.0, 0.0, 680.0, &config);
        assert_eq!(basic.pos.y, 630.0);
        assert_eq!(flyer.pos.y, 500.0);
        assert_eq!(tank.pos.y, 600.0);
        assert_eq!(tank.score(&config), 3);
    }

    #[test]
    fn ground_patrol_turns_at_bounds() {
        let config = MonsterConfig::default();
        let mut m = Monster::new(MonsterKind::Basic, 51.0, -1.0, 0.0, 680.0, &config);
        m.update(0.1, 0.0, [50.0, 2500.0], &config);
        assert_eq!(m.dir, 1.0);
        assert_eq!(m.pos.y, 630.0);

        let mut m = Monster::new(MonsterKind::Tank, 2499.0, 1.0, 0.0, 680.0, &config);
        m.update(0.1, 0.0, [50.0, 2500.0], &config);
        assert_eq!(m.dir, -1.0);
    }

    #[test]
    fn flyer_bobs_within_amplitude() {
        let config = MonsterConfig::default();
        let mut m = Monster::new(MonsterKind::Flyer, 1000.0, 1.0, 0.0, 680.0, &config);
        let mut lowest = f32::MIN;
        let mut highest = f32::MAX;
        for i in 0..240 {
            m.update(1.0 / 60.0, i as f32 / 60.0, [50.0, 2500.0], &config);
            lowest = lowest.max(m.pos.y);
            highest = highest.min(m.pos.y);
        }
        assert!(lowest <= m.base_y + 50.0 + 1e-3);
        assert!(highest >= m.base_y - 50.0 - 1e-3);
        assert!(lowest - highest > 90.0);
    }

    #[test]
    fn refill_respects_allowed_kinds() {
        let config = MonsterConfig::default();
        let level = builtin_levels().remove(0);
        let mut rng = SimpleRng::new(3);
        let mut monsters = Vec::new();
        refill(&mut monsters, &level, &mut rng, &config);
        assert_eq!(monsters.len(), 3);
        for m in &monsters {
            assert_eq!(m.kind, MonsterKind::Basic);
            assert!((100.0..2500.0).contains(&m.pos.x));
        }
    }

    #[test]
    fn refill_without_kinds_stops() {
        let config = MonsterConfig::default();
        let mut level = builtin_levels().remove(0);
        level.monster_kinds.clear();
        let mut monsters = Vec::new();
        refill(&mut monsters, &level, &mut SimpleRng::new(1), &config);
        assert!(monsters.is_empty());
    }
}
