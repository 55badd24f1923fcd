use glam::Vec2;

use crate::camera::Camera;
use crate::config::{CombatConfig, MonsterConfig};
use crate::geom::circles_overlap;
use crate::monster::{Monster, MonsterKind};

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// -1.0 or 1.0
    pub dir: f32,
}

/// A monster killed by a projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub kind: MonsterKind,
    pub pos: Vec2,
    pub score: u32,
}

impl Projectile {
    /// Spawns just in front of the head, travelling the way the player faces.
    pub fn fire(head: Vec2, facing: f32, head_radius: f32) -> Self {
        Projectile { pos: Vec2::new(head.x + facing * (head_radius + 10.0), head.y), dir: facing }
    }

    pub fn advance(&mut self, dt: f32, speed: f32) {
        self.pos.x += self.dir * speed * dt;
    }
}

/// Moves every projectile and drops the ones that left the camera span.
pub fn advance_all(projectiles: &mut Vec<Projectile>, camera: &Camera, config: &CombatConfig, dt: f32) {
    let (min_x, max_x) = camera.x_span(config.projectile_margin);
    for p in projectiles.iter_mut() {
        p.advance(dt, config.projectile_speed);
    }
    projectiles.retain(|p| p.pos.x >= min_x && p.pos.x <= max_x);
}

/// Each projectile removes at most one monster it overlaps; both are consumed.
pub fn resolve_hits(
    projectiles: &mut Vec<Projectile>,
    monsters: &mut Vec<Monster>,
    combat: &CombatConfig,
    config: &MonsterConfig,
) -> Vec<Kill> {
    let mut kills = Vec::new();
    projectiles.retain(|p| {
        let hit = monsters
            .iter()
            .position(|m| circles_overlap(p.pos, combat.projectile_radius, m.pos, m.radius(config)));
        match hit {
            Some(idx) => {
                let m = monsters.remove(idx);
                kills.push(Kill { kind: m.kind, pos: m.pos, score: m.score(config) });
                false
            }
            None => true,
        }
    });
    kills
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    #[test]
    fn fire_offsets_by_facing() {
        let left = Projectile::fire(Vec2::new(500.0, 300.0), -1.0, 20.0);
        assert_eq!(left.pos, Vec2::new(470.0, 300.0));
        let right = Projectile::fire(Vec2::new(500.0, 300.0), 1.0, 20.0);
        assert_eq!(right.pos, Vec2::new(530.0, 300.0));
    }

    #[test]
    fn projectiles_outside_view_are_culled() {
        let camera = Camera::new(&CameraConfig::default());
        let combat = CombatConfig::default();
        let mut projectiles = vec![
            Projectile { pos: Vec2::new(1460.0, 0.0), dir: 1.0 },
            Projectile { pos: Vec2::new(700.0, 0.0), dir: 1.0 },
            Projectile { pos: Vec2::new(-95.0, 0.0), dir: -1.0 },
        ];
        advance_all(&mut projectiles, &camera, &combat, 0.1);
        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].pos.x, 760.0);
    }

    #[test]
    fn one_projectile_kills_one_monster() {
        let combat = CombatConfig::default();
        let config = MonsterConfig::default();
        let mut monsters = vec![
            Monster::new(MonsterKind::Basic, 500.0, 1.0, 0.0, 680.0, &config),
            Monster::new(MonsterKind::Basic, 505.0, 1.0, 0.0, 680.0, &config),
            Monster::new(MonsterKind::Tank, 1500.0, 1.0, 0.0, 680.0, &config),
        ];
        let mut projectiles = vec![
            Projectile { pos: Vec2::new(490.0, 630.0), dir: 1.0 },
            Projectile { pos: Vec2::new(900.0, 630.0), dir: 1.0 },
        ];
        let kills = resolve_hits(&mut projectiles, &mut monsters, &combat, &config);
        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].score, 1);
        assert_eq!(monsters.len(), 2);
        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].pos.x, 900.0);
    }
}
