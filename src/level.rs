//! Course layouts: built-in levels, JSON level sets and static validation.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{GameError, Result};
use crate::geom::Rect;
use crate::monster::MonsterKind;

fn default_world_width() -> f32 { 3000.0 }
fn default_ground_y() -> f32 { 680.0 }
fn default_true() -> bool { true }
fn default_max_monsters() -> usize { 3 }
fn default_kinds() -> Vec<MonsterKind> { vec![MonsterKind::Basic] }
fn default_spawn_range() -> [f32; 2] { [100.0, 2500.0] }
fn default_patrol_range() -> [f32; 2] { [50.0, 2500.0] }

/// A single course: ground line, one-way platforms, spawn point and goal door.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    #[serde(default = "default_world_width")]
    pub world_width: f32,
    #[serde(default = "default_ground_y")]
    pub ground_y: f32,
    /// Without solid ground the bottom is a pit.
    #[serde(default = "default_true")]
    pub solid_ground: bool,
    pub spawn: Vec2,
    pub goal: Rect,
    pub platforms: Vec<Rect>,
    #[serde(default = "default_max_monsters")]
    pub max_monsters: usize,
    #[serde(default = "default_kinds")]
    pub monster_kinds: Vec<MonsterKind>,
    #[serde(default = "default_spawn_range")]
    pub spawn_range: [f32; 2],
    #[serde(default = "default_patrol_range")]
    pub patrol_range: [f32; 2],
}

#[derive(Debug, Serialize, Deserialize)]
struct LevelFile {
    levels: Vec<Level>,
}

/// Something the player can stand on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub left: f32,
    pub right: f32,
    pub top: f32,
}

fn course_platforms() -> Vec<Rect> {
    vec![
        Rect::new(100.0, 560.0, 200.0, 20.0),
        Rect::new(380.0, 480.0, 180.0, 20.0),
        Rect::new(620.0, 420.0, 160.0, 20.0),
        Rect::new(860.0, 360.0, 140.0, 20.0),
        Rect::new(1060.0, 300.0, 180.0, 20.0),
        Rect::new(1300.0, 200.0, 250.0, 20.0),
        Rect::new(1600.0, 150.0, 300.0, 20.0),
        Rect::new(2000.0, 120.0, 400.0, 20.0),
    ]
}

/// The two stock courses: a basic-monster warm-up and the mixed-monster run.
pub fn builtin_levels() -> Vec<Level> {
    let spawn = Vec2::new(683.0, 590.0);
    vec![
        Level {
            name: "Warm-up".to_string(),
            world_width: default_world_width(),
            ground_y: default_ground_y(),
            solid_ground: true,
            spawn,
            goal: Rect::new(2300.0, 40.0, 40.0, 80.0),
            platforms: course_platforms(),
            max_monsters: 3,
            monster_kinds: vec![MonsterKind::Basic],
            spawn_range: default_spawn_range(),
            patrol_range: default_patrol_range(),
        },
        Level {
            name: "Monster Run".to_string(),
            world_width: default_world_width(),
            ground_y: default_ground_y(),
            solid_ground: true,
            spawn,
            goal: Rect::new(2300.0, 20.0, 80.0, 100.0),
            platforms: course_platforms(),
            max_monsters: 5,
            monster_kinds: vec![MonsterKind::Basic, MonsterKind::Flyer, MonsterKind::Tank],
            spawn_range: default_spawn_range(),
            patrol_range: default_patrol_range(),
        },
    ]
}

/// Parses a `{ "levels": [...] }` document and rejects malformed courses.
pub fn parse_levels(json: &str) -> Result<Vec<Level>> {
    let file: LevelFile = serde_json::from_str(json)?;
    if file.levels.is_empty() {
        return Err(GameError::NoLevels);
    }
    for level in &file.levels {
        level.check_structure()?;
    }
    Ok(file.levels)
}

pub fn load_levels(path: impl AsRef<Path>) -> Result<Vec<Level>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| GameError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let levels = parse_levels(&json)?;
    log::info!("loaded {} level(s) from {}", levels.len(), path.display());
    Ok(levels)
}

impl Level {
    fn invalid(&self, reason: impl Into<String>) -> GameError {
        GameError::InvalidLevel { name: self.name.clone(), reason: reason.into() }
    }

    /// Errors that make the level unplayable regardless of tuning.
    pub fn check_structure(&self) -> Result<()> {
        if self.world_width <= 0.0 {
            return Err(self.invalid("world width must be positive"));
        }
        if self.goal.w <= 0.0 || self.goal.h <= 0.0 {
            return Err(self.invalid("goal has no area"));
        }
        if let Some(i) = self.platforms.iter().position(|p| p.w <= 0.0 || p.h <= 0.0) {
            return Err(self.invalid(format!("platform {i} has no area")));
        }
        if self.spawn.x < 0.0 || self.spawn.x > self.world_width {
            return Err(self.invalid("spawn point is outside the world"));
        }
        if self.max_monsters > 0 && self.monster_kinds.is_empty() {
            return Err(self.invalid("monsters enabled but no kinds listed"));
        }
        if self.spawn_range[0] > self.spawn_range[1] || self.patrol_range[0] > self.patrol_range[1] {
            return Err(self.invalid("monster range is inverted"));
        }
        Ok(())
    }

    /// Standing surfaces; solid ground comes first when present.
    pub fn surfaces(&self) -> Vec<Surface> {
        let ground = self.solid_ground.then_some(Surface {
            left: 0.0,
            right: self.world_width,
            top: self.ground_y,
        });
        ground
            .into_iter()
            .chain(self.platforms.iter().map(|p| Surface { left: p.left(), right: p.right(), top: p.top() }))
            .collect()
    }

    /// Below this y the player has fallen out of the level.
    pub fn kill_y(&self, fall_limit: f32) -> f32 {
        let lowest = self.platforms.iter().map(Rect::bottom).fold(self.ground_y, f32::max);
        lowest + fall_limit
    }

    /// Lowest `top` a surface can have and still hold the player below the ceiling.
    pub fn min_standing_top(config: &Config) -> f32 {
        config.player.feet_offset() + config.player.head_radius
    }

    /// The surface a player dropped at the spawn point lands on.
    fn start_surface(&self, surfaces: &[Surface], config: &Config) -> Option<usize> {
        let feet = self.spawn.y + config.player.feet_offset();
        let margin = config.physics.platform_margin;
        let snap = config.physics.platform_snap;
        surfaces
            .iter()
            .enumerate()
            .filter(|(_, s)| s.left - margin < self.spawn.x && self.spawn.x < s.right + margin)
            .filter(|(_, s)| s.top >= feet - snap)
            .min_by(|(_, a), (_, b)| a.top.total_cmp(&b.top))
            .map(|(i, _)| i)
    }

    /// Marks every surface reachable from the spawn by walking, falling and jumping.
    pub fn reachable_surfaces(&self, config: &Config) -> Vec<bool> {
        let surfaces = self.surfaces();
        let mut visited = vec![false; surfaces.len()];
        let Some(start) = self.start_surface(&surfaces, config) else {
            return visited;
        };

        let margin = config.physics.platform_margin;
        let min_top = Self::min_standing_top(config);
        let mut queue = VecDeque::new();
        visited[start] = true;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let from = surfaces[current];
            for (next, to) in surfaces.iter().enumerate() {
                if visited[next] || to.top < min_top {
                    continue;
                }
                let Some(reach) = config.physics.jump_reach(from.top - to.top) else {
                    continue;
                };
                let gap = (to.left - from.right).max(from.left - to.right) - 2.0 * margin;
                if gap.max(0.0) <= reach {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }
        visited
    }

    /// True if the head can touch the goal from some reachable surface.
    pub fn goal_reachable(&self, config: &Config) -> bool {
        let head = config.player.head_radius;
        let feet = config.player.feet_offset();
        let margin = config.physics.platform_margin;
        let jump = config.physics.jump_height();

        self.surfaces()
            .iter()
            .zip(self.reachable_surfaces(config))
            .filter(|(_, reachable)| *reachable)
            .any(|(s, _)| {
                let x_overlap = self.goal.left() < s.right + margin + head && self.goal.right() > s.left - margin - head;
                let head_low = s.top - feet + head;
                let head_high = s.top - feet - head - jump;
                x_overlap && self.goal.top() < head_low && self.goal.bottom() > head_high
            })
    }

    /// Human-readable problems, empty when the level is sound.
    pub fn validate(&self, config: &Config) -> Vec<String> {
        let mut issues = Vec::new();
        if let Err(e) = self.check_structure() {
            issues.push(e.to_string());
            return issues;
        }
        let surfaces = self.surfaces();
        if self.start_surface(&surfaces, config).is_none() {
            issues.push("spawn point is above no surface".to_string());
        }
        let reachable = self.reachable_surfaces(config);
        let offset = usize::from(self.solid_ground);
        let min_top = Self::min_standing_top(config);
        for (i, ok) in reachable.iter().enumerate().skip(offset) {
            if surfaces[i].top < min_top {
                issues.push(format!("platform {} is too close to the ceiling to stand on", i - offset));
            } else if !ok {
                issues.push(format!("platform {} is unreachable", i - offset));
            }
        }
        if !self.goal_reachable(config) {
            issues.push("goal cannot be reached".to_string());
        }
        issues
    }
}
