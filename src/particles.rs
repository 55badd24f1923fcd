//! Cosmetic particle bursts spawned by gameplay events.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::rng::SimpleRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Monster death.
    Spark,
    /// Player took a hit.
    Hurt,
    /// Dash start and landings.
    Dust,
}

impl ParticleKind {
    fn gravity(self) -> f32 {
        match self {
            ParticleKind::Spark => 400.0,
            ParticleKind::Hurt => 200.0,
            ParticleKind::Dust => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime in seconds.
    pub life: f32,
    pub max_life: f32,
    pub kind: ParticleKind,
}

impl Particle {
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// 0.0 when fresh, 1.0 when about to die.
    pub fn age(&self) -> f32 {
        if self.max_life > 0.0 { 1.0 - self.life / self.max_life } else { 1.0 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub count: usize,
    pub speed: (f32, f32),
    pub life: (f32, f32),
}

impl Burst {
    pub fn for_kind(kind: ParticleKind) -> Self {
        match kind {
            ParticleKind::Spark => Burst { count: 16, speed: (80.0, 260.0), life: (0.3, 0.7) },
            ParticleKind::Hurt => Burst { count: 12, speed: (60.0, 180.0), life: (0.4, 0.8) },
            ParticleKind::Dust => Burst { count: 6, speed: (20.0, 80.0), life: (0.15, 0.35) },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn burst(&mut self, origin: Vec2, kind: ParticleKind, rng: &mut SimpleRng) {
        let spec = Burst::for_kind(kind);
        self.particles.reserve(spec.count);
        for _ in 0..spec.count {
            let angle = rng.range_f32(0.0, TAU);
            let speed = rng.range_f32(spec.speed.0, spec.speed.1);
            let life = rng.range_f32(spec.life.0, spec.life.1);
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::from_angle(angle) * speed,
                life,
                max_life: life,
                kind,
            });
        }
    }

    pub fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.vel.y += p.kind.gravity() * dt;
            p.pos += p.vel * dt;
            p.life -= dt;
        }
        self.particles.retain(Particle::is_alive);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
