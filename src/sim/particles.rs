//! Visual feedback particles
//!
//! Particles never affect gameplay. Alpha is derived from remaining life on
//! read and is not stored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use crate::consts::*;

/// Particle colour class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleTint {
    /// Obstacle impact
    Warning,
    /// Correct answer
    Success,
    /// Wrong answer
    Failure,
}

/// What produced a burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstKind {
    Impact,
    Bonus { correct: bool },
}

impl BurstKind {
    fn count(self) -> usize {
        match self {
            BurstKind::Impact => IMPACT_PARTICLES,
            BurstKind::Bonus { .. } => BONUS_PARTICLES,
        }
    }

    fn life(self) -> u32 {
        match self {
            BurstKind::Impact => IMPACT_LIFE,
            BurstKind::Bonus { .. } => BONUS_LIFE,
        }
    }

    /// (spread, upward bias)
    fn velocity(self) -> (f32, f32) {
        match self {
            BurstKind::Impact => (IMPACT_SPREAD, IMPACT_LIFT),
            BurstKind::Bonus { .. } => (BONUS_SPREAD, BONUS_LIFT),
        }
    }

    fn tint(self) -> ParticleTint {
        match self {
            BurstKind::Impact => ParticleTint::Warning,
            BurstKind::Bonus { correct: true } => ParticleTint::Success,
            BurstKind::Bonus { correct: false } => ParticleTint::Failure,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left
    pub life: u32,
    pub max_life: u32,
    pub tint: ParticleTint,
}

impl Particle {
    /// Render opacity in `[0, 1]`
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        (self.life as f32 / self.max_life as f32).clamp(0.0, 1.0)
    }
}

/// Live particle pool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a burst at `origin`
    pub fn emit(&mut self, kind: BurstKind, origin: Vec2, rng: &mut impl RandomSource) {
        let (spread, lift) = kind.velocity();
        for _ in 0..kind.count() {
            if self.particles.len() >= MAX_PARTICLES {
                // Evict oldest to make room
                self.particles.remove(0);
            }
            let vel = Vec2::new(rng.spread(spread), rng.spread(spread) - lift);
            self.particles.push(Particle {
                pos: origin,
                vel,
                life: kind.life(),
                max_life: kind.life(),
                tint: kind.tint(),
            });
        }
    }

    /// One frame of motion and ageing
    pub fn update(&mut self) {
        self.particles.retain_mut(|p| {
            p.pos += p.vel;
            p.vel.y += PARTICLE_GRAVITY;
            p.life = p.life.saturating_sub(1);
            p.life > 0
        });
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
