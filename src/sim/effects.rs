//! Cosmetic particles and floating damage numbers
//!
//! Visual only: nothing here feeds back into gameplay, and the spread comes
//! from a hash of the tick counter so the gameplay RNG stream stays untouched.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;
/// Maximum floating damage numbers
pub const MAX_DAMAGE_NUMBERS: usize = 64;

/// Particle styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Spark,
    Burst,
    Explosion,
    XpGem,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ParticleKind,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageNumber {
    pub pos: Vec2,
    pub vel: Vec2,
    pub amount: u32,
    /// Charged hits are drawn larger
    pub critical: bool,
    pub life: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub damage_numbers: Vec<DamageNumber>,
}

/// Cheap deterministic 0-1 value
fn unit_hash(seed: u32, i: u32) -> f32 {
    let hash = seed.wrapping_mul(2654435761).wrapping_add(i.wrapping_mul(7919));
    (hash % 1000) as f32 / 1000.0
}

impl Effects {
    fn push_particle(&mut self, particle: Particle) {
        if self.particles.len() >= MAX_PARTICLES {
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    /// Radial ring of particles
    fn ring(&mut self, pos: Vec2, kind: ParticleKind, count: u32, speed: f32, seed: u32) {
        for i in 0..count {
            let angle = std::f32::consts::TAU * i as f32 / count as f32
                + (unit_hash(seed, i) - 0.5) * 0.5;
            let speed = speed * (0.6 + unit_hash(seed, i + count) * 0.8);
            self.push_particle(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                kind,
                life: 1.0,
                size: 2.0 + unit_hash(seed, i + 2 * count) * 3.0,
            });
        }
    }

    pub fn hit_sparks(&mut self, pos: Vec2, seed: u32) {
        self.ring(pos, ParticleKind::Spark, 6, 120.0, seed);
    }

    pub fn death_burst(&mut self, pos: Vec2, seed: u32) {
        self.ring(pos, ParticleKind::Burst, 12, 180.0, seed);
        self.push_particle(Particle {
            pos,
            vel: Vec2::new((unit_hash(seed, 99) - 0.5) * 120.0, -150.0),
            kind: ParticleKind::XpGem,
            life: 1.0,
            size: 8.0,
        });
    }

    pub fn explosion(&mut self, pos: Vec2, seed: u32) {
        self.ring(pos, ParticleKind::Explosion, 20, 240.0, seed);
    }

    pub fn damage_number(&mut self, pos: Vec2, amount: f32, critical: bool, seed: u32) {
        if self.damage_numbers.len() >= MAX_DAMAGE_NUMBERS {
            self.damage_numbers.remove(0);
        }
        self.damage_numbers.push(DamageNumber {
            pos,
            vel: Vec2::new((unit_hash(seed, 7) - 0.5) * 120.0, -180.0),
            amount: amount.round().max(0.0) as u32,
            critical,
            life: 1.0,
        });
    }

    /// Integrate and age everything, dropping what has faded
    pub fn update(&mut self, dt: f32) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel * dt;
            particle.vel.y += 540.0 * dt; // Gravity
            particle.life -= dt * 1.2;
        }
        self.particles.retain(|p| p.life > 0.0);

        for number in self.damage_numbers.iter_mut() {
            number.pos += number.vel * dt;
            number.life -= dt * 0.9;
        }
        self.damage_numbers.retain(|n| n.life > 0.0);
    }
}
