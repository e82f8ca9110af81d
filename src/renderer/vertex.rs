//! Vertex types for 2D rendering

use serde::Serialize;

/// Simple 2D vertex with position and color
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Placeholder colors for arena entities
pub mod colors {
    use crate::sim::{MonsterKind, ParticleKind, ProjectileKind};

    pub const BACKGROUND: [f32; 4] = [0.08, 0.1, 0.12, 1.0];
    pub const AVATAR: [f32; 4] = [0.3, 0.8, 1.0, 1.0];
    pub const AIM: [f32; 4] = [1.0, 1.0, 1.0, 0.6];
    pub const CHARGE: [f32; 4] = [1.0, 0.85, 0.2, 0.8];
    pub const MONSTER: [f32; 4] = [0.85, 0.25, 0.25, 1.0];
    pub const ELITE: [f32; 4] = [0.7, 0.2, 0.9, 1.0];
    pub const MINION: [f32; 4] = [0.95, 0.55, 0.3, 1.0];
    pub const BOSS: [f32; 4] = [0.5, 0.05, 0.1, 1.0];
    pub const SHIELD: [f32; 4] = [0.4, 0.7, 1.0, 0.7];
    pub const DOT: [f32; 4] = [0.2, 0.6, 1.0, 0.5];
    pub const HEALTH_BACK: [f32; 4] = [0.15, 0.15, 0.15, 0.9];
    pub const DAMAGE_TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const DAMAGE_TEXT_CRIT: [f32; 4] = [1.0, 0.8, 0.1, 1.0];

    pub fn monster(kind: MonsterKind) -> [f32; 4] {
        match kind {
            MonsterKind::Regular => MONSTER,
            MonsterKind::Elite => ELITE,
            MonsterKind::Minion { .. } => MINION,
            MonsterKind::Boss { .. } => BOSS,
        }
    }

    pub fn projectile(kind: ProjectileKind) -> [f32; 4] {
        match kind {
            ProjectileKind::Default => [1.0, 1.0, 0.6, 1.0],
            ProjectileKind::Waterball => [0.2, 0.5, 1.0, 1.0],
            ProjectileKind::Banana => [1.0, 0.9, 0.2, 1.0],
            ProjectileKind::Acorn => [0.6, 0.4, 0.2, 1.0],
            ProjectileKind::Boomerang => [0.3, 0.9, 0.4, 1.0],
        }
    }

    pub fn particle(kind: ParticleKind) -> [f32; 4] {
        match kind {
            ParticleKind::Spark => [1.0, 0.9, 0.6, 1.0],
            ParticleKind::Burst => [0.9, 0.3, 0.3, 1.0],
            ParticleKind::Explosion => [1.0, 0.5, 0.1, 1.0],
            ParticleKind::XpGem => [0.3, 1.0, 0.5, 1.0],
        }
    }
}
