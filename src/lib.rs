//! Pet Arena - real-time combat minigame engine for a virtual pet
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity stores, spawning, combat, game loop)
//! - `renderer`: Read-only presentation adapter (snapshots, placeholder colours)
//! - `stats`: Effective combat stats from attributes and equipment
//! - `rewards`: Run outcome to XP, coins and equipment drops
//! - `content`: Areas, equipment and characters supplied by the pet layer
//! - `tuning`: Data-driven game balance

pub mod content;
pub mod error;
pub mod renderer;
pub mod rewards;
pub mod sim;
pub mod stats;
pub mod tuning;

pub use error::ConfigError;
pub use rewards::{RewardBundle, RunResult};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Display-synchronised simulation rate
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions (screen space, y grows downward)
    pub const ARENA_WIDTH: f32 = 900.0;
    pub const ARENA_HEIGHT: f32 = 700.0;

    /// Entity sizes (diameters)
    pub const PLAYER_SIZE: f32 = 30.0;
    pub const MONSTER_SIZE: f32 = 25.0;
    pub const BOSS_SIZE: f32 = 40.0;

    /// Projectiles further than this outside the arena are expired
    pub const ARENA_MARGIN: f32 = 20.0;

    /// Spawn check cadence (100 ms)
    pub const SPAWN_CHECK_TICKS: u32 = 6;
    /// Run clock cadence (1 Hz)
    pub const CLOCK_TICKS: u32 = TICK_RATE;
}

/// Convert a millisecond duration to whole simulation ticks
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    (ms as f32 * consts::TICK_RATE as f32 / 1000.0).round() as u32
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Move `current` toward `target` by `factor` along the shortest arc
#[inline]
pub fn lerp_angle(current: f32, target: f32, factor: f32) -> f32 {
    let delta = normalize_angle(target - current);
    normalize_angle(current + delta * factor.clamp(0.0, 1.0))
}

/// Unit vector for a heading angle
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Heading angle of a vector
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(500), 30);
        assert_eq!(ms_to_ticks(100), 6);
        assert_eq!(ms_to_ticks(15_000), 900);
    }

    #[test]
    fn test_lerp_angle_takes_short_way() {
        // From just below +π to just above -π should cross the seam, not sweep through 0
        let from = PI - 0.1;
        let to = -PI + 0.1;
        let mid = lerp_angle(from, to, 0.5);
        assert!(mid.abs() > PI - 0.01);
    }

    #[test]
    fn test_lerp_angle_full_factor_snaps() {
        let result = lerp_angle(0.0, 1.0, 1.0);
        assert!((result - 1.0).abs() < 1e-5);
    }
}
