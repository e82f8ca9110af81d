//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order for monsters, fire order for projectiles)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod combat;
pub mod effects;
pub mod spawn;
pub mod state;
pub mod tick;

pub use combat::Contact;
pub use effects::{DamageNumber, Effects, Particle, ParticleKind};
pub use state::{
    Avatar, BossState, Charge, DamageOverTime, Direction, GameEvent, GamePhase, GameState,
    HitRequirement, Interval, Monster, MonsterKind, Payload, Projectile, ProjectileKind, RunConfig,
    SpawnSide,
};
pub use tick::{TickInput, charge_level, tick};
