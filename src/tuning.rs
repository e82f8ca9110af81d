//! Data-driven game balance
//!
//! Every number the spawn director, combat resolver and reward calculator
//! read lives here. Durations are stored in milliseconds (as authored) and
//! converted to ticks on access. A JSON document only needs to name the
//! fields it overrides.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::ms_to_ticks;

/// Balance values for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Run structure ===
    /// Total run length in seconds
    pub run_duration_secs: u32,
    /// Length of one level in seconds
    pub level_duration_secs: u32,
    /// Number of levels; the last one spawns the boss
    pub max_level: u32,

    // === Avatar ===
    /// Avatar movement in pixels per tick
    pub avatar_speed: f32,
    /// Fraction of the remaining aim error closed each tick
    pub aim_smoothing: f32,

    // === Monsters ===
    pub monster_base_speed: f32,
    pub monster_speed_per_difficulty: f32,
    pub monster_base_health: f32,
    pub monster_health_per_level: f32,
    pub monster_health_per_difficulty: f32,
    pub elite_chance_per_level: f64,
    pub elite_health_multiplier: f32,
    pub elite_speed_multiplier: f32,
    pub minion_health: f32,
    pub minion_speed_multiplier: f32,

    // === Spawning ===
    pub spawn_delay_ms: u32,
    pub spawn_delay_step_ms: u32,
    pub spawn_delay_min_ms: u32,

    // === Attack ===
    pub base_power: u32,
    pub power_divisor: u32,
    pub attack_cooldown_ms: u32,
    pub cooldown_per_speed_ms: u32,
    pub min_attack_cooldown_ms: u32,
    pub projectile_speed: f32,
    pub attack_range: f32,

    // === Charge ===
    pub charge_threshold_ms: u32,
    pub charge_interval_ms: u32,
    pub max_charge_level: u32,
    /// Extra range per charge level (fraction of base range)
    pub charge_range_step: f32,
    /// Charge level at which shots start piercing
    pub charge_pierce_level: u32,
    /// Explosion radius granted at max charge
    pub charge_explosion_radius: f32,

    // === Projectile kinds ===
    pub dot_damage_fraction: f32,
    pub dot_pulse_ms: u32,
    pub dot_duration_ms: u32,
    pub splash_radius: f32,
    pub splash_damage_fraction: f32,
    pub split_count: u32,
    pub split_damage_fraction: f32,
    pub split_range: f32,
    pub max_bounces: u32,
    pub bounce_radius: f32,
    pub boomerang_capture_radius: f32,
    /// Heading change per tick on the outward leg (radians)
    pub boomerang_curve: f32,

    // === Bosses ===
    pub shielded_boss_health: f32,
    pub summoner_boss_health: f32,
    pub wave_gated_boss_health: f32,
    pub brute_boss_health: f32,
    /// Boss health multiplier added per point of area difficulty
    pub boss_difficulty_scale: f32,
    pub boss_speed_multiplier: f32,
    pub shield_hit_threshold: u32,
    pub vulnerable_ms: u32,
    pub summoner_charged_hits: u32,
    pub summoner_minion_count: u32,
    /// Health fraction at which the wave-gated boss locks down
    pub wave_gate_fraction: f32,
    pub wave_gate_minion_count: u32,

    // === Score and rewards ===
    pub kill_score: u64,
    pub xp_per_level: u64,
    pub coins_per_level: u64,
    pub equipment_base_chance: f64,
    pub equipment_chance_per_difficulty: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            run_duration_secs: 180,
            level_duration_secs: 30,
            max_level: 6,

            avatar_speed: 4.0,
            aim_smoothing: 0.2,

            monster_base_speed: 1.0,
            monster_speed_per_difficulty: 0.2,
            monster_base_health: 20.0,
            monster_health_per_level: 10.0,
            monster_health_per_difficulty: 5.0,
            elite_chance_per_level: 0.04,
            elite_health_multiplier: 3.0,
            elite_speed_multiplier: 2.0,
            minion_health: 15.0,
            minion_speed_multiplier: 1.2,

            spawn_delay_ms: 2000,
            spawn_delay_step_ms: 250,
            spawn_delay_min_ms: 600,

            base_power: 10,
            power_divisor: 5,
            attack_cooldown_ms: 500,
            cooldown_per_speed_ms: 5,
            min_attack_cooldown_ms: 150,
            projectile_speed: 8.0,
            attack_range: 300.0,

            charge_threshold_ms: 500,
            charge_interval_ms: 500,
            max_charge_level: 3,
            charge_range_step: 0.25,
            charge_pierce_level: 2,
            charge_explosion_radius: 60.0,

            dot_damage_fraction: 0.2,
            dot_pulse_ms: 500,
            dot_duration_ms: 3000,
            splash_radius: 60.0,
            splash_damage_fraction: 0.5,
            split_count: 5,
            split_damage_fraction: 0.4,
            split_range: 120.0,
            max_bounces: 3,
            bounce_radius: 200.0,
            boomerang_capture_radius: 25.0,
            boomerang_curve: 0.02,

            shielded_boss_health: 400.0,
            summoner_boss_health: 600.0,
            wave_gated_boss_health: 800.0,
            brute_boss_health: 500.0,
            boss_difficulty_scale: 0.5,
            boss_speed_multiplier: 0.6,
            shield_hit_threshold: 3,
            vulnerable_ms: 15_000,
            summoner_charged_hits: 3,
            summoner_minion_count: 8,
            wave_gate_fraction: 0.6,
            wave_gate_minion_count: 15,

            kill_score: 10,
            xp_per_level: 50,
            coins_per_level: 20,
            equipment_base_chance: 0.3,
            equipment_chance_per_difficulty: 0.05,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> ConfigResult<()> {
        fn reject(field: &'static str, reason: &'static str) -> ConfigResult<()> {
            Err(ConfigError::Tuning { field, reason })
        }

        if self.max_level == 0 {
            return reject("max_level", "must be at least 1");
        }
        if self.level_duration_secs == 0 {
            return reject("level_duration_secs", "must be positive");
        }
        if self.run_duration_secs < self.level_duration_secs {
            return reject("run_duration_secs", "must cover at least one level");
        }
        let final_level_start = (self.max_level as u64 - 1) * self.level_duration_secs as u64;
        if final_level_start >= self.run_duration_secs as u64 {
            return reject("max_level", "final level must start before the run ends");
        }
        if self.max_charge_level == 0 {
            return reject("max_charge_level", "must be at least 1");
        }
        if ms_to_ticks(self.charge_interval_ms) == 0 {
            return reject("charge_interval_ms", "must last at least one tick");
        }
        if ms_to_ticks(self.dot_pulse_ms) == 0 {
            return reject("dot_pulse_ms", "must last at least one tick");
        }
        if ms_to_ticks(self.min_attack_cooldown_ms) == 0 {
            return reject("min_attack_cooldown_ms", "must last at least one tick");
        }
        if self.power_divisor == 0 {
            return reject("power_divisor", "must be positive");
        }
        if self.projectile_speed <= 0.0 {
            return reject("projectile_speed", "must be positive");
        }
        if self.shield_hit_threshold == 0 || self.summoner_charged_hits == 0 {
            return reject("shield_hit_threshold", "boss hit thresholds must be positive");
        }
        if !(0.0..1.0).contains(&self.wave_gate_fraction) {
            return reject("wave_gate_fraction", "must be in [0, 1)");
        }
        if !(0.0..=1.0).contains(&self.aim_smoothing) {
            return reject("aim_smoothing", "must be in [0, 1]");
        }
        Ok(())
    }

    pub fn run_ticks(&self) -> u64 {
        self.run_duration_secs as u64 * crate::consts::TICK_RATE as u64
    }

    pub fn level_ticks(&self) -> u64 {
        self.level_duration_secs as u64 * crate::consts::TICK_RATE as u64
    }

    pub fn charge_threshold_ticks(&self) -> u32 {
        ms_to_ticks(self.charge_threshold_ms)
    }

    pub fn charge_interval_ticks(&self) -> u32 {
        ms_to_ticks(self.charge_interval_ms).max(1)
    }

    pub fn vulnerable_ticks(&self) -> u32 {
        ms_to_ticks(self.vulnerable_ms)
    }

    pub fn dot_pulse_ticks(&self) -> u32 {
        ms_to_ticks(self.dot_pulse_ms).max(1)
    }

    pub fn dot_duration_ticks(&self) -> u32 {
        ms_to_ticks(self.dot_duration_ms)
    }

    /// Delay between spawn batches at the given level (1-based)
    pub fn spawn_delay_ticks(&self, level: u32) -> u32 {
        let delay = self
            .spawn_delay_ms
            .saturating_sub(self.spawn_delay_step_ms.saturating_mul(level))
            .max(self.spawn_delay_min_ms);
        ms_to_ticks(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "shield_hit_threshold": 5 }"#).unwrap();
        assert_eq!(tuning.shield_hit_threshold, 5);
        assert_eq!(tuning.max_level, Tuning::default().max_level);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_levels_rejected() {
        let err = Tuning::from_json(r#"{ "max_level": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Tuning { field: "max_level", .. }));
    }

    #[test]
    fn test_unreachable_final_level_rejected() {
        // 9 levels of 30 s before the last one, longer than the 180 s run
        let err = Tuning::from_json(r#"{ "max_level": 10 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Tuning { field: "max_level", .. }));

        // Final level starting exactly at the end leaves no time for the boss
        let err = Tuning::from_json(r#"{ "max_level": 7 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Tuning { field: "max_level", .. }));

        let tuning = Tuning::from_json(r#"{ "max_level": 10, "run_duration_secs": 300 }"#).unwrap();
        assert_eq!(tuning.max_level, 10);
    }

    #[test]
    fn test_spawn_delay_shrinks_and_floors() {
        let tuning = Tuning::default();
        assert!(tuning.spawn_delay_ticks(2) < tuning.spawn_delay_ticks(1));
        // 2000 - 250 * 10 saturates, floored at 600 ms
        assert_eq!(tuning.spawn_delay_ticks(10), ms_to_ticks(600));
    }
}
