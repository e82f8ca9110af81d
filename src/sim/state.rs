//! Game state and core simulation types
//!
//! One explicit state struct owned by the loop. Every tick mutates it in
//! place; presentation only ever sees a copied snapshot.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::Effects;
use crate::consts::*;
use crate::content::{Area, Attributes, BossArchetype, EquippedItems, projectile_for_character};
use crate::error::{ConfigError, ConfigResult};
use crate::rewards::{RunResult, calculate_rewards};
use crate::stats::{attack_cooldown_ticks, effective_power};
use crate::tuning::Tuning;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Briefing shown, nothing simulated yet
    Ready,
    /// Active simulation
    Playing,
    /// Result available; terminal for this run
    Finished,
}

/// Four-way facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Quantise a heading (screen space, y down) to the closest axis
    pub fn from_angle(theta: f32) -> Self {
        let (sin, cos) = theta.sin_cos();
        if cos.abs() >= sin.abs() {
            if cos >= 0.0 { Direction::Right } else { Direction::Left }
        } else if sin > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    pub fn vector(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// The player-controlled pet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub pos: Vec2,
    pub facing: Direction,
    /// Smoothed aim heading (radians)
    pub aim: f32,
}

impl Avatar {
    pub fn start_position() -> Vec2 {
        Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT * 0.75)
    }

    pub fn radius(&self) -> f32 {
        PLAYER_SIZE / 2.0
    }
}

impl Default for Avatar {
    fn default() -> Self {
        Self {
            pos: Self::start_position(),
            facing: Direction::Up,
            aim: -std::f32::consts::FRAC_PI_2,
        }
    }
}

/// Which attacks a minion accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitRequirement {
    Any,
    Charged,
    Uncharged,
}

impl HitRequirement {
    pub fn admits(&self, charged: bool) -> bool {
        match self {
            HitRequirement::Any => true,
            HitRequirement::Charged => charged,
            HitRequirement::Uncharged => !charged,
        }
    }
}

/// Monster discriminator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MonsterKind {
    Regular,
    /// Triple health, double speed
    Elite,
    /// Summoned by a boss; removed when the boss dies
    Minion { requires: HitRequirement },
    Boss { archetype: BossArchetype },
}

/// Edge zone a monster entered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnSide {
    Top,
    Left,
    Right,
}

/// Damage-over-time debuff
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageOverTime {
    /// Damage per pulse
    pub damage: f32,
    /// Ticks until the debuff wears off
    pub remaining_ticks: u32,
    /// Ticks between pulses
    pub pulse_ticks: u32,
    /// Ticks since the last pulse
    pub pulse_timer: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub id: u32,
    pub kind: MonsterKind,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    /// Multiplier over the area's base monster speed
    pub speed_multiplier: f32,
    pub spawn_side: SpawnSide,
    /// Close enough to the avatar to attack (drives presentation)
    pub is_attacking: bool,
    pub dot: Option<DamageOverTime>,
}

impl Monster {
    pub fn new(id: u32, kind: MonsterKind, pos: Vec2, health: f32, spawn_side: SpawnSide) -> Self {
        Self {
            id,
            kind,
            pos,
            health,
            max_health: health,
            speed_multiplier: 1.0,
            spawn_side,
            is_attacking: false,
            dot: None,
        }
    }

    pub fn radius(&self) -> f32 {
        match self.kind {
            MonsterKind::Boss { .. } => BOSS_SIZE / 2.0,
            _ => MONSTER_SIZE / 2.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, MonsterKind::Boss { .. })
    }

    pub fn is_minion(&self) -> bool {
        matches!(self.kind, MonsterKind::Minion { .. })
    }

    /// Subtract damage, never leaving [0, max_health]; returns damage dealt
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
        before - self.health
    }
}

/// Script state for the boss currently alive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BossState {
    /// Charged hits landed on the shield since it last went up
    pub shield_hits: u32,
    pub vulnerable: bool,
    pub vulnerable_ticks: u32,
    /// Charged hits counted toward the next summon
    pub charged_hits: u32,
    /// A minion wave is alive
    pub minions_spawned: bool,
    pub phase: u32,
}

/// Character-bound projectile tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectileKind {
    #[default]
    Default,
    Waterball,
    Banana,
    Acorn,
    Boomerang,
}

/// Per-kind projectile state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    Plain,
    /// Debuffs the target and splashes its neighbours
    Waterball {
        splash_radius: f32,
        dot_damage: f32,
        dot_ticks: u32,
    },
    /// Splits into smaller shots on its first hit
    Banana { split_count: u32, has_split: bool },
    /// Hops to the next target after each hit
    Acorn { bounces_left: u32 },
    /// Arcs out, then homes back to the avatar
    Boomerang { returning: bool, outward_range: f32 },
}

impl Payload {
    pub fn kind(&self) -> ProjectileKind {
        match self {
            Payload::Plain => ProjectileKind::Default,
            Payload::Waterball { .. } => ProjectileKind::Waterball,
            Payload::Banana { .. } => ProjectileKind::Banana,
            Payload::Acorn { .. } => ProjectileKind::Acorn,
            Payload::Boomerang { .. } => ProjectileKind::Boomerang,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub traveled: f32,
    pub max_range: f32,
    pub damage: f32,
    /// Fired from a charge release
    pub charged: bool,
    pub charge_level: u32,
    pub piercing: bool,
    pub explosion_radius: Option<f32>,
    /// Monsters this projectile already struck
    pub hit: Vec<u32>,
    pub payload: Payload,
    pub expired: bool,
}

impl Projectile {
    pub fn kind(&self) -> ProjectileKind {
        self.payload.kind()
    }

    pub fn has_hit(&self, monster_id: u32) -> bool {
        self.hit.contains(&monster_id)
    }

    pub fn mark_hit(&mut self, monster_id: u32) {
        if !self.has_hit(monster_id) {
            self.hit.push(monster_id);
        }
    }
}

/// Active charge (attack held down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub held_ticks: u32,
    /// Heading at the moment charging began
    pub locked_aim: f32,
}

/// Everything the pet layer hands to a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub attributes: Attributes,
    #[serde(default)]
    pub equipped: EquippedItems,
    pub area: Area,
    /// Character id; decides the projectile kind
    #[serde(default)]
    pub character: Option<String>,
}

impl RunConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=10).contains(&self.area.difficulty) {
            return Err(ConfigError::Difficulty(self.area.difficulty));
        }
        Ok(())
    }

    pub fn projectile_kind(&self) -> ProjectileKind {
        projectile_for_character(self.character.as_deref())
    }
}

/// Notable things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    MonsterKilled { id: u32, boss: bool, score: u64 },
    LevelUp { level: u32 },
    BossSpawned { archetype: BossArchetype },
    BossVulnerable,
    BossShieldRestored,
    MinionWave { count: u32 },
    BossPhase { phase: u32 },
    BossDefeated,
    RunFinished { success: bool },
}

/// Fixed-period tick counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub period: u32,
    pub counter: u32,
}

impl Interval {
    pub fn new(period: u32) -> Self {
        Self {
            period: period.max(1),
            counter: 0,
        }
    }

    /// Advance one tick; true when the period elapses
    pub fn advance(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.period {
            self.counter = 0;
            true
        } else {
            false
        }
    }
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: RunConfig,
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub avatar: Avatar,
    /// Active monsters (spawn order)
    pub monsters: Vec<Monster>,
    /// In-flight projectiles (fire order)
    pub projectiles: Vec<Projectile>,
    /// Present exactly while a boss is alive
    pub boss: Option<BossState>,
    pub score: u64,
    pub kills: u32,
    /// Current level (1-based)
    pub level: u32,
    /// Ticks simulated since the run started
    pub elapsed_ticks: u64,
    /// Seconds on the run clock
    pub time_left: u32,
    pub clock: Interval,
    pub spawn_timer: Interval,
    /// Tick of the last regular spawn batch
    pub last_spawn_tick: u64,
    /// Ticks until the next auto-attack
    pub attack_cooldown: u32,
    pub charge: Option<Charge>,
    /// Latest pointer position
    pub aim_target: Option<Vec2>,
    pub boss_spawned: bool,
    pub boss_defeated: bool,
    /// Cosmetic particles and damage numbers (not gameplay-affecting)
    pub effects: Effects,
    pub events: Vec<GameEvent>,
    result: Option<RunResult>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// New run in the `Ready` phase with default tuning
    pub fn new(config: RunConfig, seed: u64) -> ConfigResult<Self> {
        Self::with_tuning(config, Tuning::default(), seed)
    }

    pub fn with_tuning(config: RunConfig, tuning: Tuning, seed: u64) -> ConfigResult<Self> {
        config.validate()?;
        tuning.validate()?;
        let time_left = tuning.run_duration_secs;
        Ok(Self {
            config,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Ready,
            avatar: Avatar::default(),
            monsters: Vec::new(),
            projectiles: Vec::new(),
            boss: None,
            score: 0,
            kills: 0,
            level: 1,
            elapsed_ticks: 0,
            time_left,
            clock: Interval::new(CLOCK_TICKS),
            spawn_timer: Interval::new(SPAWN_CHECK_TICKS),
            last_spawn_tick: 0,
            attack_cooldown: 0,
            charge: None,
            aim_target: None,
            boss_spawned: false,
            boss_defeated: false,
            effects: Effects::default(),
            events: Vec::new(),
            result: None,
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// `Ready` → `Playing`: reset the avatar, stores, score and clocks
    pub fn start(&mut self) {
        if self.phase != GamePhase::Ready {
            return;
        }
        self.avatar = Avatar::default();
        self.monsters.clear();
        self.projectiles.clear();
        self.boss = None;
        self.score = 0;
        self.kills = 0;
        self.level = 1;
        self.elapsed_ticks = 0;
        self.time_left = self.tuning.run_duration_secs;
        self.clock = Interval::new(CLOCK_TICKS);
        self.spawn_timer = Interval::new(SPAWN_CHECK_TICKS);
        self.last_spawn_tick = 0;
        self.attack_cooldown = 0;
        self.charge = None;
        self.aim_target = None;
        self.boss_spawned = false;
        self.boss_defeated = false;
        self.effects = Effects::default();
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::RunStarted);
        log::info!(
            "Run started in {} (difficulty {}, boss {:?}, seed {})",
            self.config.area.name,
            self.config.area.difficulty,
            self.config.area.boss,
            self.seed
        );
    }

    /// Abort the run: defeat, credit only for fully elapsed levels
    pub fn cancel(&mut self) {
        match self.phase {
            GamePhase::Finished => {}
            GamePhase::Ready => self.finish(false, 0),
            GamePhase::Playing => {
                let completed = self.level.saturating_sub(1);
                self.finish(false, completed);
            }
        }
    }

    /// Terminate the run and produce its result (once)
    pub(crate) fn finish(&mut self, success: bool, levels_completed: u32) {
        if self.phase == GamePhase::Finished {
            return;
        }
        self.charge = None;
        self.aim_target = None;
        self.boss = None;
        self.phase = GamePhase::Finished;

        let total_levels = self.tuning.max_level;
        let rewards = calculate_rewards(
            self.score,
            levels_completed,
            total_levels,
            self.config.area.difficulty,
            &self.tuning,
            &mut self.rng,
        );
        log::info!(
            "Run finished: success={} levels={}/{} score={} xp={} coins={} drop={:?}",
            success,
            levels_completed,
            total_levels,
            self.score,
            rewards.xp,
            rewards.coins,
            rewards.equipment.as_ref().map(|e| e.name.as_str())
        );
        self.result = Some(RunResult {
            success,
            levels_completed,
            total_levels,
            score: self.score,
            rewards,
        });
        self.events.push(GameEvent::RunFinished { success });
    }

    /// Result of a finished run
    pub fn result(&self) -> Option<&RunResult> {
        self.result.as_ref()
    }

    /// Hand the result to the progression layer; later calls return `None`
    pub fn take_result(&mut self) -> Option<RunResult> {
        self.result.take()
    }

    /// Drain events accumulated since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn boss_monster(&self) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.is_boss())
    }

    pub fn boss_alive(&self) -> bool {
        self.monsters.iter().any(|m| m.is_boss())
    }

    pub fn minions_alive(&self) -> usize {
        self.monsters.iter().filter(|m| m.is_minion() && m.is_alive()).count()
    }

    /// Current uncharged shot damage
    pub fn power(&self) -> f32 {
        effective_power(
            &self.config.attributes,
            &self.config.equipped.bonuses(),
            self.config.area.weakness,
            &self.tuning,
        ) as f32
    }

    /// Current auto-attack period in ticks
    pub fn cooldown_ticks(&self) -> u32 {
        attack_cooldown_ticks(&self.config.attributes, &self.config.equipped.bonuses(), &self.tuning)
    }

    /// Base movement speed for the area before per-monster multipliers
    pub fn monster_speed(&self) -> f32 {
        self.tuning.monster_base_speed
            + self.tuning.monster_speed_per_difficulty * self.config.area.difficulty as f32
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::content::find_area;

    pub(crate) fn config_for(area_id: &str) -> RunConfig {
        RunConfig {
            attributes: Attributes {
                speed: 10,
                wisdom: 10,
                strength: 10,
                clarity: 10,
            },
            equipped: EquippedItems::default(),
            area: find_area(area_id).unwrap(),
            character: None,
        }
    }

    #[test]
    fn test_new_state_is_ready_and_empty() {
        let state = GameState::new(config_for("ocean_1"), 1).unwrap();
        assert_eq!(state.phase, GamePhase::Ready);
        assert!(state.monsters.is_empty());
        assert!(state.projectiles.is_empty());
        assert!(state.result().is_none());
    }

    #[test]
    fn test_invalid_difficulty_rejected() {
        let mut config = config_for("ocean_1");
        config.area.difficulty = 0;
        assert!(matches!(GameState::new(config, 1), Err(ConfigError::Difficulty(0))));
    }

    #[test]
    fn test_start_resets() {
        let mut state = GameState::new(config_for("ocean_1"), 1).unwrap();
        state.score = 99;
        state.avatar.pos = Vec2::ZERO;
        state.start();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.avatar.pos, Avatar::start_position());
        assert_eq!(state.time_left, state.tuning.run_duration_secs);
    }

    #[test]
    fn test_cancel_gives_partial_credit_once() {
        let mut state = GameState::new(config_for("ocean_1"), 1).unwrap();
        state.start();
        state.level = 3;
        state.charge = Some(Charge {
            held_ticks: 10,
            locked_aim: 0.0,
        });
        state.cancel();
        assert_eq!(state.phase, GamePhase::Finished);
        assert!(state.charge.is_none());
        let result = state.take_result().unwrap();
        assert!(!result.success);
        assert_eq!(result.levels_completed, 2);
        // Finished is terminal: a second cancel produces nothing new
        state.cancel();
        assert!(state.take_result().is_none());
    }

    #[test]
    fn test_take_damage_clamps() {
        let mut monster = Monster::new(1, MonsterKind::Regular, Vec2::ZERO, 20.0, SpawnSide::Top);
        assert_eq!(monster.take_damage(25.0), 20.0);
        assert_eq!(monster.health, 0.0);
        assert_eq!(monster.take_damage(-5.0), 0.0);
    }

    #[test]
    fn test_direction_from_angle() {
        use std::f32::consts::FRAC_PI_2;
        assert_eq!(Direction::from_angle(0.0), Direction::Right);
        assert_eq!(Direction::from_angle(FRAC_PI_2), Direction::Down);
        assert_eq!(Direction::from_angle(-FRAC_PI_2), Direction::Up);
        assert_eq!(Direction::from_angle(3.0), Direction::Left);
    }

    #[test]
    fn test_interval_fires_on_period() {
        let mut interval = Interval::new(3);
        assert!(!interval.advance());
        assert!(!interval.advance());
        assert!(interval.advance());
        assert!(!interval.advance());
    }
}
