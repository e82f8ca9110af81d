//! Spawn director
//!
//! Decides when regular batches arrive, rolls elites, and owns the one-time
//! boss trigger plus the minion waves bosses call in. Reads area and tuning
//! data but never changes them.

use glam::Vec2;
use rand::Rng;

use super::collision::clamp_to_arena;
use super::state::{
    BossState, GameEvent, GameState, HitRequirement, Monster, MonsterKind, SpawnSide,
};
use crate::consts::*;
use crate::content::BossArchetype;

/// Monsters per regular batch at a level
pub fn batch_size(level: u32) -> u32 {
    match level {
        0..=2 => 2,
        3..=4 => 3,
        _ => 4,
    }
}

/// Health of a regular monster at a level
pub fn regular_health(state: &GameState, level: u32) -> f32 {
    let t = &state.tuning;
    t.monster_base_health
        + t.monster_health_per_level * level as f32
        + t.monster_health_per_difficulty * state.config.area.difficulty as f32
}

/// Boss health for the run's archetype and difficulty
pub fn boss_health(state: &GameState) -> f32 {
    let t = &state.tuning;
    let base = match state.config.area.boss {
        BossArchetype::Shielded => t.shielded_boss_health,
        BossArchetype::Summoner => t.summoner_boss_health,
        BossArchetype::WaveGated => t.wave_gated_boss_health,
        BossArchetype::Brute => t.brute_boss_health,
    };
    base * (1.0 + t.boss_difficulty_scale * state.config.area.difficulty as f32)
}

/// Runs on the spawn-check cadence
///
/// Spawns the boss once on entering the final level, holds regular spawns
/// while it lives, and otherwise releases a batch whenever the level's
/// spawn delay has passed.
pub fn spawn_check(state: &mut GameState) {
    let final_level = state.level >= state.tuning.max_level;

    if final_level && !state.boss_spawned && !state.boss_alive() {
        spawn_boss(state);
        return;
    }
    if state.boss_alive() || (final_level && !state.boss_defeated) {
        return;
    }

    let delay = state.tuning.spawn_delay_ticks(state.level) as u64;
    if state.elapsed_ticks.saturating_sub(state.last_spawn_tick) < delay {
        return;
    }
    state.last_spawn_tick = state.elapsed_ticks;

    let count = batch_size(state.level);
    for _ in 0..count {
        spawn_regular(state);
    }
    log::debug!(
        "Level {}: spawned {} monsters ({} alive)",
        state.level,
        count,
        state.monsters.len()
    );
}

fn edge_position(side: SpawnSide, rng: &mut impl Rng) -> Vec2 {
    let r = MONSTER_SIZE / 2.0;
    match side {
        SpawnSide::Top => Vec2::new(rng.random_range(MONSTER_SIZE..ARENA_WIDTH - MONSTER_SIZE), r),
        SpawnSide::Left => Vec2::new(r, rng.random_range(MONSTER_SIZE..ARENA_HEIGHT * 0.6)),
        SpawnSide::Right => {
            Vec2::new(ARENA_WIDTH - r, rng.random_range(MONSTER_SIZE..ARENA_HEIGHT * 0.6))
        }
    }
}

/// Spawn one regular (possibly elite) monster on a random edge
pub fn spawn_regular(state: &mut GameState) {
    let side = match state.rng.random_range(0..3) {
        0 => SpawnSide::Top,
        1 => SpawnSide::Left,
        _ => SpawnSide::Right,
    };
    let pos = edge_position(side, &mut state.rng);

    let elite_chance = (state.tuning.elite_chance_per_level * state.level as f64).clamp(0.0, 1.0);
    let elite = state.rng.random_bool(elite_chance);

    let mut health = regular_health(state, state.level);
    let mut kind = MonsterKind::Regular;
    let mut speed_multiplier = 1.0;
    if elite {
        health *= state.tuning.elite_health_multiplier;
        speed_multiplier = state.tuning.elite_speed_multiplier;
        kind = MonsterKind::Elite;
    }

    let id = state.next_entity_id();
    let mut monster = Monster::new(id, kind, pos, health, side);
    monster.speed_multiplier = speed_multiplier;
    state.monsters.push(monster);
}

/// Spawn the final-level boss (at most once per run)
pub fn spawn_boss(state: &mut GameState) {
    if state.boss_spawned {
        return;
    }
    let archetype = state.config.area.boss;
    let health = boss_health(state);
    let id = state.next_entity_id();
    let pos = Vec2::new(ARENA_WIDTH / 2.0, BOSS_SIZE);
    let mut boss = Monster::new(id, MonsterKind::Boss { archetype }, pos, health, SpawnSide::Top);
    boss.speed_multiplier = state.tuning.boss_speed_multiplier;

    state.monsters.push(boss);
    state.boss = Some(BossState::default());
    state.boss_spawned = true;
    state.events.push(GameEvent::BossSpawned { archetype });
    log::info!("Boss spawned: {:?} with {:.0} health", archetype, health);
}

/// Requirement of the n-th minion for an archetype
fn minion_requirement(archetype: BossArchetype, index: u32) -> HitRequirement {
    match archetype {
        BossArchetype::Summoner => HitRequirement::Uncharged,
        BossArchetype::WaveGated if index % 3 == 2 => HitRequirement::Charged,
        _ => HitRequirement::Any,
    }
}

/// Ring of minions around the boss
pub fn spawn_minion_wave(state: &mut GameState, count: u32) {
    let Some((center, archetype)) = state.boss_monster().and_then(|b| match b.kind {
        MonsterKind::Boss { archetype } => Some((b.pos, archetype)),
        _ => None,
    }) else {
        return;
    };

    let ring = BOSS_SIZE * 2.0;
    for i in 0..count {
        let angle = std::f32::consts::TAU * i as f32 / count.max(1) as f32;
        let pos = clamp_to_arena(
            center + Vec2::new(angle.cos(), angle.sin()) * ring,
            MONSTER_SIZE / 2.0,
        );
        let side = if pos.x < ARENA_WIDTH / 3.0 {
            SpawnSide::Left
        } else if pos.x > ARENA_WIDTH * 2.0 / 3.0 {
            SpawnSide::Right
        } else {
            SpawnSide::Top
        };
        let id = state.next_entity_id();
        let requires = minion_requirement(archetype, i);
        let mut minion = Monster::new(
            id,
            MonsterKind::Minion { requires },
            pos,
            state.tuning.minion_health,
            side,
        );
        minion.speed_multiplier = state.tuning.minion_speed_multiplier;
        state.monsters.push(minion);
    }

    if let Some(boss) = state.boss.as_mut() {
        boss.minions_spawned = true;
    }
    state.events.push(GameEvent::MinionWave { count });
    log::debug!("{:?} boss summoned {} minions", archetype, count);
}
