//! Fixed timestep simulation tick
//!
//! Core game loop that advances a run deterministically, one step per call.

use glam::Vec2;

use super::autopilot;
use super::collision::clamp_to_arena;
use super::combat::{apply_damage_over_time, fire, resolve_deaths, resolve_projectiles, tick_boss_timers};
use super::spawn::spawn_check;
use super::state::{BossState, Charge, Direction, GameEvent, GamePhase, GameState, MonsterKind};
use crate::consts::*;
use crate::content::BossArchetype;
use crate::tuning::Tuning;
use crate::{angle_of, lerp_angle};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement directions; opposite keys cancel
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Latest pointer position in arena coordinates
    pub aim_target: Option<Vec2>,
    /// Attack went down this tick (begin charge)
    pub attack_pressed: bool,
    /// Attack came up this tick (resolve charge)
    pub attack_released: bool,
    /// Abort the run
    pub cancel: bool,
    /// Idle/demo mode - AI plays the run
    pub idle_mode: bool,
}

impl TickInput {
    /// Movement direction, normalised so diagonals are not faster
    pub fn movement(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Charge level reached after holding for `held_ticks`
///
/// Zero below the threshold, then one level per interval, capped.
pub fn charge_level(held_ticks: u32, tuning: &Tuning) -> u32 {
    let threshold = tuning.charge_threshold_ticks();
    if held_ticks < threshold {
        return 0;
    }
    let interval = tuning.charge_interval_ticks().max(1);
    (1 + (held_ticks - threshold) / interval).min(tuning.max_charge_level)
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.cancel {
        state.cancel();
        return;
    }
    if state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot::drive(state, &mut input);
    }
    let input = &input;

    state.elapsed_ticks += 1;

    // 1. Aim and facing
    update_aim(state, input);

    // 2. Movement
    let step = input.movement() * state.tuning.avatar_speed;
    state.avatar.pos = clamp_to_arena(state.avatar.pos + step, state.avatar.radius());

    // 3. Charge and auto-attack
    update_attack(state, input);

    // 4. Boss vulnerability window
    tick_boss_timers(state);

    // 5. Monsters close in, debuffs pulse
    move_monsters(state);
    apply_damage_over_time(state);
    resolve_deaths(state);

    // 6. Projectiles
    resolve_projectiles(state);

    // 7. Purge
    resolve_deaths(state);

    // 8. Level clock and spawning
    update_level(state);
    if state.spawn_timer.advance() {
        spawn_check(state);
    }

    state.effects.update(dt);

    if state.clock.advance() {
        state.time_left = state.time_left.saturating_sub(1);
        if state.time_left == 0 {
            end_of_run(state);
        }
    }
}

fn update_aim(state: &mut GameState, input: &TickInput) {
    if input.aim_target.is_some() {
        state.aim_target = input.aim_target;
    }
    let target = match state.aim_target {
        Some(point) if point != state.avatar.pos => Some(angle_of(point - state.avatar.pos)),
        _ => {
            let movement = input.movement();
            (movement != Vec2::ZERO).then(|| angle_of(movement))
        }
    };
    if let Some(target) = target {
        state.avatar.aim = lerp_angle(state.avatar.aim, target, state.tuning.aim_smoothing);
    }
    state.avatar.facing = Direction::from_angle(state.avatar.aim);
}

fn update_attack(state: &mut GameState, input: &TickInput) {
    if input.attack_pressed && state.charge.is_none() {
        state.charge = Some(Charge {
            held_ticks: 0,
            locked_aim: state.avatar.aim,
        });
    } else if let Some(charge) = state.charge.as_mut() {
        charge.held_ticks += 1;
    }

    // Release without a charge in progress does nothing
    if input.attack_released {
        if let Some(charge) = state.charge.take() {
            let level = charge_level(charge.held_ticks, &state.tuning);
            if level > 0 {
                fire(state, charge.locked_aim, level);
                state.attack_cooldown = state.cooldown_ticks();
            }
        }
    }

    state.attack_cooldown = state.attack_cooldown.saturating_sub(1);
    if state.charge.is_none() && state.attack_cooldown == 0 {
        let aim = state.avatar.aim;
        fire(state, aim, 0);
        state.attack_cooldown = state.cooldown_ticks();
    }
}

/// Whether the boss script pins the boss in place
fn boss_holds_position(archetype: BossArchetype, boss: Option<&BossState>) -> bool {
    let Some(boss) = boss else {
        return false;
    };
    match archetype {
        BossArchetype::Shielded => boss.vulnerable,
        BossArchetype::WaveGated => boss.phase == 1,
        BossArchetype::Summoner | BossArchetype::Brute => false,
    }
}

fn move_monsters(state: &mut GameState) {
    let target = state.avatar.pos;
    let reach = PLAYER_SIZE / 2.0;
    let base_speed = state.monster_speed();

    for monster in state.monsters.iter_mut() {
        if !monster.is_alive() {
            continue;
        }
        let offset = target - monster.pos;
        let distance = offset.length();
        monster.is_attacking = distance <= monster.radius() + reach;

        let frozen = match monster.kind {
            MonsterKind::Boss { archetype } => boss_holds_position(archetype, state.boss.as_ref()),
            _ => false,
        };
        if frozen || monster.is_attacking {
            continue;
        }
        let step = (base_speed * monster.speed_multiplier).min(distance);
        monster.pos += offset.normalize_or_zero() * step;
    }
}

fn update_level(state: &mut GameState) {
    let level_ticks = state.tuning.level_ticks().max(1);
    let level = (1 + state.elapsed_ticks / level_ticks).min(state.tuning.max_level as u64) as u32;
    if level > state.level {
        state.level = level;
        state.events.push(GameEvent::LevelUp { level });
        log::info!("Level {} reached ({} monsters on the board)", level, state.monsters.len());
    }
}

/// Run clock ran out: victory only with the final boss already dead
fn end_of_run(state: &mut GameState) {
    let max_level = state.tuning.max_level;
    let success = state.level >= max_level && state.boss_spawned && !state.boss_alive();
    let levels_completed = if success { max_level } else { state.level };
    state.finish(success, levels_completed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::spawn_boss;
    use crate::sim::state::tests::config_for;
    use crate::sim::state::{Monster, Payload, Projectile, SpawnSide};
    use proptest::prelude::*;

    fn playing(area: &str, seed: u64) -> GameState {
        let mut state = GameState::new(config_for(area), seed).unwrap();
        state.start();
        state
    }

    /// Input that never fires: holds a charge forever
    fn holding() -> TickInput {
        TickInput {
            attack_pressed: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_ready_does_not_tick() {
        let mut state = GameState::new(config_for("ocean_1"), 1).unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.elapsed_ticks, 0);
    }

    #[test]
    fn test_no_spawns_before_first_interval() {
        let mut state = playing("forest_1", 3);
        assert!(state.monsters.is_empty());

        let delay = state.tuning.spawn_delay_ticks(1);
        for _ in 0..delay - 1 {
            tick(&mut state, &holding(), SIM_DT);
            assert!(state.monsters.is_empty());
        }
        for _ in 0..SPAWN_CHECK_TICKS + 1 {
            tick(&mut state, &holding(), SIM_DT);
        }
        assert!(!state.monsters.is_empty());
    }

    #[test]
    fn test_movement_clamped_and_diagonal_normalised() {
        let mut state = playing("ocean_1", 1);
        let start = state.avatar.pos;
        let input = TickInput {
            up: true,
            right: true,
            ..holding()
        };
        tick(&mut state, &input, SIM_DT);
        let moved = state.avatar.pos - start;
        assert!((moved.length() - state.tuning.avatar_speed).abs() < 1e-4);

        for _ in 0..500 {
            tick(&mut state, &input, SIM_DT);
        }
        let r = state.avatar.radius();
        assert_eq!(state.avatar.pos, Vec2::new(ARENA_WIDTH - r, r));
    }

    #[test]
    fn test_aim_smooths_toward_pointer() {
        let mut state = playing("ocean_1", 1);
        let target = state.avatar.pos + Vec2::new(100.0, 0.0);
        let input = TickInput {
            aim_target: Some(target),
            ..holding()
        };
        tick(&mut state, &input, SIM_DT);
        // Started facing up; one step moves only part of the way
        assert!(state.avatar.aim < 0.0 && state.avatar.aim > -std::f32::consts::FRAC_PI_2);
        for _ in 0..60 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.avatar.aim.abs() < 0.01);
        assert_eq!(state.avatar.facing, Direction::Right);
    }

    #[test]
    fn test_auto_attack_respects_cooldown() {
        let mut state = playing("ocean_1", 1);
        let cooldown = state.cooldown_ticks();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.projectiles.len(), 1);
        for _ in 0..cooldown - 1 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.projectiles.len(), 1);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_early_release_is_noop() {
        let mut state = playing("ocean_1", 1);
        tick(&mut state, &holding(), SIM_DT);
        assert!(state.charge.is_some());
        let release = TickInput {
            attack_released: true,
            ..Default::default()
        };
        state.attack_cooldown = 100;
        tick(&mut state, &release, SIM_DT);
        assert!(state.charge.is_none());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.attack_cooldown, 99);
    }

    #[test]
    fn test_release_without_charge_is_noop() {
        let mut state = playing("ocean_1", 1);
        state.attack_cooldown = 100;
        let release = TickInput {
            attack_released: true,
            ..Default::default()
        };
        tick(&mut state, &release, SIM_DT);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_charged_release_uses_locked_aim() {
        let mut state = playing("ocean_1", 1);
        let start_aim = state.avatar.aim;
        tick(&mut state, &holding(), SIM_DT);
        let turn = TickInput {
            aim_target: Some(state.avatar.pos + Vec2::new(200.0, 0.0)),
            ..Default::default()
        };
        for _ in 0..state.tuning.charge_threshold_ticks() + 5 {
            tick(&mut state, &turn, SIM_DT);
        }
        assert!((state.avatar.aim - start_aim).abs() > 0.5);

        let release = TickInput {
            attack_released: true,
            ..turn
        };
        tick(&mut state, &release, SIM_DT);
        let shot = state.projectiles.iter().find(|p| p.charged).unwrap();
        assert_eq!(shot.charge_level, 1);
        let heading = angle_of(shot.vel);
        assert!((heading - start_aim).abs() < 1e-4);
    }

    #[test]
    fn test_monsters_close_in() {
        let mut state = playing("ocean_1", 1);
        let id = state.next_entity_id();
        state.monsters.push(Monster::new(
            id,
            MonsterKind::Regular,
            Vec2::new(450.0, 100.0),
            1000.0,
            SpawnSide::Top,
        ));
        let before = state.monsters[0].pos.distance(state.avatar.pos);
        tick(&mut state, &holding(), SIM_DT);
        let after = state.monsters[0].pos.distance(state.avatar.pos);
        assert!((before - after - state.monster_speed()).abs() < 1e-3);
    }

    #[test]
    fn test_vulnerable_shielded_boss_holds_still() {
        let mut state = playing("scrapyard_1", 1);
        spawn_boss(&mut state);
        if let Some(boss) = state.boss.as_mut() {
            boss.vulnerable = true;
            boss.vulnerable_ticks = 100;
        }
        let before = state.boss_monster().unwrap().pos;
        tick(&mut state, &holding(), SIM_DT);
        assert_eq!(state.boss_monster().unwrap().pos, before);
        assert_eq!(state.boss.as_ref().unwrap().vulnerable_ticks, 99);
    }

    #[test]
    fn test_levels_follow_clock() {
        let mut state = playing("ocean_1", 1);
        let level_ticks = state.tuning.level_ticks();
        for _ in 0..level_ticks {
            tick(&mut state, &holding(), SIM_DT);
        }
        assert_eq!(state.level, 2);
        assert!(state.drain_events().contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_projectile_kill_scores_same_tick() {
        let mut state = playing("ocean_1", 1);
        let pos = Vec2::new(450.0, 200.0);
        let id = state.next_entity_id();
        state.monsters.push(Monster::new(id, MonsterKind::Regular, pos, 20.0, SpawnSide::Top));
        let pid = state.next_entity_id();
        state.projectiles.push(Projectile {
            id: pid,
            pos,
            vel: Vec2::ZERO,
            traveled: 0.0,
            max_range: 300.0,
            damage: 25.0,
            charged: false,
            charge_level: 0,
            piercing: false,
            explosion_radius: None,
            hit: Vec::new(),
            payload: Payload::Plain,
            expired: false,
        });
        tick(&mut state, &holding(), SIM_DT);
        assert!(state.monsters.is_empty());
        assert_eq!(state.kills, 1);
    }

    #[test]
    fn test_timer_expiry_with_boss_alive_is_defeat() {
        let mut state = playing("scrapyard_1", 1);
        state.level = state.tuning.max_level;
        state.elapsed_ticks = state.tuning.run_ticks() - 1;
        spawn_boss(&mut state);
        state.time_left = 1;
        state.clock.counter = CLOCK_TICKS - 1;

        tick(&mut state, &holding(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Finished);
        let result = state.take_result().unwrap();
        assert!(!result.success);
        assert_eq!(result.levels_completed, state.level);
        // The boss fight state does not outlive the run
        assert!(state.boss.is_none());
    }

    #[test]
    fn test_timer_expiry_after_boss_killed_is_victory() {
        let mut state = playing("forest_1", 1);
        state.level = state.tuning.max_level;
        state.elapsed_ticks = state.tuning.run_ticks() - 1;
        state.boss_spawned = true;
        state.boss_defeated = true;
        state.time_left = 1;
        state.clock.counter = CLOCK_TICKS - 1;

        tick(&mut state, &holding(), SIM_DT);
        let result = state.take_result().unwrap();
        assert!(result.success);
        assert_eq!(result.levels_completed, state.tuning.max_level);
        assert_eq!(result.total_levels, state.tuning.max_level);
    }

    #[test]
    fn test_cancel_mid_run() {
        let mut state = playing("ocean_1", 1);
        tick(&mut state, &holding(), SIM_DT);
        tick(
            &mut state,
            &TickInput {
                cancel: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(state.phase, GamePhase::Finished);
        assert!(state.charge.is_none());
        assert_eq!(state.take_result().unwrap().levels_completed, 0);

        // Finished is terminal
        let ticks = state.elapsed_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.elapsed_ticks, ticks);
    }

    #[test]
    fn test_full_autopilot_run_finishes() {
        let mut state = playing("ocean_2", 7);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let run_ticks = state.tuning.run_ticks();
        for _ in 0..run_ticks + 10 {
            tick(&mut state, &input, SIM_DT);
            for monster in &state.monsters {
                assert!(monster.health > 0.0 && monster.health <= monster.max_health);
            }
        }
        assert_eq!(state.phase, GamePhase::Finished);
        let result = state.result().unwrap();
        assert!(result.levels_completed <= result.total_levels);
        assert!(state.boss_spawned);
    }

    #[test]
    fn test_determinism() {
        // Two runs with same seed and inputs end identical
        let mut a = playing("mountain_3", 99999);
        let mut b = playing("mountain_3", 99999);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.kills, b.kills);
        assert_eq!(a.monsters.len(), b.monsters.len());
        assert_eq!(a.avatar.pos, b.avatar.pos);
    }

    #[test]
    fn test_charge_level_steps() {
        let t = Tuning::default();
        let threshold = t.charge_threshold_ticks();
        let interval = t.charge_interval_ticks();
        assert_eq!(charge_level(0, &t), 0);
        assert_eq!(charge_level(threshold - 1, &t), 0);
        assert_eq!(charge_level(threshold, &t), 1);
        assert_eq!(charge_level(threshold + interval, &t), 2);
        assert_eq!(charge_level(threshold + 2 * interval, &t), 3);
    }

    #[test]
    fn test_oversized_attributes_play_without_overflow() {
        let mut config = config_for("forest_1");
        config.attributes.strength = u32::MAX;
        config.equipped.weapon = crate::content::equipment_pool()
            .into_iter()
            .find(|e| e.id == "iron_sword");
        let mut state = GameState::new(config, 3).unwrap();
        state.start();
        assert!(state.power() > 1.0e8);

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    proptest! {
        #[test]
        fn prop_charge_level_saturates(held in 0u32..100_000) {
            let t = Tuning::default();
            let level = charge_level(held, &t);
            prop_assert!(level <= t.max_charge_level);
            if held < t.charge_threshold_ticks() {
                prop_assert_eq!(level, 0);
            }
            if held >= t.charge_threshold_ticks() + 2 * t.charge_interval_ticks() {
                prop_assert_eq!(level, t.max_charge_level);
            }
        }
    }
}
