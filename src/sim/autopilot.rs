//! Idle/demo mode controller
//!
//! Fills in a `TickInput` from the current state: aim at the closest
//! monster, back away when it gets close, and charge up against targets
//! that only charged hits can hurt.

use glam::Vec2;

use super::state::{Avatar, GameState, HitRequirement, Monster, MonsterKind};
use super::tick::TickInput;
use crate::content::BossArchetype;

/// Closer than this, the pet backs off
const KITE_DISTANCE: f32 = 150.0;
/// Further than this from home, the pet drifts back
const HOME_SLACK: f32 = 60.0;
/// Axis dead zone for turning a vector into key presses
const DEAD_ZONE: f32 = 0.3;

/// Whether only a charged hit makes progress against this monster
fn wants_charged_hit(state: &GameState, monster: &Monster) -> bool {
    match monster.kind {
        MonsterKind::Minion { requires } => requires == HitRequirement::Charged,
        MonsterKind::Boss { archetype } => {
            let Some(boss) = state.boss.as_ref() else {
                return false;
            };
            match archetype {
                BossArchetype::Shielded => !boss.vulnerable,
                BossArchetype::Summoner => !boss.minions_spawned,
                BossArchetype::WaveGated => boss.phase >= 2,
                BossArchetype::Brute => false,
            }
        }
        MonsterKind::Regular | MonsterKind::Elite => false,
    }
}

fn press_toward(input: &mut TickInput, dir: Vec2) {
    let dir = dir.normalize_or_zero();
    input.left = dir.x < -DEAD_ZONE;
    input.right = dir.x > DEAD_ZONE;
    input.up = dir.y < -DEAD_ZONE;
    input.down = dir.y > DEAD_ZONE;
}

/// Overwrite movement, aim and attack fields of `input`
pub fn drive(state: &GameState, input: &mut TickInput) {
    let pos = state.avatar.pos;

    // Minions first while a wave is up, then whatever is closest
    let target = state
        .monsters
        .iter()
        .filter(|m| m.is_alive())
        .min_by(|a, b| {
            let da = a.pos.distance(pos) - if a.is_minion() { KITE_DISTANCE } else { 0.0 };
            let db = b.pos.distance(pos) - if b.is_minion() { KITE_DISTANCE } else { 0.0 };
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(target) = target else {
        let home = Avatar::start_position() - pos;
        if home.length() > HOME_SLACK {
            press_toward(input, home);
        }
        if state.charge.is_some() {
            input.attack_released = true;
        }
        return;
    };

    input.aim_target = Some(target.pos);

    let offset = pos - target.pos;
    if offset.length() < KITE_DISTANCE {
        // Slide sideways too so the pet does not get pinned against a wall
        let away = offset.normalize_or_zero() + Vec2::new(-offset.y, offset.x).normalize_or_zero() * 0.5;
        press_toward(input, away);
    } else {
        let home = Avatar::start_position() - pos;
        if home.length() > HOME_SLACK {
            press_toward(input, home);
        }
    }

    let want_charge = wants_charged_hit(state, target);
    match state.charge {
        None if want_charge => input.attack_pressed = true,
        Some(charge) => {
            let ready = charge.held_ticks >= state.tuning.charge_threshold_ticks();
            if ready || !want_charge {
                input.attack_released = true;
            }
        }
        None => {}
    }
}
