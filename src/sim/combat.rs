//! Combat resolver
//!
//! Projectile flight, projectile/monster collisions, hit gating for bosses
//! and minions, per-kind secondary effects, damage over time, and the death
//! purge that turns kills into score and advances boss phases.

use glam::Vec2;

use super::collision::{monsters_within, nearest_monster, out_of_arena, projectile_hits};
use super::effects::Effects;
use super::spawn::spawn_minion_wave;
use super::state::{
    BossState, DamageOverTime, GameEvent, GameState, Monster, MonsterKind, Payload, Projectile,
    ProjectileKind,
};
use crate::content::BossArchetype;
use crate::tuning::Tuning;

/// What a strike did to its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Health went down by this much
    Damaged(f32),
    /// The target was touched but is immune to this kind of hit
    Absorbed,
}

/// Boss script steps raised during a pass and applied once it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BossTrigger {
    SummonWave,
    GateWave,
}

/// What a projectile does after touching a monster
enum AfterHit {
    Continue,
    /// Redirected; stop colliding this tick
    Stop,
    Expire,
}

/// Apply one strike, honouring minion requirements and boss scripts
///
/// `direct` is true for projectile contact. Splash and damage-over-time
/// pulses pass `false`: they can hurt a boss whose gate is open but never
/// count toward shield breaks or summons.
#[allow(clippy::too_many_arguments)]
pub(crate) fn strike(
    monster: &mut Monster,
    boss: Option<&mut BossState>,
    damage: f32,
    charged: bool,
    direct: bool,
    tuning: &Tuning,
    triggers: &mut Vec<BossTrigger>,
    events: &mut Vec<GameEvent>,
) -> Contact {
    match monster.kind {
        MonsterKind::Regular | MonsterKind::Elite => Contact::Damaged(monster.take_damage(damage)),
        MonsterKind::Minion { requires } => {
            if requires.admits(charged) {
                Contact::Damaged(monster.take_damage(damage))
            } else {
                Contact::Absorbed
            }
        }
        MonsterKind::Boss { archetype } => {
            let Some(boss) = boss else {
                // No script state left; behave like a plain boss
                return Contact::Damaged(monster.take_damage(damage));
            };
            match archetype {
                BossArchetype::Shielded => {
                    strike_shielded(monster, boss, damage, charged, direct, tuning, events)
                }
                BossArchetype::Summoner => {
                    if charged && direct && !boss.minions_spawned {
                        boss.charged_hits += 1;
                        if boss.charged_hits >= tuning.summoner_charged_hits {
                            boss.charged_hits = 0;
                            boss.minions_spawned = true;
                            triggers.push(BossTrigger::SummonWave);
                        }
                    }
                    Contact::Absorbed
                }
                BossArchetype::WaveGated => {
                    strike_wave_gated(monster, boss, damage, charged, tuning, triggers, events)
                }
                BossArchetype::Brute => Contact::Damaged(monster.take_damage(damage)),
            }
        }
    }
}

fn strike_shielded(
    monster: &mut Monster,
    boss: &mut BossState,
    damage: f32,
    charged: bool,
    direct: bool,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> Contact {
    if boss.vulnerable {
        return if charged {
            Contact::Absorbed
        } else {
            Contact::Damaged(monster.take_damage(damage))
        };
    }
    if charged && direct {
        boss.shield_hits += 1;
        if boss.shield_hits >= tuning.shield_hit_threshold {
            boss.vulnerable = true;
            boss.vulnerable_ticks = tuning.vulnerable_ticks();
            events.push(GameEvent::BossVulnerable);
            log::debug!("Shield broken after {} charged hits", boss.shield_hits);
        }
    }
    Contact::Absorbed
}

fn strike_wave_gated(
    monster: &mut Monster,
    boss: &mut BossState,
    damage: f32,
    charged: bool,
    tuning: &Tuning,
    triggers: &mut Vec<BossTrigger>,
    events: &mut Vec<GameEvent>,
) -> Contact {
    match boss.phase {
        0 => {
            if charged {
                return Contact::Absorbed;
            }
            // Uncharged damage stops at the gate; crossing it locks the boss down
            let gate = monster.max_health * tuning.wave_gate_fraction;
            let allowed = (monster.health - gate).max(0.0);
            let dealt = monster.take_damage(damage.min(allowed));
            if monster.health <= gate {
                boss.phase = 1;
                boss.minions_spawned = true;
                triggers.push(BossTrigger::GateWave);
                events.push(GameEvent::BossPhase { phase: 1 });
            }
            if dealt > 0.0 { Contact::Damaged(dealt) } else { Contact::Absorbed }
        }
        1 => Contact::Absorbed,
        _ => {
            if charged {
                Contact::Damaged(monster.take_damage(damage))
            } else {
                Contact::Absorbed
            }
        }
    }
}

/// Build a projectile leaving the avatar along `heading`
///
/// Charge level 0 is a normal shot; levels scale damage, range, piercing
/// and (at max) add an explosion radius.
pub fn make_projectile(state: &GameState, heading: f32, charge_level: u32) -> Projectile {
    let t = &state.tuning;
    let kind = state.config.projectile_kind();
    let level = charge_level.min(t.max_charge_level);
    let damage = state.power() * level.max(1) as f32;
    let range = t.attack_range * (1.0 + t.charge_range_step * level as f32);
    let piercing = (level > 0 && level >= t.charge_pierce_level) || kind == ProjectileKind::Boomerang;
    let explosion_radius = (level > 0 && level >= t.max_charge_level).then_some(t.charge_explosion_radius);

    let payload = match kind {
        ProjectileKind::Default => Payload::Plain,
        ProjectileKind::Waterball => Payload::Waterball {
            splash_radius: t.splash_radius,
            dot_damage: damage * t.dot_damage_fraction,
            dot_ticks: t.dot_duration_ticks(),
        },
        ProjectileKind::Banana => Payload::Banana {
            split_count: t.split_count,
            has_split: false,
        },
        ProjectileKind::Acorn => Payload::Acorn {
            bounces_left: t.max_bounces,
        },
        ProjectileKind::Boomerang => Payload::Boomerang {
            returning: false,
            outward_range: range,
        },
    };
    let max_range = match kind {
        ProjectileKind::Boomerang => range * 3.0,
        _ => range,
    };

    Projectile {
        id: 0,
        pos: state.avatar.pos,
        vel: Vec2::new(heading.cos(), heading.sin()) * t.projectile_speed,
        traveled: 0.0,
        max_range,
        damage,
        charged: level > 0,
        charge_level: level,
        piercing,
        explosion_radius,
        hit: Vec::new(),
        payload,
        expired: false,
    }
}

/// Fire a projectile into the store
pub fn fire(state: &mut GameState, heading: f32, charge_level: u32) {
    let mut projectile = make_projectile(state, heading, charge_level);
    projectile.id = state.next_entity_id();
    state.projectiles.push(projectile);
}

fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Move a projectile one tick and expire it when its flight is over
pub(crate) fn advance(projectile: &mut Projectile, avatar_pos: Vec2, tuning: &Tuning) {
    let speed = projectile.vel.length();

    if let Payload::Boomerang {
        returning,
        outward_range,
    } = &mut projectile.payload
    {
        if !*returning {
            projectile.vel = rotate(projectile.vel, tuning.boomerang_curve);
            if projectile.traveled >= *outward_range {
                *returning = true;
            }
        }
        if *returning {
            let to_avatar = avatar_pos - projectile.pos;
            if to_avatar.length() <= tuning.boomerang_capture_radius {
                projectile.expired = true;
                return;
            }
            projectile.vel = to_avatar.normalize_or_zero() * speed;
        }
    }

    projectile.pos += projectile.vel;
    projectile.traveled += speed;
    if projectile.traveled > projectile.max_range || out_of_arena(projectile.pos) {
        projectile.expired = true;
    }
}

/// Sub-shots thrown out radially by a splitting projectile
fn split(parent: &Projectile, count: u32, tuning: &Tuning) -> Vec<Projectile> {
    let speed = parent.vel.length().max(tuning.projectile_speed);
    (0..count)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            Projectile {
                id: 0,
                pos: parent.pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                traveled: 0.0,
                max_range: tuning.split_range,
                damage: parent.damage * tuning.split_damage_fraction,
                charged: false,
                charge_level: 0,
                piercing: false,
                explosion_radius: None,
                // Children skip whatever the parent already struck
                hit: parent.hit.clone(),
                payload: Payload::Banana {
                    split_count: 0,
                    has_split: true,
                },
                expired: false,
            }
        })
        .collect()
}

/// Secondary effects after a damaging contact with `monsters[target]`
#[allow(clippy::too_many_arguments)]
fn on_damaged(
    projectile: &mut Projectile,
    target: usize,
    monsters: &mut [Monster],
    mut boss: Option<&mut BossState>,
    tuning: &Tuning,
    spawned: &mut Vec<Projectile>,
    triggers: &mut Vec<BossTrigger>,
    events: &mut Vec<GameEvent>,
    effects: &mut Effects,
) -> AfterHit {
    let default = if projectile.piercing {
        AfterHit::Continue
    } else {
        AfterHit::Expire
    };

    match &mut projectile.payload {
        Payload::Plain | Payload::Boomerang { .. } => default,
        Payload::Waterball {
            splash_radius,
            dot_damage,
            dot_ticks,
        } => {
            let center = monsters[target].pos;
            let target_id = monsters[target].id;
            if monsters[target].is_alive() {
                monsters[target].dot = Some(DamageOverTime {
                    damage: *dot_damage,
                    remaining_ticks: *dot_ticks,
                    pulse_ticks: tuning.dot_pulse_ticks(),
                    pulse_timer: 0,
                });
            }
            let splash = projectile.damage * tuning.splash_damage_fraction;
            for j in monsters_within(monsters, center, *splash_radius, target_id) {
                let contact = strike(
                    &mut monsters[j],
                    boss.as_deref_mut(),
                    splash,
                    projectile.charged,
                    false,
                    tuning,
                    triggers,
                    events,
                );
                if let Contact::Damaged(dealt) = contact {
                    effects.damage_number(monsters[j].pos, dealt, false, monsters[j].id);
                }
            }
            default
        }
        Payload::Banana {
            split_count,
            has_split,
        } => {
            if !*has_split {
                *has_split = true;
                let count = *split_count;
                spawned.extend(split(projectile, count, tuning));
            }
            default
        }
        Payload::Acorn { bounces_left } => {
            if *bounces_left == 0 {
                return default;
            }
            let hit = &projectile.hit;
            let next = nearest_monster(monsters, projectile.pos, tuning.bounce_radius, |m| {
                !hit.contains(&m.id)
            });
            match next {
                Some(j) => {
                    *bounces_left -= 1;
                    let speed = projectile.vel.length().max(tuning.projectile_speed);
                    projectile.vel = (monsters[j].pos - projectile.pos).normalize_or_zero() * speed;
                    projectile.traveled = 0.0;
                    AfterHit::Stop
                }
                None => AfterHit::Expire,
            }
        }
    }
}

/// Move every projectile and resolve its collisions (fire order)
///
/// Monsters already at zero health are skipped so a kill cannot be
/// counted twice within one pass.
pub fn resolve_projectiles(state: &mut GameState) {
    let mut spawned: Vec<Projectile> = Vec::new();
    let mut triggers: Vec<BossTrigger> = Vec::new();
    let avatar_pos = state.avatar.pos;

    {
        let GameState {
            projectiles,
            monsters,
            boss,
            tuning,
            events,
            effects,
            ..
        } = state;

        for projectile in projectiles.iter_mut() {
            if projectile.expired {
                continue;
            }
            advance(projectile, avatar_pos, tuning);

            for i in 0..monsters.len() {
                if projectile.expired {
                    break;
                }
                let monster = &monsters[i];
                if !monster.is_alive()
                    || projectile.has_hit(monster.id)
                    || !projectile_hits(projectile, monster)
                {
                    continue;
                }
                let id = monster.id;

                let contact = strike(
                    &mut monsters[i],
                    boss.as_mut(),
                    projectile.damage,
                    projectile.charged,
                    true,
                    tuning,
                    &mut triggers,
                    events,
                );
                projectile.mark_hit(id);
                if projectile.explosion_radius.is_some() {
                    effects.explosion(projectile.pos, projectile.id);
                }

                let after = match contact {
                    Contact::Damaged(dealt) => {
                        effects.damage_number(monsters[i].pos, dealt, projectile.charged, id);
                        effects.hit_sparks(monsters[i].pos, id ^ projectile.id);
                        on_damaged(
                            projectile,
                            i,
                            monsters,
                            boss.as_mut(),
                            tuning,
                            &mut spawned,
                            &mut triggers,
                            events,
                            effects,
                        )
                    }
                    Contact::Absorbed => {
                        effects.hit_sparks(monsters[i].pos, id ^ projectile.id);
                        if projectile.piercing {
                            AfterHit::Continue
                        } else {
                            AfterHit::Expire
                        }
                    }
                };

                match after {
                    AfterHit::Continue => {}
                    AfterHit::Stop => break,
                    AfterHit::Expire => projectile.expired = true,
                }
            }
        }
    }

    for mut projectile in spawned {
        projectile.id = state.next_entity_id();
        state.projectiles.push(projectile);
    }
    state.projectiles.retain(|p| !p.expired);
    apply_triggers(state, triggers);
}

/// Run deferred boss script steps
pub(crate) fn apply_triggers(state: &mut GameState, triggers: Vec<BossTrigger>) {
    for trigger in triggers {
        let count = match trigger {
            BossTrigger::SummonWave => state.tuning.summoner_minion_count,
            BossTrigger::GateWave => state.tuning.wave_gate_minion_count,
        };
        spawn_minion_wave(state, count);
    }
}

/// Count down the shield-break window; restore the shield when it lapses
pub fn tick_boss_timers(state: &mut GameState) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    if !boss.vulnerable {
        return;
    }
    boss.vulnerable_ticks = boss.vulnerable_ticks.saturating_sub(1);
    if boss.vulnerable_ticks == 0 {
        boss.vulnerable = false;
        boss.shield_hits = 0;
        state.events.push(GameEvent::BossShieldRestored);
        log::debug!("Boss shield restored");
    }
}

/// Pulse damage-over-time debuffs
pub fn apply_damage_over_time(state: &mut GameState) {
    let mut triggers = Vec::new();
    {
        let GameState {
            monsters,
            boss,
            tuning,
            events,
            effects,
            ..
        } = state;

        for monster in monsters.iter_mut() {
            if !monster.is_alive() {
                continue;
            }
            let Some(mut dot) = monster.dot else {
                continue;
            };
            dot.pulse_timer += 1;
            dot.remaining_ticks = dot.remaining_ticks.saturating_sub(1);
            if dot.pulse_timer >= dot.pulse_ticks {
                dot.pulse_timer = 0;
                let contact = strike(
                    monster,
                    boss.as_mut(),
                    dot.damage,
                    false,
                    false,
                    tuning,
                    &mut triggers,
                    events,
                );
                if let Contact::Damaged(dealt) = contact {
                    effects.damage_number(monster.pos, dealt, false, monster.id);
                }
            }
            monster.dot = (dot.remaining_ticks > 0).then_some(dot);
        }
    }
    apply_triggers(state, triggers);
}

/// Remove dead monsters, award score, and advance boss phases
///
/// Repeats until stable, since a cleared minion wave can finish off the boss.
/// Returns the number of monsters killed.
pub fn resolve_deaths(state: &mut GameState) -> u32 {
    let mut total = 0;
    loop {
        let dead: Vec<(u32, Vec2, bool)> = state
            .monsters
            .iter()
            .filter(|m| !m.is_alive())
            .map(|m| (m.id, m.pos, m.is_boss()))
            .collect();

        if !dead.is_empty() {
            state.monsters.retain(|m| m.is_alive());
            let mut boss_killed = false;
            for (id, pos, is_boss) in dead {
                let gained = state.tuning.kill_score * state.level as u64;
                state.score += gained;
                state.kills += 1;
                total += 1;
                state.effects.death_burst(pos, id);
                state.events.push(GameEvent::MonsterKilled {
                    id,
                    boss: is_boss,
                    score: gained,
                });
                boss_killed |= is_boss;
            }
            if boss_killed {
                state.boss = None;
                state.boss_defeated = true;
                state.monsters.retain(|m| !m.is_minion());
                state.events.push(GameEvent::BossDefeated);
                log::info!("Boss defeated at level {} (score {})", state.level, state.score);
            }
        }

        if !advance_cleared_wave(state) {
            break;
        }
    }
    total
}

/// Boss reaction to its minion wave being wiped out; true if anything changed
fn advance_cleared_wave(state: &mut GameState) -> bool {
    let minions_alive = state.minions_alive();
    let Some(archetype) = state.boss_monster().and_then(|m| match m.kind {
        MonsterKind::Boss { archetype } => Some(archetype),
        _ => None,
    }) else {
        return false;
    };
    let Some(boss) = state.boss.as_mut() else {
        return false;
    };
    if !boss.minions_spawned || minions_alive > 0 {
        return false;
    }
    boss.minions_spawned = false;

    match archetype {
        BossArchetype::Summoner => {
            boss.phase += 1;
            let phase = boss.phase;
            if let Some(monster) = state.monsters.iter_mut().find(|m| m.is_boss()) {
                if phase >= 3 {
                    monster.take_damage(monster.max_health);
                } else {
                    monster.take_damage(monster.max_health / 3.0);
                }
            }
            state.events.push(GameEvent::BossPhase { phase });
            log::debug!("Summoner wave cleared, phase {}", phase);
        }
        BossArchetype::WaveGated => {
            boss.phase = 2;
            state.events.push(GameEvent::BossPhase { phase: 2 });
            log::debug!("Gate wave cleared, boss exposed to charged hits");
        }
        BossArchetype::Shielded | BossArchetype::Brute => {}
    }
    true
}
