//! Collision geometry for the arena
//!
//! Everything in the arena is a circle: the avatar, monsters, projectiles
//! and explosion areas. Queries return indices into the monster store so the
//! caller can mutate afterwards without holding a borrow.

use glam::Vec2;

use super::state::{Monster, Projectile};
use crate::consts::{ARENA_HEIGHT, ARENA_MARGIN, ARENA_WIDTH};

/// Radius within which a projectile registers a hit on a monster
///
/// Explosive shots use their blast radius, everything else the monster's body.
#[inline]
pub fn hit_radius(projectile: &Projectile, monster: &Monster) -> f32 {
    projectile.explosion_radius.unwrap_or_else(|| monster.radius())
}

/// Check whether a projectile currently overlaps a monster
#[inline]
pub fn projectile_hits(projectile: &Projectile, monster: &Monster) -> bool {
    projectile.pos.distance(monster.pos) <= hit_radius(projectile, monster)
}

/// Keep a body of the given radius fully inside the arena
pub fn clamp_to_arena(pos: Vec2, radius: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(radius, ARENA_WIDTH - radius),
        pos.y.clamp(radius, ARENA_HEIGHT - radius),
    )
}

/// True once a point has left the arena plus its margin
pub fn out_of_arena(pos: Vec2) -> bool {
    pos.x < -ARENA_MARGIN
        || pos.y < -ARENA_MARGIN
        || pos.x > ARENA_WIDTH + ARENA_MARGIN
        || pos.y > ARENA_HEIGHT + ARENA_MARGIN
}

/// Index of the closest living monster within `radius` that passes `eligible`
pub fn nearest_monster(
    monsters: &[Monster],
    from: Vec2,
    radius: f32,
    eligible: impl Fn(&Monster) -> bool,
) -> Option<usize> {
    monsters
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_alive() && eligible(m))
        .map(|(i, m)| (i, m.pos.distance(from)))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
}

/// Indices of living monsters within `radius` of `center`, except `skip_id`
pub fn monsters_within(monsters: &[Monster], center: Vec2, radius: f32, skip_id: u32) -> Vec<usize> {
    monsters
        .iter()
        .enumerate()
        .filter(|(_, m)| m.id != skip_id && m.is_alive() && m.pos.distance(center) <= radius)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{MonsterKind, Payload, SpawnSide};

    fn monster(id: u32, x: f32, y: f32) -> Monster {
        Monster::new(id, MonsterKind::Regular, Vec2::new(x, y), 20.0, SpawnSide::Top)
    }

    fn projectile_at(x: f32, y: f32, explosion_radius: Option<f32>) -> Projectile {
        Projectile {
            id: 1,
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            traveled: 0.0,
            max_range: 300.0,
            damage: 10.0,
            charged: false,
            charge_level: 0,
            piercing: false,
            explosion_radius,
            hit: Vec::new(),
            payload: Payload::Plain,
            expired: false,
        }
    }

    #[test]
    fn test_body_radius_hit() {
        let target = monster(1, 100.0, 100.0);
        assert!(projectile_hits(&projectile_at(110.0, 100.0, None), &target));
        assert!(!projectile_hits(&projectile_at(115.0, 100.0, None), &target));
    }

    #[test]
    fn test_explosion_radius_hit() {
        let target = monster(1, 100.0, 100.0);
        assert!(projectile_hits(&projectile_at(150.0, 100.0, Some(60.0)), &target));
    }

    #[test]
    fn test_nearest_skips_ineligible_and_dead() {
        let mut monsters = vec![monster(1, 10.0, 0.0), monster(2, 20.0, 0.0), monster(3, 30.0, 0.0)];
        monsters[1].health = 0.0;
        let found = nearest_monster(&monsters, Vec2::ZERO, 100.0, |m| m.id != 1);
        assert_eq!(found, Some(2));
        assert_eq!(nearest_monster(&monsters, Vec2::ZERO, 25.0, |m| m.id != 1), None);
    }

    #[test]
    fn test_monsters_within_excludes_center() {
        let monsters = vec![monster(1, 0.0, 0.0), monster(2, 50.0, 0.0), monster(3, 90.0, 0.0)];
        assert_eq!(monsters_within(&monsters, Vec2::ZERO, 60.0, 1), vec![1]);
    }

    #[test]
    fn test_arena_bounds() {
        assert_eq!(clamp_to_arena(Vec2::new(-50.0, 800.0), 15.0), Vec2::new(15.0, ARENA_HEIGHT - 15.0));
        assert!(out_of_arena(Vec2::new(-30.0, 10.0)));
        assert!(!out_of_arena(Vec2::new(450.0, 350.0)));
    }
}
