//! Effective combat stats
//!
//! Pure functions over the pet's attributes and equipment. Cheap enough to
//! evaluate every tick, so nothing here is cached.

use crate::content::{Attribute, Attributes, EquipmentBonuses};
use crate::ms_to_ticks;
use crate::tuning::Tuning;

/// Attribute value including equipment
#[inline]
pub fn total_attribute(base: &Attributes, bonuses: &EquipmentBonuses, attr: Attribute) -> u32 {
    base.get(attr).saturating_add(bonuses.attribute(attr))
}

/// Damage of one uncharged shot
///
/// Strength gives the base term, the attribute the area is weak against
/// gives a bonus term, and gear adds flat attack power.
pub fn effective_power(
    base: &Attributes,
    bonuses: &EquipmentBonuses,
    weakness: Attribute,
    tuning: &Tuning,
) -> u32 {
    let strength = total_attribute(base, bonuses, Attribute::Strength);
    let weak = total_attribute(base, bonuses, weakness);
    tuning
        .base_power
        .saturating_add(strength / tuning.power_divisor)
        .saturating_add(weak / tuning.power_divisor)
        .saturating_add(bonuses.attack_power)
}

/// Ticks between auto-attacks; faster pets attack more often, down to a floor
pub fn attack_cooldown_ticks(base: &Attributes, bonuses: &EquipmentBonuses, tuning: &Tuning) -> u32 {
    let speed = total_attribute(base, bonuses, Attribute::Speed);
    let ms = tuning
        .attack_cooldown_ms
        .saturating_sub(speed.saturating_mul(tuning.cooldown_per_speed_ms))
        .max(tuning.min_attack_cooldown_ms);
    ms_to_ticks(ms).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_power_uses_strength_and_weakness() {
        let tuning = Tuning::default();
        let base = Attributes {
            strength: 10,
            clarity: 20,
            ..Default::default()
        };
        let bonuses = EquipmentBonuses {
            attack_power: 5,
            clarity: 5,
            ..Default::default()
        };
        // 10 + 10/5 + 25/5 + 5
        assert_eq!(effective_power(&base, &bonuses, Attribute::Clarity, &tuning), 22);
        // Weak against strength: strength counts for both terms
        assert_eq!(effective_power(&base, &bonuses, Attribute::Strength, &tuning), 19);
    }

    #[test]
    fn test_cooldown_floor() {
        let tuning = Tuning::default();
        let slow = Attributes::default();
        let fast = Attributes {
            speed: 1000,
            ..Default::default()
        };
        let none = EquipmentBonuses::default();
        assert_eq!(attack_cooldown_ticks(&slow, &none, &tuning), 30);
        assert_eq!(attack_cooldown_ticks(&fast, &none, &tuning), ms_to_ticks(150));
    }

    #[test]
    fn test_huge_attributes_saturate() {
        let tuning = Tuning::default();
        let base = Attributes {
            strength: u32::MAX,
            speed: u32::MAX,
            ..Default::default()
        };
        let bonuses = EquipmentBonuses {
            strength: 8,
            speed: 3,
            attack_power: u32::MAX,
            ..Default::default()
        };
        assert_eq!(total_attribute(&base, &bonuses, Attribute::Strength), u32::MAX);
        assert_eq!(effective_power(&base, &bonuses, Attribute::Strength, &tuning), u32::MAX);
        assert_eq!(attack_cooldown_ticks(&base, &bonuses, &tuning), ms_to_ticks(150));
    }

    proptest! {
        #[test]
        fn prop_more_speed_never_slows_attacks(speed in 0u32..500, extra in 0u32..100) {
            let tuning = Tuning::default();
            let none = EquipmentBonuses::default();
            let a = Attributes { speed, ..Default::default() };
            let b = Attributes { speed: speed + extra, ..Default::default() };
            prop_assert!(attack_cooldown_ticks(&b, &none, &tuning) <= attack_cooldown_ticks(&a, &none, &tuning));
        }
    }
}
