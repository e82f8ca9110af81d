//! Run outcome and rewards
//!
//! Turns the score and levels survived into XP, coins and at most one
//! piece of equipment. The result record is the only thing that leaves a run.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::content::{Equipment, Rarity, equipment_pool};
use crate::tuning::Tuning;

/// Everything the pet layer receives from a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardBundle {
    pub xp: u64,
    pub coins: u64,
    /// Zero or one item per run
    pub equipment: Option<Equipment>,
}

/// Produced exactly once when a run finishes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub success: bool,
    pub levels_completed: u32,
    pub total_levels: u32,
    pub score: u64,
    pub rewards: RewardBundle,
}

/// XP for a run: the score plus a per-level bonus scaled by difficulty
pub fn xp_reward(score: u64, levels_completed: u32, difficulty: u32, tuning: &Tuning) -> u64 {
    score + levels_completed as u64 * tuning.xp_per_level * difficulty as u64
}

/// Coins for a run: half the score (floored) plus a per-level bonus
pub fn coin_reward(score: u64, levels_completed: u32, difficulty: u32, tuning: &Tuning) -> u64 {
    score / 2 + levels_completed as u64 * tuning.coins_per_level * difficulty as u64
}

/// Probability that a run drops equipment, in [0, 1]
pub fn equipment_drop_chance(
    levels_completed: u32,
    total_levels: u32,
    difficulty: u32,
    tuning: &Tuning,
) -> f64 {
    if total_levels == 0 {
        return 0.0;
    }
    let progress = (levels_completed.min(total_levels)) as f64 / total_levels as f64;
    let chance = progress
        * (tuning.equipment_base_chance + difficulty as f64 * tuning.equipment_chance_per_difficulty);
    chance.clamp(0.0, 1.0)
}

/// Weighted rarity roll; harder areas favour rarer items
pub fn roll_rarity(difficulty: u32, rng: &mut impl Rng) -> Rarity {
    let total: u32 = Rarity::ALL.iter().map(|r| r.weight(difficulty)).sum();
    let mut roll = rng.random_range(0..total);
    for rarity in Rarity::ALL {
        let weight = rarity.weight(difficulty);
        if roll < weight {
            return rarity;
        }
        roll -= weight;
    }
    Rarity::Common
}

/// Pick a random item of a rolled rarity
pub fn roll_equipment(difficulty: u32, rng: &mut impl Rng) -> Option<Equipment> {
    let rarity = roll_rarity(difficulty, rng);
    let candidates: Vec<Equipment> = equipment_pool()
        .into_iter()
        .filter(|e| e.rarity == rarity)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let index = rng.random_range(0..candidates.len());
    candidates.into_iter().nth(index)
}

/// Compute the full reward bundle for a finished run
pub fn calculate_rewards(
    score: u64,
    levels_completed: u32,
    total_levels: u32,
    difficulty: u32,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> RewardBundle {
    let chance = equipment_drop_chance(levels_completed, total_levels, difficulty, tuning);
    let equipment = if rng.random::<f64>() < chance {
        roll_equipment(difficulty, rng)
    } else {
        None
    };

    RewardBundle {
        xp: xp_reward(score, levels_completed, difficulty, tuning),
        coins: coin_reward(score, levels_completed, difficulty, tuning),
        equipment,
    }
}
