//! Presentation adapter
//!
//! The loop copies a `Snapshot` out of the simulation once per frame and hands
//! it to a `Presenter`. Presenters only ever read; entity data stays owned by
//! the simulation.

pub mod shapes;
pub mod vertex;

use serde::Serialize;

use crate::sim::{Avatar, BossState, Effects, GamePhase, GameState, Monster, Projectile, charge_level};

pub use vertex::{Vertex, colors};

/// HUD values derived from the run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub area: String,
    pub score: u64,
    pub kills: u32,
    pub level: u32,
    pub max_level: u32,
    pub time_left: u32,
    /// Charge level the current hold would release at (0 when idle)
    pub charge_level: u32,
    /// Boss health as (current, max)
    pub boss_health: Option<(f32, f32)>,
}

/// Read-only copy of everything a frame needs
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub avatar: Avatar,
    pub monsters: Vec<Monster>,
    pub projectiles: Vec<Projectile>,
    pub boss: Option<BossState>,
    pub effects: Effects,
    pub hud: Hud,
}

impl GameState {
    /// Copy the stores out for presentation
    pub fn snapshot(&self) -> Snapshot {
        let charge_level = self
            .charge
            .map(|c| charge_level(c.held_ticks, &self.tuning))
            .unwrap_or(0);
        Snapshot {
            phase: self.phase,
            avatar: self.avatar.clone(),
            monsters: self.monsters.clone(),
            projectiles: self.projectiles.clone(),
            boss: self.boss.clone(),
            effects: self.effects.clone(),
            hud: Hud {
                area: self.config.area.name.clone(),
                score: self.score,
                kills: self.kills,
                level: self.level,
                max_level: self.tuning.max_level,
                time_left: self.time_left,
                charge_level,
                boss_health: self.boss_monster().map(|m| (m.health, m.max_health)),
            },
        }
    }
}

/// Something that draws frames
pub trait Presenter {
    fn present(&mut self, snapshot: &Snapshot);
}

/// Logs the HUD whenever the displayed second changes
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_time_left: Option<u32>,
}

impl Presenter for LogPresenter {
    fn present(&mut self, snapshot: &Snapshot) {
        let hud = &snapshot.hud;
        if self.last_time_left == Some(hud.time_left) {
            return;
        }
        self.last_time_left = Some(hud.time_left);
        match hud.boss_health {
            Some((health, max)) => log::info!(
                "[{:>3}s] level {}/{} score {} kills {} monsters {} boss {:.0}/{:.0}",
                hud.time_left,
                hud.level,
                hud.max_level,
                hud.score,
                hud.kills,
                snapshot.monsters.len(),
                health,
                max
            ),
            None => log::info!(
                "[{:>3}s] level {}/{} score {} kills {} monsters {}",
                hud.time_left,
                hud.level,
                hud.max_level,
                hud.score,
                hud.kills,
                snapshot.monsters.len()
            ),
        }
    }
}

/// Builds the triangle list for each frame; a GPU backend uploads `vertices`
#[derive(Debug, Default)]
pub struct MeshPresenter {
    pub vertices: Vec<Vertex>,
    pub frames: u64,
}

impl Presenter for MeshPresenter {
    fn present(&mut self, snapshot: &Snapshot) {
        self.vertices = shapes::frame(snapshot);
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::spawn_boss;
    use crate::sim::state::tests::config_for;
    use crate::sim::{Charge, TickInput, tick};

    #[test]
    fn test_snapshot_copies_stores() {
        let mut state = GameState::new(config_for("scrapyard_1"), 4).unwrap();
        state.start();
        spawn_boss(&mut state);
        tick(&mut state, &TickInput::default(), crate::consts::SIM_DT);

        let mut snapshot = state.snapshot();
        assert_eq!(snapshot.monsters.len(), state.monsters.len());
        assert_eq!(snapshot.projectiles.len(), state.projectiles.len());
        assert!(snapshot.hud.boss_health.is_some());

        // Mutating the copy leaves the run untouched
        snapshot.monsters.clear();
        assert!(!state.monsters.is_empty());
    }

    #[test]
    fn test_snapshot_charge_level() {
        let mut state = GameState::new(config_for("ocean_1"), 4).unwrap();
        state.start();
        assert_eq!(state.snapshot().hud.charge_level, 0);
        state.charge = Some(Charge {
            held_ticks: state.tuning.charge_threshold_ticks(),
            locked_aim: 0.0,
        });
        assert_eq!(state.snapshot().hud.charge_level, 1);
    }

    #[test]
    fn test_mesh_presenter_draws_frame() {
        let mut state = GameState::new(config_for("forest_1"), 4).unwrap();
        state.start();
        spawn_boss(&mut state);
        let mut presenter = MeshPresenter::default();
        presenter.present(&state.snapshot());
        assert_eq!(presenter.frames, 1);
        assert!(!presenter.vertices.is_empty());
        assert_eq!(presenter.vertices.len() % 3, 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = GameState::new(config_for("ocean_1"), 4).unwrap();
        state.start();
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"hud\""));
    }
}
