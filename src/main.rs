//! Pet Arena headless runner
//!
//! Plays one run with the autopilot and prints the result as JSON.
//!
//! Usage: `pet-arena [area_id] [seed] [character_id]`
//! Set `PET_ARENA_TUNING` to a JSON file to override balance values.

use std::process::ExitCode;

use pet_arena::consts::*;
use pet_arena::content::{Attributes, EquippedItems, characters, equipment_pool, find_area};
use pet_arena::renderer::{LogPresenter, MeshPresenter, Presenter};
use pet_arena::sim::{GameEvent, GamePhase, GameState, RunConfig, TickInput, tick};
use pet_arena::{ConfigError, Tuning};

/// Wall time each frame hands to the accumulator
const FRAME_DT: f32 = 1.0 / 60.0;

/// Game instance holding the run and its presenters
struct Game {
    state: GameState,
    accumulator: f32,
    input: TickInput,
    hud: LogPresenter,
    mesh: MeshPresenter,
}

impl Game {
    fn new(state: GameState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
            hud: LogPresenter::default(),
            mesh: MeshPresenter::default(),
        }
    }

    /// Run simulation ticks
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in self.state.drain_events() {
            match event {
                GameEvent::BossSpawned { archetype } => log::info!("A {:?} boss appears!", archetype),
                GameEvent::BossVulnerable => log::info!("The boss shield is down"),
                GameEvent::BossDefeated => log::info!("Boss defeated!"),
                GameEvent::MinionWave { count } => log::debug!("{} minions join the fight", count),
                _ => {}
            }
        }
    }

    fn render(&mut self) {
        let snapshot = self.state.snapshot();
        self.hud.present(&snapshot);
        self.mesh.present(&snapshot);
    }
}

fn load_tuning() -> Result<Tuning, ConfigError> {
    match std::env::var("PET_ARENA_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}, using defaults", path, e);
                Ok(Tuning::default())
            }
        },
        Err(_) => Ok(Tuning::default()),
    }
}

fn default_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pet Arena (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let area_id = args.first().map(String::as_str).unwrap_or("forest_1");
    let seed = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(default_seed);

    let Some(area) = find_area(area_id) else {
        log::error!("Unknown area '{}'", area_id);
        return ExitCode::FAILURE;
    };

    let roster = characters();
    let character = match args.get(2) {
        Some(id) => roster.iter().find(|c| &c.id == id),
        None => roster.get(seed as usize % roster.len().max(1)),
    };
    if let Some(c) = character {
        log::info!("Fighting as {} ({:?} shots)", c.name, c.projectile);
    }

    // A modest starter loadout
    let pool = equipment_pool();
    let equipped = EquippedItems {
        weapon: pool.iter().find(|e| e.slot == pet_arena::content::EquipmentSlot::Weapon).cloned(),
        ..Default::default()
    };

    let config = RunConfig {
        attributes: Attributes {
            speed: 12,
            wisdom: 10,
            strength: 14,
            clarity: 8,
        },
        equipped,
        area,
        character: character.map(|c| c.id.clone()),
    };

    let state = match load_tuning().and_then(|tuning| GameState::with_tuning(config, tuning, seed)) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut game = Game::new(state);
    game.state.start();
    while game.state.phase == GamePhase::Playing {
        game.update(FRAME_DT);
        game.render();
    }
    log::info!("Rendered {} frames", game.mesh.frames);

    let Some(result) = game.state.take_result() else {
        log::error!("Run ended without a result");
        return ExitCode::FAILURE;
    };
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Could not serialize result: {}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
