//! Headless runner: plays the game with the autopilot paddle
//!
//! Usage: `brickfall [settings.json]`. Set `RUST_LOG=info` (or `debug`) to
//! follow the run.

use std::process::ExitCode;
use std::sync::mpsc;

use brickfall::consts::SIM_DT;
use brickfall::effects::LogEffects;
use brickfall::hud::{Hud, LogText};
use brickfall::sim::{Game, SceneId, TickInput};
use brickfall::Settings;

/// Simulated time limit for one run, in seconds
const MAX_RUN_SECONDS: f32 = 600.0;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Brickfall (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load settings: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    if let Err(e) = settings.validate() {
        log::error!("Invalid settings: {e}");
        return ExitCode::FAILURE;
    }

    let (tx, rx) = mpsc::channel();
    let mut game = Game::new(settings, tx, LogEffects);
    game.start_game();

    let input = TickInput {
        autopilot: true,
        ..TickInput::default()
    };
    let mut elapsed = 0.0;

    while elapsed < MAX_RUN_SECONDS {
        while let Ok(scene) = rx.try_recv() {
            let hud = if scene.is_game_level() {
                Hud::unbound()
                    .with_score(LogText("ScoreText"))
                    .with_lives(LogText("LivesText"))
                    .with_message(LogText("MessageText"))
            } else {
                Hud::unbound()
            };
            game.load_standard_scene(scene, hud);

            if matches!(scene, SceneId::Victory | SceneId::Defeat) {
                println!("{}: {}", scene, game.session().final_score_text());
                return ExitCode::SUCCESS;
            }
        }

        game.update(SIM_DT, &input);
        elapsed += SIM_DT;
    }

    let snapshot = game.session().snapshot();
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("Time limit reached:\n{json}"),
        Err(e) => log::error!("Failed to serialize session: {e}"),
    }
    ExitCode::SUCCESS
}
