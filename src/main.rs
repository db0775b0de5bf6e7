//! Star Catcher headless runner
//!
//! Plays a few rounds with a simple autopilot against the built-in arcade
//! physics and prints a JSON summary.
//!
//! Usage: `star-catcher [settings.json] [rounds]`

use serde::Serialize;

use star_catcher::Settings;
use star_catcher::arcade::ArcadePhysics;
use star_catcher::bridge::{LogPresenter, present};
use star_catcher::consts::SIM_DT;
use star_catcher::sim::{Direction, EntityKind, Game, GamePhase, TickInput};

/// Give up on a round after this many ticks (5 minutes of play)
const MAX_ROUND_TICKS: u64 = 60 * 60 * 5;
/// Ticks the game-over panel stays up before the autopilot hits "Try Again"
const RESTART_DELAY_TICKS: u64 = 90;

#[derive(Debug, Serialize)]
struct RoundSummary {
    round: u32,
    level: u32,
    score: u64,
    ticks: u64,
    ended_by_hazard: bool,
}

#[derive(Debug, Serialize)]
struct SessionSummary {
    seed: u64,
    rounds: Vec<RoundSummary>,
    best_score: u64,
}

fn main() {
    env_logger::init();
    log::info!("Star Catcher (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load settings from {path}: {e}");
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    let rounds = args
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(3)
        .max(1);

    match run_session(settings, rounds) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to encode summary: {e}"),
        },
        Err(e) => {
            log::error!("Session aborted: {e}");
            std::process::exit(1);
        }
    }
}

fn run_session(settings: Settings, rounds: u32) -> Result<SessionSummary, star_catcher::SimError> {
    let seed = settings.seed;
    let mut game = Game::new(settings)?;
    let physics = ArcadePhysics::from_game(&game);
    let mut presenter = LogPresenter::default();
    let mut summaries = Vec::new();
    let mut round_start = 0;
    let mut game_over_at = None;

    present(&mut game, &mut presenter);

    while summaries.len() < rounds as usize {
        let input = autopilot(&game);
        game.report_movement_intent(input.direction, input.jump);
        physics.step(&mut game, SIM_DT)?;
        game.update()?;
        present(&mut game, &mut presenter);

        let elapsed = game.ticks() - round_start;
        match game.state().phase {
            GamePhase::GameOver => {
                let since = *game_over_at.get_or_insert(game.ticks());
                if game.ticks() - since < RESTART_DELAY_TICKS {
                    continue;
                }
                summaries.push(summarize(&game, elapsed, true));
                match presenter.prompt.take() {
                    Some(prompt) => {
                        prompt.activate(&mut game);
                    }
                    None => game.request_restart(),
                }
                game_over_at = None;
                round_start = game.ticks();
            }
            GamePhase::Playing if elapsed >= MAX_ROUND_TICKS => {
                log::warn!("Round {} hit the tick limit", game.round());
                summaries.push(summarize(&game, elapsed, false));
                break;
            }
            GamePhase::Playing => {}
        }
    }

    let best_score = summaries.iter().map(|r| r.score).max().unwrap_or(0);
    Ok(SessionSummary {
        seed,
        rounds: summaries,
        best_score,
    })
}

fn summarize(game: &Game, ticks: u64, ended_by_hazard: bool) -> RoundSummary {
    RoundSummary {
        round: game.round(),
        level: game.state().level,
        score: game.state().score,
        ticks,
        ended_by_hazard,
    }
}

/// Run toward the nearest star, away from nearby bombs, and jump at
/// anything overhead
fn autopilot(game: &Game) -> TickInput {
    let player = game.player_entity();
    let entities = game.entities();

    let threat = entities
        .active(EntityKind::Hazard)
        .filter(|h| (h.pos - player.pos).length() < 90.0)
        .min_by(|a, b| {
            let da = (a.pos - player.pos).length_squared();
            let db = (b.pos - player.pos).length_squared();
            da.total_cmp(&db)
        });
    if let Some(hazard) = threat {
        let direction = if hazard.pos.x < player.pos.x {
            Direction::Right
        } else {
            Direction::Left
        };
        return TickInput {
            direction,
            jump: hazard.pos.y > player.pos.y,
            restart: false,
        };
    }

    let target = entities.active(EntityKind::Collectible).min_by(|a, b| {
        let da = (a.pos - player.pos).length_squared();
        let db = (b.pos - player.pos).length_squared();
        da.total_cmp(&db)
    });
    match target {
        Some(star) => {
            let dx = star.pos.x - player.pos.x;
            let direction = if dx < -4.0 {
                Direction::Left
            } else if dx > 4.0 {
                Direction::Right
            } else {
                Direction::None
            };
            TickInput {
                direction,
                jump: star.pos.y < player.pos.y - 40.0,
                restart: false,
            }
        }
        None => TickInput::default(),
    }
}
