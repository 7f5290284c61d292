//! Headless brick breaker driver
//!
//! Runs one session with an autopilot paddle and logs the outcome.
//!
//! Usage: `brick-breaker [tuning.json] [seed]`
//!
//! Set `BRICK_BREAKER_MUTE` to silence cue and music logging.

use brick_breaker::sim::{Arena, PatternLevels};
use brick_breaker::{Game, LogAudio, Tuning};

const DEFAULT_SEED: u64 = 12345;
/// Give up after this many ticks (~30 minutes of play)
const MAX_TICKS: u64 = 60 * 60 * 30;
/// Progress log interval
const REPORT_TICKS: u64 = 60 * 30;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Brick Breaker (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let seed = match args.next() {
        Some(s) => match s.parse() {
            Ok(seed) => seed,
            Err(_) => {
                log::warn!("Invalid seed {:?}, using {}", s, DEFAULT_SEED);
                DEFAULT_SEED
            }
        },
        None => DEFAULT_SEED,
    };

    let mut audio = LogAudio::new();
    audio.set_muted(std::env::var_os("BRICK_BREAKER_MUTE").is_some());

    let mut game = match Game::new(seed, tuning, Arena::default(), PatternLevels, audio) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            std::process::exit(1);
        }
    };

    let mut ticks = 0;
    while !game.state().session.is_terminal() && ticks < MAX_TICKS {
        autopilot(&mut game, ticks);
        game.step();
        ticks += 1;

        if ticks % REPORT_TICKS == 0 {
            let session = &game.state().session;
            log::info!(
                "t={}s level {} score {} lives {} balls {} bricks left {}",
                ticks / 60,
                session.level,
                session.score,
                session.lives,
                game.state().balls.len(),
                game.state().active_brick_count()
            );
        }
    }

    let hud = game.snapshot().hud;
    log::info!(
        "Finished after {} ticks: {:?} on level {}/{} with score {}",
        ticks,
        game.phase(),
        hud.level,
        hud.max_levels,
        hud.score
    );
    match serde_json::to_string_pretty(&hud) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize result: {}", e),
    }
}

/// Track the lowest descending ball, hitting it slightly off-centre so it
/// does not settle into a vertical loop
fn autopilot<L, A>(game: &mut Game<L, A>, ticks: u64)
where
    L: brick_breaker::sim::LevelProvider,
    A: brick_breaker::AudioSink,
{
    let state = game.state();
    let target = state
        .balls
        .iter()
        .filter(|b| b.vel.y > 0)
        .max_by_key(|b| b.rect.y())
        .or_else(|| state.balls.first())
        .map(|b| {
            let sway = ((ticks as f32 * 0.05).sin() * state.paddle.rect.width() as f32 * 0.3) as i32;
            b.rect.center_x() + sway
        });

    if let Some(x) = target {
        game.set_paddle_target_x(x);
    }
}
