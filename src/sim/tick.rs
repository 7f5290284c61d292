//! Discrete simulation tick and session transitions
//!
//! `tick` is the only thing that advances time. Pause, restart, level select
//! and reflow are applied between ticks by the controller.

use super::collision::resolve_collisions;
use super::level::LevelProvider;
use super::state::{Arena, GamePhase, GameState, PowerUp, PowerUpKind, Session};
use crate::audio::{AudioSink, Cue, MusicCommand};

/// Input intents for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move-left key held
    pub move_left: bool,
    /// Move-right key held
    pub move_right: bool,
    /// Centre the paddle on this x (pointer follow)
    pub target_x: Option<i32>,
}

/// Advance the game state by one tick
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    levels: &dyn LevelProvider,
    audio: &mut dyn AudioSink,
) {
    // Paused, game over and win all freeze the simulation
    if state.session.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    let width = state.arena.width;

    // Paddle
    let step = state.paddle.move_amount(state.tuning.paddle_speed);
    if let Some(x) = input.target_x {
        state.paddle.center_on(x, width);
    }
    if input.move_left {
        state.paddle.rect.pos.x -= step;
    }
    if input.move_right {
        state.paddle.rect.pos.x += step;
    }
    state
        .paddle
        .update_boosts(state.tuning.paddle_shrink_rate, width);
    state.paddle.rect.clamp_x(width);

    for power_up in &mut state.power_ups {
        power_up.step();
    }
    for ball in &mut state.balls {
        ball.step();
    }

    let report = resolve_collisions(
        &mut state.balls,
        &state.paddle,
        &mut state.bricks,
        &state.walls,
        state.arena,
        state.tuning.brick_score,
        &mut state.rng,
    );

    for cue in &report.cues {
        audio.play(*cue);
    }
    state.session.score += report.score;
    for spawn in &report.spawns {
        log::debug!("Spawning {:?} power-up at {}", spawn.kind, spawn.center);
        state.power_ups.push(PowerUp::new(
            spawn.kind,
            spawn.center,
            state.tuning.power_up_size,
            state.tuning.power_up_fall_speed,
        ));
    }
    state.bricks.retain(|b| !b.destroyed);

    if state.bricks.is_empty() {
        complete_level(state, levels, audio);
        return;
    }

    if remove_lost_balls(state, audio) {
        return;
    }

    collect_power_ups(state, audio);
}

/// Advance to the next level, or win after the last one
fn complete_level(state: &mut GameState, levels: &dyn LevelProvider, audio: &mut dyn AudioSink) {
    audio.play(Cue::Win);

    if state.session.level < state.tuning.max_levels {
        state.session.level += 1;
        log::info!(
            "Level {} cleared, score {}",
            state.session.level - 1,
            state.session.score
        );
        load_level(state, levels);
    } else {
        state.session.phase = GamePhase::Win;
        audio.music(MusicCommand::Stop);
        log::info!("Final level cleared, game won with score {}", state.session.score);
    }
}

/// Drop balls below the arena. Returns true if that ended the game.
fn remove_lost_balls(state: &mut GameState, audio: &mut dyn AudioSink) -> bool {
    let floor = state.arena.height;
    let lost: Vec<usize> = state
        .balls
        .iter()
        .enumerate()
        .filter(|(_, b)| b.rect.y() > floor)
        .map(|(i, _)| i)
        .collect();

    if lost.is_empty() {
        return false;
    }

    let lives_lost = lost.iter().filter(|&&i| !state.balls[i].is_clone).count() as u32;
    for &i in lost.iter().rev() {
        state.balls.remove(i);
    }

    state.session.lives = state.session.lives.saturating_sub(lives_lost);
    log::debug!(
        "{} ball(s) lost, {} cost a life, {} lives left",
        lost.len(),
        lives_lost,
        state.session.lives
    );

    if state.session.lives == 0 {
        state.session.phase = GamePhase::GameOver;
        audio.play(Cue::Lose);
        audio.music(MusicCommand::Stop);
        log::info!(
            "Game over on level {} with score {}",
            state.session.level,
            state.session.score
        );
        return true;
    }

    if state.balls.is_empty() {
        state.reset_positions();
    }
    false
}

/// Apply power-ups touching the paddle, discard ones that fell past it
fn collect_power_ups(state: &mut GameState, audio: &mut dyn AudioSink) {
    let paddle = state.paddle.rect;
    let floor = state.arena.height;
    let mut caught = Vec::new();

    state.power_ups.retain(|p| {
        if p.rect.intersects(&paddle) {
            caught.push(p.kind);
            false
        } else if p.rect.y() > floor {
            log::debug!("Missed {:?} power-up", p.kind);
            false
        } else {
            true
        }
    });

    for kind in caught {
        apply_power_up(state, kind);
        audio.play(Cue::MenuClick);
    }
}

/// Apply a caught power-up's effect
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    log::debug!("Caught {:?} power-up", kind);
    let tuning = &state.tuning;

    match kind {
        PowerUpKind::PaddleGrow => state.paddle.apply_size_boost(
            tuning.paddle_grow_amount,
            tuning.paddle_grow_ticks,
            tuning.paddle_max_width,
            state.arena.width,
        ),
        PowerUpKind::PaddleSpeed => state
            .paddle
            .apply_speed_boost(tuning.paddle_speed_multiplier, tuning.paddle_speed_ticks),
        PowerUpKind::BallClone => {
            let offset = tuning.clone_offset;
            let clones: Vec<_> = state
                .balls
                .iter()
                .map(|b| b.mirrored_clone(offset))
                .collect();
            state.balls.extend(clones);
        }
    }
}

/// Replace bricks and walls with the current level's layout and reset the ball set
pub fn load_level(state: &mut GameState, levels: &dyn LevelProvider) {
    let layout = levels.load_level(state.session.level, state.arena, &mut state.rng);
    if layout.bricks.is_empty() {
        log::warn!(
            "Level {} has no bricks, it will complete immediately",
            state.session.level
        );
    }
    log::info!(
        "Loaded level {}: {} bricks, {} walls",
        state.session.level,
        layout.bricks.len(),
        layout.walls.len()
    );

    state.bricks = layout.bricks;
    state.walls = layout.walls;
    state.power_ups.clear();
    state.reset_positions();
}

/// Flip between playing and paused. Terminal phases are left alone.
pub fn toggle_pause(state: &mut GameState, audio: &mut dyn AudioSink) -> GamePhase {
    match state.session.phase {
        GamePhase::Playing => {
            state.session.phase = GamePhase::Paused;
            audio.music(MusicCommand::Pause);
        }
        GamePhase::Paused => {
            state.session.phase = GamePhase::Playing;
            audio.music(MusicCommand::Resume);
        }
        GamePhase::GameOver | GamePhase::Win => {}
    }
    state.session.phase
}

/// Fresh session at level 1
pub fn restart(state: &mut GameState, levels: &dyn LevelProvider, audio: &mut dyn AudioSink) {
    start_session(state, 1, levels, audio);
}

/// Fresh session at the given level, clamped into `1..=max_levels`
pub fn select_level(
    state: &mut GameState,
    level: u32,
    levels: &dyn LevelProvider,
    audio: &mut dyn AudioSink,
) {
    let clamped = level.clamp(1, state.tuning.max_levels);
    if clamped != level {
        log::warn!("Level {} out of range, using {}", level, clamped);
    }
    start_session(state, clamped, levels, audio);
}

fn start_session(
    state: &mut GameState,
    level: u32,
    levels: &dyn LevelProvider,
    audio: &mut dyn AudioSink,
) {
    state.session = Session {
        level,
        ..Session::new(state.tuning.lives)
    };
    state.paddle.clear_boosts();
    load_level(state, levels);
    audio.music(MusicCommand::Play);
    log::info!("Session started at level {}", level);
}

/// Resize the play surface: rebuild the current level's geometry for the new
/// arena and put paddle and balls back in their starting places.
pub fn reflow(state: &mut GameState, arena: Arena, levels: &dyn LevelProvider) {
    log::info!(
        "Reflow {}x{} -> {}x{}",
        state.arena.width,
        state.arena.height,
        arena.width,
        arena.height
    );
    state.arena = arena;
    load_level(state, levels);
}
