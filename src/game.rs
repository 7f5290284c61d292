//! Game controller
//!
//! Owns the simulation state, the level source and the audio sink. Hosts feed
//! it input intents and wall-clock time; it turns those into fixed-rate ticks
//! and hands back snapshots for drawing.

use crate::audio::{AudioSink, NullAudio};
use crate::consts::{MAX_SUBSTEPS, TICK_SECONDS};
use crate::sim::{
    Arena, GamePhase, GameState, LevelProvider, PatternLevels, Snapshot, TickInput, reflow,
    restart, select_level, tick, toggle_pause,
};
use crate::tuning::{Tuning, TuningError};

/// Longest frame gap fed into the accumulator, in seconds
const MAX_FRAME_SECONDS: f32 = 0.25;

pub struct Game<L: LevelProvider = PatternLevels, A: AudioSink = NullAudio> {
    state: GameState,
    levels: L,
    audio: A,
    input: TickInput,
    accumulator: f32,
}

impl Game {
    /// Stock levels, no audio
    pub fn with_defaults(seed: u64) -> Self {
        Game::start(seed, Tuning::default(), Arena::default(), PatternLevels, NullAudio)
    }
}

impl<L: LevelProvider, A: AudioSink> Game<L, A> {
    /// Build a game and start a session at level 1.
    ///
    /// Fails if `tuning` would leave the game without a moving ball.
    pub fn new(
        seed: u64,
        tuning: Tuning,
        arena: Arena,
        levels: L,
        audio: A,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::start(seed, tuning, arena, levels, audio))
    }

    fn start(seed: u64, tuning: Tuning, arena: Arena, levels: L, mut audio: A) -> Self {
        let mut state = GameState::new(seed, tuning, arena);
        restart(&mut state, &levels, &mut audio);
        log::info!("Game created with seed {}", seed);
        Self {
            state,
            levels,
            audio,
            input: TickInput::default(),
            accumulator: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn phase(&self) -> GamePhase {
        self.state.session.phase
    }

    pub fn set_moving_left(&mut self, held: bool) {
        self.input.move_left = held;
    }

    pub fn set_moving_right(&mut self, held: bool) {
        self.input.move_right = held;
    }

    /// Centre the paddle on `x` at the next tick
    pub fn set_paddle_target_x(&mut self, x: i32) {
        self.input.target_x = Some(x);
    }

    pub fn toggle_pause(&mut self) -> GamePhase {
        let phase = toggle_pause(&mut self.state, &mut self.audio);
        self.accumulator = 0.0;
        phase
    }

    pub fn restart(&mut self) {
        restart(&mut self.state, &self.levels, &mut self.audio);
        self.reset_clock();
    }

    pub fn select_level(&mut self, level: u32) {
        select_level(&mut self.state, level, &self.levels, &mut self.audio);
        self.reset_clock();
    }

    /// New surface size; the current level is rebuilt to fit
    pub fn reflow(&mut self, width: i32, height: i32) {
        reflow(&mut self.state, Arena::new(width, height), &self.levels);
        self.reset_clock();
    }

    /// Run exactly one tick
    pub fn step(&mut self) {
        tick(&mut self.state, &self.input, &self.levels, &mut self.audio);

        // Clear one-shot inputs after processing
        self.input.target_x = None;
    }

    /// Feed elapsed wall-clock time and run however many ticks are due.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if self.state.session.phase != GamePhase::Playing {
            self.accumulator = 0.0;
            return 0;
        }

        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_SECONDS);

        let mut substeps = 0;
        while self.accumulator >= TICK_SECONDS && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= TICK_SECONDS;
            substeps += 1;

            if self.state.session.phase != GamePhase::Playing {
                self.accumulator = 0.0;
                break;
            }
        }

        // Too far behind: drop the backlog instead of catching up
        if substeps == MAX_SUBSTEPS && self.accumulator >= TICK_SECONDS {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        substeps
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    fn reset_clock(&mut self) {
        self.accumulator = 0.0;
        self.input = TickInput::default();
    }
}
