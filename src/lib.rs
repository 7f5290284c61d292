//! Brick Breaker - a paddle-and-ball arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, level flow, snapshots)
//! - `audio`: Fire-and-forget cue sink the simulation reports into
//! - `tuning`: Data-driven game balance
//! - `game`: Controller facade driven by input intents and a fixed-rate clock

pub mod audio;
pub mod game;
pub mod sim;
pub mod tuning;

pub use audio::{AudioSink, Cue, LogAudio, MusicCommand, NullAudio};
pub use game::Game;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick every ~16ms)
    pub const TICK_SECONDS: f32 = 1.0 / 60.0;
    /// Maximum ticks per `Game::advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default arena dimensions (pixels)
    pub const ARENA_WIDTH: i32 = 600;
    pub const ARENA_HEIGHT: i32 = 660;

    /// Steering divisor is paddle width / this, never below 1
    pub const PADDLE_STEER_DIVISIONS: i32 = 8;
    /// Horizontal speed picked when a paddle hit would leave the ball going straight up
    pub const DEAD_CENTER_DX: i32 = 2;
}
