//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One discrete tick at a time, driven from outside
//! - Seeded RNG only
//! - Stable iteration order (list order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod rect;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, PowerUpSpawn, rescale_to_speed, resolve_collisions};
pub use level::{LevelLayout, LevelProvider, PatternLevels};
pub use rect::Rect;
pub use snapshot::{BodyKind, BodyView, Hud, Snapshot};
pub use state::{
    Arena, Ball, Brick, GamePhase, GameState, Paddle, PowerUp, PowerUpKind, Session, Wall,
};
pub use tick::{TickInput, load_level, reflow, restart, select_level, tick, toggle_pause};
