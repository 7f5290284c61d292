//! Read-only render snapshot
//!
//! A flat, owned copy of everything a renderer needs. Bodies are one
//! homogeneous list tagged by kind, in back-to-front draw order.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{Arena, GameState, PowerUpKind};

/// What a body in the snapshot is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Brick,
    Wall,
    PowerUp,
    Ball,
    Paddle,
}

/// One drawable rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyView {
    pub kind: BodyKind,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    /// Fill colour for bricks and walls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    /// Power-up carried by a brick, or the kind of a falling capsule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_up: Option<PowerUpKind>,
    #[serde(default)]
    pub is_clone: bool,
}

impl BodyView {
    fn new(kind: BodyKind, rect: &Rect) -> Self {
        Self {
            kind,
            x: rect.x(),
            y: rect.y(),
            w: rect.width(),
            h: rect.height(),
            color: None,
            power_up: None,
            is_clone: false,
        }
    }
}

/// HUD scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub max_levels: u32,
    /// Ticks left before an enlarged paddle starts shrinking
    pub paddle_grow_ticks: u32,
    pub paddle_enlarged: bool,
    /// Ticks left on the paddle speed boost
    pub paddle_speed_ticks: u32,
    pub paused: bool,
    pub game_over: bool,
    pub win: bool,
}

/// Everything the renderer reads for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub arena: Arena,
    pub bodies: Vec<BodyView>,
    pub hud: Hud,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let mut bodies = Vec::with_capacity(
            state.bricks.len() + state.walls.len() + state.power_ups.len() + state.balls.len() + 1,
        );

        bodies.extend(state.bricks.iter().filter(|b| !b.destroyed).map(|b| BodyView {
            color: Some(b.color),
            power_up: b.power_up,
            ..BodyView::new(BodyKind::Brick, &b.rect)
        }));
        bodies.extend(state.walls.iter().map(|w| BodyView {
            color: Some(w.color),
            ..BodyView::new(BodyKind::Wall, &w.rect)
        }));
        bodies.extend(state.power_ups.iter().map(|p| BodyView {
            power_up: Some(p.kind),
            ..BodyView::new(BodyKind::PowerUp, &p.rect)
        }));
        bodies.extend(state.balls.iter().map(|b| BodyView {
            is_clone: b.is_clone,
            ..BodyView::new(BodyKind::Ball, &b.rect)
        }));
        bodies.push(BodyView::new(BodyKind::Paddle, &state.paddle.rect));

        let session = &state.session;
        Self {
            arena: state.arena,
            bodies,
            hud: Hud {
                score: session.score,
                lives: session.lives,
                level: session.level,
                max_levels: state.tuning.max_levels,
                paddle_grow_ticks: state.paddle.grow_ticks,
                paddle_enlarged: state.paddle.is_enlarged(),
                paddle_speed_ticks: state.paddle.speed_boost_ticks,
                paused: session.is_paused(),
                game_over: session.is_game_over(),
                win: session.is_win(),
            },
        }
    }

    /// Bodies of one kind, in draw order
    pub fn bodies_of(&self, kind: BodyKind) -> impl Iterator<Item = &BodyView> {
        self.bodies.iter().filter(move |b| b.kind == kind)
    }

    /// Serialize for a renderer on another thread or process
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
