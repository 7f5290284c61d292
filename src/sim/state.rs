//! Game state and core simulation types
//!
//! The simulation owns every body collection exclusively. Bodies never point
//! back at the state; cross-body effects are reported upward as events.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::tuning::Tuning;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Ticks suspended, nothing reset
    Paused,
    /// Out of lives (terminal)
    GameOver,
    /// Final level cleared (terminal)
    Win,
}

/// Play surface dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub rect: Rect,
    /// Pixels per tick, signed
    pub vel: IVec2,
    /// Clones cost no life when lost
    pub is_clone: bool,
}

impl Ball {
    pub fn new(x: i32, y: i32, size: i32, vel: IVec2) -> Self {
        Self {
            rect: Rect::new(x, y, size, size),
            vel,
            is_clone: false,
        }
    }

    /// Velocity magnitude
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.as_vec2().length()
    }

    /// Advance by one tick of velocity
    pub fn step(&mut self) {
        self.rect.translate(self.vel);
    }

    /// Mirrored copy for the BALL_CLONE power-up
    pub fn mirrored_clone(&self, offset: i32) -> Ball {
        Ball {
            rect: Rect::new(
                self.rect.x() + offset,
                self.rect.y() + offset,
                self.rect.width(),
                self.rect.height(),
            ),
            vel: IVec2::new(-self.vel.x, self.vel.y),
            is_clone: true,
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    /// Width the paddle eases back to
    pub base_width: i32,
    /// Current speed multiplier (1.0 when no boost)
    pub speed_multiplier: f32,
    /// Ticks left on the speed boost
    pub speed_boost_ticks: u32,
    /// Ticks left before an enlarged paddle starts shrinking
    pub grow_ticks: u32,
}

impl Paddle {
    pub fn new(tuning: &Tuning, arena: Arena) -> Self {
        let mut paddle = Self {
            rect: Rect::new(0, 0, tuning.paddle_width, tuning.paddle_height),
            base_width: tuning.paddle_width,
            speed_multiplier: 1.0,
            speed_boost_ticks: 0,
            grow_ticks: 0,
        };
        paddle.reset_position(arena, tuning.paddle_bottom_offset);
        paddle
    }

    /// Centre horizontally and sit `bottom_offset` above the arena floor
    pub fn reset_position(&mut self, arena: Arena, bottom_offset: i32) {
        self.rect.pos.x = (arena.width - self.rect.width()) / 2;
        self.rect.pos.y = arena.height - bottom_offset;
        self.rect.clamp_x(arena.width);
    }

    /// Drop every boost and return to base width
    pub fn clear_boosts(&mut self) {
        let center = self.rect.center_x();
        self.rect.size.x = self.base_width;
        self.rect.pos.x = center - self.base_width / 2;
        self.speed_multiplier = 1.0;
        self.speed_boost_ticks = 0;
        self.grow_ticks = 0;
    }

    /// Pixels moved per tick while a direction is held
    pub fn move_amount(&self, base_speed: i32) -> i32 {
        ((base_speed as f32 * self.speed_multiplier).round() as i32).max(1)
    }

    /// Centre the paddle on an absolute x (pointer follow)
    pub fn center_on(&mut self, x: i32, arena_width: i32) {
        self.rect.pos.x = x - self.rect.width() / 2;
        self.rect.clamp_x(arena_width);
    }

    /// True while wider than base
    pub fn is_enlarged(&self) -> bool {
        self.rect.width() > self.base_width
    }

    /// PADDLE_SPEED: multiply speed for a fixed number of ticks
    pub fn apply_speed_boost(&mut self, multiplier: f32, ticks: u32) {
        self.speed_multiplier = multiplier;
        self.speed_boost_ticks = ticks;
    }

    /// PADDLE_GROW: widen around the current centre, capped at `max_width`
    pub fn apply_size_boost(&mut self, amount: i32, ticks: u32, max_width: i32, arena_width: i32) {
        self.set_width_centered((self.rect.width() + amount).min(max_width));
        self.rect.clamp_x(arena_width);
        self.grow_ticks = ticks;
    }

    /// Count down boosts; once the grow hold expires, ease back toward base
    pub fn update_boosts(&mut self, shrink_rate: i32, arena_width: i32) {
        if self.speed_boost_ticks > 0 {
            self.speed_boost_ticks -= 1;
            if self.speed_boost_ticks == 0 {
                self.speed_multiplier = 1.0;
            }
        }

        if self.grow_ticks > 0 {
            self.grow_ticks -= 1;
        } else if self.is_enlarged() {
            let width = (self.rect.width() - shrink_rate).max(self.base_width);
            self.set_width_centered(width);
            self.rect.clamp_x(arena_width);
        }
    }

    fn set_width_centered(&mut self, width: i32) {
        let center = self.rect.center_x();
        self.rect.size.x = width;
        self.rect.pos.x = center - width / 2;
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    PaddleGrow,
    PaddleSpeed,
    BallClone,
}

impl PowerUpKind {
    /// Rotation used when tagging bricks at level load
    pub const ROTATION: [PowerUpKind; 3] = [
        PowerUpKind::PaddleGrow,
        PowerUpKind::PaddleSpeed,
        PowerUpKind::BallClone,
    ];
}

/// A destructible brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    /// Packed 0xRRGGBB
    pub color: u32,
    pub destroyed: bool,
    /// Power-up released when destroyed
    pub power_up: Option<PowerUpKind>,
}

/// An indestructible obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub rect: Rect,
    pub color: u32,
}

/// A falling power-up capsule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub rect: Rect,
    pub kind: PowerUpKind,
    /// Downward pixels per tick
    pub fall_speed: i32,
}

impl PowerUp {
    /// Capsule of `size` centred on `center`
    pub fn new(kind: PowerUpKind, center: IVec2, size: i32, fall_speed: i32) -> Self {
        Self {
            rect: Rect::new(center.x - size / 2, center.y - size / 2, size, size),
            kind,
            fall_speed,
        }
    }

    pub fn step(&mut self) {
        self.rect.pos.y += self.fall_speed;
    }
}

/// Match scalars owned by the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub lives: u32,
    /// Monotonic within a session
    pub score: u64,
    /// 1-based
    pub level: u32,
    pub phase: GamePhase,
}

impl Session {
    pub fn new(lives: u32) -> Self {
        Self {
            lives,
            score: 0,
            level: 1,
            phase: GamePhase::Playing,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_win(&self) -> bool {
        self.phase == GamePhase::Win
    }

    /// Game over or win: nothing ticks until a restart
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver | GamePhase::Win)
    }
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Source of every random choice in the simulation
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub arena: Arena,
    pub session: Session,
    pub paddle: Paddle,
    /// Balls in play (list order is collision order)
    pub balls: Vec<Ball>,
    /// Live bricks; destroyed ones are removed at the end of each tick
    pub bricks: Vec<Brick>,
    pub walls: Vec<Wall>,
    pub power_ups: Vec<PowerUp>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create an empty state with the default ball set. Load a level before ticking.
    pub fn new(seed: u64, tuning: Tuning, arena: Arena) -> Self {
        let paddle = Paddle::new(&tuning, arena);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            session: Session::new(tuning.lives),
            tuning,
            arena,
            paddle,
            balls: Vec::new(),
            bricks: Vec::new(),
            walls: Vec::new(),
            power_ups: Vec::new(),
            time_ticks: 0,
        };
        state.reset_positions();
        state
    }

    /// Centre the paddle and replace every ball with the default ball set
    pub fn reset_positions(&mut self) {
        self.paddle
            .reset_position(self.arena, self.tuning.paddle_bottom_offset);
        self.balls.clear();
        self.spawn_default_balls();
    }

    /// Spawn `ball_count` balls just above the paddle, heading up.
    /// Always at least one ball, moving at least one pixel per tick.
    pub fn spawn_default_balls(&mut self) {
        let size = self.tuning.ball_size;
        let speed = self.tuning.ball_speed.max(1);
        let x = self.paddle.rect.center_x() - size / 2;
        for i in 0..self.tuning.ball_count.max(1) as i32 {
            let y = self.paddle.rect.y() - size - i * 2;
            let dx = if i % 2 == 0 {
                -speed + i % 3
            } else {
                speed - i % 3
            };
            self.balls.push(Ball::new(x, y, size, IVec2::new(dx, -speed)));
        }
    }

    /// Bricks not yet destroyed
    pub fn active_brick_count(&self) -> usize {
        self.bricks.iter().filter(|b| !b.destroyed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_default_ball_set() {
        let state = GameState::new(1, Tuning::default(), Arena::default());
        assert_eq!(state.balls.len(), 1);
        let ball = &state.balls[0];
        assert_eq!(ball.vel, IVec2::new(-5, -5));
        assert!(!ball.is_clone);
        // Sits on top of the paddle without overlapping it
        assert_eq!(ball.rect.bottom(), state.paddle.rect.y());
        assert!(!ball.rect.intersects(&state.paddle.rect));
    }

    #[test]
    fn test_default_ball_set_never_stalls() {
        let tuning = Tuning {
            ball_speed: 0,
            ball_count: 0,
            ..Tuning::default()
        };
        let state = GameState::new(1, tuning, Arena::default());
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.balls[0].vel, IVec2::new(-1, -1));
    }

    #[test]
    fn test_paddle_starts_centered() {
        let arena = Arena::default();
        let paddle = Paddle::new(&Tuning::default(), arena);
        assert_eq!(paddle.rect.x(), (arena.width - 100) / 2);
        assert_eq!(paddle.rect.y(), arena.height - 50);
    }

    #[test]
    fn test_multi_ball_set_alternates_direction() {
        let tuning = Tuning {
            ball_count: 3,
            ..Tuning::default()
        };
        let state = GameState::new(1, tuning, Arena::default());
        assert_eq!(state.balls.len(), 3);
        assert!(state.balls[0].vel.x < 0);
        assert!(state.balls[1].vel.x > 0);
        assert!(state.balls.iter().all(|b| b.vel.y < 0));
    }

    #[test]
    fn test_mirrored_clone() {
        let ball = Ball::new(100, 200, 12, IVec2::new(4, -6));
        let clone = ball.mirrored_clone(8);
        assert_eq!(clone.vel, IVec2::new(-4, -6));
        assert_eq!(clone.rect.pos, IVec2::new(108, 208));
        assert!(clone.is_clone);
    }

    #[test]
    fn test_speed_boost_expires() {
        let mut paddle = Paddle::new(&Tuning::default(), Arena::default());
        paddle.apply_speed_boost(1.8, 2);
        assert_eq!(paddle.move_amount(6), 11);
        paddle.update_boosts(2, 600);
        assert_eq!(paddle.speed_multiplier, 1.8);
        paddle.update_boosts(2, 600);
        assert_eq!(paddle.speed_multiplier, 1.0);
        assert_eq!(paddle.move_amount(6), 6);
    }

    #[test]
    fn test_move_amount_never_zero() {
        let paddle = Paddle::new(&Tuning::default(), Arena::default());
        assert_eq!(paddle.move_amount(0), 1);
    }

    #[test]
    fn test_grow_holds_then_eases_back() {
        let mut paddle = Paddle::new(&Tuning::default(), Arena::default());
        let center = paddle.rect.center_x();
        paddle.apply_size_boost(80, 3, 260, 600);
        assert_eq!(paddle.rect.width(), 180);
        assert_eq!(paddle.rect.center_x(), center);

        // Hold
        for _ in 0..3 {
            paddle.update_boosts(2, 600);
        }
        assert_eq!(paddle.rect.width(), 180);

        // Ease back gradually, not instantly
        paddle.update_boosts(2, 600);
        assert_eq!(paddle.rect.width(), 178);
        for _ in 0..100 {
            paddle.update_boosts(2, 600);
        }
        assert_eq!(paddle.rect.width(), 100);
        assert!(!paddle.is_enlarged());
    }

    #[test]
    fn test_grow_is_capped() {
        let mut paddle = Paddle::new(&Tuning::default(), Arena::default());
        for _ in 0..5 {
            paddle.apply_size_boost(80, 10, 260, 600);
        }
        assert_eq!(paddle.rect.width(), 260);
        assert!(paddle.rect.x() >= 0 && paddle.rect.right() <= 600);
    }

    #[test]
    fn test_power_up_centered_and_falls() {
        let mut pu = PowerUp::new(PowerUpKind::BallClone, IVec2::new(50, 50), 14, 3);
        assert_eq!(pu.rect.pos, IVec2::new(43, 43));
        pu.step();
        assert_eq!(pu.rect.y(), 46);
    }
}
