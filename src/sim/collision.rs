//! Collision detection and response for axis-aligned bodies
//!
//! Per ball, in order: indestructible walls, arena edges, paddle, bricks.
//! Every directional change is followed by a rescale back to the ball's
//! pre-collision speed, so rounding never pumps energy in or out.
//!
//! The engine mutates balls and marks bricks destroyed. Everything else
//! (score, cues, spawns) is reported to the caller in a `CollisionReport`.

use glam::IVec2;
use rand::Rng;

use super::rect::Rect;
use super::state::{Arena, Ball, Brick, Paddle, PowerUpKind, Wall};
use crate::audio::Cue;
use crate::consts::{DEAD_CENTER_DX, PADDLE_STEER_DIVISIONS};

/// Power-up released by a destroyed brick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerUpSpawn {
    pub kind: PowerUpKind,
    /// Centre of the brick that carried it
    pub center: IVec2,
}

/// Everything a collision pass produced besides ball motion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Cue requests, in the order they happened
    pub cues: Vec<Cue>,
    /// Indices into the brick list destroyed this pass
    pub destroyed: Vec<usize>,
    pub spawns: Vec<PowerUpSpawn>,
    pub score: u64,
}

/// Run one collision pass over every ball
pub fn resolve_collisions<R: Rng>(
    balls: &mut [Ball],
    paddle: &Paddle,
    bricks: &mut [Brick],
    walls: &[Wall],
    arena: Arena,
    brick_score: u64,
    rng: &mut R,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    for ball in balls.iter_mut() {
        for wall in walls {
            if ball_wall_collision(ball, &wall.rect) {
                report.cues.push(Cue::BallHit);
            }
        }

        report.cues.extend(ball_arena_collision(ball, arena));

        if ball.rect.intersects(&paddle.rect) {
            paddle_bounce(ball, &paddle.rect, rng);
            report.cues.push(Cue::BallHit);
        }

        if let Some(index) = ball_brick_collision(ball, bricks) {
            let brick = &bricks[index];
            report.cues.push(Cue::BoxHit);
            report.score += brick_score;
            report.destroyed.push(index);
            if let Some(kind) = brick.power_up {
                report.spawns.push(PowerUpSpawn {
                    kind,
                    center: brick.rect.center(),
                });
            }
        }
    }

    report
}

/// Bounce off an indestructible wall. Returns true on contact.
///
/// The bounce axis comes from where the ball was before this tick's move:
/// if it was fully above or below the wall, the hit is vertical; otherwise
/// horizontal. The ball is put back on that axis so it cannot stay embedded.
pub fn ball_wall_collision(ball: &mut Ball, wall: &Rect) -> bool {
    if !ball.rect.intersects(wall) {
        return false;
    }

    let prev_top = ball.rect.y() - ball.vel.y;
    let prev_bottom = ball.rect.bottom() - ball.vel.y;
    let vertical = prev_bottom <= wall.y() || prev_top >= wall.bottom();

    if vertical {
        ball.rect.pos.y -= ball.vel.y;
        ball.vel.y = -ball.vel.y;
    } else {
        ball.rect.pos.x -= ball.vel.x;
        ball.vel.x = -ball.vel.x;
    }
    true
}

/// Clamp against the left, right and top arena edges.
///
/// The bottom is open; losing a ball is the controller's business.
pub fn ball_arena_collision(ball: &mut Ball, arena: Arena) -> Vec<Cue> {
    let mut cues = Vec::new();

    if ball.rect.x() <= 0 {
        ball.rect.pos.x = 0;
        ball.vel.x = ball.vel.x.abs();
        cues.push(Cue::BallHit);
    }
    if ball.rect.right() >= arena.width {
        ball.rect.pos.x = (arena.width - ball.rect.width()).max(0);
        ball.vel.x = -ball.vel.x.abs();
        cues.push(Cue::BallHit);
    }
    if ball.rect.y() <= 0 {
        ball.rect.pos.y = 0;
        ball.vel.y = ball.vel.y.abs();
        cues.push(Cue::BallHit);
    }

    cues
}

/// Horizontal steering from where the ball struck the paddle.
///
/// Proportional to the offset from the paddle centre. A dead-centre hit
/// picks ±2 at random so the ball never loops straight up and down.
pub fn paddle_steer_dx<R: Rng>(ball: &Rect, paddle: &Rect, rng: &mut R) -> i32 {
    let diff = ball.center_x() - paddle.center_x();
    let divisor = (paddle.width() / PADDLE_STEER_DIVISIONS).max(1);
    match diff / divisor {
        0 if rng.random_bool(0.5) => -DEAD_CENTER_DX,
        0 => DEAD_CENTER_DX,
        dx => dx,
    }
}

/// Send the ball back up off the paddle at its pre-collision speed
pub fn paddle_bounce<R: Rng>(ball: &mut Ball, paddle: &Rect, rng: &mut R) {
    ball.rect.pos.y = (paddle.y() - ball.rect.height() - 1).max(0);

    let prev_speed = ball.speed();
    let dx = paddle_steer_dx(&ball.rect, paddle, rng);
    let dy = -ball.vel.y.abs().max(1);

    let mut vel = rescale_to_speed(IVec2::new(dx, dy), prev_speed);
    if vel.y >= 0 {
        vel.y = -1;
    }
    ball.vel = vel;
}

/// Destroy the first live brick the ball overlaps (list order) and bounce.
///
/// At most one brick per ball per pass. Returns its index.
pub fn ball_brick_collision(ball: &mut Ball, bricks: &mut [Brick]) -> Option<usize> {
    let index = bricks
        .iter()
        .position(|b| !b.destroyed && b.rect.intersects(&ball.rect))?;

    bricks[index].destroyed = true;

    let speed = ball.speed();
    ball.vel.y = -ball.vel.y;
    ball.vel = rescale_to_speed(ball.vel, speed);

    Some(index)
}

/// Scale a direction to the given speed, rounding to whole pixels.
///
/// Never returns a stationary velocity: a zero direction, or one that rounds
/// to zero, becomes a straight-up velocity of at least one pixel per tick.
pub fn rescale_to_speed(direction: IVec2, speed: f32) -> IVec2 {
    let fallback = IVec2::new(0, -(speed.round() as i32).max(1));

    let current = direction.as_vec2().length();
    if current <= f32::EPSILON {
        return fallback;
    }

    let scaled = (direction.as_vec2() * (speed / current)).round().as_ivec2();
    if scaled == IVec2::ZERO { fallback } else { scaled }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn paddle() -> Paddle {
        Paddle::new(&Tuning::default(), Arena::default())
    }

    fn brick(x: i32, y: i32) -> Brick {
        Brick {
            rect: Rect::new(x, y, 30, 30),
            color: 0xFF5D5D,
            destroyed: false,
            power_up: None,
        }
    }

    #[test]
    fn test_scenario_a_dead_center_paddle_hit() {
        let paddle = paddle();
        let mut rng = Pcg32::seed_from_u64(7);

        // Ball centred on the paddle, overlapping its top edge
        let x = paddle.rect.center_x() - 6;
        let mut ball = Ball::new(x, paddle.rect.y() - 6, 12, IVec2::new(5, -5));
        assert!(ball.rect.intersects(&paddle.rect));

        let steer = paddle_steer_dx(&ball.rect, &paddle.rect, &mut rng.clone());
        assert!(steer == 2 || steer == -2);

        paddle_bounce(&mut ball, &paddle.rect, &mut rng);
        assert!(ball.vel.y < 0);
        assert_ne!(ball.vel.x, 0);
        assert_eq!(ball.vel.x.signum(), steer.signum());
        assert!((ball.speed() - 50f32.sqrt()).abs() <= 1.0);
        // Repositioned just above the paddle
        assert_eq!(ball.rect.bottom(), paddle.rect.y() - 1);
    }

    #[test]
    fn test_paddle_offset_steers_toward_side() {
        let paddle = paddle();
        let mut rng = Pcg32::seed_from_u64(1);

        let mut right = Ball::new(paddle.rect.right() - 8, paddle.rect.y(), 12, IVec2::new(-3, 6));
        paddle_bounce(&mut right, &paddle.rect, &mut rng);
        assert!(right.vel.x > 0);

        let mut left = Ball::new(paddle.rect.x() - 4, paddle.rect.y(), 12, IVec2::new(3, 6));
        paddle_bounce(&mut left, &paddle.rect, &mut rng);
        assert!(left.vel.x < 0);
    }

    #[test]
    fn test_steering_divisor_never_zero() {
        let tiny = Rect::new(100, 500, 3, 10);
        let ball = Rect::new(110, 490, 12, 12);
        let mut rng = Pcg32::seed_from_u64(1);
        // Width 3 / 8 == 0 would divide by zero without the floor of 1
        assert_eq!(paddle_steer_dx(&ball, &tiny, &mut rng), 15);
    }

    #[test]
    fn test_scenario_b_left_edge() {
        let mut ball = Ball::new(0, 100, 12, IVec2::new(-3, 4));
        let cues = ball_arena_collision(&mut ball, Arena::default());
        assert_eq!(ball.rect.x(), 0);
        assert_eq!(ball.vel.x, 3);
        assert_eq!(cues, vec![Cue::BallHit]);
    }

    #[test]
    fn test_right_and_top_edges() {
        let arena = Arena::default();
        let mut ball = Ball::new(arena.width - 5, -4, 12, IVec2::new(6, -6));
        let cues = ball_arena_collision(&mut ball, arena);
        assert_eq!(ball.rect.right(), arena.width);
        assert_eq!(ball.rect.y(), 0);
        assert_eq!(ball.vel, IVec2::new(-6, 6));
        assert_eq!(cues.len(), 2);
    }

    #[test]
    fn test_no_bottom_bounce() {
        let arena = Arena::default();
        let mut ball = Ball::new(100, arena.height + 10, 12, IVec2::new(2, 5));
        let cues = ball_arena_collision(&mut ball, arena);
        assert!(cues.is_empty());
        assert_eq!(ball.vel, IVec2::new(2, 5));
    }

    #[test]
    fn test_wall_vertical_bounce() {
        let wall = Rect::new(100, 100, 30, 30);
        // Was above the wall last tick, moved down into it
        let mut ball = Ball::new(105, 92, 12, IVec2::new(2, 5));
        assert!(ball_wall_collision(&mut ball, &wall));
        assert_eq!(ball.vel, IVec2::new(2, -5));
        assert!(!ball.rect.intersects(&wall));
    }

    #[test]
    fn test_wall_horizontal_bounce() {
        let wall = Rect::new(100, 100, 30, 30);
        // Level with the wall, moved right into its left face
        let mut ball = Ball::new(92, 110, 12, IVec2::new(5, 1));
        assert!(ball_wall_collision(&mut ball, &wall));
        assert_eq!(ball.vel, IVec2::new(-5, 1));
        assert!(!ball.rect.intersects(&wall));
    }

    #[test]
    fn test_wall_corner_tie_bounces_vertically() {
        let wall = Rect::new(100, 100, 30, 30);
        // Was fully above and fully left of the wall, moved diagonally into its corner
        let mut ball = Ball::new(92, 92, 12, IVec2::new(5, 5));
        assert!(ball.rect.intersects(&wall));
        assert!(ball_wall_collision(&mut ball, &wall));
        assert_eq!(ball.vel, IVec2::new(5, -5));
        assert_eq!(ball.rect.pos, IVec2::new(92, 87));
    }

    #[test]
    fn test_wall_miss() {
        let wall = Rect::new(100, 100, 30, 30);
        let mut ball = Ball::new(10, 10, 12, IVec2::new(5, 5));
        assert!(!ball_wall_collision(&mut ball, &wall));
        assert_eq!(ball.vel, IVec2::new(5, 5));
    }

    #[test]
    fn test_one_brick_per_ball_per_pass() {
        let mut bricks = vec![brick(100, 100), brick(110, 100)];
        let mut ball = Ball::new(108, 110, 12, IVec2::new(3, -4));
        let hit = ball_brick_collision(&mut ball, &mut bricks);
        assert_eq!(hit, Some(0));
        assert!(bricks[0].destroyed);
        assert!(!bricks[1].destroyed);
        assert_eq!(ball.vel, IVec2::new(3, 4));
    }

    #[test]
    fn test_destroyed_brick_never_recollides() {
        let mut bricks = vec![brick(100, 100)];
        bricks[0].destroyed = true;
        let mut ball = Ball::new(105, 105, 12, IVec2::new(3, -4));
        assert_eq!(ball_brick_collision(&mut ball, &mut bricks), None);
        assert_eq!(ball.vel, IVec2::new(3, -4));
    }

    #[test]
    fn test_report_collects_score_and_spawns() {
        let paddle = paddle();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut bricks = vec![brick(100, 100)];
        bricks[0].power_up = Some(PowerUpKind::BallClone);
        let mut balls = vec![Ball::new(105, 105, 12, IVec2::new(3, -4))];

        let report = resolve_collisions(
            &mut balls,
            &paddle,
            &mut bricks,
            &[],
            Arena::default(),
            100,
            &mut rng,
        );

        assert_eq!(report.score, 100);
        assert_eq!(report.destroyed, vec![0]);
        assert_eq!(report.cues, vec![Cue::BoxHit]);
        assert_eq!(
            report.spawns,
            vec![PowerUpSpawn {
                kind: PowerUpKind::BallClone,
                center: IVec2::new(115, 115),
            }]
        );
    }

    #[test]
    fn test_rescale_fallback_points_up() {
        assert_eq!(rescale_to_speed(IVec2::ZERO, 4.2), IVec2::new(0, -4));
        assert_eq!(rescale_to_speed(IVec2::ZERO, 0.0), IVec2::new(0, -1));
        assert_eq!(rescale_to_speed(IVec2::new(1, 1), 0.2), IVec2::new(0, -1));
    }

    #[test]
    fn test_rescale_keeps_direction() {
        let v = rescale_to_speed(IVec2::new(3, -4), 10.0);
        assert_eq!(v, IVec2::new(6, -8));
    }

    proptest! {
        #[test]
        fn prop_paddle_bounce_preserves_speed(
            dx in -40i32..=40,
            dy in -40i32..=40,
            offset in -60i32..=60,
            width in 20i32..=260,
            seed in any::<u64>(),
        ) {
            let before = IVec2::new(dx, dy).as_vec2().length();
            prop_assume!(before >= 2.0);

            let paddle = Rect::new(200, 600, width, 18);
            let mut ball = Ball::new(paddle.center_x() + offset - 6, 595, 12, IVec2::new(dx, dy));
            let mut rng = Pcg32::seed_from_u64(seed);
            paddle_bounce(&mut ball, &paddle, &mut rng);

            prop_assert!(ball.vel.y < 0);
            prop_assert!((ball.speed() - before).abs() <= 1.0);
        }

        #[test]
        fn prop_brick_bounce_preserves_speed(dx in -40i32..=40, dy in -40i32..=40) {
            let before = IVec2::new(dx, dy).as_vec2().length();
            prop_assume!(before >= 2.0);

            let mut bricks = vec![brick(100, 100)];
            let mut ball = Ball::new(105, 105, 12, IVec2::new(dx, dy));
            prop_assert_eq!(ball_brick_collision(&mut ball, &mut bricks), Some(0));
            prop_assert!((ball.speed() - before).abs() <= 1.0);
        }

        #[test]
        fn prop_boundary_containment(
            x in -60i32..=660,
            y in -60i32..=640,
            dx in -20i32..=20,
            dy in -20i32..=20,
            seed in any::<u64>(),
        ) {
            let arena = Arena::default();
            let paddle = paddle();
            let mut balls = vec![Ball::new(x, y, 12, IVec2::new(dx, dy))];
            let mut rng = Pcg32::seed_from_u64(seed);
            resolve_collisions(&mut balls, &paddle, &mut [], &[], arena, 100, &mut rng);

            let ball = &balls[0];
            prop_assert!(ball.rect.x() >= 0);
            prop_assert!(ball.rect.right() <= arena.width);
            prop_assert!(ball.rect.y() >= 0);
        }
    }
}
