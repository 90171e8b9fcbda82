//! Collision detection for the ball against walls, paddle and bricks
//!
//! All tests are point-in-region checks on the ball center after it has moved;
//! there is no swept collision and no position correction.

use glam::Vec2;

use super::state::{Ball, Brick, Paddle, Playfield};

/// Which walls the ball touched this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHit {
    /// Left or right wall
    pub side: bool,
    /// Top wall
    pub top: bool,
}

/// Check the ball against the left, right and top walls
///
/// The bottom edge is open: leaving through it is the loss condition, see
/// [`ball_out_of_bounds`].
pub fn ball_wall_collision(ball: &Ball, playfield: Playfield) -> WallHit {
    let width = playfield.width_f32();
    WallHit {
        side: ball.pos.x < ball.radius || ball.pos.x > width - ball.radius,
        top: ball.pos.y < ball.radius,
    }
}

/// Check if the ball has reached the paddle's top edge within its horizontal span
///
/// Only the vertical threshold is tested, so a ball below the paddle still
/// counts as a hit while it stays inside the span.
pub fn ball_paddle_collision(ball: &Ball, paddle: &Paddle) -> bool {
    ball.pos.y > paddle.pos.y - ball.radius && paddle.rect().spans_x(ball.pos.x)
}

/// Index of the first brick (storage order) whose box, grown by the ball
/// radius, contains the ball center
pub fn first_brick_hit(ball: &Ball, bricks: &[Brick]) -> Option<usize> {
    bricks
        .iter()
        .position(|brick| brick.rect.inflate(ball.radius).contains_point(ball.pos))
}

/// Check if the ball fell past the bottom of the playfield
pub fn ball_out_of_bounds(ball: &Ball, playfield: Playfield) -> bool {
    ball.pos.y > playfield.height_f32()
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n. With an axis normal this flips
/// exactly one component.
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
