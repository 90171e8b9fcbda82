//! Breakout simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One tick per call, no wall-clock time
//! - Randomness only through an injected [`JitterSource`]
//! - Stable brick order (generation order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod jitter;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{
    WallHit, ball_out_of_bounds, ball_paddle_collision, ball_wall_collision, first_brick_hit,
    reflect_velocity,
};
pub use jitter::{FixedJitter, JitterSource, SeededJitter};
pub use rect::Rect;
pub use state::{Ball, Brick, GameEvent, GamePhase, GameState, Paddle, Playfield};
pub use tick::{TickInput, generate_bricks, tick};
