//! Game state and core simulation types
//!
//! Everything the simulation step reads or writes lives in [`GameState`]; the
//! host owns one value and replaces it wholesale on restart or resize.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball in motion, ticks advance
    #[default]
    Playing,
    /// Every brick destroyed
    Cleared,
    /// Ball fell past the bottom of the playfield
    Lost,
}

/// Something notable that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off the left or right wall
    WallBounce,
    /// Ball bounced off the top wall
    CeilingBounce,
    /// Ball bounced off the paddle
    PaddleHit,
    /// Brick at `index` (storage order before removal) was destroyed
    BrickDestroyed { index: usize, color: u8 },
    /// Last brick destroyed
    Cleared,
    /// Ball fell past the paddle
    BallLost,
}

/// Drawing surface bounds in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: u32,
    pub height: u32,
}

impl Playfield {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn width_f32(&self) -> f32 {
        self.width as f32
    }

    #[inline]
    pub fn height_f32(&self) -> f32 {
        self.height as f32
    }

    /// Number of brick columns that fit across the playfield
    pub fn columns(&self) -> u32 {
        (self.width_f32() / (BRICK_WIDTH + BRICK_GAP)).floor() as u32
    }

    /// Check if an x coordinate is inside the playfield (edges included)
    pub fn contains_x(&self, x: f32) -> bool {
        x >= 0.0 && x <= self.width_f32()
    }
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// Ball at the center of the playfield with the start velocity
    pub fn centered(playfield: Playfield) -> Self {
        Self {
            pos: Vec2::new(playfield.width_f32() / 2.0, playfield.height_f32() / 2.0),
            vel: Vec2::new(BALL_START_VEL.0, BALL_START_VEL.1),
            radius: BALL_RADIUS,
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// Paddle centered horizontally, a fixed distance above the bottom edge
    pub fn centered(playfield: Playfield) -> Self {
        Self {
            pos: Vec2::new(
                playfield.width_f32() / 2.0 - PADDLE_WIDTH / 2.0,
                playfield.height_f32() - PADDLE_BOTTOM_OFFSET,
            ),
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// Center the paddle under a pointer x coordinate
    pub fn track(&mut self, pointer_x: f32) {
        self.pos.x = pointer_x - self.width / 2.0;
    }
}

/// A destructible brick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    /// Index into [`BRICK_PALETTE`]
    pub color: u8,
}

impl Brick {
    /// Brick color as 0xRRGGBB
    pub fn rgb(&self) -> u32 {
        BRICK_PALETTE[self.color as usize % BRICK_PALETTE.len()]
    }
}

/// Complete game state (serializable snapshot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub playfield: Playfield,
    pub ball: Ball,
    pub paddle: Paddle,
    /// Remaining bricks in generation order (row-major)
    pub bricks: Vec<Brick>,
    pub phase: GamePhase,
    /// Ticks advanced since restart
    pub ticks: u64,
    /// Events produced by the most recent tick
    #[serde(default)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh game for the given playfield (used for restart and resize)
    pub fn new(playfield: Playfield) -> Self {
        let bricks = super::tick::generate_bricks(playfield);
        log::info!(
            "New game {}x{}: {} rows x {} columns ({} bricks)",
            playfield.width,
            playfield.height,
            BRICK_ROWS,
            playfield.columns(),
            bricks.len()
        );

        Self {
            playfield,
            ball: Ball::centered(playfield),
            paddle: Paddle::centered(playfield),
            bricks,
            phase: GamePhase::Playing,
            ticks: 0,
            events: Vec::new(),
        }
    }

    /// All bricks destroyed
    pub fn is_cleared(&self) -> bool {
        self.phase == GamePhase::Cleared
    }

    /// No further ticks should be requested until restart
    pub fn is_stopped(&self) -> bool {
        self.phase != GamePhase::Playing
    }
}
