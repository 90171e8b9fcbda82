//! Canvas Breakout - a single-screen brick breaker
//!
//! Core modules:
//! - `sim`: Pure simulation step (ball, paddle, bricks, win/loss)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Persisted host preferences

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Velocity after every restart (units per tick, y grows downward)
    pub const BALL_START_VEL: (f32, f32) = (10.0, -10.0);
    /// Maximum magnitude of the horizontal kick on paddle/brick hits
    pub const JITTER_AMPLITUDE: f32 = 1.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Distance from the bottom of the playfield to the paddle's top edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 50.0;

    /// Brick grid
    pub const BRICK_ROWS: u32 = 5;
    pub const BRICK_WIDTH: f32 = 50.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    /// Spacing between neighbouring bricks, both axes
    pub const BRICK_GAP: f32 = 10.0;
    pub const BRICK_LEFT_OFFSET: f32 = 5.0;
    pub const BRICK_TOP_OFFSET: f32 = 30.0;

    /// Brick colors as 0xRRGGBB, assigned cyclically across the grid
    pub const BRICK_PALETTE: [u32; 10] = [
        0xFF5733, 0x33FF57, 0x3357FF, 0xFF33A1, 0xA133FF, 0x33FFF5, 0xF5FF33, 0xFF8C33, 0x8C33FF,
        0x33FF8C,
    ];

    /// Vertical space the host reserves below the canvas for the restart button
    pub const CONTROLS_HEIGHT: u32 = 50;

    /// Text overlaid once every brick is gone
    pub const CLEAR_MESSAGE: &str = "!!Clear!!";
}
