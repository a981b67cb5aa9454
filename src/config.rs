//! Game tuning parameters.
//!
//! The defaults reproduce the classic 360×640 layout; every value is in
//! logical playfield units (not terminal cells).

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Playfield
    pub const FRAME_WIDTH: i32 = 360;
    pub const FRAME_HEIGHT: i32 = 640;

    // Player
    pub const PLAYER_WIDTH: i32 = 34;
    pub const PLAYER_HEIGHT: i32 = 24;

    // Pipes
    pub const PIPE_WIDTH: i32 = 64;
    pub const PIPE_HEIGHT: i32 = 512;
    pub const PIPE_START_Y: i32 = 0;
    pub const PIPE_VELOCITY_X: i32 = -4;

    // Physics
    pub const GRAVITY: i32 = 1;
    pub const FLAP_VELOCITY: i32 = -10;

    // Timers
    pub const TICK_INTERVAL_MS: u64 = 1000 / 60; // ~60 Hz
    pub const SPAWN_INTERVAL_MS: u64 = 3500;
}

/// Runtime configuration. Built from [`Params`] by `Default`; tests build
/// their own to shrink the playfield or change the physics.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub frame_width: i32,
    pub frame_height: i32,
    pub player_width: i32,
    pub player_height: i32,
    pub pipe_width: i32,
    pub pipe_height: i32,
    pub pipe_start_y: i32,
    pub pipe_velocity_x: i32,
    pub gravity: i32,
    pub flap_velocity: i32,
    pub tick_interval: Duration,
    pub spawn_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_width: Params::FRAME_WIDTH,
            frame_height: Params::FRAME_HEIGHT,
            player_width: Params::PLAYER_WIDTH,
            player_height: Params::PLAYER_HEIGHT,
            pipe_width: Params::PIPE_WIDTH,
            pipe_height: Params::PIPE_HEIGHT,
            pipe_start_y: Params::PIPE_START_Y,
            pipe_velocity_x: Params::PIPE_VELOCITY_X,
            gravity: Params::GRAVITY,
            flap_velocity: Params::FLAP_VELOCITY,
            tick_interval: Duration::from_millis(Params::TICK_INTERVAL_MS),
            spawn_interval: Duration::from_millis(Params::SPAWN_INTERVAL_MS),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Player spawn column: one eighth of the way across.
    pub fn player_start_x(&self) -> i32 {
        self.frame_width / 8
    }

    /// Player spawn row: the vertical centre.
    pub fn player_start_y(&self) -> i32 {
        self.frame_height / 2
    }

    /// Vertical opening between the upper and lower pipe of a pair.
    pub fn gap_height(&self) -> i32 {
        self.frame_height / 4
    }
}
