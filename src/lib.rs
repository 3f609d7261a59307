//! Sorry Pong - a link-encoded apology game
//!
//! Core modules:
//! - `codec`: Invite token encoding with backward-compatible decoding
//! - `sim`: Frame-driven simulation (Pong match, AI, prize wheel)
//! - `flow`: Play page state machine driven by A/B buttons and the d-pad
//! - `platform`: Clipboard and browser bindings
//! - `tuning`: Data-driven game balance
//! - `i18n`: Localized string lookups

pub mod codec;
pub mod flow;
pub mod i18n;
pub mod invite;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use codec::{decode, encode};
pub use flow::{EndPhase, PlayFlow, Screen};
pub use invite::{Category, GameInvite, Locale, PrizeList};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Default court size (pixels)
    pub const COURT_WIDTH: f32 = 400.0;
    pub const COURT_HEIGHT: f32 = 300.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 10.0;
    pub const PADDLE_HEIGHT: f32 = 60.0;
    pub const PADDLE_MARGIN: f32 = 10.0;
    /// Player paddle speed (pixels per frame)
    pub const PLAYER_SPEED: f32 = 8.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 10.0;
    /// Horizontal serve speed (pixels per frame)
    pub const SERVE_SPEED: f32 = 4.0;
    /// Cap on horizontal ball speed so rallies cannot outrun the court
    pub const MAX_BALL_SPEED: f32 = 16.0;

    /// Chance per frame that the AI moves away from the ball
    pub const AI_WRONG_DIRECTION_PROBABILITY: f64 = 0.15;
    /// Minimum gap between AI popups (ms)
    pub const BUBBLE_COOLDOWN_MS: f64 = 1500.0;
    /// Points needed to win
    pub const WINNING_SCORE: u32 = 10;

    /// Slices on the prize wheel
    pub const WHEEL_SEGMENTS: usize = 6;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_turn(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(std::f64::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f64::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Cubic ease-out, `1 - (1 - t)^3`, with `t` clamped to [0, 1]
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}
