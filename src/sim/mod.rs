//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - One `tick` per display frame, fixed per-frame deltas
//! - Seeded RNG only, so a seed replays a match exactly
//! - Wall-clock time enters only through explicit timestamps

pub mod ai;
pub mod collision;
pub mod state;
pub mod tick;
pub mod wheel;

pub use collision::{paddle_contact, reflect_walls, return_ball, spin_velocity};
pub use state::{
    Ball, Bubble, Direction, MatchEvent, MatchPhase, MatchSnapshot, MatchState, Paddle, Side,
};
pub use tick::{TickInput, tick};
pub use wheel::{POINTER_OFFSET, WheelPhase, WheelState, segment_at};
