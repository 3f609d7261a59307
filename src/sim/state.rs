//! Match state and core simulation types
//!
//! A `MatchState` lives for one play session and is never persisted.
//! Screen coordinates: origin top-left, y grows downward.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::MatchTuning;

/// Which player a point or a win belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Human on the left paddle
    Recipient,
    /// AI on the right paddle
    Sender,
}

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "phase")]
pub enum MatchPhase {
    /// Waiting for the start action
    Idle,
    /// Frames are being simulated
    Running,
    /// A side reached the winning score
    Over { winner: Side },
}

/// Held direction of the player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    #[default]
    None,
}

impl Direction {
    /// Sign of the y motion in screen space
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Up => -1.0,
            Direction::Down => 1.0,
            Direction::None => 0.0,
        }
    }
}

/// The ball (position is its center)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// A paddle, tracked by the y of its top edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub y: f32,
}

impl Paddle {
    pub fn center(&self, height: f32) -> f32 {
        self.y + height / 2.0
    }
}

/// Transient popup text anchored near the AI paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// Emitted for a recipient point rather than an AI return
    pub celebration: bool,
}

/// Things that happened during a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    PaddleHit { side: Side },
    Point { scorer: Side },
    Bubble(Bubble),
    MatchOver { winner: Side },
}

/// Everything the presentation shell needs to draw a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub phase: MatchPhase,
    pub court_width: f32,
    pub court_height: f32,
    pub ball_x: f32,
    pub ball_y: f32,
    pub player_y: f32,
    pub ai_y: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub ball_size: f32,
    pub recipient_score: u32,
    pub sender_score: u32,
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct MatchState {
    pub tuning: MatchTuning,
    pub rng: Pcg32,
    pub phase: MatchPhase,
    pub ball: Ball,
    /// Left paddle, human controlled
    pub player: Paddle,
    /// Right paddle, AI controlled
    pub ai: Paddle,
    pub input: Direction,
    pub recipient_score: u32,
    pub sender_score: u32,
    /// Timestamp (ms) of the last AI popup
    pub last_bubble_ms: Option<f64>,
    /// Frames simulated while running
    pub frames: u64,
    /// Popup texts for the active locale and category
    bubbles: Vec<String>,
}

impl MatchState {
    /// Create a new match with the given seed
    pub fn new(tuning: MatchTuning, bubbles: Vec<String>, seed: u64) -> Self {
        let mut state = Self {
            rng: Pcg32::seed_from_u64(seed),
            phase: MatchPhase::Idle,
            ball: Ball {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
            },
            player: Paddle { y: 0.0 },
            ai: Paddle { y: 0.0 },
            input: Direction::None,
            recipient_score: 0,
            sender_score: 0,
            last_bubble_ms: None,
            frames: 0,
            bubbles,
            tuning,
        };

        state.center_paddles();
        state.reset_ball();
        // First serve always heads for the AI
        state.ball.vel.x = state.ball.vel.x.abs();
        state
    }

    /// A court with no area cannot be simulated
    pub fn is_degenerate(&self) -> bool {
        !(self.tuning.court_width > 0.0 && self.tuning.court_height > 0.0)
    }

    /// Resize the court (e.g. canvas resize), keeping paddles in bounds
    pub fn resize(&mut self, width: f32, height: f32) {
        self.tuning.court_width = width;
        self.tuning.court_height = height;
        if self.is_degenerate() {
            return;
        }
        self.player.y = self.clamp_paddle(self.player.y);
        self.ai.y = self.clamp_paddle(self.ai.y);
        let half = self.tuning.ball_size / 2.0;
        self.ball.pos = self.ball.pos.clamp(
            Vec2::new(0.0, half),
            Vec2::new(width, (height - half).max(half)),
        );
    }

    pub fn center_paddles(&mut self) {
        let y = (self.tuning.court_height - self.tuning.paddle_height) / 2.0;
        self.player.y = y.max(0.0);
        self.ai.y = y.max(0.0);
    }

    /// Keep a paddle's top edge inside the court
    pub fn clamp_paddle(&self, y: f32) -> f32 {
        let max = (self.tuning.court_height - self.tuning.paddle_height).max(0.0);
        y.clamp(0.0, max)
    }

    /// Serve from the center with a random direction and vertical speed
    pub fn reset_ball(&mut self) {
        let t = &self.tuning;
        let center = Vec2::new(t.court_width / 2.0, t.court_height / 2.0);
        let half_range = t.serve_vertical_range.abs() / 2.0;
        let vx = if self.rng.random_bool(0.5) {
            t.serve_speed
        } else {
            -t.serve_speed
        };
        let vy = self.rng.random_range(-half_range..=half_range);
        self.ball = Ball {
            pos: center,
            vel: Vec2::new(vx, vy),
        };
    }

    /// Pick a popup text uniformly at random
    pub fn random_bubble_text(&mut self) -> Option<String> {
        if self.bubbles.is_empty() {
            return None;
        }
        let i = self.rng.random_range(0..self.bubbles.len());
        Some(self.bubbles[i].clone())
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Recipient => self.recipient_score,
            Side::Sender => self.sender_score,
        }
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            MatchPhase::Over { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            phase: self.phase,
            court_width: self.tuning.court_width,
            court_height: self.tuning.court_height,
            ball_x: self.ball.pos.x,
            ball_y: self.ball.pos.y,
            player_y: self.player.y,
            ai_y: self.ai.y,
            paddle_width: self.tuning.paddle_width,
            paddle_height: self.tuning.paddle_height,
            ball_size: self.tuning.ball_size,
            recipient_score: self.recipient_score,
            sender_score: self.sender_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_match_is_idle_and_centered() {
        let state = MatchState::new(MatchTuning::default(), vec!["SORRY!".into()], 7);
        assert_eq!(state.phase, MatchPhase::Idle);
        assert_eq!(state.player.y, (300.0 - 60.0) / 2.0);
        assert_eq!(state.ball.pos, Vec2::new(200.0, 150.0));
        assert!(state.ball.vel.x > 0.0);
        assert!(state.ball.vel.y.abs() <= 3.0);
    }

    #[test]
    fn test_resize_clamps_paddles() {
        let mut state = MatchState::new(MatchTuning::default(), Vec::new(), 7);
        state.player.y = 230.0;
        state.resize(200.0, 100.0);
        assert_eq!(state.player.y, 40.0);
        state.resize(0.0, 100.0);
        assert!(state.is_degenerate());
    }

    #[test]
    fn test_bubble_text_from_bank() {
        let mut state = MatchState::new(MatchTuning::default(), vec!["A".into(), "B".into()], 1);
        for _ in 0..20 {
            let text = state.random_bubble_text().unwrap();
            assert!(text == "A" || text == "B");
        }
        let mut empty = MatchState::new(MatchTuning::default(), Vec::new(), 1);
        assert_eq!(empty.random_bubble_text(), None);
    }
}
