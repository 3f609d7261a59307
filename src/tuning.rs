//! Data-driven game balance
//!
//! Every speed, size, probability and threshold of the match and the prize
//! wheel. Persisted separately from anything else in LocalStorage so a
//! deployment can retune the game without a rebuild.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Pong court and AI balance (units are pixels and pixels per frame)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchTuning {
    pub court_width: f32,
    pub court_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between a paddle and its court edge
    pub paddle_margin: f32,
    pub ball_size: f32,

    pub player_speed: f32,

    /// AI speed is drawn uniformly from this range every frame
    pub ai_speed_min: f32,
    pub ai_speed_max: f32,
    /// Full width of the random offset added to the AI's target
    pub ai_jitter: f32,
    /// AI holds still while its center is this close to the target
    pub ai_dead_zone: f32,
    /// Chance per frame that the AI moves away from its target
    pub ai_wrong_direction_probability: f64,

    pub serve_speed: f32,
    /// Full width of the random vertical serve velocity
    pub serve_vertical_range: f32,
    /// Horizontal speed multiplier on a player return
    pub player_hit_boost: f32,
    /// Vertical speed range produced by player paddle spin
    pub player_spin: f32,
    pub ai_hit_boost: f32,
    pub ai_spin: f32,
    pub max_ball_speed: f32,

    /// Minimum time between AI popups (ms)
    pub bubble_cooldown_ms: f64,
    pub winning_score: u32,
}

impl Default for MatchTuning {
    fn default() -> Self {
        Self {
            court_width: COURT_WIDTH,
            court_height: COURT_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_margin: PADDLE_MARGIN,
            ball_size: BALL_SIZE,

            player_speed: PLAYER_SPEED,

            ai_speed_min: 2.0,
            ai_speed_max: 4.0,
            ai_jitter: 80.0,
            ai_dead_zone: 30.0,
            ai_wrong_direction_probability: AI_WRONG_DIRECTION_PROBABILITY,

            serve_speed: SERVE_SPEED,
            serve_vertical_range: 6.0,
            player_hit_boost: 1.05,
            player_spin: 8.0,
            ai_hit_boost: 1.02,
            ai_spin: 6.0,
            max_ball_speed: MAX_BALL_SPEED,

            bubble_cooldown_ms: BUBBLE_COOLDOWN_MS,
            winning_score: WINNING_SCORE,
        }
    }
}

/// Prize wheel spin feel (radians per frame, wall-clock deceleration)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelTuning {
    pub segments: usize,
    /// Speed gained per frame while accelerating; at or above
    /// `max_speed` the wheel free-spins at constant speed
    pub accel: f64,
    pub max_speed: f64,
    pub decel_duration_ms: f64,
    /// Extra full turns at top speed are drawn from this range
    pub extra_turns_min: f64,
    pub extra_turns_max: f64,
    /// Additional random rotation up to this many radians
    pub extra_jitter: f64,
}

impl Default for WheelTuning {
    fn default() -> Self {
        Self {
            segments: WHEEL_SEGMENTS,
            accel: 0.004,
            max_speed: 0.35,
            decel_duration_ms: 2500.0,
            extra_turns_min: 2.0,
            extra_turns_max: 4.0,
            extra_jitter: std::f64::consts::PI,
        }
    }
}

/// Timings and toggles of the post-match screens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowTuning {
    /// Delay between "copied" confirmation and the success screen (ms)
    pub copy_grace_ms: f64,
    /// Whether winning unlocks the prize wheel
    pub wheel_enabled: bool,
}

impl Default for FlowTuning {
    fn default() -> Self {
        Self {
            copy_grace_ms: 500.0,
            wheel_enabled: true,
        }
    }
}

/// All tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Tuning {
    #[serde(rename = "match")]
    pub pong: MatchTuning,
    pub wheel: WheelTuning,
    pub flow: FlowTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The stored form, read back by `from_json`
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Shorter matches, as shipped alongside the category picker
    pub fn short_match() -> Self {
        let mut tuning = Self::default();
        tuning.pong.winning_score = 5;
        tuning
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sorry_pong_tuning";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Tuning saved");
                }
                Err(e) => log::warn!("Failed to serialize tuning: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
