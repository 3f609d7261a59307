//! The sender's paddle controller
//!
//! Deliberately weak: it tracks the ball with random jitter, moves at a
//! random speed and, with a fixed probability each frame, moves the wrong
//! way. The recipient is supposed to win.

use rand::Rng;

use super::state::{Ball, Paddle};
use crate::tuning::MatchTuning;

/// Where the AI wants its paddle center to be this frame
pub fn target_y<R: Rng>(ball: &Ball, tuning: &MatchTuning, rng: &mut R) -> f32 {
    if ball.pos.x > tuning.court_width * 0.5 {
        let half = tuning.ai_jitter.abs() / 2.0;
        ball.pos.y + rng.random_range(-half..=half)
    } else {
        tuning.court_height / 2.0
    }
}

/// Advance the AI paddle by one frame (not yet clamped)
pub fn step<R: Rng>(paddle: &mut Paddle, ball: &Ball, tuning: &MatchTuning, rng: &mut R) {
    let center = paddle.center(tuning.paddle_height);
    let target = target_y(ball, tuning, rng);

    let lo = tuning.ai_speed_min.min(tuning.ai_speed_max);
    let hi = tuning.ai_speed_min.max(tuning.ai_speed_max);
    let speed = rng.random_range(lo..=hi);

    let wrong_way = rng.random_bool(tuning.ai_wrong_direction_probability.clamp(0.0, 1.0));
    if !wrong_way {
        if center < target - tuning.ai_dead_zone {
            paddle.y += speed;
        } else if center > target + tuning.ai_dead_zone {
            paddle.y -= speed;
        }
    } else if center < target {
        paddle.y -= speed;
    } else {
        paddle.y += speed;
    }
}
