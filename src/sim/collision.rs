//! Collision detection and response for the court
//!
//! Walls reflect the vertical velocity. Paddles reflect the horizontal
//! velocity, speed it up and set a vertical "spin" from the contact point.

use glam::Vec2;

use super::state::Ball;

/// Reflect off the top and bottom walls, clamping the ball back inside
///
/// Returns true when a wall was touched.
pub fn reflect_walls(ball: &mut Ball, court_height: f32, ball_size: f32) -> bool {
    let half = ball_size / 2.0;
    let bottom = (court_height - half).max(half);

    if ball.pos.y <= half {
        ball.vel.y = ball.vel.y.abs();
        ball.pos.y = half;
        true
    } else if ball.pos.y >= bottom {
        ball.vel.y = -ball.vel.y.abs();
        ball.pos.y = bottom;
        true
    } else {
        false
    }
}

/// Where along a paddle the ball touched it, in [0, 1] from the top
///
/// `None` when the ball's center is outside the paddle's vertical span.
pub fn paddle_contact(ball_y: f32, paddle_y: f32, paddle_height: f32) -> Option<f32> {
    if paddle_height <= 0.0 {
        return None;
    }
    if ball_y < paddle_y || ball_y > paddle_y + paddle_height {
        return None;
    }
    Some((ball_y - paddle_y) / paddle_height)
}

/// Map a contact point to a vertical velocity in `[-spin/2, spin/2]`
#[inline]
pub fn spin_velocity(contact: f32, spin: f32) -> f32 {
    (contact - 0.5) * spin
}

/// Bounce the ball back toward `direction` (+1 right, -1 left)
///
/// The horizontal speed is multiplied by `boost` and capped at `max_speed`;
/// the ball is placed at `contact_x` so it cannot tunnel through the paddle.
pub fn return_ball(
    ball: &mut Ball,
    direction: f32,
    contact_x: f32,
    contact: f32,
    boost: f32,
    spin: f32,
    max_speed: f32,
) {
    let speed = (ball.vel.x.abs() * boost).min(max_speed.max(0.0));
    ball.vel = Vec2::new(speed * direction.signum(), spin_velocity(contact, spin));
    ball.pos.x = contact_x;
}
