//! Per-frame simulation tick
//!
//! One call per display refresh. Motion uses fixed per-frame deltas rather
//! than elapsed time, so the match runs at the display's frame rate; the
//! timestamp only drives the popup cooldown.

use super::ai;
use super::collision::{paddle_contact, reflect_walls, return_ball};
use super::state::{Bubble, Direction, MatchEvent, MatchPhase, MatchState, Side};

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction of the player's paddle
    pub direction: Direction,
    /// Start the match (A button / start action)
    pub start: bool,
    /// Frame timestamp (ms)
    pub now_ms: f64,
}

/// Horizontal offset of a popup from the right edge of the court
const BUBBLE_OFFSET_X: f32 = 80.0;

/// Advance the match by one frame, returning what happened
pub fn tick(state: &mut MatchState, input: &TickInput) -> Vec<MatchEvent> {
    let mut events = Vec::new();
    state.input = input.direction;

    if input.start && state.phase == MatchPhase::Idle {
        state.phase = MatchPhase::Running;
        log::info!("Match started");
    }

    // Don't tick unless running
    if state.phase != MatchPhase::Running {
        return events;
    }

    if state.is_degenerate() {
        return events;
    }

    state.frames += 1;
    let t = state.tuning.clone();

    // Player paddle
    state.player.y = state.clamp_paddle(state.player.y + state.input.sign() * t.player_speed);

    // AI paddle
    ai::step(&mut state.ai, &state.ball, &t, &mut state.rng);
    state.ai.y = state.clamp_paddle(state.ai.y);

    // Ball
    let prev_x = state.ball.pos.x;
    state.ball.pos += state.ball.vel;
    reflect_walls(&mut state.ball, t.court_height, t.ball_size);

    let half_ball = t.ball_size / 2.0;

    // Paddles only catch a ball that crossed their face this frame; one
    // already behind the face is lost.

    // Player paddle (left)
    let player_face = t.paddle_margin + t.paddle_width + half_ball;
    if state.ball.vel.x < 0.0 && prev_x > player_face && state.ball.pos.x <= player_face {
        if let Some(contact) = paddle_contact(state.ball.pos.y, state.player.y, t.paddle_height) {
            return_ball(
                &mut state.ball,
                1.0,
                player_face + 1.0,
                contact,
                t.player_hit_boost,
                t.player_spin,
                t.max_ball_speed,
            );
            events.push(MatchEvent::PaddleHit {
                side: Side::Recipient,
            });
        }
    }

    // AI paddle (right)
    let ai_face = t.court_width - t.paddle_margin - t.paddle_width - half_ball;
    if state.ball.vel.x > 0.0 && prev_x < ai_face && state.ball.pos.x >= ai_face {
        if let Some(contact) = paddle_contact(state.ball.pos.y, state.ai.y, t.paddle_height) {
            return_ball(
                &mut state.ball,
                -1.0,
                ai_face - 1.0,
                contact,
                t.ai_hit_boost,
                t.ai_spin,
                t.max_ball_speed,
            );
            events.push(MatchEvent::PaddleHit { side: Side::Sender });

            let cooled_down = state
                .last_bubble_ms
                .is_none_or(|last| input.now_ms - last > t.bubble_cooldown_ms);
            if cooled_down {
                if let Some(text) = state.random_bubble_text() {
                    state.last_bubble_ms = Some(input.now_ms);
                    events.push(MatchEvent::Bubble(Bubble {
                        text,
                        x: t.court_width - BUBBLE_OFFSET_X,
                        y: state.ai.y - 10.0,
                        celebration: false,
                    }));
                }
            }
        }
    }

    // Scoring
    let scorer = if state.ball.pos.x < 0.0 {
        Some(Side::Sender)
    } else if state.ball.pos.x > t.court_width {
        Some(Side::Recipient)
    } else {
        None
    };

    if let Some(scorer) = scorer {
        match scorer {
            Side::Sender => state.sender_score += 1,
            Side::Recipient => {
                state.recipient_score += 1;
                if let Some(text) = state.random_bubble_text() {
                    events.push(MatchEvent::Bubble(Bubble {
                        text,
                        x: t.court_width - BUBBLE_OFFSET_X,
                        y: state.ai.y,
                        celebration: true,
                    }));
                }
            }
        }
        log::debug!(
            "Point to {:?} ({} - {})",
            scorer,
            state.recipient_score,
            state.sender_score
        );
        events.push(MatchEvent::Point { scorer });
        state.reset_ball();

        if state.score(scorer) >= t.winning_score {
            state.phase = MatchPhase::Over { winner: scorer };
            log::info!(
                "Match over, {:?} wins {} - {}",
                scorer,
                state.recipient_score,
                state.sender_score
            );
            events.push(MatchEvent::MatchOver { winner: scorer });
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::MatchTuning;
    use glam::Vec2;

    fn new_state() -> MatchState {
        MatchState::new(MatchTuning::default(), vec!["SORRY!".into()], 12345)
    }

    fn running() -> MatchState {
        let mut state = new_state();
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        state
    }

    #[test]
    fn test_tick_idle_to_running() {
        let mut state = new_state();
        let before = state.ball;

        // Tick without start - should stay idle and frozen
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, MatchPhase::Idle);
        assert_eq!(state.ball, before);

        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, MatchPhase::Running);
        assert_ne!(state.ball.pos, before.pos);
    }

    #[test]
    fn test_player_paddle_moves_and_clamps() {
        let mut state = running();
        let y = state.player.y;
        let up = TickInput {
            direction: Direction::Up,
            ..Default::default()
        };
        tick(&mut state, &up);
        assert_eq!(state.player.y, y - 8.0);
        for _ in 0..100 {
            tick(&mut state, &up);
        }
        assert_eq!(state.player.y, 0.0);
    }

    #[test]
    fn test_degenerate_court_is_a_no_op() {
        let mut state = running();
        state.resize(0.0, 0.0);
        let before = state.ball;
        let events = tick(&mut state, &TickInput::default());
        assert!(events.is_empty());
        assert_eq!(state.ball, before);
        assert!(state.ball.pos.x.is_finite() && state.ball.pos.y.is_finite());
    }

    #[test]
    fn test_player_return_reverses_and_boosts() {
        let mut state = running();
        state.player.y = 100.0;
        state.ball.pos = Vec2::new(30.0, 130.0);
        state.ball.vel = Vec2::new(-8.0, 0.0);
        let events = tick(&mut state, &TickInput::default());

        assert!(events.contains(&MatchEvent::PaddleHit {
            side: Side::Recipient
        }));
        assert!((state.ball.vel.x - 8.4).abs() < 1e-4);
        assert_eq!(state.ball.pos.x, 26.0);
    }

    #[test]
    fn test_ball_behind_paddle_is_not_returned() {
        let mut state = running();
        state.player.y = 0.0;
        state.ball.pos = Vec2::new(9.0, 30.0);
        state.ball.vel = Vec2::new(-2.0, 0.0);
        let events = tick(&mut state, &TickInput::default());

        assert!(events.is_empty());
        assert_eq!(state.ball.pos, Vec2::new(7.0, 30.0));
        assert_eq!(state.ball.vel.x, -2.0);

        // Same on the AI side
        state.tuning.ai_speed_min = 0.0;
        state.tuning.ai_speed_max = 0.0;
        state.ai.y = 0.0;
        state.ball.pos = Vec2::new(390.0, 30.0);
        state.ball.vel = Vec2::new(2.0, 0.0);
        let events = tick(&mut state, &TickInput::default());
        assert!(events.is_empty());
        assert_eq!(state.ball.vel.x, 2.0);
    }

    #[test]
    fn test_fast_ball_crossing_the_face_is_returned() {
        let mut state = running();
        state.player.y = 0.0;
        state.ball.pos = Vec2::new(25.5, 30.0);
        state.ball.vel = Vec2::new(-16.0, 0.0);
        let events = tick(&mut state, &TickInput::default());

        assert!(events.contains(&MatchEvent::PaddleHit {
            side: Side::Recipient
        }));
        assert_eq!(state.ball.pos.x, 26.0);
        assert_eq!(state.ball.vel.x, 16.0);
    }

    #[test]
    fn test_ai_return_emits_bubble_with_cooldown() {
        let mut state = running();
        state.tuning.ai_speed_min = 0.0;
        state.tuning.ai_speed_max = 0.0;
        state.ai.y = 100.0;

        let hit = |state: &mut MatchState, now_ms: f64| {
            state.ball.pos = Vec2::new(370.0, 130.0);
            state.ball.vel = Vec2::new(8.0, 0.0);
            tick(
                state,
                &TickInput {
                    now_ms,
                    ..Default::default()
                },
            )
        };

        let first = hit(&mut state, 2000.0);
        assert!(state.ball.vel.x < 0.0);
        assert!(first.iter().any(|e| matches!(e, MatchEvent::Bubble(b) if !b.celebration)));

        let second = hit(&mut state, 2500.0);
        assert!(!second.iter().any(|e| matches!(e, MatchEvent::Bubble(_))));

        let third = hit(&mut state, 3600.0);
        assert!(third.iter().any(|e| matches!(e, MatchEvent::Bubble(_))));
    }

    #[test]
    fn test_scoring_resets_ball() {
        let mut state = running();
        state.ai.y = 0.0;
        state.tuning.ai_speed_min = 0.0;
        state.tuning.ai_speed_max = 0.0;
        state.ball.pos = Vec2::new(398.0, 290.0);
        state.ball.vel = Vec2::new(4.0, 0.0);
        let events = tick(&mut state, &TickInput::default());

        assert_eq!(state.recipient_score, 1);
        assert!(events.contains(&MatchEvent::Point {
            scorer: Side::Recipient
        }));
        assert!(events.iter().any(|e| matches!(e, MatchEvent::Bubble(b) if b.celebration)));
        assert_eq!(state.ball.pos, Vec2::new(200.0, 150.0));
        assert_eq!(state.ball.vel.x.abs(), 4.0);
    }

    #[test]
    fn test_match_ends_at_winning_score() {
        let mut state = running();
        state.sender_score = 9;
        state.player.y = 0.0;
        state.ball.pos = Vec2::new(2.0, 290.0);
        state.ball.vel = Vec2::new(-4.0, 0.0);
        let events = tick(&mut state, &TickInput::default());

        assert_eq!(state.sender_score, 10);
        assert_eq!(state.winner(), Some(Side::Sender));
        assert!(events.contains(&MatchEvent::MatchOver {
            winner: Side::Sender
        }));

        // No further frames are processed
        let frames = state.frames;
        let ball = state.ball;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.frames, frames);
        assert_eq!(state.ball, ball);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = running();
        let mut state2 = running();

        let inputs = [
            TickInput {
                direction: Direction::Up,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                direction: Direction::Down,
                now_ms: 16.0,
                ..Default::default()
            },
        ];

        for _ in 0..200 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.frames, state2.frames);
        assert_eq!(state1.ball, state2.ball);
        assert_eq!(state1.ai, state2.ai);
        assert_eq!(state1.recipient_score, state2.recipient_score);
    }
}
