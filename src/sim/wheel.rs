//! Lucky wheel spin physics
//!
//! `Idle -> Accelerating -> Decelerating -> Idle`. Acceleration is per
//! frame; deceleration is a cubic ease-out sampled against wall-clock time,
//! so it lasts the same regardless of frame rate. Exactly one result is
//! produced per cycle, when deceleration completes.

use std::f64::consts::{PI, TAU};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::WheelTuning;
use crate::{ease_out_cubic, wrap_turn};

/// The pointer sits at the top of the wheel, three quarters of a turn
/// from the canvas' zero angle
pub const POINTER_OFFSET: f64 = 1.5 * PI;

/// Segment under the pointer for a given accumulated rotation
///
/// Always in `[0, segments)`, however large the rotation grows.
pub fn segment_at(rotation: f64, segments: usize) -> usize {
    if segments == 0 {
        return 0;
    }
    let final_angle = wrap_turn(rotation);
    let pointer_angle = wrap_turn(TAU - final_angle + POINTER_OFFSET);
    let width = TAU / segments as f64;
    ((pointer_angle / width).floor() as usize) % segments
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WheelPhase {
    Idle,
    Accelerating,
    Decelerating,
}

/// Parameters of the ease-out fixed when "stop" is pressed
#[derive(Debug, Clone, Copy, PartialEq)]
struct Deceleration {
    start_ms: f64,
    base: f64,
    extra: f64,
}

/// Prize wheel state
#[derive(Debug, Clone)]
pub struct WheelState {
    /// Accumulated rotation (radians, unbounded)
    pub rotation: f64,
    /// Radians per frame while accelerating
    pub speed: f64,
    phase: WheelPhase,
    decel: Option<Deceleration>,
    tuning: WheelTuning,
    rng: Pcg32,
}

impl WheelState {
    pub fn new(tuning: WheelTuning, seed: u64) -> Self {
        Self {
            rotation: 0.0,
            speed: 0.0,
            phase: WheelPhase::Idle,
            decel: None,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn phase(&self) -> WheelPhase {
        self.phase
    }

    pub fn segments(&self) -> usize {
        self.tuning.segments
    }

    /// Start spinning; ignored unless idle
    pub fn spin(&mut self) -> bool {
        if self.phase != WheelPhase::Idle {
            return false;
        }
        self.phase = WheelPhase::Accelerating;
        self.speed = 0.0;
        log::debug!("Wheel spinning");
        true
    }

    /// Begin decelerating; ignored unless accelerating
    pub fn stop(&mut self, now_ms: f64) -> bool {
        if self.phase != WheelPhase::Accelerating {
            return false;
        }

        let t = &self.tuning;
        let ratio = if t.max_speed > 0.0 {
            (self.speed / t.max_speed).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let lo = t.extra_turns_min.min(t.extra_turns_max);
        let hi = t.extra_turns_min.max(t.extra_turns_max);
        let turns = self.rng.random_range(lo..=hi);
        let jitter = self.rng.random_range(0.0..=t.extra_jitter.abs());
        let extra = ratio * TAU * turns + jitter;

        self.decel = Some(Deceleration {
            start_ms: now_ms,
            base: self.rotation,
            extra,
        });
        self.phase = WheelPhase::Decelerating;
        log::debug!("Wheel stopping, {:.2} rad to go", extra);
        true
    }

    /// Advance one frame; returns the winning segment when a spin completes
    pub fn update(&mut self, now_ms: f64) -> Option<usize> {
        match self.phase {
            WheelPhase::Idle => None,
            WheelPhase::Accelerating => {
                self.speed = (self.speed + self.tuning.accel).min(self.tuning.max_speed);
                self.rotation += self.speed;
                None
            }
            WheelPhase::Decelerating => {
                let decel = self.decel?;
                let duration = self.tuning.decel_duration_ms;
                let progress = if duration > 0.0 {
                    ((now_ms - decel.start_ms) / duration).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                self.rotation = decel.base + decel.extra * ease_out_cubic(progress);

                if progress < 1.0 {
                    return None;
                }

                self.phase = WheelPhase::Idle;
                self.speed = 0.0;
                self.decel = None;
                let segment = segment_at(self.rotation, self.tuning.segments);
                log::info!("Wheel landed on segment {}", segment);
                Some(segment)
            }
        }
    }

    /// Segment currently under the pointer
    pub fn current_segment(&self) -> usize {
        segment_at(self.rotation, self.tuning.segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wheel() -> WheelState {
        WheelState::new(WheelTuning::default(), 42)
    }

    #[test]
    fn test_segment_at_fixed_angles() {
        // Pointer at the top: rotation 0 puts 1.5π under it → slice 4 of 6
        assert_eq!(segment_at(0.0, 6), 4);
        // Half a turn: pointer angle 0.5π → slice 1
        assert_eq!(segment_at(PI, 6), 1);
        for k in [1.0, 2.0, 10.0, 1000.0, 123_456.0, -3.0] {
            assert_eq!(segment_at(TAU * k, 6), 4, "k = {k}");
        }
    }

    #[test]
    fn test_segment_always_in_range() {
        let mut angle = -1.0e6;
        while angle < 1.0e6 {
            assert!(segment_at(angle, 6) < 6);
            angle += 997.13;
        }
        assert!(segment_at(f64::MAX / 4.0, 6) < 6);
        assert_eq!(segment_at(1.0, 0), 0);
    }

    #[test]
    fn test_spin_while_spinning_is_a_no_op() {
        let mut w = wheel();
        assert!(w.spin());
        w.update(0.0);
        let (rotation, speed) = (w.rotation, w.speed);
        assert!(!w.spin());
        assert_eq!(w.phase(), WheelPhase::Accelerating);
        assert_eq!((w.rotation, w.speed), (rotation, speed));
    }

    #[test]
    fn test_stop_while_idle_is_a_no_op() {
        let mut w = wheel();
        assert!(!w.stop(0.0));
        assert_eq!(w.phase(), WheelPhase::Idle);
        assert_eq!(w.update(10_000.0), None);
    }

    #[test]
    fn test_acceleration_caps_at_max_speed() {
        let mut w = wheel();
        w.spin();
        for _ in 0..200 {
            w.update(0.0);
        }
        assert_eq!(w.speed, 0.35);
    }

    #[test]
    fn test_exactly_one_result_per_cycle() {
        let mut w = wheel();
        let mut results = 0;
        for cycle in 0..3 {
            let start = cycle as f64 * 10_000.0;
            assert!(w.spin());
            for _ in 0..30 {
                assert_eq!(w.update(start), None);
            }
            assert!(w.stop(start));
            assert!(!w.stop(start));
            assert!(!w.spin());

            let mut now = start;
            while now < start + 4000.0 {
                now += 16.0;
                if let Some(segment) = w.update(now) {
                    assert!(segment < 6);
                    assert_eq!(segment, w.current_segment());
                    results += 1;
                }
            }
            assert_eq!(w.phase(), WheelPhase::Idle);
        }
        assert_eq!(results, 3);
    }

    #[test]
    fn test_deceleration_is_wall_clock_driven() {
        let mut slow = wheel();
        let mut fast = wheel();
        for w in [&mut slow, &mut fast] {
            w.spin();
            for _ in 0..100 {
                w.update(0.0);
            }
            w.stop(0.0);
        }

        // 10 fps vs 100 fps still finish at the same instant and angle
        let mut slow_done = None;
        let mut fast_done = None;
        let mut now = 0.0;
        while now <= 2600.0 {
            now += 10.0;
            if (now as u64) % 100 == 0 && slow_done.is_none() && slow.update(now).is_some() {
                slow_done = Some(now);
            }
            if fast_done.is_none() && fast.update(now).is_some() {
                fast_done = Some(now);
            }
        }
        assert_eq!(slow_done, Some(2500.0));
        assert_eq!(fast_done, Some(2500.0));
        assert!((slow.rotation - fast.rotation).abs() < 1e-9);
    }

    #[test]
    fn test_zero_duration_lands_immediately() {
        let tuning = WheelTuning {
            decel_duration_ms: 0.0,
            ..Default::default()
        };
        let mut w = WheelState::new(tuning, 1);
        w.spin();
        w.update(0.0);
        w.stop(5.0);
        assert!(w.update(5.0).is_some());
    }
}
