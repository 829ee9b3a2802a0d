//! Sinusoidal marker motion with runtime-adjustable parameters.

use glam::Vec3;

use crate::params::{WaveIncrements, WaveParams};

/// Oscillator moving an object relative to where it started
#[derive(Debug, Clone)]
pub struct WaveMotion {
    params: WaveParams,
    start_position: Vec3,
}

impl WaveMotion {
    /// Capture the start position; it never changes afterwards
    pub fn new(start_position: Vec3, params: WaveParams) -> Self {
        Self {
            params,
            start_position,
        }
    }

    pub fn params(&self) -> WaveParams {
        self.params
    }

    pub fn start_position(&self) -> Vec3 {
        self.start_position
    }

    /// Replace all four parameters at once
    pub fn set_wave(&mut self, amplitude: f32, frequency: f32, speed: f32, offset: f32) {
        self.params = WaveParams {
            amplitude,
            frequency,
            speed,
            offset,
        };
    }

    /// Position at `time_s` seconds since start:
    /// `start + (speed·t, amplitude·sin(frequency·t + offset), 0)`
    pub fn position(&self, time_s: f32) -> Vec3 {
        let p = &self.params;
        self.start_position
            + Vec3::new(
                p.speed * time_s,
                p.amplitude * (p.frequency * time_s + p.offset).sin(),
                0.0,
            )
    }
}

/// Parameter bumped by a single key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveTrigger {
    Amplitude,
    Frequency,
    Speed,
    Offset,
}

/// Applies configured increments to a [`WaveMotion`], one parameter per trigger
#[derive(Debug, Clone, Default)]
pub struct WaveController {
    increments: WaveIncrements,
}

impl WaveController {
    pub fn new(increments: WaveIncrements) -> Self {
        Self { increments }
    }

    /// Add the trigger's increment to its parameter; no clamping
    pub fn apply(&self, trigger: WaveTrigger, wave: &mut WaveMotion) {
        let WaveParams {
            mut amplitude,
            mut frequency,
            mut speed,
            mut offset,
        } = wave.params();

        match trigger {
            WaveTrigger::Amplitude => amplitude += self.increments.amplitude,
            WaveTrigger::Frequency => frequency += self.increments.frequency,
            WaveTrigger::Speed => speed += self.increments.speed,
            WaveTrigger::Offset => offset += self.increments.offset,
        }

        wave.set_wave(amplitude, frequency, speed, offset);
        log::info!(
            "Wave: amplitude={:.2} frequency={:.2} speed={:.2} offset={:.2}",
            amplitude,
            frequency,
            speed,
            offset
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_position_at_t0() {
        let start = Vec3::new(1.0, -2.0, 3.0);
        let mut wave = WaveMotion::new(start, WaveParams::default());
        wave.set_wave(2.0, 3.0, 4.0, 5.0);

        let pos = wave.position(0.0);
        assert_eq!(pos.x, start.x);
        assert_abs_diff_eq!(pos.y, start.y + 2.0 * 5.0f32.sin(), epsilon = 1e-6);
        assert_eq!(pos.z, start.z);
    }

    #[test]
    fn test_position_over_time() {
        let mut wave = WaveMotion::new(Vec3::ZERO, WaveParams::default());
        wave.set_wave(0.5, 2.0, 1.5, 0.25);

        let t = 1.2;
        let pos = wave.position(t);
        assert_abs_diff_eq!(pos.x, 1.5 * t, epsilon = 1e-6);
        assert_abs_diff_eq!(pos.y, 0.5 * (2.0 * t + 0.25).sin(), epsilon = 1e-6);
        assert_eq!(pos.z, 0.0);
        assert_eq!(wave.start_position(), Vec3::ZERO);
    }

    #[test]
    fn test_each_trigger_changes_one_parameter() {
        let increments = WaveIncrements {
            amplitude: 0.1,
            frequency: 0.2,
            speed: 0.3,
            offset: 0.4,
        };
        let controller = WaveController::new(increments);
        let mut wave = WaveMotion::new(Vec3::ZERO, WaveParams::default());
        let base = wave.params();

        controller.apply(WaveTrigger::Amplitude, &mut wave);
        let p = wave.params();
        assert_eq!(p.amplitude, base.amplitude + 0.1);
        assert_eq!((p.frequency, p.speed, p.offset), (base.frequency, base.speed, base.offset));

        controller.apply(WaveTrigger::Frequency, &mut wave);
        let q = wave.params();
        assert_eq!(q.frequency, base.frequency + 0.2);
        assert_eq!((q.amplitude, q.speed, q.offset), (p.amplitude, p.speed, p.offset));

        controller.apply(WaveTrigger::Speed, &mut wave);
        let r = wave.params();
        assert_eq!(r.speed, base.speed + 0.3);
        assert_eq!((r.amplitude, r.frequency, r.offset), (q.amplitude, q.frequency, q.offset));

        controller.apply(WaveTrigger::Offset, &mut wave);
        let s = wave.params();
        assert_eq!(s.offset, base.offset + 0.4);
        assert_eq!((s.amplitude, s.frequency, s.speed), (r.amplitude, r.frequency, r.speed));
    }

    #[test]
    fn test_increments_are_unbounded() {
        let controller = WaveController::default();
        let mut wave = WaveMotion::new(Vec3::ZERO, WaveParams::default());

        for _ in 0..1000 {
            controller.apply(WaveTrigger::Amplitude, &mut wave);
        }
        assert_abs_diff_eq!(wave.params().amplitude, 101.0, epsilon = 1e-2);
    }
}
