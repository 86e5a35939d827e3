use crate::{check_duration, AnimationError};

/// One step of the frame clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockTick {
    pub frame: u64,
    pub now: f64,
    pub dt: f64,
}

/// Fixed-step logical clock. Time is derived as `frame * dt` rather than
/// summed, so long sessions do not drift.
#[derive(Debug, Clone)]
pub struct FrameClock {
    dt: f64,
    frame: u64,
}

impl FrameClock {
    pub fn new(dt: f64) -> Result<Self, AnimationError> {
        let dt = check_duration("frame interval", dt)?;
        Ok(Self { dt, frame: 0 })
    }

    pub fn from_fps(fps: f64) -> Result<Self, AnimationError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(AnimationError::InvalidDuration {
                context: "frame interval (1 / fps)".into(),
                value: 1.0 / fps,
            });
        }
        Self::new(1.0 / fps)
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn now(&self) -> f64 {
        self.frame as f64 * self.dt
    }

    pub fn tick(&mut self) -> ClockTick {
        self.frame += 1;
        ClockTick {
            frame: self.frame,
            now: self.now(),
            dt: self.dt,
        }
    }

    pub fn reset(&mut self) {
        self.frame = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_is_monotonic_and_drift_free() {
        let mut clock = FrameClock::new(0.1).unwrap();
        let mut last = clock.now();
        for _ in 0..1000 {
            let tick = clock.tick();
            assert!(tick.now > last);
            last = tick.now;
        }
        assert_eq!(clock.now(), 1000.0 * 0.1);
        assert_eq!(clock.frame(), 1000);
    }

    #[test]
    fn reset_rewinds_to_zero() {
        let mut clock = FrameClock::from_fps(30.0).unwrap();
        clock.tick();
        clock.reset();
        assert_eq!(clock.now(), 0.0);
        assert_eq!(clock.tick().frame, 1);
    }

    #[test]
    fn rejects_non_positive_rates() {
        assert!(FrameClock::new(0.0).is_err());
        assert!(FrameClock::from_fps(0.0).is_err());
        assert!(FrameClock::from_fps(f64::NAN).is_err());
    }
}
