use std::f64::consts::TAU;

use serde::Serialize;

use crate::easing::lerp;
use crate::timeline::CameraCue;
use crate::{check_duration, check_pose, AnimationError};

/// Spherical view placement: `phi` from the vertical axis, `theta` around it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraPose {
    pub phi: f64,
    pub theta: f64,
    pub distance: f64,
}

impl CameraPose {
    pub fn new(phi: f64, theta: f64, distance: f64) -> Self {
        Self {
            phi,
            theta,
            distance,
        }
    }

    /// Builds a pose from angles in degrees.
    pub fn from_degrees(phi: f64, theta: f64, distance: f64) -> Self {
        Self::new(phi.to_radians(), theta.to_radians(), distance)
    }
}

/// View parameters handed to the renderer each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraState {
    pub phi: f64,
    pub theta: f64,
    pub distance: f64,
    /// Radians per second while an orbit is being applied.
    pub orbit_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMode {
    Static,
    Orbiting {
        rate: f64,
    },
    Moving {
        from: CameraPose,
        to: CameraPose,
        duration: f64,
        elapsed: f64,
    },
}

/// Ambient orbit and discrete moves, stepped independently of the timeline.
///
/// A move suspends any orbit. When the move completes the camera rests unless
/// `begin_orbit` was issued again.
#[derive(Debug, Clone)]
pub struct CameraController {
    pose: CameraPose,
    mode: CameraMode,
    suspended_rate: Option<f64>,
    resume_rate: Option<f64>,
}

impl CameraController {
    pub fn new(pose: CameraPose) -> Self {
        Self {
            pose,
            mode: CameraMode::Static,
            suspended_rate: None,
            resume_rate: None,
        }
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.mode, CameraMode::Moving { .. })
    }

    /// Orbit rate that was active when the current or last move began.
    pub fn suspended_orbit_rate(&self) -> Option<f64> {
        self.suspended_rate
    }

    pub fn state(&self) -> CameraState {
        CameraState {
            phi: self.pose.phi,
            theta: self.pose.theta,
            distance: self.pose.distance,
            orbit_rate: match self.mode {
                CameraMode::Orbiting { rate } => Some(rate),
                _ => None,
            },
        }
    }

    /// Starts or retunes the orbit. During a move the orbit is armed and takes
    /// over once the move completes.
    pub fn begin_orbit(&mut self, rate: f64) {
        match self.mode {
            CameraMode::Moving { .. } => {
                tracing::debug!(rate, "orbit armed until camera move completes");
                self.resume_rate = Some(rate);
            }
            _ => {
                tracing::debug!(rate, "camera orbit started");
                self.mode = CameraMode::Orbiting { rate };
            }
        }
    }

    pub fn stop_orbit(&mut self) {
        match self.mode {
            CameraMode::Orbiting { .. } => {
                tracing::debug!("camera orbit stopped");
                self.mode = CameraMode::Static;
            }
            CameraMode::Moving { .. } => {
                self.resume_rate = None;
                self.suspended_rate = None;
            }
            CameraMode::Static => {}
        }
    }

    /// Interpolates linearly from the current pose to the target over
    /// `duration` seconds. A move issued mid-move restarts from the partial pose.
    pub fn move_to(
        &mut self,
        phi: f64,
        theta: f64,
        distance: f64,
        duration: f64,
    ) -> Result<(), AnimationError> {
        let duration = check_duration("camera move duration", duration)?;
        let to = check_pose("camera move target", CameraPose::new(phi, theta, distance))?;
        if let CameraMode::Orbiting { rate } = self.mode {
            self.suspended_rate = Some(rate);
        }
        tracing::debug!(phi, theta, distance, duration, "camera move started");
        self.mode = CameraMode::Moving {
            from: self.pose,
            to,
            duration,
            elapsed: 0.0,
        };
        Ok(())
    }

    /// Applies a timeline cue. Move fields left unset keep the current pose
    /// value, and a move without its own duration lasts `default_duration`.
    pub fn apply_cue(&mut self, cue: &CameraCue, default_duration: f64) -> Result<(), AnimationError> {
        match *cue {
            CameraCue::BeginOrbit { rate } => self.begin_orbit(rate),
            CameraCue::StopOrbit => self.stop_orbit(),
            CameraCue::MoveTo {
                phi,
                theta,
                distance,
                duration,
            } => self.move_to(
                phi.unwrap_or(self.pose.phi),
                theta.unwrap_or(self.pose.theta),
                distance.unwrap_or(self.pose.distance),
                duration.unwrap_or(default_duration),
            )?,
        }
        Ok(())
    }

    pub fn update(&mut self, dt: f64) {
        let dt = dt.max(0.0);
        match self.mode {
            CameraMode::Static => {}
            CameraMode::Orbiting { rate } => {
                self.pose.theta = (self.pose.theta + rate * dt).rem_euclid(TAU);
            }
            CameraMode::Moving {
                from,
                to,
                duration,
                elapsed,
            } => {
                let elapsed = elapsed + dt;
                if elapsed >= duration {
                    self.pose = to;
                    self.mode = match self.resume_rate.take() {
                        Some(rate) => {
                            let overshoot = elapsed - duration;
                            self.pose.theta = (self.pose.theta + rate * overshoot).rem_euclid(TAU);
                            CameraMode::Orbiting { rate }
                        }
                        None => CameraMode::Static,
                    };
                    tracing::debug!("camera move complete");
                    return;
                }
                let t = elapsed / duration;
                self.pose = CameraPose {
                    phi: lerp(from.phi, to.phi, t),
                    theta: lerp(from.theta, to.theta, t),
                    distance: lerp(from.distance, to.distance, t),
                };
                self.mode = CameraMode::Moving {
                    from,
                    to,
                    duration,
                    elapsed,
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> CameraController {
        CameraController::new(CameraPose::new(1.0, 0.0, 12.0))
    }

    #[test]
    fn orbit_advances_theta_by_rate_times_time() {
        let mut camera = camera();
        camera.begin_orbit(0.1);
        for _ in 0..100 {
            camera.update(0.1);
        }
        assert!((camera.pose().theta - 1.0).abs() < 1e-9);
        assert_eq!(camera.pose().phi, 1.0);
        assert_eq!(camera.state().orbit_rate, Some(0.1));
    }

    #[test]
    fn orbit_wraps_full_turns() {
        let mut camera = camera();
        camera.begin_orbit(1.0);
        camera.update(TAU + 0.5);
        assert!((camera.pose().theta - 0.5).abs() < 1e-12);
    }

    #[test]
    fn move_suspends_orbit_for_its_duration() {
        let mut camera = camera();
        camera.begin_orbit(0.5);
        camera.update(1.0);
        let theta_before = camera.pose().theta;

        camera.move_to(1.0, theta_before, 12.0, 2.0).unwrap();
        assert_eq!(camera.suspended_orbit_rate(), Some(0.5));
        for _ in 0..4 {
            camera.update(0.25);
            assert_eq!(camera.pose().theta, theta_before);
            assert_eq!(camera.state().orbit_rate, None);
        }
        camera.update(1.0);
        assert_eq!(camera.mode(), CameraMode::Static);
        camera.update(1.0);
        assert_eq!(camera.pose().theta, theta_before);
    }

    #[test]
    fn move_interpolates_linearly_and_lands_exactly() {
        let mut camera = camera();
        camera.move_to(0.0, 2.0, 4.0, 4.0).unwrap();
        camera.update(1.0);
        let pose = camera.pose();
        assert!((pose.phi - 0.75).abs() < 1e-12);
        assert!((pose.theta - 0.5).abs() < 1e-12);
        assert!((pose.distance - 10.0).abs() < 1e-12);
        camera.update(3.0);
        assert_eq!(camera.pose(), CameraPose::new(0.0, 2.0, 4.0));
        assert_eq!(camera.mode(), CameraMode::Static);
    }

    #[test]
    fn stop_orbit_after_completed_move_is_noop() {
        let mut camera = camera();
        camera.begin_orbit(0.1);
        camera.move_to(0.5, 0.5, 10.0, 1.0).unwrap();
        camera.update(1.0);
        camera.stop_orbit();
        assert_eq!(camera.mode(), CameraMode::Static);
        assert_eq!(camera.pose(), CameraPose::new(0.5, 0.5, 10.0));
    }

    #[test]
    fn new_move_supersedes_in_flight_move() {
        let mut camera = camera();
        camera.move_to(0.0, 4.0, 12.0, 2.0).unwrap();
        camera.update(1.0);
        let partial = camera.pose();
        assert!((partial.theta - 2.0).abs() < 1e-12);

        camera.move_to(1.0, 0.0, 12.0, 1.0).unwrap();
        match camera.mode() {
            CameraMode::Moving { from, elapsed, .. } => {
                assert_eq!(from, partial);
                assert_eq!(elapsed, 0.0);
            }
            other => panic!("expected move, got {other:?}"),
        }
        camera.update(1.0);
        assert_eq!(camera.pose(), CameraPose::new(1.0, 0.0, 12.0));
    }

    #[test]
    fn orbit_requested_during_move_resumes_afterwards() {
        let mut camera = camera();
        camera.move_to(1.0, 0.0, 12.0, 1.0).unwrap();
        camera.begin_orbit(0.2);
        assert!(camera.is_moving());
        camera.update(1.5);
        assert_eq!(camera.mode(), CameraMode::Orbiting { rate: 0.2 });
        assert!((camera.pose().theta - 0.1).abs() < 1e-12);
    }

    #[test]
    fn move_cue_keeps_unset_fields_and_uses_entry_run_time() {
        let mut camera = camera();
        let cue = CameraCue::MoveTo {
            phi: None,
            theta: Some(2.0),
            distance: None,
            duration: None,
        };
        camera.apply_cue(&cue, 4.0).unwrap();
        match camera.mode() {
            CameraMode::Moving { to, duration, .. } => {
                assert_eq!(to, CameraPose::new(1.0, 2.0, 12.0));
                assert_eq!(duration, 4.0);
            }
            other => panic!("expected move, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_positive_move_duration() {
        let mut camera = camera();
        assert!(matches!(
            camera.move_to(0.0, 0.0, 1.0, 0.0),
            Err(AnimationError::InvalidDuration { .. })
        ));
        assert_eq!(camera.mode(), CameraMode::Static);
    }

    #[test]
    fn rejects_non_finite_move_target() {
        let mut camera = camera();
        camera.begin_orbit(0.5);
        for (phi, theta, distance) in [
            (f64::NAN, 0.0, 12.0),
            (0.0, f64::INFINITY, 12.0),
            (0.0, 0.0, f64::NEG_INFINITY),
            (0.0, 0.0, 0.0),
        ] {
            assert!(matches!(
                camera.move_to(phi, theta, distance, 1.0),
                Err(AnimationError::InvalidCamera { .. })
            ));
        }
        assert_eq!(camera.mode(), CameraMode::Orbiting { rate: 0.5 });
        assert_eq!(camera.suspended_orbit_rate(), None);
    }

    #[test]
    fn stop_orbit_during_move_cancels_armed_orbit() {
        let mut camera = camera();
        camera.begin_orbit(0.3);
        camera.move_to(0.5, 1.0, 8.0, 1.0).unwrap();
        camera.begin_orbit(0.2);
        camera.stop_orbit();
        assert!(camera.is_moving());
        assert_eq!(camera.suspended_orbit_rate(), None);

        camera.update(1.5);
        assert_eq!(camera.mode(), CameraMode::Static);
        assert_eq!(camera.pose(), CameraPose::new(0.5, 1.0, 8.0));
        assert_eq!(camera.state().orbit_rate, None);
    }
}
