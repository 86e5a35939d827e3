//! Tick-driven animation engine for parametric wireframe surfaces.
//!
//! A [`Session`] owns the parameter store, the timeline scheduler, the camera
//! controller and the frame clock. Every tick advances the clock, steps the
//! scheduler's active tweens, steps the camera, and regenerates the mesh from a
//! fresh parameter snapshot.

mod camera;
mod clock;
mod easing;
mod params;
mod scheduler;
mod session;
mod timeline;
mod tween;

pub use camera::{CameraController, CameraMode, CameraPose, CameraState};
pub use clock::{ClockTick, FrameClock};
pub use easing::{lerp, Easing};
pub use params::{Parameter, ParameterStore, TweenId};
pub use scheduler::{AnimationScheduler, SchedulerEvent, SchedulerState};
pub use session::{Frame, Session, SessionSpec};
pub use timeline::{CameraCue, TimelineEntry, TweenSpec};
pub use tween::{Tween, TweenState, TweenTarget};

pub use wireframe::{MeshError, ParameterSnapshot, Surface};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnimationError {
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
    #[error("parameter '{name}' is already targeted by another tween")]
    ParameterConflict { name: String },
    #[error("{context} must be a positive number of seconds, got {value}")]
    InvalidDuration { context: String, value: f64 },
    #[error(
        "{context} needs finite angles and a positive distance, \
         got phi={phi} theta={theta} distance={distance}"
    )]
    InvalidCamera {
        context: String,
        phi: f64,
        theta: f64,
        distance: f64,
    },
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

pub(crate) fn check_duration(context: impl Into<String>, value: f64) -> Result<f64, AnimationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AnimationError::InvalidDuration {
            context: context.into(),
            value,
        })
    }
}

pub(crate) fn check_pose(
    context: impl Into<String>,
    pose: CameraPose,
) -> Result<CameraPose, AnimationError> {
    let angles_ok = pose.phi.is_finite() && pose.theta.is_finite();
    if angles_ok && pose.distance.is_finite() && pose.distance > 0.0 {
        Ok(pose)
    } else {
        Err(AnimationError::InvalidCamera {
            context: context.into(),
            phi: pose.phi,
            theta: pose.theta,
            distance: pose.distance,
        })
    }
}
