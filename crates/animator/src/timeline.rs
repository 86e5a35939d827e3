use std::collections::HashSet;

use sceneconfig::{CameraCueConfig, TimelineStep};

use crate::camera::CameraPose;
use crate::easing::Easing;
use crate::params::ParameterStore;
use crate::tween::Tween;
use crate::{check_duration, check_pose, AnimationError};

/// Camera command attached to a timeline entry. Angles are in radians.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraCue {
    BeginOrbit {
        rate: f64,
    },
    StopOrbit,
    /// Fields left as `None` keep their current value; a missing duration
    /// uses the entry's run time.
    MoveTo {
        phi: Option<f64>,
        theta: Option<f64>,
        distance: Option<f64>,
        duration: Option<f64>,
    },
}

impl From<&CameraCueConfig> for CameraCue {
    fn from(cue: &CameraCueConfig) -> Self {
        match cue {
            CameraCueConfig::BeginOrbit { rate } => CameraCue::BeginOrbit { rate: *rate },
            CameraCueConfig::StopOrbit => CameraCue::StopOrbit,
            CameraCueConfig::MoveTo {
                phi,
                theta,
                distance,
                duration,
            } => CameraCue::MoveTo {
                phi: phi.map(f64::to_radians),
                theta: theta.map(f64::to_radians),
                distance: *distance,
                duration: duration.map(|d| d.as_secs_f64()),
            },
        }
    }
}

/// End values for one tween. The tween's duration comes from its entry.
#[derive(Debug, Clone)]
pub struct TweenSpec {
    targets: Vec<(String, f64)>,
    easing: Option<Easing>,
}

impl TweenSpec {
    pub fn to(name: impl Into<String>, end: f64) -> Self {
        Self {
            targets: vec![(name.into(), end)],
            easing: None,
        }
    }

    /// Adds another parameter driven by the same tween.
    pub fn and(mut self, name: impl Into<String>, end: f64) -> Self {
        self.targets.push((name.into(), end));
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn targets(&self) -> impl Iterator<Item = (&str, f64)> {
        self.targets.iter().map(|(name, end)| (name.as_str(), *end))
    }
}

/// One step of the timeline: its tweens run together for exactly `run_time`.
#[derive(Debug, Clone)]
pub struct TimelineEntry {
    label: Option<String>,
    run_time: f64,
    easing: Easing,
    tweens: Vec<TweenSpec>,
    cues: Vec<CameraCue>,
}

impl TimelineEntry {
    /// A hold of `run_time` seconds; add tweens and cues with the builder methods.
    pub fn new(run_time: f64) -> Self {
        Self {
            label: None,
            run_time,
            easing: Easing::Linear,
            tweens: Vec::new(),
            cues: Vec::new(),
        }
    }

    pub fn from_step(step: &TimelineStep) -> Self {
        let mut entry = Self::new(step.run_time.as_secs_f64()).with_easing(step.easing.into());
        entry.label = step.label.clone();
        entry.tweens = step
            .targets
            .iter()
            .map(|(name, end)| TweenSpec::to(name.clone(), end.value()))
            .collect();
        entry.cues = step.camera.iter().map(CameraCue::from).collect();
        entry
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn tween(mut self, spec: TweenSpec) -> Self {
        self.tweens.push(spec);
        self
    }

    pub fn cue(mut self, cue: CameraCue) -> Self {
        self.cues.push(cue);
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn run_time(&self) -> f64 {
        self.run_time
    }

    pub fn tweens(&self) -> &[TweenSpec] {
        &self.tweens
    }

    pub fn cues(&self) -> &[CameraCue] {
        &self.cues
    }

    pub(crate) fn display_name(&self, index: usize) -> String {
        match &self.label {
            Some(label) => format!("#{index} '{label}'"),
            None => format!("#{index}"),
        }
    }

    /// Checks the entry against `store` without touching it.
    pub fn validate(&self, index: usize, store: &ParameterStore) -> Result<(), AnimationError> {
        let name = self.display_name(index);
        check_duration(format!("run_time of timeline entry {name}"), self.run_time)?;

        let mut seen = HashSet::new();
        for (target, _) in self.tweens.iter().flat_map(|spec| spec.targets()) {
            if !store.contains(target) {
                return Err(AnimationError::UnknownParameter(target.to_string()));
            }
            if !seen.insert(target) {
                return Err(AnimationError::ParameterConflict {
                    name: target.to_string(),
                });
            }
        }

        for cue in &self.cues {
            if let CameraCue::MoveTo {
                phi,
                theta,
                distance,
                duration,
            } = *cue
            {
                let context = format!("camera move in timeline entry {name}");
                if let Some(duration) = duration {
                    check_duration(context.clone(), duration)?;
                }
                // Unset fields keep the live pose, so only the given ones are checked.
                let given = CameraPose::new(
                    phi.unwrap_or(0.0),
                    theta.unwrap_or(0.0),
                    distance.unwrap_or(1.0),
                );
                check_pose(context, given)?;
            }
        }
        Ok(())
    }

    /// Builds and starts every tween with current store values as start values.
    ///
    /// Either all tweens start or none do.
    pub(crate) fn instantiate(&self, store: &mut ParameterStore) -> Result<Vec<Tween>, AnimationError> {
        let mut started: Vec<Tween> = Vec::with_capacity(self.tweens.len());
        for spec in &self.tweens {
            let result = Tween::new(
                spec.targets.iter().map(|(name, end)| (name.clone(), *end)),
                self.run_time,
                spec.easing.unwrap_or(self.easing),
            )
            .and_then(|mut tween| tween.start(store).map(|()| tween));
            match result {
                Ok(tween) => started.push(tween),
                Err(err) => {
                    for tween in &mut started {
                        tween.abandon(store);
                    }
                    return Err(err);
                }
            }
        }
        Ok(started)
    }
}
