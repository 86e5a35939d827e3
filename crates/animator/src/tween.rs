use crate::easing::{lerp, Easing};
use crate::params::{ParameterStore, TweenId};
use crate::{check_duration, AnimationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenState {
    Pending,
    Running,
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TweenTarget {
    pub name: String,
    pub start: f64,
    pub end: f64,
}

/// Interpolates one or more parameters from their values at start time to
/// fixed end values over `duration` seconds.
#[derive(Debug, Clone)]
pub struct Tween {
    owner: Option<TweenId>,
    targets: Vec<TweenTarget>,
    duration: f64,
    elapsed: f64,
    easing: Easing,
    state: TweenState,
}

impl Tween {
    pub fn new<I, S>(targets: I, duration: f64, easing: Easing) -> Result<Self, AnimationError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let duration = check_duration("tween duration", duration)?;
        let mut collected: Vec<TweenTarget> = Vec::new();
        for (name, end) in targets {
            let name = name.into();
            if collected.iter().any(|target| target.name == name) {
                return Err(AnimationError::ParameterConflict { name });
            }
            collected.push(TweenTarget {
                name,
                start: end,
                end,
            });
        }
        Ok(Self {
            owner: None,
            targets: collected,
            duration,
            elapsed: 0.0,
            easing,
            state: TweenState::Pending,
        })
    }

    /// Claims the targets and captures their current values as start values.
    ///
    /// On failure nothing is claimed and the tween stays pending.
    pub fn start(&mut self, store: &mut ParameterStore) -> Result<(), AnimationError> {
        if self.state != TweenState::Pending {
            return Ok(());
        }
        let owner = store.next_tween_id();
        store.claim_all(owner, self.targets.iter().map(|target| target.name.as_str()))?;
        for target in &mut self.targets {
            target.start = store.get(&target.name)?;
        }
        self.owner = Some(owner);
        self.state = TweenState::Running;
        Ok(())
    }

    /// Advances by `dt` seconds and writes the interpolated values. Reaching
    /// the duration snaps every target to its exact end value.
    pub fn advance(&mut self, dt: f64, store: &mut ParameterStore) -> TweenState {
        if self.state != TweenState::Running {
            return self.state;
        }
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        if self.elapsed >= self.duration {
            return self.finish(store);
        }

        let eased = self.easing.sample(self.progress());
        for target in &self.targets {
            store.write(&target.name, lerp(target.start, target.end, eased));
        }
        self.state
    }

    /// Jumps to the end: targets take their end values and claims are released.
    pub fn finish(&mut self, store: &mut ParameterStore) -> TweenState {
        if self.state == TweenState::Done {
            return self.state;
        }
        if self.state == TweenState::Running {
            for target in &self.targets {
                store.write(&target.name, target.end);
            }
        }
        if let Some(owner) = self.owner.take() {
            store.release_all(owner);
        }
        self.elapsed = self.duration;
        self.state = TweenState::Done;
        self.state
    }

    /// Releases claims without writing; used when a sibling tween fails to start.
    pub(crate) fn abandon(&mut self, store: &mut ParameterStore) {
        if let Some(owner) = self.owner.take() {
            store.release_all(owner);
        }
        self.state = TweenState::Done;
    }

    pub fn state(&self) -> TweenState {
        self.state
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn targets(&self) -> &[TweenTarget] {
        &self.targets
    }

    /// Linear progress in `[0, 1]`, before easing.
    pub fn progress(&self) -> f64 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }
}
