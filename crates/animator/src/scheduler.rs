use crate::params::ParameterStore;
use crate::timeline::{CameraCue, TimelineEntry};
use crate::tween::Tween;
use crate::AnimationError;

/// Relative slack when deciding whether a tick reaches an entry boundary, so
/// accumulated rounding in `dt` sums does not push completion one tick late.
const BOUNDARY_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Entry `k` is next but has not started.
    Idle(usize),
    /// Entry `k`'s tweens are active.
    Running(usize),
    Complete,
}

/// Transition reported by [`AnimationScheduler::tick`]. `offset` is the
/// logical time since the start of that tick.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerEvent {
    EntryStarted {
        index: usize,
        offset: f64,
        run_time: f64,
        cues: Vec<CameraCue>,
    },
    EntryFinished {
        index: usize,
        offset: f64,
    },
    TimelineComplete {
        offset: f64,
    },
}

/// Plays timeline entries strictly in order. Tweens inside one entry run
/// together; entry `k + 1` starts only once every tween of entry `k` is done.
#[derive(Debug)]
pub struct AnimationScheduler {
    entries: Vec<TimelineEntry>,
    state: SchedulerState,
    active: Vec<Tween>,
    entry_elapsed: f64,
}

impl AnimationScheduler {
    /// Validates every entry against `store` before anything runs.
    pub fn new(entries: Vec<TimelineEntry>, store: &ParameterStore) -> Result<Self, AnimationError> {
        for (index, entry) in entries.iter().enumerate() {
            entry.validate(index, store)?;
        }
        let state = initial_state(&entries);
        Ok(Self {
            entries,
            state,
            active: Vec::new(),
            entry_elapsed: 0.0,
        })
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == SchedulerState::Complete
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn current_entry(&self) -> Option<(usize, &TimelineEntry)> {
        match self.state {
            SchedulerState::Idle(index) | SchedulerState::Running(index) => {
                self.entries.get(index).map(|entry| (index, entry))
            }
            SchedulerState::Complete => None,
        }
    }

    pub fn active_tweens(&self) -> &[Tween] {
        &self.active
    }

    /// Seconds spent in the running entry.
    pub fn entry_elapsed(&self) -> f64 {
        self.entry_elapsed
    }

    pub fn total_run_time(&self) -> f64 {
        self.entries.iter().map(TimelineEntry::run_time).sum()
    }

    /// Advances the timeline by `dt` seconds and writes the new parameter values.
    ///
    /// Time left over after an entry completes carries into the next entry
    /// within the same tick.
    pub fn tick(
        &mut self,
        store: &mut ParameterStore,
        dt: f64,
    ) -> Result<Vec<SchedulerEvent>, AnimationError> {
        let mut events = Vec::new();
        let mut remaining = dt.max(0.0);
        let mut offset = 0.0;

        loop {
            match self.state {
                SchedulerState::Complete => break,
                SchedulerState::Idle(index) => {
                    let entry = &self.entries[index];
                    self.active = entry.instantiate(store)?;
                    self.entry_elapsed = 0.0;
                    tracing::debug!(
                        entry = index,
                        label = entry.label().unwrap_or(""),
                        run_time = entry.run_time(),
                        tweens = self.active.len(),
                        "timeline entry started"
                    );
                    events.push(SchedulerEvent::EntryStarted {
                        index,
                        offset,
                        run_time: entry.run_time(),
                        cues: entry.cues().to_vec(),
                    });
                    self.state = SchedulerState::Running(index);
                }
                SchedulerState::Running(index) => {
                    let run_time = self.entries[index].run_time();
                    let entry_left = run_time - self.entry_elapsed;
                    let slack = BOUNDARY_EPSILON * run_time.max(1.0);

                    if remaining < entry_left - slack {
                        for tween in &mut self.active {
                            tween.advance(remaining, store);
                        }
                        self.entry_elapsed += remaining;
                        break;
                    }

                    let step = entry_left.max(0.0);
                    for tween in &mut self.active {
                        tween.advance(step, store);
                        tween.finish(store);
                    }
                    self.active.clear();
                    self.entry_elapsed = 0.0;
                    offset += step;
                    remaining = (remaining - step).max(0.0);

                    tracing::debug!(entry = index, "timeline entry finished");
                    events.push(SchedulerEvent::EntryFinished { index, offset });

                    if index + 1 < self.entries.len() {
                        self.state = SchedulerState::Idle(index + 1);
                    } else {
                        self.state = SchedulerState::Complete;
                        tracing::info!(entries = self.entries.len(), "timeline complete");
                        events.push(SchedulerEvent::TimelineComplete { offset });
                    }
                }
            }
        }

        Ok(events)
    }

    /// Drops the running entry without writing and rewinds to the first entry.
    /// The caller restores parameter values.
    pub fn rewind(&mut self, store: &mut ParameterStore) {
        for tween in &mut self.active {
            tween.abandon(store);
        }
        self.active.clear();
        self.entry_elapsed = 0.0;
        self.state = initial_state(&self.entries);
    }
}

fn initial_state(entries: &[TimelineEntry]) -> SchedulerState {
    if entries.is_empty() {
        SchedulerState::Complete
    } else {
        SchedulerState::Idle(0)
    }
}
