use sceneconfig::SceneConfig;
use serde::Serialize;
use wireframe::{Domain, Interval, Mesh, MeshGenerator, ParameterSnapshot, Resolution, Surface};

use crate::camera::{CameraController, CameraPose, CameraState};
use crate::clock::FrameClock;
use crate::params::ParameterStore;
use crate::scheduler::{AnimationScheduler, SchedulerEvent};
use crate::timeline::TimelineEntry;
use crate::{check_pose, AnimationError};

const DEFAULT_FPS: f64 = 30.0;

/// Everything needed to build a [`Session`].
#[derive(Debug, Clone)]
pub struct SessionSpec {
    pub title: Option<String>,
    pub parameters: Vec<(String, f64)>,
    pub resolution: Resolution,
    pub domain: Domain,
    pub camera: CameraPose,
    pub timeline: Vec<TimelineEntry>,
    pub fps: f64,
}

impl SessionSpec {
    pub fn new(resolution: Resolution, domain: Domain) -> Self {
        Self {
            title: None,
            parameters: Vec::new(),
            resolution,
            domain,
            camera: CameraPose::from_degrees(60.0, 45.0, 12.0),
            timeline: Vec::new(),
            fps: DEFAULT_FPS,
        }
    }

    /// Converts a parsed scene. Fails when the mesh layout is unusable.
    pub fn from_config(config: &SceneConfig) -> Result<Self, AnimationError> {
        let [u_count, v_count] = config.mesh.resolution;
        let [u_min, u_max] = config.mesh.u_range;
        let [v_min, v_max] = config.mesh.v_range;
        let resolution = Resolution::new(u_count, v_count)?;
        let domain = Domain::new(
            Interval::new(u_min.value(), u_max.value()),
            Interval::new(v_min.value(), v_max.value()),
        )?;

        Ok(Self {
            title: config.title.clone(),
            parameters: config
                .parameter_defaults()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
            resolution,
            domain,
            camera: CameraPose::from_degrees(
                config.camera.phi,
                config.camera.theta,
                config.camera.distance,
            ),
            timeline: config.timeline.iter().map(TimelineEntry::from_step).collect(),
            fps: config.fps,
        })
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn parameter(mut self, name: impl Into<String>, default: f64) -> Self {
        self.parameters.push((name.into(), default));
        self
    }

    pub fn with_camera(mut self, camera: CameraPose) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    pub fn entry(mut self, entry: TimelineEntry) -> Self {
        self.timeline.push(entry);
        self
    }
}

/// Output of one tick: the regenerated mesh plus the view to draw it from.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub index: u64,
    pub time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub camera: CameraState,
    pub parameters: ParameterSnapshot,
    pub mesh: Mesh,
}

/// One playback of a timeline against a surface.
///
/// Each tick runs in a fixed order: clock, scheduler, camera, mesh. Camera cues
/// are applied at the offset inside the tick where their entry starts.
pub struct Session<S> {
    title: Option<String>,
    params: ParameterStore,
    scheduler: AnimationScheduler,
    camera: CameraController,
    initial_camera: CameraPose,
    clock: FrameClock,
    generator: MeshGenerator,
    surface: S,
    frame: Frame,
}

impl<S: Surface> Session<S> {
    pub fn new(spec: SessionSpec, surface: S) -> Result<Self, AnimationError> {
        let mut params = ParameterStore::new();
        for (name, default) in &spec.parameters {
            params.register(name.as_str(), *default);
        }
        if let Some(missing) = surface
            .parameters()
            .iter()
            .find(|name| !params.contains(name))
        {
            return Err(AnimationError::UnknownParameter(missing.to_string()));
        }

        let scheduler = AnimationScheduler::new(spec.timeline, &params)?;
        let clock = FrameClock::from_fps(spec.fps)?;
        let camera = CameraController::new(check_pose("initial camera", spec.camera)?);
        let generator = MeshGenerator::new(spec.resolution, spec.domain);
        let frame = build_frame(
            0,
            0.0,
            spec.title.as_deref(),
            &camera,
            &params,
            &generator,
            &surface,
        );

        tracing::info!(
            title = spec.title.as_deref().unwrap_or("untitled"),
            parameters = params.len(),
            entries = scheduler.entries().len(),
            run_time = scheduler.total_run_time(),
            vertices = spec.resolution.vertex_count(),
            "session ready"
        );

        Ok(Self {
            title: spec.title,
            params,
            scheduler,
            camera,
            initial_camera: spec.camera,
            clock,
            generator,
            surface,
            frame,
        })
    }

    pub fn from_config(config: &SceneConfig, surface: S) -> Result<Self, AnimationError> {
        Self::new(SessionSpec::from_config(config)?, surface)
    }

    /// Advances one frame interval and regenerates the mesh.
    pub fn tick(&mut self) -> Result<&Frame, AnimationError> {
        let tick = self.clock.tick();
        let events = self.scheduler.tick(&mut self.params, tick.dt)?;

        let mut cursor = 0.0;
        for event in &events {
            if let SchedulerEvent::EntryStarted {
                offset,
                run_time,
                cues,
                ..
            } = event
            {
                if cues.is_empty() {
                    continue;
                }
                self.camera.update(offset - cursor);
                cursor = *offset;
                for cue in cues {
                    self.camera.apply_cue(cue, *run_time)?;
                }
            }
        }
        self.camera.update(tick.dt - cursor);

        self.frame = build_frame(
            tick.frame,
            tick.now,
            self.title.as_deref(),
            &self.camera,
            &self.params,
            &self.generator,
            &self.surface,
        );
        Ok(&self.frame)
    }

    /// Most recent frame; before the first tick this is the initial state.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn is_complete(&self) -> bool {
        self.scheduler.is_complete()
    }

    /// Restores parameter defaults, the initial camera and the first entry.
    pub fn reset(&mut self) {
        self.scheduler.rewind(&mut self.params);
        self.params.reset();
        self.camera = CameraController::new(self.initial_camera);
        self.clock.reset();
        self.frame = build_frame(
            0,
            0.0,
            self.title.as_deref(),
            &self.camera,
            &self.params,
            &self.generator,
            &self.surface,
        );
        tracing::debug!("session reset");
    }

    /// Writes a parameter directly. Refused while a tween owns it.
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), AnimationError> {
        self.params.set(name, value)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn total_run_time(&self) -> f64 {
        self.scheduler.total_run_time()
    }

    pub fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn generator(&self) -> &MeshGenerator {
        &self.generator
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

fn build_frame<S: Surface>(
    index: u64,
    time: f64,
    title: Option<&str>,
    camera: &CameraController,
    params: &ParameterStore,
    generator: &MeshGenerator,
    surface: &S,
) -> Frame {
    let parameters = params.snapshot();
    let mesh = generator.generate(&parameters, surface);
    Frame {
        index,
        time,
        title: title.map(str::to_string),
        camera: camera.state(),
        parameters,
        mesh,
    }
}
