use std::f64::consts::{PI, TAU};

use animator::{
    AnimationError, CameraCue, Frame, ParameterSnapshot, SchedulerState, Session, SessionSpec,
    TimelineEntry, TweenSpec,
};
use sceneconfig::SceneConfig;
use wireframe::{Domain, Interval, Point3, Resolution, Surface, TwistedRibbon};

fn wave(u: f64, v: f64, params: &ParameterSnapshot) -> Point3 {
    let amp = params.value_or("amp", 0.0);
    Point3::new(u, v, amp * (u + v).sin())
}

fn wave_spec() -> SessionSpec {
    SessionSpec::new(
        Resolution::new(4, 4).unwrap(),
        Domain::new(Interval::new(-PI, PI), Interval::new(-1.0, 1.0)).unwrap(),
    )
    .parameter("amp", 0.0)
    .with_fps(1.0)
    .entry(TimelineEntry::new(2.0).tween(TweenSpec::to("amp", 1.0)))
}

#[test]
fn tween_drives_mesh_until_complete() {
    let mut session = Session::new(wave_spec(), wave).unwrap();

    let frame = session.tick().unwrap();
    assert_eq!(frame.parameters.get("amp"), Some(0.5));
    let expected = wave(-PI, -1.0, &ParameterSnapshot::new().with("amp", 0.5));
    assert_eq!(frame.mesh.vertex(0, 0), Some(expected));
    assert_eq!(session.scheduler().state(), SchedulerState::Running(0));

    let frame = session.tick().unwrap();
    assert_eq!(frame.parameters.get("amp"), Some(1.0));
    assert!(session.is_complete());
    assert_eq!(session.scheduler().state(), SchedulerState::Complete);
}

#[test]
fn frames_serialise_as_json() {
    let mut session = Session::new(wave_spec(), wave).unwrap();
    let frame: &Frame = session.tick().unwrap();
    let json = serde_json::to_value(frame).unwrap();
    assert_eq!(json["index"], 1);
    assert_eq!(json["parameters"]["amp"], 0.5);
    assert!(json["camera"]["orbit_rate"].is_null());
}

#[test]
fn unknown_tween_target_is_rejected_up_front() {
    let spec = wave_spec().entry(TimelineEntry::new(1.0).tween(TweenSpec::to("twist", 2.0)));
    let err = Session::new(spec, wave).err().unwrap();
    assert_eq!(err, AnimationError::UnknownParameter("twist".into()));
}

#[test]
fn orbit_cue_turns_camera_at_its_rate() {
    let spec = wave_spec()
        .with_fps(10.0)
        .entry(TimelineEntry::new(10.0).cue(CameraCue::BeginOrbit { rate: 0.1 }));
    let mut session = Session::new(spec, wave).unwrap();

    // Orbit starts when the second entry begins at t = 2s.
    for _ in 0..20 {
        session.tick().unwrap();
    }
    let theta_at_start = session.frame().camera.theta;
    for _ in 0..100 {
        session.tick().unwrap();
    }
    let turned = session.frame().camera.theta - theta_at_start;
    assert!((turned - 1.0).abs() < 1e-9, "turned {turned}");
}

#[test]
fn builtin_scene_plays_to_completion() {
    let config = SceneConfig::builtin().unwrap();
    let mut session = Session::from_config(&config, TwistedRibbon).unwrap();
    let total = session.total_run_time();
    assert!((total - config.total_run_time().as_secs_f64()).abs() < 1e-9);

    let expected_frames = (total * config.fps).round() as u64;
    let mut frames = 0;
    while !session.is_complete() {
        session.tick().unwrap();
        frames += 1;
        assert!(frames <= expected_frames, "timeline overran");
    }
    assert_eq!(frames, expected_frames);

    let params = session.parameters();
    let settled = [
        (TwistedRibbon::TWIST_AMPLITUDE, 1.8),
        (TwistedRibbon::WAVE_FREQUENCY, 2.5),
        (TwistedRibbon::RIBBON_WIDTH, 1.0),
        (TwistedRibbon::CURVATURE_INTENSITY, 1.5),
        (TwistedRibbon::TIME, 4.0 * TAU),
    ];
    for (name, value) in settled {
        assert_eq!(params.get(name), Ok(value), "{name}");
    }
    for name in TwistedRibbon.parameters() {
        assert!(!params.is_claimed(name));
    }
    assert_eq!(session.frame().mesh.vertex_count(), 60 * 45);
}
