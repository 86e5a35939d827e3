mod cli;
mod paths;
mod run;
mod scene;

use std::path::Path;

use animator::Session;
use anyhow::{Context, Result};
use cli::{Command, SceneAction};
use paths::AppPaths;
use scene::{load_file, resolve_scene, LoadedScene};
use wireframe::TwistedRibbon;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Scene(scene_cmd)) => handle_scene_command(scene_cmd.action),
        None => run::run(cli.run),
    }
}

fn handle_scene_command(action: SceneAction) -> Result<()> {
    match action {
        SceneAction::Validate { path } => run_scene_validate(&path),
        SceneAction::Show { scene } => run_scene_show(scene.as_deref()),
        SceneAction::Where => run_scene_where(),
    }
}

fn run_scene_validate(path: &Path) -> Result<()> {
    let LoadedScene { config, source } = load_file(path)?;
    let session = Session::from_config(&config, TwistedRibbon)
        .with_context(|| format!("scene {source} failed engine validation"))?;
    println!(
        "Scene OK: {} steps, {:.2}s at {} fps ({} frames)",
        config.timeline.len(),
        session.total_run_time(),
        config.fps,
        (session.total_run_time() * config.fps).round()
    );
    Ok(())
}

fn run_scene_show(handle: Option<&str>) -> Result<()> {
    let paths = AppPaths::discover()?;
    let LoadedScene { config, source } = resolve_scene(handle, &paths)?;

    println!("Scene: {}", config.title.as_deref().unwrap_or("untitled"));
    println!("  source:     {source}");
    println!("  fps:        {}", config.fps);
    println!(
        "  mesh:       {}x{} over u [{:.4}, {:.4}] v [{:.4}, {:.4}]",
        config.mesh.resolution[0],
        config.mesh.resolution[1],
        config.mesh.u_range[0].value(),
        config.mesh.u_range[1].value(),
        config.mesh.v_range[0].value(),
        config.mesh.v_range[1].value(),
    );
    println!(
        "  camera:     phi={} theta={} distance={}",
        config.camera.phi, config.camera.theta, config.camera.distance
    );
    println!("Parameters:");
    for (name, value) in config.parameter_defaults() {
        println!("  {name:<24} {value}");
    }
    println!("Timeline ({:.2}s):", config.total_run_time().as_secs_f64());
    for (index, step) in config.timeline.iter().enumerate() {
        let targets = step
            .targets
            .iter()
            .map(|(name, value)| format!("{name}={:.4}", value.value()))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "  {index:>3} {:<20} {:>6.2}s cues={} {}",
            step.label.as_deref().unwrap_or("-"),
            step.run_time.as_secs_f64(),
            step.camera.len(),
            if targets.is_empty() { "hold" } else { targets.as_str() }
        );
    }
    Ok(())
}

fn run_scene_where() -> Result<()> {
    let paths = AppPaths::discover()?;
    println!("Configuration directories:");
    println!("  config:     {}", paths.config_dir().display());
    println!("  scenes:     {}", paths.scenes_dir().display());
    let installed = paths.installed_scenes();
    if installed.is_empty() {
        println!("No scenes installed; the built-in scene is used by default.");
    } else {
        println!("Installed scenes:");
        for name in installed {
            println!("  {name}");
        }
    }
    Ok(())
}
