use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use animator::{Frame, Session};
use anyhow::{bail, Context, Result};
use sceneconfig::SceneConfig;
use tracing_subscriber::EnvFilter;
use wireframe::{write_obj, TwistedRibbon};

use crate::cli::RunArgs;
use crate::paths::AppPaths;
use crate::scene::{resolve_scene, LoadedScene};

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

pub fn run(args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let LoadedScene { mut config, source } = resolve_scene(args.scene.as_deref(), &paths)?;
    apply_overrides(&mut config, &args);
    tracing::info!(
        scene = %source,
        title = config.title.as_deref().unwrap_or("untitled"),
        fps = config.fps,
        "loading scene"
    );

    let mut session = Session::from_config(&config, TwistedRibbon)
        .with_context(|| format!("scene {source} failed engine validation"))?;

    if let Some(path) = args.still_export.as_ref() {
        let time = args.still_time.unwrap_or(0.0);
        return export_still(&mut session, config.fps, time, path);
    }

    let mut sink = FrameSink::open(args.frames_out.as_deref())?;
    let summary_to_stderr = sink.is_stdout();
    let mut emitted = 0u64;
    if sink.write(session.frame())? {
        emitted += 1;
    }

    while !session.is_complete() {
        if args
            .max_frames
            .is_some_and(|limit| session.clock().frame() >= limit)
        {
            tracing::info!(frames = session.clock().frame(), "frame limit reached");
            break;
        }
        let frame = session.tick()?;
        if frame.index % args.every == 0 && sink.write(frame)? {
            emitted += 1;
        }
    }
    sink.finish()?;

    let summary = PlaybackSummary {
        title: session.title().unwrap_or("untitled").to_string(),
        source: source.to_string(),
        frames: session.clock().frame(),
        emitted,
        seconds: session.now(),
        complete: session.is_complete(),
    };
    if summary_to_stderr {
        summary.print(&mut io::stderr().lock())?;
    } else {
        summary.print(&mut io::stdout().lock())?;
    }
    Ok(())
}

fn apply_overrides(config: &mut SceneConfig, args: &RunArgs) {
    if let Some(fps) = args.fps {
        tracing::debug!(fps, "frame rate overridden from the command line");
        config.fps = fps;
    }
    if let Some((u, v)) = args.resolution {
        tracing::debug!(u, v, "mesh resolution overridden from the command line");
        config.mesh.resolution = [u, v];
    }
}

fn export_still(session: &mut Session<TwistedRibbon>, fps: f64, time: f64, path: &Path) -> Result<()> {
    let total = session.total_run_time();
    let ticks = (time * fps).round();
    if ticks > (total * fps).round() {
        bail!("--still-time {time}s is past the end of the timeline ({total:.3}s)");
    }
    for _ in 0..ticks as u64 {
        session.tick()?;
    }
    let frame = session.frame();
    let file = File::create(path)
        .with_context(|| format!("failed to create still export {}", path.display()))?;
    write_obj(&frame.mesh, BufWriter::new(file))
        .with_context(|| format!("failed to write still export {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        time = frame.time,
        vertices = frame.mesh.vertex_count(),
        edges = frame.mesh.edge_count(),
        "still exported"
    );
    Ok(())
}

/// Destination for streamed frames, one JSON document per line.
enum FrameSink {
    Discard,
    Stdout(BufWriter<io::Stdout>),
    File(PathBuf, BufWriter<File>),
}

impl FrameSink {
    fn open(target: Option<&Path>) -> Result<Self> {
        match target {
            None => Ok(FrameSink::Discard),
            Some(path) if path == Path::new("-") => Ok(FrameSink::Stdout(BufWriter::new(io::stdout()))),
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create frame output {}", path.display()))?;
                Ok(FrameSink::File(path.to_path_buf(), BufWriter::new(file)))
            }
        }
    }

    fn is_stdout(&self) -> bool {
        matches!(self, FrameSink::Stdout(_))
    }

    /// Returns whether the frame was written anywhere.
    fn write(&mut self, frame: &Frame) -> Result<bool> {
        match self {
            FrameSink::Discard => Ok(false),
            FrameSink::Stdout(out) => {
                write_json_line(out, frame).context("failed to write frame to stdout")?;
                Ok(true)
            }
            FrameSink::File(path, out) => {
                write_json_line(out, frame)
                    .with_context(|| format!("failed to write frame to {}", path.display()))?;
                Ok(true)
            }
        }
    }

    fn finish(self) -> Result<()> {
        match self {
            FrameSink::Discard => Ok(()),
            FrameSink::Stdout(mut out) => out.flush().context("failed to flush stdout"),
            FrameSink::File(path, mut out) => out
                .flush()
                .with_context(|| format!("failed to flush frame output {}", path.display())),
        }
    }
}

fn write_json_line<W: Write>(out: &mut W, frame: &Frame) -> Result<()> {
    serde_json::to_writer(&mut *out, frame)?;
    out.write_all(b"\n")?;
    Ok(())
}

struct PlaybackSummary {
    title: String,
    source: String,
    frames: u64,
    emitted: u64,
    seconds: f64,
    complete: bool,
}

impl PlaybackSummary {
    fn print<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Scene:    {} ({})", self.title, self.source)?;
        writeln!(out, "Frames:   {} ({} emitted)", self.frames, self.emitted)?;
        writeln!(out, "Duration: {:.3}s", self.seconds)?;
        writeln!(
            out,
            "Timeline: {}",
            if self.complete { "complete" } else { "stopped early" }
        )
    }
}
