use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "wiremorph",
    author,
    version,
    about = "Parametric wireframe animation player",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Scene file path or name under `<config>/scenes`; the built-in scene when omitted.
    #[arg(long, value_name = "NAME|PATH")]
    pub scene: Option<String>,

    /// Override the scene frame rate.
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f64>,

    /// Override the mesh sampling grid (e.g. `60x45`).
    #[arg(long, value_name = "UxV", value_parser = parse_resolution)]
    pub resolution: Option<(usize, usize)>,

    /// Stream frames as JSON Lines to a file, or `-` for stdout.
    #[arg(long, value_name = "PATH|-")]
    pub frames_out: Option<PathBuf>,

    /// Only emit every Nth frame to the frame sink.
    #[arg(
        long,
        value_name = "N",
        default_value_t = 1,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub every: u64,

    /// Stop after this many frames even if the timeline is still running.
    #[arg(long, value_name = "N")]
    pub max_frames: Option<u64>,

    /// Timestamp in seconds to capture for `--still-export` (defaults to 0). Must fall
    /// within the timeline.
    #[arg(long, value_name = "SECONDS", requires = "still_export", value_parser = parse_seconds)]
    pub still_time: Option<f64>,

    /// Export the mesh at `--still-time` as a Wavefront OBJ wireframe, then exit.
    #[arg(long, value_name = "PATH")]
    pub still_export: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect and validate scene files.
    Scene(SceneCommand),
}

#[derive(Parser, Debug)]
pub struct SceneCommand {
    #[command(subcommand)]
    pub action: SceneAction,
}

#[derive(Subcommand, Debug)]
pub enum SceneAction {
    /// Parse a scene file and run every engine check without playing it.
    Validate {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Print a summary of a scene (the built-in one when omitted).
    Show {
        #[arg(value_name = "NAME|PATH")]
        scene: Option<String>,
    },
    /// Print the directories searched for named scenes.
    Where,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_resolution(value: &str) -> Result<(usize, usize), String> {
    let trimmed = value.trim();
    let (u, v) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid resolution '{trimmed}'; expected UxV such as 60x45"))?;
    let u: usize = u
        .trim()
        .parse()
        .map_err(|_| format!("invalid u sample count '{u}'"))?;
    let v: usize = v
        .trim()
        .parse()
        .map_err(|_| format!("invalid v sample count '{v}'"))?;
    if u < 2 || v < 2 {
        return Err(format!(
            "resolution {u}x{v} is too small; each axis needs at least 2 samples"
        ));
    }
    Ok((u, v))
}

pub fn parse_seconds(value: &str) -> Result<f64, String> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid timestamp '{value}'; expected seconds"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("timestamp must be a non-negative number, got {value}"));
    }
    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_accepts_both_separators() {
        assert_eq!(parse_resolution("60x45"), Ok((60, 45)));
        assert_eq!(parse_resolution(" 8X4 "), Ok((8, 4)));
    }

    #[test]
    fn resolution_rejects_degenerate_grids() {
        assert!(parse_resolution("1x10").is_err());
        assert!(parse_resolution("60").is_err());
        assert!(parse_resolution("ax4").is_err());
    }

    #[test]
    fn seconds_must_be_non_negative() {
        assert_eq!(parse_seconds("2.5"), Ok(2.5));
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("soon").is_err());
    }

    #[test]
    fn still_time_requires_export_path() {
        let err = Cli::try_parse_from(["wiremorph", "--still-time", "3"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let cli = Cli::try_parse_from([
            "wiremorph",
            "--still-time",
            "3",
            "--still-export",
            "out.obj",
        ])
        .unwrap();
        assert_eq!(cli.run.still_time, Some(3.0));
    }

    #[test]
    fn every_must_be_positive() {
        assert!(Cli::try_parse_from(["wiremorph", "--every", "0"]).is_err());
        let cli = Cli::try_parse_from(["wiremorph"]).unwrap();
        assert_eq!(cli.run.every, 1);
    }
}
