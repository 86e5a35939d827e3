use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use sceneconfig::SceneConfig;

use crate::paths::AppPaths;

/// Names that always refer to the scene compiled into the binary.
pub const BUILTIN_NAMES: [&str; 2] = ["builtin", "twisted_ribbon"];

#[derive(Debug, Clone, PartialEq)]
pub enum SceneSource {
    File(PathBuf),
    Builtin,
}

impl fmt::Display for SceneSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneSource::File(path) => write!(f, "{}", path.display()),
            SceneSource::Builtin => f.write_str("built-in"),
        }
    }
}

#[derive(Debug)]
pub struct LoadedScene {
    pub config: SceneConfig,
    pub source: SceneSource,
}

/// Resolves `handle` as an existing path, then as a name under the config
/// `scenes/` directory, then as the built-in scene.
pub fn resolve_scene(handle: Option<&str>, paths: &AppPaths) -> Result<LoadedScene> {
    let Some(handle) = handle.map(str::trim).filter(|handle| !handle.is_empty()) else {
        return load_builtin();
    };

    let direct = PathBuf::from(handle);
    if direct.is_file() {
        return load_file(&direct);
    }

    let named = paths.scene_candidate(handle);
    if named.is_file() {
        return load_file(&named);
    }

    if BUILTIN_NAMES.contains(&handle) {
        return load_builtin();
    }

    bail!(
        "scene '{handle}' not found (looked for a file, then {}, then the built-in names {})",
        named.display(),
        BUILTIN_NAMES.join("/")
    );
}

pub fn load_file(path: &Path) -> Result<LoadedScene> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read scene file {}", path.display()))?;
    let config = SceneConfig::from_toml_str(&text)
        .with_context(|| format!("failed to load scene {}", path.display()))?;
    tracing::debug!(path = %path.display(), steps = config.timeline.len(), "loaded scene file");
    Ok(LoadedScene {
        config,
        source: SceneSource::File(path.to_path_buf()),
    })
}

fn load_builtin() -> Result<LoadedScene> {
    let config = SceneConfig::builtin().context("built-in scene failed to load")?;
    Ok(LoadedScene {
        config,
        source: SceneSource::Builtin,
    })
}
