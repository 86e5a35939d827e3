//! Resolves the wiremorph configuration directory and the named-scene search path.
//!
//! Types:
//!
//! - `AppPaths` captures the resolved config directory.
//!
//! Functions:
//!
//! - `AppPaths::discover` honours `WIREMORPH_CONFIG_DIR` before falling back to the
//!   platform project directories.
//! - `AppPaths::scene_candidate` maps a scene name to its file under `scenes/`.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories_next::ProjectDirs;

pub const ENV_CONFIG_DIR: &str = "WIREMORPH_CONFIG_DIR";

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "wiremorph";
const APPLICATION: &str = "wiremorph";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> Result<Self> {
        if let Some(config_dir) = env_override(ENV_CONFIG_DIR) {
            return Ok(Self { config_dir });
        }
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
            .ok_or_else(|| anyhow!("failed to determine user directories"))?;
        Ok(Self {
            config_dir: project_dirs.config_dir().to_path_buf(),
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn scenes_dir(&self) -> PathBuf {
        self.config_dir.join("scenes")
    }

    pub fn scene_candidate(&self, name: &str) -> PathBuf {
        self.scenes_dir().join(format!("{name}.toml"))
    }

    /// Names of the `.toml` scenes installed under `scenes/`, sorted.
    pub fn installed_scenes(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.scenes_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("toml"))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        names
    }
}

fn env_override(name: &str) -> Option<PathBuf> {
    match env::var_os(name) {
        Some(value) if !value.as_os_str().is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}
