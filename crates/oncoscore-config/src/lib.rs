//! Configuration loading for Oncoscore.
//! Reads oncoscore.toml from the current directory or the path in the
//! ONCOSCORE_CONFIG env var; every field has a serviceable default so a
//! missing file starts a local dev instance.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 5007 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// A deployable scoring module. The enabled list controls which artifact
/// sets must load before the service reports ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleId {
    Endometrial,
    Molecular,
    Cervical,
    Cytology,
}

impl ModuleId {
    /// Artifact subdirectory for this module.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ModuleId::Endometrial => "endometrial",
            ModuleId::Molecular => "molecular",
            ModuleId::Cervical => "cervical",
            ModuleId::Cytology => "cytology",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    #[serde(default = "default_artifacts_dir")]
    pub dir: PathBuf,
    /// Modules that must load at startup. Any failure among these is fatal.
    #[serde(default = "default_modules")]
    pub modules: Vec<ModuleId>,
}

fn default_artifacts_dir() -> PathBuf { PathBuf::from("artifacts") }

fn default_modules() -> Vec<ModuleId> {
    vec![
        ModuleId::Endometrial,
        ModuleId::Molecular,
        ModuleId::Cervical,
        ModuleId::Cytology,
    ]
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: default_artifacts_dir(),
            modules: default_modules(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Upper bound on concurrent CPU-bound inference tasks.
    #[serde(default = "default_inference_workers")]
    pub inference_workers: usize,
}

fn default_inference_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            inference_workers: default_inference_workers(),
        }
    }
}

impl Config {
    /// Load from the conventional location, falling back to defaults when
    /// no config file exists.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("ONCOSCORE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("oncoscore.toml"));
        if path.exists() {
            Self::from_path(&path)
        } else {
            info!(path = %path.display(), "no config file found; using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5007);
        assert_eq!(config.artifacts.dir, PathBuf::from("artifacts"));
        assert_eq!(config.artifacts.modules.len(), 4);
        assert!(config.runtime.inference_workers >= 1);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000

            [artifacts]
            modules = ["endometrial", "cervical"]
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(
            config.artifacts.modules,
            vec![ModuleId::Endometrial, ModuleId::Cervical]
        );
    }

    #[test]
    fn test_module_dir_names() {
        assert_eq!(ModuleId::Cytology.dir_name(), "cytology");
        assert_eq!(ModuleId::Molecular.dir_name(), "molecular");
    }
}
