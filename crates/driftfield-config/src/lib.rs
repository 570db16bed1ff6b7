//! Configuration for the driftfield particle demo.
//!
//! Settings are read once at startup from `config.toml` in the platform
//! config directory. Every section is optional; anything left out falls back
//! to the built-in defaults (a 1280x720 resizable window with 500 particles).

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`Config`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which variant of the main loop to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// Full animated particle field.
    #[default]
    Animated,
    /// Input handling only: clear, present, nothing else.
    Minimal,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Main loop variant.
    pub mode: LoopMode,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
    pub window: WindowConfig,
    pub particles: ParticleConfig,
    pub display: DisplayConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Logical width in pixels.
    pub width: u32,
    /// Logical height in pixels.
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "driftfield".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Number of particles in the field.
    pub count: usize,
    /// Slowest particle speed in pixels per second.
    pub min_speed: f32,
    /// Fastest particle speed in pixels per second.
    pub max_speed: f32,
    /// Half the side length of the square drawn around each particle.
    pub half_size: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 500,
            min_speed: 30.0,
            max_speed: 120.0,
            half_size: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Frame rate the present call paces to.
    pub target_fps: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { target_fps: 60 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Platform directories for driftfield, if a home directory is known.
    pub fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "driftfield")
    }

    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from the default location, falling back to defaults when no
    /// file exists.
    pub fn load() -> ConfigResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and validate the config file at `path`.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable by the simulation.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        let p = &self.particles;
        if !(p.min_speed.is_finite() && p.max_speed.is_finite()) {
            return Err(ConfigError::Invalid("particle speeds must be finite".into()));
        }
        if p.min_speed < 0.0 || p.min_speed > p.max_speed {
            return Err(ConfigError::Invalid(format!(
                "speed range must satisfy 0 <= min <= max, got [{}, {}]",
                p.min_speed, p.max_speed
            )));
        }
        if !p.half_size.is_finite() || p.half_size < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "half_size must be >= 0, got {}",
                p.half_size
            )));
        }

        if self.display.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be > 0".into()));
        }
        Ok(())
    }
}
