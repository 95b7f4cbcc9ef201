//! Configuration handling for tutorial-kit
//!
//! Configuration is stored in `.tutor/config.toml` (project) and
//! `~/.config/tutor/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DocType;
use crate::render::RenderOptions;

/// Environment variable overriding `site.profile`
pub const PROFILE_ENV: &str = "TUTOR_PROFILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Build profile deciding whether asset paths are prefixed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BuildProfile {
    #[default]
    Development,
    Production,
}

impl BuildProfile {
    pub fn as_str(&self) -> &str {
        match self {
            BuildProfile::Development => "development",
            BuildProfile::Production => "production",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(BuildProfile::Development),
            "production" | "prod" => Ok(BuildProfile::Production),
            other => Err(ConfigError::Invalid(format!("unknown profile '{}'", other))),
        }
    }
}

/// Deployment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Build profile; production prefixes asset paths
    pub profile: BuildProfile,

    /// Path segment prepended to assets in production
    pub base_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            profile: BuildProfile::Development,
            base_path: "/stripe-doc".to_string(),
        }
    }
}

impl SiteConfig {
    /// Profile after applying the `TUTOR_PROFILE` override
    pub fn effective_profile(&self) -> Result<BuildProfile, ConfigError> {
        match std::env::var(PROFILE_ENV) {
            Ok(value) if !value.trim().is_empty() => BuildProfile::parse(&value),
            _ => Ok(self.profile),
        }
    }

    /// Render options for a profile
    pub fn render_options(&self, profile: BuildProfile) -> RenderOptions {
        match profile {
            BuildProfile::Production => RenderOptions::with_asset_prefix(self.base_path.clone()),
            BuildProfile::Development => RenderOptions::default(),
        }
    }
}

/// Document viewer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// How many UI ticks (250ms each) a toast stays visible
    pub toast_ticks: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self { toast_ticks: 8 }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Tutorial shown when no `--tutorial` is given
    pub default_tutorial: DocType,

    pub site: SiteConfig,

    pub viewer: ViewerConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_tutorial: DocType::new("payments"),
            site: SiteConfig::default(),
            viewer: ViewerConfig::default(),
        }
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "tutor", "tutorial-kit").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    pub fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(".tutor").join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")
    }

    /// Finds the project root by looking for `.tutor/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(".tutor").is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Render options for the effective build profile
    pub fn render_options(&self) -> Result<RenderOptions> {
        let profile = self.project.site.effective_profile()?;
        Ok(self.project.site.render_options(profile))
    }
}
