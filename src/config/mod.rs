//! config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! ghpush has two configuration scopes:
//! - **Global**: User-level settings
//! - **Project**: Per-directory overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$GHPUSH_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/ghpush/config.toml`
//! 3. `~/.config/ghpush/config.toml`
//!
//! # Project Config Location
//!
//! `.ghpush.toml` in the working directory.
//!
//! # Example
//!
//! ```no_run
//! use ghpush::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/project"))).unwrap();
//!
//! if let Some(coordinate) = config.coordinate() {
//!     println!("Repository: {}", coordinate);
//! }
//! if let Some(branch) = config.branch() {
//!     println!("Branch: {}", branch);
//! }
//! ```

pub mod schema;

pub use schema::{GlobalConfig, ProjectConfig, RepositoryConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::forge::RepoCoordinate;

/// File name of the project-scope config.
pub const PROJECT_CONFIG_FILE: &str = ".ghpush.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// This struct provides accessor methods that apply precedence rules
/// automatically. Project config overrides global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Project configuration (if the working directory has one)
    pub project: Option<ProjectConfig>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the project config file (if loaded)
    project_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `project_dir` is provided, also loads `.ghpush.toml` from it.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or fail
    /// validation. Missing config files are not an error (defaults are used).
    pub fn load(project_dir: Option<&Path>) -> Result<Config, ConfigError> {
        let (global, global_path) = Self::load_global()?;

        let (project, project_path) = if let Some(dir) = project_dir {
            Self::load_project(dir)?
        } else {
            (None, None)
        };

        global.validate()?;
        if let Some(ref p) = project {
            p.validate()?;
        }

        Ok(Config {
            global,
            project,
            global_path,
            project_path,
        })
    }

    /// Load global configuration from standard locations.
    fn load_global() -> Result<(GlobalConfig, Option<PathBuf>), ConfigError> {
        // 1. Check $GHPUSH_CONFIG
        if let Ok(path) = std::env::var("GHPUSH_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 2. Check $XDG_CONFIG_HOME/ghpush/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("ghpush/config.toml");
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 3. Check ~/.config/ghpush/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".config/ghpush/config.toml");
            if path.exists() {
                let config = Self::read_toml(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // No config found, use defaults
        Ok((GlobalConfig::default(), None))
    }

    /// Load project configuration from the working directory.
    fn load_project(dir: &Path) -> Result<(Option<ProjectConfig>, Option<PathBuf>), ConfigError> {
        let path = dir.join(PROJECT_CONFIG_FILE);
        if !path.exists() {
            return Ok((None, None));
        }

        let config = Self::read_toml(&path)?;
        Ok((Some(config), Some(path)))
    }

    /// Read and parse a TOML config file.
    fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Get the API base URL, if configured.
    ///
    /// `None` means the public GitHub API.
    pub fn api_base(&self) -> Option<&str> {
        self.project
            .as_ref()
            .and_then(|p| p.api_base.as_deref())
            .or(self.global.api_base.as_deref())
    }

    /// Get the repository owner, if configured.
    pub fn owner(&self) -> Option<&str> {
        self.repository_field(|r| r.owner.as_deref())
    }

    /// Get the repository name, if configured.
    pub fn repo_name(&self) -> Option<&str> {
        self.repository_field(|r| r.name.as_deref())
    }

    /// Get the target branch, if configured.
    pub fn branch(&self) -> Option<&str> {
        self.repository_field(|r| r.branch.as_deref())
    }

    /// Get the repository coordinate when both owner and name are
    /// configured.
    pub fn coordinate(&self) -> Option<RepoCoordinate> {
        Some(RepoCoordinate::new(self.owner()?, self.repo_name()?))
    }

    /// Resolve one `[repository]` field, project scope over global.
    fn repository_field<'a>(
        &'a self,
        get: impl Fn(&'a RepositoryConfig) -> Option<&'a str>,
    ) -> Option<&'a str> {
        self.project
            .as_ref()
            .and_then(|p| p.repository.as_ref())
            .and_then(&get)
            .or_else(|| self.global.repository.as_ref().and_then(&get))
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded project config file.
    pub fn project_config_loaded_from(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_empty_defaults() {
        std::env::remove_var("GHPUSH_CONFIG");
        std::env::remove_var("XDG_CONFIG_HOME");

        let temp = TempDir::new().unwrap();
        let config = Config::load(Some(temp.path())).unwrap();

        assert!(config.owner().is_none());
        assert!(config.repo_name().is_none());
        assert!(config.branch().is_none());
        assert!(config.coordinate().is_none());
        assert!(config.project_config_loaded_from().is_none());
    }

    #[test]
    fn load_global_from_env() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");

        fs::write(
            &config_path,
            r#"
            api_base = "https://github.example.com/api/v3"

            [repository]
            owner = "octocat"
            name = "hello-world"
            branch = "main"
            "#,
        )
        .unwrap();

        std::env::set_var("GHPUSH_CONFIG", config_path.to_str().unwrap());

        let config = Config::load(None).unwrap();

        assert_eq!(config.api_base(), Some("https://github.example.com/api/v3"));
        assert_eq!(config.owner(), Some("octocat"));
        assert_eq!(config.branch(), Some("main"));
        assert_eq!(
            config.coordinate(),
            Some(RepoCoordinate::new("octocat", "hello-world"))
        );

        std::env::remove_var("GHPUSH_CONFIG");
    }

    #[test]
    fn load_project_config() {
        std::env::remove_var("GHPUSH_CONFIG");

        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            r#"
            [repository]
            owner = "octocat"
            name = "hello-world"
            branch = "release"
            "#,
        )
        .unwrap();

        let config = Config::load(Some(temp.path())).unwrap();

        assert_eq!(config.branch(), Some("release"));
        assert!(config.project_config_loaded_from().is_some());
    }

    #[test]
    fn project_overrides_global_per_field() {
        let config = Config {
            global: GlobalConfig {
                api_base: Some("https://global.example.com".to_string()),
                repository: Some(RepositoryConfig {
                    owner: Some("global-owner".to_string()),
                    name: Some("global-repo".to_string()),
                    branch: Some("main".to_string()),
                }),
            },
            project: Some(ProjectConfig {
                api_base: None,
                repository: Some(RepositoryConfig {
                    owner: None,
                    name: None,
                    branch: Some("release".to_string()),
                }),
            }),
            global_path: None,
            project_path: None,
        };

        // Project branch wins; unset project fields fall through to global
        assert_eq!(config.branch(), Some("release"));
        assert_eq!(config.owner(), Some("global-owner"));
        assert_eq!(config.api_base(), Some("https://global.example.com"));
    }

    #[test]
    fn unparseable_project_config_is_an_error() {
        std::env::remove_var("GHPUSH_CONFIG");

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PROJECT_CONFIG_FILE), "not valid toml [").unwrap();

        let result = Config::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn unknown_fields_rejected() {
        std::env::remove_var("GHPUSH_CONFIG");

        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            "unknown_field = true",
        )
        .unwrap();

        let result = Config::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn invalid_api_base_rejected() {
        std::env::remove_var("GHPUSH_CONFIG");

        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            "api_base = \"example.com\"",
        )
        .unwrap();

        let result = Config::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }
}
