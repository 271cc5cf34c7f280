//! config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$GHPUSH_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/ghpush/config.toml`
//! 3. `~/.config/ghpush/config.toml`
//!
//! # Project Config
//!
//! Located at `.ghpush.toml` in the working directory.
//!
//! # Validation
//!
//! Config values are validated after parsing: the API base must be an
//! http(s) URL and repository fields must be non-empty when present.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// api_base = "https://github.example.com/api/v3"
///
/// [repository]
/// owner = "octocat"
/// name = "hello-world"
/// branch = "main"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// API base URL (GitHub Enterprise); public API when unset
    pub api_base: Option<String>,

    /// Default target repository
    pub repository: Option<RepositoryConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_api_base(self.api_base.as_deref())?;
        if let Some(repository) = &self.repository {
            repository.validate()?;
        }
        Ok(())
    }
}

/// Project configuration (per-directory scope).
///
/// Same shape as [`GlobalConfig`]; values here override global ones.
///
/// # Example
///
/// ```toml
/// [repository]
/// owner = "octocat"
/// name = "hello-world"
/// branch = "release"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// API base URL (GitHub Enterprise); public API when unset
    pub api_base: Option<String>,

    /// Target repository for this directory
    pub repository: Option<RepositoryConfig>,
}

impl ProjectConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_api_base(self.api_base.as_deref())?;
        if let Some(repository) = &self.repository {
            repository.validate()?;
        }
        Ok(())
    }
}

/// Target repository identification.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Repository owner (user or organization)
    pub owner: Option<String>,

    /// Repository name
    pub name: Option<String>,

    /// Target branch
    pub branch: Option<String>,
}

impl RepositoryConfig {
    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("repository.owner", &self.owner),
            ("repository.name", &self.name),
            ("repository.branch", &self.branch),
        ] {
            if let Some(v) = value {
                if v.trim().is_empty() {
                    return Err(ConfigError::InvalidValue(format!(
                        "{} cannot be empty",
                        field
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Validate an API base URL if present.
fn validate_api_base(api_base: Option<&str>) -> Result<(), ConfigError> {
    if let Some(base) = api_base {
        if !base.starts_with("https://") && !base.starts_with("http://") {
            return Err(ConfigError::InvalidValue(format!(
                "api_base must be an http(s) URL, got '{}'",
                base
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GlobalConfig::default().validate().is_ok());
        assert!(ProjectConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_full_project_config() {
        let config: ProjectConfig = toml::from_str(
            r#"
            api_base = "https://github.example.com/api/v3"

            [repository]
            owner = "octocat"
            name = "hello-world"
            branch = "main"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.api_base.as_deref(),
            Some("https://github.example.com/api/v3")
        );
        let repository = config.repository.unwrap();
        assert_eq!(repository.owner.as_deref(), Some("octocat"));
        assert_eq!(repository.name.as_deref(), Some("hello-world"));
        assert_eq!(repository.branch.as_deref(), Some("main"));
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<GlobalConfig, _> = toml::from_str("unknown_field = true");
        assert!(result.is_err());
    }

    #[test]
    fn non_http_api_base_rejected() {
        let config = GlobalConfig {
            api_base: Some("ftp://example.com".to_string()),
            repository: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn empty_repository_field_rejected() {
        let config = RepositoryConfig {
            owner: Some("".to_string()),
            name: None,
            branch: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
