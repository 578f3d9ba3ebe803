//! Settings with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/samband-graph/config.toml` or the platform config dir
//! 2. Project config: `samband-graph.toml` in the working directory, or the file
//!    passed with `--config`
//! 3. Environment variables: `SAMBAND_GRAPH_*`, nested keys split on `__`
//!    (e.g. `SAMBAND_GRAPH_API__TOKEN`)
//!
//! Command-line flags are applied on top by `main`.
//!
//! ```toml
//! [api]
//! base_url = "https://nautobot.example.net"
//! token = "0123456789abcdef"
//!
//! [view]
//! default_mode = "full-hierarchy"
//! default_depth = 2
//! depth_choices = [1, 2, 3]
//! ```

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;

use crate::graph::ViewMode;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const PROJECT_CONFIG: &str = "samband-graph.toml";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub view: ViewSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    /// Request timeout; unset means requests may wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: None,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewSettings {
    #[serde(default)]
    pub default_mode: ViewMode,
    #[serde(default = "default_depth")]
    pub default_depth: u32,
    #[serde(default = "default_depth_choices")]
    pub depth_choices: Vec<u32>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            default_mode: ViewMode::default(),
            default_depth: default_depth(),
            depth_choices: default_depth_choices(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_depth() -> u32 {
    2
}

fn default_depth_choices() -> Vec<u32> {
    vec![1, 2, 3]
}

impl Settings {
    pub fn load(project_config: Option<&Path>) -> Result<Self, ConfigError> {
        let project_config = project_config
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG));

        let figment = Figment::new()
            .merge(Toml::file(Self::user_config_path()))
            .merge(Toml::file(project_config))
            .merge(Env::prefixed("SAMBAND_GRAPH_").split("__"));

        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let mut settings: Settings = figment.extract()?;
        settings.view.depth_choices.retain(|depth| *depth > 0);
        settings.view.depth_choices.sort_unstable();
        settings.view.depth_choices.dedup();
        if settings.view.depth_choices.is_empty() {
            settings.view.depth_choices = default_depth_choices();
        }
        Ok(settings)
    }

    fn user_config_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home
                .join(".config")
                .join("samband-graph")
                .join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        dirs::config_dir()
            .map(|p| p.join("samband-graph").join("config.toml"))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Settings {
        Settings::from_figment(Figment::from(Toml::string(toml))).unwrap()
    }

    #[test]
    fn empty_config_uses_defaults() {
        let settings = parse("");
        assert_eq!(settings.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.api.token, None);
        assert_eq!(settings.api.timeout(), None);
        assert_eq!(settings.view.default_mode, ViewMode::FullHierarchy);
        assert_eq!(settings.view.default_depth, 2);
        assert_eq!(settings.view.depth_choices, [1, 2, 3]);
    }

    #[test]
    fn reads_api_and_view_sections() {
        let settings = parse(
            r#"
            [api]
            base_url = "https://nautobot.example.net"
            token = "abc"
            timeout_secs = 15

            [view]
            default_mode = "descendants-only"
            default_depth = 3
            depth_choices = [4, 1, 3, 3]
            "#,
        );

        assert_eq!(settings.api.base_url, "https://nautobot.example.net");
        assert_eq!(settings.api.token.as_deref(), Some("abc"));
        assert_eq!(settings.api.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(settings.view.default_mode, ViewMode::DescendantsOnly);
        assert_eq!(settings.view.default_depth, 3);
        assert_eq!(settings.view.depth_choices, [1, 3, 4]);
    }

    #[test]
    fn unusable_depth_choices_fall_back() {
        let settings = parse("[view]\ndepth_choices = [0]");
        assert_eq!(settings.view.depth_choices, [1, 2, 3]);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let result = Settings::from_figment(Figment::from(Toml::string(
            "[view]\ndefault_mode = \"sideways\"",
        )));
        assert!(result.is_err());
    }
}
