use serde::{Deserialize, Serialize};
use std::fs;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "https://api.wheretheiss.at/v1/satellites/25544";

pub const DEFAULT_PROFILE: &str = "dev";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub profile: String, // Resolved from RUNTIME_ENV, not read from the file
    pub debug_mode: bool, // Verbose error bodies and DEBUG logs, dev only
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    pub api_url: String,
    pub timeout_seconds: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_prefix: String, // Rolled daily, e.g. iss.log.2025-01-31
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: DEFAULT_PROFILE.to_string(),
            debug_mode: false,
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: 5.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_prefix: "iss.log".to_string(),
        }
    }
}

impl Config {
    /// Loads `config.<profile>.toml` from the working directory, where the
    /// profile comes from `RUNTIME_ENV` (default `dev`), then applies the
    /// `API_URL` and `DEBUG_MODE` environment overrides.
    ///
    /// A missing file means defaults. A file that fails to parse is reported
    /// and also falls back to defaults.
    pub fn load() -> Self {
        let env = |key: &str| std::env::var(key).ok();
        let config_path = format!("config.{}.toml", resolve_profile(&env));

        let content = fs::read_to_string(&config_path).ok();
        Self::from_sources(content.as_deref(), env)
    }

    /// Builds a configuration from optional file contents and an environment
    /// lookup. Split out of [`Config::load`] so it can run without touching
    /// the process environment.
    pub fn from_sources(content: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = match content.map(toml::from_str::<Config>) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                warn!("Failed to parse configuration file: {}. Using defaults.", e);
                Config::default()
            }
            None => Config::default(),
        };

        config.profile = resolve_profile(&env);
        if let Some(url) = env("API_URL").filter(|u| !u.trim().is_empty()) {
            config.upstream.api_url = url;
        }
        if let Some(flag) = env("DEBUG_MODE") {
            config.debug_mode = flag.trim().eq_ignore_ascii_case("true");
        }

        config
    }
}

fn resolve_profile(env: &impl Fn(&str) -> Option<String>) -> String {
    env("RUNTIME_ENV")
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let config = Config::from_sources(None, env_of(&[]));

        assert_eq!(config.upstream.api_url, DEFAULT_API_URL);
        assert_eq!(config.upstream.timeout_seconds, 5.0);
        assert_eq!(config.server.bind_address, "0.0.0.0:5000");
        assert_eq!(config.logging.directory, "logs");
        assert_eq!(config.profile, "dev");
        assert!(!config.debug_mode);
    }

    #[test]
    fn profile_comes_from_runtime_env() {
        let config = Config::from_sources(None, env_of(&[("RUNTIME_ENV", "prod")]));
        assert_eq!(config.profile, "prod");

        let config = Config::from_sources(Some("profile = \"ignored\""), env_of(&[("RUNTIME_ENV", " ")]));
        assert_eq!(config.profile, DEFAULT_PROFILE);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = r#"
            debug_mode = true

            [upstream]
            timeout_seconds = 2.5
        "#;
        let config = Config::from_sources(Some(file), env_of(&[]));

        assert!(config.debug_mode);
        assert_eq!(config.upstream.timeout_seconds, 2.5);
        assert_eq!(config.upstream.api_url, DEFAULT_API_URL);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn env_overrides_file() {
        let file = r#"
            [upstream]
            api_url = "http://from-file.example/iss"
        "#;
        let config = Config::from_sources(
            Some(file),
            env_of(&[("API_URL", "http://from-env.example/iss"), ("DEBUG_MODE", "TRUE")]),
        );

        assert_eq!(config.upstream.api_url, "http://from-env.example/iss");
        assert!(config.debug_mode);
    }

    #[test]
    fn debug_mode_env_can_switch_it_off() {
        let config = Config::from_sources(Some("debug_mode = true"), env_of(&[("DEBUG_MODE", "no")]));
        assert!(!config.debug_mode);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let config = Config::from_sources(Some("this is = = not toml"), env_of(&[]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(Config::from_sources(Some(&text), env_of(&[])), Config::default());
    }
}
