use eyre::{Context, Result};
use phcap::capture::{API_KEY_VAR, HOST_VAR};
use phcap::{Env, Layered, ProcessEnv};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main phcap configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub reporter: ReporterSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// Fallback reporter settings; the process environment takes precedence
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReporterSettings {
    /// Used when POSTHOG_API_KEY is not set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Used when POSTHOG_HOST is not set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Distinct id for CLI-sent events when --distinct-id is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct_id: Option<String>,
    /// Send in the background instead of awaiting the collector
    pub background: bool,
}

impl Env for ReporterSettings {
    fn var(&self, key: &str) -> Option<String> {
        match key {
            API_KEY_VAR => self.api_key.clone(),
            HOST_VAR => self.host.clone(),
            _ => None,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            let path = Self::expand_path(path);
            return Self::load_from_file(&path).context(format!("Failed to load config from {}", path.display()));
        }

        // Check PHCAP_CONFIG env var
        if let Ok(env_path) = std::env::var("PHCAP_CONFIG") {
            let path = Self::expand_path(Path::new(&env_path));
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from PHCAP_CONFIG: {}", e);
                    }
                }
            }
        }

        // Try PHCAP_DIR/phcap.yaml, then ~/.config/phcap/phcap.yaml
        let path = Self::phcap_dir().join("phcap.yaml");
        if path.exists() {
            match Self::load_from_file(&path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }

        // Try ./phcap.yaml (for development)
        let local_config = PathBuf::from("phcap.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Directory holding phcap.yaml
    pub fn phcap_dir() -> PathBuf {
        std::env::var("PHCAP_DIR")
            .map(|dir| Self::expand_path(Path::new(&dir)))
            .unwrap_or_else(|_| dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("phcap"))
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }

    /// Process environment first, then the config file
    pub fn env(&self) -> Layered<ProcessEnv, &ReporterSettings> {
        Layered::new(ProcessEnv, &self.reporter)
    }

    pub fn distinct_id<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit.or(self.reporter.distinct_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phcap::ReporterConfig;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.reporter.api_key.is_none());
        assert!(!config.reporter.background);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "log_level: debug\nreporter:\n  api_key: phc_file\n  host: https://eu.i.posthog.com/\n  background: true"
        )
        .unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.reporter.api_key.as_deref(), Some("phc_file"));
        assert!(config.reporter.background);

        let resolved = ReporterConfig::from_env(&config.reporter);
        assert_eq!(resolved.capture_url(), "https://eu.i.posthog.com/capture/");
        assert!(resolved.is_enabled());
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_settings_env_lookup() {
        let settings = ReporterSettings {
            api_key: Some("abc".to_string()),
            host: None,
            distinct_id: Some("cli".to_string()),
            background: false,
        };
        assert_eq!(settings.var(API_KEY_VAR), Some("abc".to_string()));
        assert_eq!(settings.var(HOST_VAR), None);
        assert_eq!(settings.var("OTHER"), None);
    }

    #[test]
    fn test_empty_env_value_falls_back_to_file() {
        let mut config = Config::default();
        config.reporter.api_key = Some("phc_from_file".to_string());

        let env = Layered::new([(API_KEY_VAR, "")], &config.reporter);
        let reporter = ReporterConfig::from_env(&env);
        assert_eq!(reporter.enabled_key(), Some("phc_from_file"));
    }

    #[test]
    fn test_distinct_id_precedence() {
        let mut config = Config::default();
        assert_eq!(config.distinct_id(None), None);

        config.reporter.distinct_id = Some("from-file".to_string());
        assert_eq!(config.distinct_id(None), Some("from-file"));
        assert_eq!(config.distinct_id(Some("from-flag")), Some("from-flag"));
    }

    #[test]
    fn test_expand_path_no_expansion() {
        let path = PathBuf::from("/etc/phcap/phcap.yaml");
        assert_eq!(Config::expand_path(&path), path);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(&PathBuf::from("~/phcap.yaml"));
        assert!(!expanded.to_string_lossy().contains('~'));
        assert!(expanded.to_string_lossy().ends_with("phcap.yaml"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.reporter.host = Some("https://eu.i.posthog.com".to_string());
        let yaml_str = serde_yaml::to_string(&config).expect("Failed to serialize");
        let parsed: Config = serde_yaml::from_str(&yaml_str).expect("Failed to deserialize");
        assert_eq!(parsed.reporter.host, config.reporter.host);
        assert_eq!(parsed.log_level, config.log_level);
    }
}
