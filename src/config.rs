use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

/// Environment variable consulted for the Last.fm API key.
pub const API_KEY_ENV: &str = "LASTFM_API_KEY";

/// Application configuration loaded from TOML config file.
/// Every field is defaulted, so the file is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Archive roots used when a command gets no path arguments.
    pub music_dirs: Vec<PathBuf>,
    /// Last.fm API settings.
    pub lastfm: LastfmConfig,
    /// Track gap checker settings.
    pub gaps: GapsConfig,
}

/// Last.fm API configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LastfmConfig {
    pub api_key: Option<String>,
    /// How many top-ranked artist tags feed the genre engine.
    pub max_tags: usize,
    /// Delay before every request in milliseconds.
    pub rate_limit_ms: u64,
    pub max_attempts: u32,
    /// First retry delay in milliseconds; doubles on each retry.
    pub backoff_ms: u64,
    pub timeout_secs: u64,
}

impl Default for LastfmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            max_tags: 2,
            rate_limit_ms: 300,
            max_attempts: 4,
            backoff_ms: 600,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct GapsConfig {
    /// Enable strict checks by default.
    pub strict: bool,
    /// Where the full report is written (default `missing_tracks.txt`).
    pub report_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load config from `~/.config/archivist/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(contents) => match Self::parse(&contents) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Resolve the Last.fm API key: CLI flag > environment > config file.
    /// A blank value at any level falls through to the next.
    pub fn resolve_api_key(&self, cli_key: Option<String>) -> Option<String> {
        self.resolve_api_key_with(cli_key, std::env::var(API_KEY_ENV).ok())
    }

    fn resolve_api_key_with(&self, cli_key: Option<String>, env_key: Option<String>) -> Option<String> {
        let non_blank = |k: &String| !k.trim().is_empty();
        cli_key
            .filter(non_blank)
            .or_else(|| env_key.filter(non_blank))
            .or_else(|| self.lastfm.api_key.clone().filter(non_blank))
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = AppConfig::parse("").unwrap();
        assert!(config.music_dirs.is_empty());
        assert_eq!(config.lastfm.max_tags, 2);
        assert_eq!(config.lastfm.rate_limit_ms, 300);
        assert_eq!(config.lastfm.max_attempts, 4);
        assert_eq!(config.lastfm.backoff_ms, 600);
        assert_eq!(config.lastfm.timeout_secs, 10);
        assert!(!config.gaps.strict);
        assert!(config.gaps.report_path.is_none());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = AppConfig::parse(
            r#"
            music_dirs = ["/srv/music"]

            [lastfm]
            api_key = "abc123"
            max_tags = 3

            [gaps]
            strict = true
            "#,
        )
        .unwrap();
        assert_eq!(config.music_dirs, vec![PathBuf::from("/srv/music")]);
        assert_eq!(config.lastfm.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.lastfm.max_tags, 3);
        assert_eq!(config.lastfm.max_attempts, 4);
        assert!(config.gaps.strict);
    }

    #[test]
    fn test_bad_toml_is_error() {
        assert!(AppConfig::parse("music_dirs = 5").is_err());
    }

    #[test]
    fn test_cli_api_key_wins() {
        let mut config = AppConfig::default();
        config.lastfm.api_key = Some("from-config".into());
        assert_eq!(
            config
                .resolve_api_key_with(Some("from-cli".into()), Some("from-env".into()))
                .as_deref(),
            Some("from-cli")
        );
    }

    #[test]
    fn test_blank_api_key_falls_through() {
        let mut config = AppConfig::default();
        config.lastfm.api_key = Some("from-config".into());
        assert_eq!(
            config
                .resolve_api_key_with(Some("".into()), Some("from-env".into()))
                .as_deref(),
            Some("from-env")
        );
        assert_eq!(
            config
                .resolve_api_key_with(Some("  ".into()), Some(" ".into()))
                .as_deref(),
            Some("from-config")
        );

        config.lastfm.api_key = Some("".into());
        assert_eq!(config.resolve_api_key_with(Some("".into()), None), None);
    }
}
