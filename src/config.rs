use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

const APP_DIR: &str = "daytally";
const DEFAULT_DATA_FILE: &str = "entries.json";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigSortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) data: Option<PathBuf>,
    #[serde(default)]
    pub(crate) compact: bool,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) order: Option<ConfigSortOrder>,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) locale: Option<String>,
}

/// Where the loaded config came from
///
/// Loading happens before logging is set up, so the outcome is kept and
/// reported through [`ConfigSource::log`] afterwards.
#[derive(Debug)]
pub(crate) enum ConfigSource {
    Default,
    File(PathBuf),
    Invalid { path: PathBuf, message: String },
}

impl ConfigSource {
    pub(crate) fn log(&self) {
        match self {
            ConfigSource::Default => debug!("no config file found, using defaults"),
            ConfigSource::File(path) => debug!(path = %path.display(), "loaded config"),
            ConfigSource::Invalid { path, message } => {
                warn!(path = %path.display(), "failed to parse config: {message}");
            }
        }
    }
}

impl Config {
    pub(crate) fn load() -> (Self, ConfigSource) {
        Self::load_from(Self::get_config_paths())
    }

    /// First readable file among `paths` that parses wins
    fn load_from(paths: Vec<PathBuf>) -> (Self, ConfigSource) {
        let mut invalid = None;

        for path in paths {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => return (config, ConfigSource::File(path)),
                    Err(e) => {
                        if invalid.is_none() {
                            invalid = Some(ConfigSource::Invalid {
                                path,
                                message: e.to_string(),
                            });
                        }
                    }
                }
            }
        }

        (Self::default(), invalid.unwrap_or(ConfigSource::Default))
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/daytally/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join(APP_DIR).join("config.toml"));
        }

        // 2. Platform config dir (e.g. ~/Library/Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join(APP_DIR).join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.daytally.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".daytally.toml"));
        }

        paths
    }
}

/// `<data dir>/daytally/entries.json`
pub(crate) fn default_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join(DEFAULT_DATA_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_paths_not_empty() {
        let paths = Config::get_config_paths();
        assert!(!paths.is_empty());
        assert!(paths.iter().all(|p| p.to_string_lossy().contains("daytally")));
    }

    #[test]
    fn parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            data = "/tmp/entries"
            compact = true
            debug = true
            order = "desc"
            color = "never"
            timezone = "UTC"
            locale = "de"
            "#,
        )
        .unwrap();
        assert_eq!(config.data, Some(PathBuf::from("/tmp/entries")));
        assert!(config.compact);
        assert!(config.debug);
        assert!(!config.no_color);
        assert_eq!(config.order, Some(ConfigSortOrder::Desc));
        assert_eq!(config.color, Some(ConfigColorMode::Never));
        assert_eq!(config.timezone.as_deref(), Some("UTC"));
        assert_eq!(config.locale.as_deref(), Some("de"));
    }

    #[test]
    fn load_from_skips_missing_and_reports_invalid() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.toml");
        let broken = tmp.path().join("broken.toml");
        let good = tmp.path().join("good.toml");
        fs::write(&broken, "order = [").unwrap();
        fs::write(&good, "compact = true").unwrap();

        let (config, source) = Config::load_from(vec![missing.clone(), broken.clone(), good.clone()]);
        assert!(config.compact);
        assert!(matches!(source, ConfigSource::File(ref p) if *p == good));

        let (config, source) = Config::load_from(vec![missing, broken.clone()]);
        assert!(!config.compact);
        assert!(matches!(source, ConfigSource::Invalid { ref path, .. } if *path == broken));
    }

    #[test]
    fn load_from_nothing_is_default() {
        let (config, source) = Config::load_from(Vec::new());
        assert!(config.data.is_none());
        assert!(matches!(source, ConfigSource::Default));
    }

    #[test]
    fn default_data_path_ends_with_entries_file() {
        if let Some(path) = default_data_path() {
            assert!(path.ends_with("daytally/entries.json"));
        }
    }
}
