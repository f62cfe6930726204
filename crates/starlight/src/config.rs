use directories::ProjectDirs;
use nightsky::{MonthDay, SeasonWindow, Timing};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "intro_delay_ms")]
    pub intro_delay: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "period_ms")]
    pub period: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "activation_delay_ms")]
    pub activation_delay: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "fade_grace_ms")]
    pub fade_grace: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        let t = Timing::default();
        Self {
            intro_delay: t.intro_delay,
            period: t.period,
            activation_delay: t.activation_delay,
            fade_grace: t.fade_grace,
        }
    }
}

impl From<TimingConfig> for Timing {
    fn from(c: TimingConfig) -> Self {
        Self {
            intro_delay: c.intro_delay,
            period: c.period,
            activation_delay: c.activation_delay,
            fade_grace: c.fade_grace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SeasonConfig {
    pub start: MonthDay,
    pub end: MonthDay,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        let w = SeasonWindow::default();
        Self {
            start: w.start,
            end: w.end,
        }
    }
}

impl From<SeasonConfig> for SeasonWindow {
    fn from(c: SeasonConfig) -> Self {
        Self {
            start: c.start,
            end: c.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MediaConfig {
    /// Shown in order by the hidden photo viewer.
    pub photos: Vec<PathBuf>,
    pub courage_audio: Option<PathBuf>,
    pub karaoke_audio: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LettersConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub season: SeasonConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub letters: LettersConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("org", "starlight", "starlight").ok_or(ConfigError::ConfigDirNotFound)
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

pub fn get_data_dir() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

fn builder() -> config::ConfigBuilder<config::builder::DefaultState> {
    config::Config::builder()
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("STARLIGHT")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("media.photos")
        .try_parsing(true)
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(environment())
        .build()?;

    Ok(s.try_deserialize()?)
}

/// A broken file is reported and replaced by defaults.
pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }
    log::debug!("Watching {}", config_path.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        let s = builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        Ok(s.try_deserialize()?)
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(Timing::from(config.timing), Timing::default());
        assert_eq!(SeasonWindow::from(config.season), SeasonWindow::default());
    }

    #[test]
    fn test_bundled_default_config_parses() {
        let config = parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(Timing::from(config.timing), Timing::default());
        assert_eq!(config.season.start, MonthDay::new(4, 1).unwrap());
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = parse(
            r#"
            [timing]
            period_ms = 1000

            [season]
            start = "12-20"
            end = "01-05"

            [media]
            photos = ["/tmp/a.jpg", "/tmp/b.jpg"]
            courage_audio = "/tmp/courage.mp3"

            [letters]
            path = "/tmp/letters.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.timing.period, Duration::from_millis(1000));
        assert_eq!(config.timing.intro_delay, Duration::from_millis(3500));
        assert_eq!(config.season.end, MonthDay::new(1, 5).unwrap());
        assert_eq!(config.media.photos.len(), 2);
        assert_eq!(
            config.media.courage_audio,
            Some(PathBuf::from("/tmp/courage.mp3"))
        );
        assert_eq!(config.media.karaoke_audio, None);
        assert_eq!(config.letters.path, Some(PathBuf::from("/tmp/letters.json")));
    }

    #[test]
    fn test_bad_month_day_is_an_error() {
        assert!(parse("[season]\nstart = \"04-31\"").is_err());
    }

    #[test]
    fn test_season_deserialization() {
        let season: SeasonConfig =
            serde_json::from_str(r#"{"start": "03-21", "end": "04-19"}"#).unwrap();
        assert_eq!(season.start, MonthDay::new(3, 21).unwrap());
    }
}
