use anyhow::anyhow;
use clap::Parser;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use ogs_compat_core::{ChallengeFilter, LegacyRankTable, RankCodec, Viewer};
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::{Read, Write},
    path::PathBuf,
};
use time::{format_description::well_known::Iso8601, OffsetDateTime};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to Settings.toml file holding configuration options
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level to run with (default: info)
    #[arg(short, long)]
    pub level: Option<String>,

    /// Path to a JSON seek graph snapshot, overrides feed_settings.path
    #[arg(short, long)]
    pub feed: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Settings {
    pub config: Option<String>,
    pub level: Option<String>,
    pub feed_settings: FeedSettings,
    pub viewer_settings: ViewerSettings,
    #[serde(default)]
    pub challenge_filter: ChallengeFilter,
}

impl ConfigurableSettings for Settings {
    fn apply_cli_overrides(&mut self, cli_settings: &CliSettings) {
        if let Some(level) = &cli_settings.level {
            self.level = Some(level.clone());
        }
        if let Some(feed) = &cli_settings.feed {
            self.feed_settings.path = feed.clone();
        }
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("./config/local.toml")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedSettings {
    /// JSON array of seek graph messages, in the order they were received
    pub path: String,
    /// Which legacy table decodes professional ranking numbers
    #[serde(default)]
    pub rank_table: LegacyRankTable,
}

impl Default for FeedSettings {
    fn default() -> Self {
        FeedSettings {
            path: String::from("./data/seekgraph.json"),
            rank_table: LegacyRankTable::default(),
        }
    }
}

/// The player the challenges are filtered for
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ViewerSettings {
    /// Unset means browsing without an account
    pub id: Option<u64>,
    /// Legacy ranking number, same encoding the server uses
    pub ranking: f64,
    #[serde(default)]
    pub professional: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        ViewerSettings {
            id: None,
            ranking: 15.0,
            professional: false,
        }
    }
}

impl ViewerSettings {
    pub fn viewer(&self, codec: &RankCodec) -> Viewer {
        Viewer {
            id: self.id.unwrap_or(0),
            anonymous: self.id.is_none(),
            rank: codec.decode(self.ranking, self.professional),
        }
    }
}

pub fn get_settings() -> Result<Settings, anyhow::Error> {
    get_settings_with_cli(Cli::parse().into())
}

pub struct CliSettings {
    pub config: Option<String>,
    pub level: Option<String>,
    pub feed: Option<String>,
}

impl From<Cli> for CliSettings {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            level: cli.level,
            feed: cli.feed,
        }
    }
}

pub trait ConfigurableSettings: Serialize + for<'de> Deserialize<'de> + Default {
    /// Apply CLI settings after loading from file
    fn apply_cli_overrides(&mut self, cli_settings: &CliSettings);

    /// Get the default config file path
    fn default_config_path() -> PathBuf {
        PathBuf::from("./config/settings.toml")
    }

    /// Get the config directory path
    fn config_directory() -> PathBuf {
        PathBuf::from("./config")
    }
}

fn read_settings<T: ConfigurableSettings>(mut file: File) -> Result<T, anyhow::Error> {
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| anyhow!("Failed to read config: {}", e))?;
    toml::from_str(&content).map_err(|e| anyhow!("Failed to map config to settings: {}", e))
}

pub fn get_settings_with_cli<T: ConfigurableSettings>(
    cli_settings: CliSettings,
) -> Result<T, anyhow::Error> {
    let mut settings = if let Some(config_path) = cli_settings.config.clone() {
        let path = PathBuf::from(config_path);

        let absolute_path = if path.is_absolute() {
            path
        } else {
            env::current_dir()?.join(path)
        };

        match File::open(absolute_path) {
            Ok(file) => read_settings(file)?,
            Err(err) => return Err(anyhow!("Failed to find file: {}", err)),
        }
    } else {
        let default_path = T::default_config_path();
        match File::open(&default_path) {
            Ok(file) => read_settings(file)?,
            Err(_) => {
                let default_settings = T::default();

                fs::create_dir_all(T::config_directory())
                    .map_err(|e| anyhow!("Failed to create config directory: {}", e))?;

                let toml_content = toml::to_string(&default_settings)
                    .map_err(|e| anyhow!("Failed to serialize default settings: {}", e))?;

                let mut file = fs::File::create(&default_path)
                    .map_err(|e| anyhow!("Failed to create config file: {}", e))?;
                file.write_all(toml_content.as_bytes())
                    .map_err(|e| anyhow!("Failed to write default config: {}", e))?;

                default_settings
            }
        }
    };

    settings.apply_cli_overrides(&cli_settings);

    Ok(settings)
}

pub fn setup_logger(
    level: Option<String>,
    filter_targets: Vec<String>,
) -> Result<(), fern::InitError> {
    let rust_log = get_log_level(level);
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let timestamp = OffsetDateTime::now_utc()
                .format(&Iso8601::DEFAULT)
                .unwrap_or_default();
            out.finish(format_args!(
                "[{} {}] {}: {}",
                timestamp,
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .level(rust_log)
        .filter(move |metadata| {
            !filter_targets
                .iter()
                .any(|filter| metadata.target().starts_with(filter))
        })
        // stdout carries the report
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn get_log_level(level: Option<String>) -> LevelFilter {
    match level {
        Some(level) => parse_level(&level),
        None => parse_level(&env::var("RUST_LOG").unwrap_or_default()),
    }
}
