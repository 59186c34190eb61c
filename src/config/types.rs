use episodist_av::MkvToolnix;
use episodist_common::{paths::default_media_extensions, Genre, NamingPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Log filter for the episodist crates when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub naming: NamingConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            naming: NamingConfig::default(),
            scan: ScanConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Config {
    /// Build a naming policy, taking each unset value from `[naming]`.
    pub fn policy(
        &self,
        title: impl Into<String>,
        genre: Genre,
        year: Option<u16>,
        season: Option<u32>,
        episode: Option<u32>,
        padding: Option<u8>,
    ) -> NamingPolicy {
        NamingPolicy::new(
            title,
            genre,
            year.unwrap_or(self.naming.default_year),
            season.unwrap_or(self.naming.default_season),
            episode.unwrap_or(self.naming.default_episode),
        )
        .with_padding(padding.unwrap_or(self.naming.episode_padding))
    }
}

/// Defaults for values not given on the command line.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NamingConfig {
    #[serde(default = "default_year")]
    pub default_year: u16,

    #[serde(default = "default_one")]
    pub default_season: u32,

    #[serde(default = "default_one")]
    pub default_episode: u32,

    /// Episode number digits: 2 or 3.
    #[serde(default = "default_episode_padding")]
    pub episode_padding: u8,
}

fn default_year() -> u16 {
    2000
}
fn default_one() -> u32 {
    1
}
fn default_episode_padding() -> u8 {
    2
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            default_year: default_year(),
            default_season: default_one(),
            default_episode: default_one(),
            episode_padding: default_episode_padding(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    /// Extensions picked up when scanning a directory, with or without dot.
    #[serde(default = "default_media_extensions")]
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_media_extensions(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub mkvpropedit_path: Option<PathBuf>,

    #[serde(default)]
    pub mkvextract_path: Option<PathBuf>,
}

impl ToolsConfig {
    /// Resolve MKVToolNix, preferring the configured paths.
    pub fn discover(&self) -> MkvToolnix {
        MkvToolnix::discover(
            self.mkvpropedit_path.as_deref(),
            self.mkvextract_path.as_deref(),
        )
    }
}
