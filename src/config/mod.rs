mod types;

pub use types::*;

use anyhow::{Context, Result};
use episodist_common::{media::EPISODE_PADDINGS, paths::normalize_extension, NamingPolicy, MIN_YEAR};
use std::env;
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file, then apply environment overrides.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = ["./episodist.toml", "~/.config/episodist/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Apply `EPISODIST_*` environment variables on top of `config`.
///
/// Values that do not parse are ignored with a warning.
pub fn apply_env_overrides(config: &mut Config) {
    if let Some(raw) = env_value("EPISODIST_EXTENSIONS") {
        let extensions: Vec<String> = raw
            .split(',')
            .map(normalize_extension)
            .filter(|e| !e.is_empty())
            .collect();
        if extensions.is_empty() {
            tracing::warn!("Ignoring EPISODIST_EXTENSIONS: no extensions in {:?}", raw);
        } else {
            config.scan.extensions = extensions;
        }
    }

    if let Some(year) = env_parsed::<u16>("EPISODIST_YEAR") {
        config.naming.default_year = year;
    }
    if let Some(season) = env_parsed::<u32>("EPISODIST_SEASON") {
        config.naming.default_season = season;
    }
    if let Some(episode) = env_parsed::<u32>("EPISODIST_EPISODE") {
        config.naming.default_episode = episode;
    }
    if let Some(padding) = env_parsed::<u8>("EPISODIST_EPISODE_PADDING") {
        if EPISODE_PADDINGS.contains(&padding) {
            config.naming.episode_padding = padding;
        } else {
            tracing::warn!(
                "Ignoring EPISODIST_EPISODE_PADDING={}: must be 2 or 3",
                padding
            );
        }
    }

    if let Some(path) = env_value("EPISODIST_MKVPROPEDIT") {
        config.tools.mkvpropedit_path = Some(PathBuf::from(path));
    }
    if let Some(path) = env_value("EPISODIST_MKVEXTRACT") {
        config.tools.mkvextract_path = Some(PathBuf::from(path));
    }
    if let Some(level) = env_value("EPISODIST_LOG_LEVEL") {
        config.log_level = level;
    }
}

/// Non-empty, trimmed value of an environment variable.
fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env_value(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}: cannot parse {:?}", name, raw);
            None
        }
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let naming = &config.naming;

    if !EPISODE_PADDINGS.contains(&naming.episode_padding) {
        anyhow::bail!(
            "naming.episode_padding must be 2 or 3, got {}",
            naming.episode_padding
        );
    }
    if naming.default_season == 0 {
        anyhow::bail!("naming.default_season must be a positive integer");
    }
    if naming.default_episode == 0 {
        anyhow::bail!("naming.default_episode must be a positive integer");
    }
    let max_year = NamingPolicy::max_year();
    if !(MIN_YEAR..=max_year).contains(&naming.default_year) {
        anyhow::bail!(
            "naming.default_year {} outside {}..={}",
            naming.default_year,
            MIN_YEAR,
            max_year
        );
    }

    if config.scan.extensions.iter().all(|e| normalize_extension(e).is_empty()) {
        anyhow::bail!("scan.extensions must list at least one extension");
    }

    if let Some(path) = &config.tools.mkvpropedit_path {
        if !path.exists() {
            tracing::warn!("Configured mkvpropedit path does not exist: {:?}", path);
        }
    }
    if let Some(path) = &config.tools.mkvextract_path {
        if !path.exists() {
            tracing::warn!("Configured mkvextract path does not exist: {:?}", path);
        }
    }

    Ok(())
}
