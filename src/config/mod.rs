mod types;

pub use types::*;

use anyhow::{Context, Result};
use reqwest::Url;
use std::collections::HashSet;
use std::path::Path;

use crate::location::Location;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./poi-enrich.toml",
        "~/.config/poi-enrich/config.toml",
        "/etc/poi-enrich/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Build the location list described by the config, in file order.
pub fn build_locations(config: &Config) -> Result<Vec<Location>> {
    config
        .locations
        .iter()
        .enumerate()
        .map(|(i, loc)| {
            Location::from_config(loc).with_context(|| format!("Invalid location #{}", i + 1))
        })
        .collect()
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.http.timeout_secs == Some(0) {
        anyhow::bail!("HTTP timeout cannot be 0; omit it to disable the timeout");
    }

    Url::parse(&config.foursquare.base_url).with_context(|| {
        format!("Invalid Foursquare base_url: {}", config.foursquare.base_url)
    })?;
    Url::parse(&config.yelp.base_url)
        .with_context(|| format!("Invalid Yelp base_url: {}", config.yelp.base_url))?;

    // Missing credentials are not fatal: those calls fail and are reported
    // per location.
    if config.foursquare.client_id.is_empty() || config.foursquare.client_secret.is_empty() {
        tracing::warn!("Foursquare credentials are not configured");
    }
    if config.yelp.consumer_key.is_empty()
        || config.yelp.consumer_secret.is_empty()
        || config.yelp.token.is_empty()
        || config.yelp.token_secret.is_empty()
    {
        tracing::warn!("Yelp credentials are not configured");
    }

    let mut names = HashSet::new();
    for location in build_locations(config)? {
        if !names.insert(location.name.clone()) {
            anyhow::bail!("Location '{}' is defined more than once", location.name);
        }
    }

    Ok(())
}
