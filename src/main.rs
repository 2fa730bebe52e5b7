mod cli;

use poi_enrich::{
    config,
    enrichment::{
        providers::{FoursquareClient, YelpClient},
        EnrichmentCoordinator, ProviderClient,
    },
    report::ConsoleListener,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;

async fn enrich(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let mut locations = config::build_locations(&config)?;

    if locations.is_empty() {
        tracing::warn!("No locations configured; nothing to enrich");
    }

    let listener = Arc::new(ConsoleListener::new(json));
    let coordinator = EnrichmentCoordinator::from_config(&config, listener);
    coordinator
        .enrich(&mut locations)
        .await
        .context("Enrichment pass did not complete")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&locations)?);
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "poi_enrich=trace,poi_common=debug".to_string()
        } else {
            "poi_enrich=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Enrich { json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(enrich(cli.config.as_deref(), json))
        }
        Commands::Locations => list_locations(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("poi-enrich {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn list_locations(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let locations = config::build_locations(&config)?;

    if locations.is_empty() {
        println!("No locations configured.");
        return Ok(());
    }

    for location in &locations {
        println!(
            "{} ({}) foursquare={} yelp={}",
            location.name, location.position, location.data.foursquare.key, location.data.yelp.key
        );
    }

    Ok(())
}

fn validate_config(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let timeout = config.http.timeout();

    println!("Configuration is valid!");
    println!("  Locations: {}", config.locations.len());

    let foursquare = FoursquareClient::new(&config.foursquare, timeout);
    let yelp = YelpClient::new(&config.yelp, timeout);
    for (name, available) in [
        (foursquare.kind(), foursquare.is_available()),
        (yelp.kind(), yelp.is_available()),
    ] {
        let status = if available {
            "credentials configured"
        } else {
            "missing credentials"
        };
        println!("  {}: {}", name, status);
    }

    Ok(())
}
