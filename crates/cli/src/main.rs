mod args;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use futures::future::join_all;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinerec_core::{
    load_config_or_default, validate_config, ArtworkCatalog, Config, HttpRecommendationClient,
    PosterLookup, QueryClient, RecommendationItem, RecommendationService, SanitizedConfig,
    TmdbPosterClient,
};

use args::{parse_args, usage, Cli};
use render::{render_list, Poster};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = parse_args(std::env::args().skip(1))?;
    let Some(description) = cli.command.description() else {
        println!("{}", usage());
        return Ok(());
    };

    let config = load(&cli)?;

    let service: Arc<dyn RecommendationService> = Arc::new(
        HttpRecommendationClient::new(&config.recommender)
            .context("Failed to create recommendation client")?,
    );

    let query = QueryClient::mount(service, description);
    let state = query.settled().await;

    if let Some(message) = state.error {
        bail!("{}", message);
    }
    let items = state.data.unwrap_or_default();
    info!("Received {} recommendations", items.len());

    let posters = if cli.posters {
        enrich(&config, &items).await
    } else {
        vec![Poster::Skipped; items.len()]
    };

    print!("{}", render_list(&cli.command.heading(), &items, &posters));
    Ok(())
}

fn load(cli: &Cli) -> Result<Config> {
    let config_path = cli
        .config_path
        .clone()
        .or_else(|| std::env::var("CINEREC_CONFIG").ok().map(PathBuf::from));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config_or_default(config_path.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        "Configuration loaded: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );

    Ok(config)
}

/// Look up every poster concurrently. Failures only cost that card its poster.
async fn enrich(config: &Config, items: &[RecommendationItem]) -> Vec<Poster> {
    let credentials = config.artwork.credentials();
    if credentials.is_empty() {
        warn!("No TMDB credentials configured, posters unavailable");
        return vec![Poster::Unavailable; items.len()];
    }

    let catalog: Arc<dyn ArtworkCatalog> = match TmdbPosterClient::new(&config.artwork) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!("Failed to create TMDB client: {}", e);
            return vec![Poster::Unavailable; items.len()];
        }
    };

    let lookups: Vec<PosterLookup> = items
        .iter()
        .map(|item| {
            PosterLookup::mount(
                Arc::clone(&catalog),
                credentials.clone(),
                Some(item.title.clone()),
            )
        })
        .collect();

    let states = join_all(lookups.iter().map(|lookup| lookup.settled())).await;
    states.iter().map(Poster::from).collect()
}
