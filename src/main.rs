use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use futures_util::future::join_all;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use avatar_cache::AvatarCache;
use avatar_cache::domain::AvatarSourcePort;
use avatar_cache::infrastructure::{
    AppConfig, CliArgs, Command, HttpAvatarSource, LocalAvatarSource, StorageManager,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let mut config = if let Some(path) = &args.config {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        StorageManager::with_dir(dir).load_config(Some(path.as_path()))?
    } else {
        StorageManager::new()?.load_config(None)?
    };
    config.merge_with_args(args);
    Ok(config)
}

fn create_source(config: &AppConfig) -> Result<Arc<dyn AvatarSourcePort>> {
    if let Some(dir) = &config.avatar_dir {
        info!(dir = %dir.display(), "Serving avatars from local directory");
        return Ok(Arc::new(LocalAvatarSource::new(dir)));
    }

    let source = HttpAvatarSource::new(config.endpoint.to_settings())
        .wrap_err("failed to set up avatar endpoint")?;
    info!(base_url = %config.endpoint.base_url, "Serving avatars from remote endpoint");
    Ok(Arc::new(source))
}

async fn run(cache: Arc<AvatarCache>, command: &Command) -> Result<()> {
    let lookups = command.users().iter().map(|user| {
        let cache = cache.clone();
        async move { (user, cache.get_avatar_encoded(user).await) }
    });

    for (user, result) in join_all(lookups).await {
        let encoded = result.wrap_err_with(|| format!("avatar lookup failed for {user}"))?;
        match command {
            Command::Has { .. } => println!("{user}\t{}", !encoded.is_empty()),
            Command::Get { .. } => println!("{encoded}"),
        }
    }

    debug!(stats = %cache.stats(), "Lookups finished");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;

    info!(version = avatar_cache::VERSION, "Starting {}", avatar_cache::NAME);

    let cache = Arc::new(AvatarCache::new(create_source(&config)?));

    run(cache, &args.command).await
}
