use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use campfire::config::{Config, StorageMode};
use campfire::controllers::build_router;
use campfire::images::{ImageHost, LogImageHost};
use campfire::{in_memory, mongo};
use clap::Parser;
use tracing_subscriber::EnvFilter;

async fn async_main(config: Config) -> anyhow::Result<()> {
    let mailer = config.mailer()?;
    let images: Arc<dyn ImageHost + Sync + Send> = Arc::new(LogImageHost);

    let state = match config.storage {
        StorageMode::Memory => in_memory(mailer, images, config.public_url()),
        StorageMode::Mongo => {
            let uri = config.mongo_uri.as_deref().ok_or_else(|| {
                anyhow::anyhow!("--storage mongo requires --mongo-uri or MONGODB_URI")
            })?;
            mongo(uri, &config.database, mailer, images, config.public_url()).await?
        },
    };

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    tracing::info!(listen = %config.listen, storage = ?config.storage, "campfire listening");

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("campfire=info,tower_http=info,info")),
        )
        .init();

    let config = Config::parse();

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    if let Some(n) = config.worker_threads {
        builder.worker_threads(n);
    }
    let rt = match builder
        .enable_all()
        .thread_name_fn(|| {
            static NUM: AtomicUsize = AtomicUsize::new(0);
            format!("campfire-worker-{}", NUM.fetch_add(1, Ordering::SeqCst))
        })
        .build()
    {
        Ok(r) => r,
        Err(e) => return tracing::error!("cannot build runtime: {}", e),
    };

    if let Err(e) = rt.block_on(async_main(config)) {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
