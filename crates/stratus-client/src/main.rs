use stratus_client::NextCloud;
use stratus_client::telemetry::init_tracing;
use stratus_core::config::load_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    if !init_tracing(&config.logging) {
        eprintln!("Tracing was already initialized");
    }

    tracing::info!(url = %config.server.url, user = %config.server.user, "Configuration loaded");

    let client = NextCloud::new(&config)?;
    let path = std::env::args().nth(1).unwrap_or_default();

    let listing = client.webdav.list_directory(&path, false).await?;
    tracing::info!(path = %path, count = listing.len(), "Listed folder");

    for file in &listing {
        println!("{}", client.webdav.path_of(file));
    }

    Ok(())
}
