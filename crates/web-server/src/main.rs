use std::path::Path;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// This main function is the entry point when running `cargo run -p web-server`.
// It serves the dashboards with `config.toml` and a console logger only; the
// `stockscope` binary adds the CLI and file logging.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = configuration::load_config(Path::new("config.toml"))?;
    tracing::info!("Configuration loaded.");
    let provider = api_client::from_config(&config.provider)?;
    web_server::run_server(&config, provider).await
}
