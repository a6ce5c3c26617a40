use analytics::CorrelationMatrix;
use api_client::PriceProvider;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, Table};
use configuration::{Config, LogFormat, LoggingConfig};
use core_types::Ticker;
use engine::{ComparatorSession, HeatmapSession, heatmap_title};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// The main entry point for the Stockscope dashboards.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment overrides (STOCKSCOPE_*) may live in a .env file.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config(&cli.config)?;
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    if let Some(fixtures) = cli.fixtures {
        config.provider.fixtures = Some(fixtures);
    }
    // Keep the guard alive so buffered file logs are flushed on exit.
    let _guard = init_tracing(&config.logging)?;
    tracing::info!(config = %cli.config.display(), "Configuration loaded.");

    let provider: Arc<dyn PriceProvider> = api_client::from_config(&config.provider)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve => web_server::run_server(&config, provider).await,
        Commands::Heatmap(args) => handle_heatmap(args, &config, provider.as_ref()).await,
        Commands::Compare(args) => handle_compare(args, config, provider.as_ref()).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Interactive stock comparison and rolling correlation dashboards.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides `logging.format` from the configuration.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    /// Serves prices from this JSON file instead of the API (offline mode).
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve both dashboards over HTTP and WebSocket.
    Serve,
    /// Print the correlation matrix of one heatmap window.
    Heatmap(HeatmapArgs),
    /// Print the summary statistics of a ticker pair.
    Compare(CompareArgs),
}

#[derive(Parser)]
struct HeatmapArgs {
    /// Cursor index of the window start (0 is the first trading date).
    #[arg(long)]
    index: Option<usize>,
}

#[derive(Parser)]
struct CompareArgs {
    /// First ticker (defaults to `comparator.default_first`).
    #[arg(long)]
    first: Option<Ticker>,

    /// Second ticker (defaults to `comparator.default_second`).
    #[arg(long)]
    second: Option<Ticker>,
}

// ==============================================================================
// Logging
// ==============================================================================

/// Installs the global subscriber: `RUST_LOG` filter (default `info`), a
/// console layer and, if configured, a daily-rolling file layer.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (full, compact) = match logging.format {
        LogFormat::Full => (Some(fmt::layer()), None),
        LogFormat::Compact => (None, Some(fmt::layer().compact())),
    };

    let (file, guard) = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &logging.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(full)
        .with(compact)
        .with(file)
        .try_init()?;

    Ok(guard)
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_heatmap(
    args: HeatmapArgs,
    config: &Config,
    provider: &dyn PriceProvider,
) -> anyhow::Result<()> {
    let mut session = HeatmapSession::load(provider, &config.heatmap).await?;
    if let Some(index) = args.index {
        session.seek(index)?;
    }

    let view = session.view();
    println!("{}", heatmap_title(&view));
    println!(
        "Cursor: {} of {} ({} rows in window)",
        session.cursor().index(),
        session.cursor().last_index(),
        view.slice.table.len()
    );
    println!("{}", matrix_table(&view.matrix));
    Ok(())
}

async fn handle_compare(
    args: CompareArgs,
    mut config: Config,
    provider: &dyn PriceProvider,
) -> anyhow::Result<()> {
    if let Some(first) = args.first {
        config.comparator.default_first = first;
    }
    if let Some(second) = args.second {
        config.comparator.default_second = second;
    }
    // The overrides are subject to the same rules as the file values.
    config.validate()?;

    let session = ComparatorSession::load(provider, &config.comparator).await?;
    let frame = session.frame();
    println!("{}", frame.title);
    println!("{} aligned rows", frame.dates.len());
    println!();
    println!("{}", frame.statistics);
    Ok(())
}

fn matrix_table(matrix: &CorrelationMatrix) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec![String::new()];
    header.extend(matrix.tickers().iter().map(Ticker::to_string));
    table.set_header(header);

    for (ticker, row) in matrix.tickers().iter().zip(matrix.rows()) {
        let mut cells = vec![ticker.to_string()];
        cells.extend(row.iter().map(|value| match value {
            Some(v) => format!("{v:.1}"),
            None => "NaN".to_string(),
        }));
        table.add_row(cells);
    }

    for index in 1..=matrix.size() {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}
