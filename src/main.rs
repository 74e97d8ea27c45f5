//! Tire Stock - chat-facing stock lookup server
//!
//! Serves size lookups against a cached copy of the inventory sheet, or runs
//! a single lookup from the command line.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tire_stock::config::{
    self, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MIN_DIGITS, DEFAULT_TTL_SECS,
};
use tire_stock::{
    ConfiguredSource, Error, FileSource, InventorySource, LookupConfig, Result, SheetFormat,
    SheetSource, StockLookupService,
};

/// Tire stock lookup - matches chat messages against the inventory sheet
#[derive(Parser, Debug)]
#[command(name = "tire_stock")]
#[command(version, about, long_about = None)]
struct Args {
    /// URL of the published inventory sheet
    #[arg(long, env = "SHEET_URL", conflicts_with_all = ["sheet_id", "source_file"])]
    sheet_url: Option<String>,

    /// Format served by --sheet-url
    #[arg(long, value_enum, env = "SHEET_FORMAT", default_value_t = SheetFormat::Csv)]
    sheet_format: SheetFormat,

    /// Google Sheet ID; the tab given by --sheet-name is read as CSV
    #[arg(long, env = "SHEET_ID", conflicts_with = "source_file")]
    sheet_id: Option<String>,

    /// Tab name used with --sheet-id
    #[arg(long, env = "SHEET_NAME", default_value = "Sheet1")]
    sheet_name: String,

    /// Local CSV export of the inventory instead of a live sheet
    #[arg(long, env = "SOURCE_FILE")]
    source_file: Option<PathBuf>,

    /// Seconds before the cached inventory is refetched
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = DEFAULT_TTL_SECS)]
    ttl_secs: u64,

    /// Minimum digits for a message to count as a size query (4-6)
    #[arg(long, env = "MIN_DIGITS", default_value_t = DEFAULT_MIN_DIGITS)]
    min_digits: usize,

    /// Timeout in seconds for one sheet fetch
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    fetch_timeout_secs: u64,

    /// Port for the HTTP API
    #[arg(long, env = "PORT", default_value_t = 8080)]
    web_port: u16,

    /// Look up one message, print the matches as JSON and exit
    #[arg(long)]
    query: Option<String>,
}

fn build_source(args: &Args) -> Result<ConfiguredSource> {
    let timeout = config::fetch_timeout(args.fetch_timeout_secs)?;

    if let Some(path) = &args.source_file {
        return Ok(ConfiguredSource::File(FileSource::new(path)));
    }
    if let Some(url) = &args.sheet_url {
        let sheet = SheetSource::new(url.as_str(), args.sheet_format, timeout)?;
        return Ok(ConfiguredSource::Sheet(sheet));
    }
    if let Some(sheet_id) = &args.sheet_id {
        let sheet = SheetSource::google_csv(sheet_id, &args.sheet_name, timeout)?;
        return Ok(ConfiguredSource::Sheet(sheet));
    }

    Err(Error::InvalidConfig(
        "no inventory source: set --sheet-url, --sheet-id or --source-file".to_string(),
    ))
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match LookupConfig::new(args.ttl_secs, args.min_digits) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let source = match build_source(&args) {
        Ok(source) => source,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    log::info!("Starting tire_stock...");
    log::info!("Inventory source: {}", source.describe());
    log::info!(
        "Cache TTL: {}s, minimum size digits: {}",
        config.ttl.as_secs(),
        config.min_digits
    );

    let service = Arc::new(StockLookupService::new(source, config));

    if let Some(text) = args.query {
        run_query(service.as_ref(), &text).await;
        return;
    }

    // Warm the cache so the first chat message doesn't wait on the sheet
    match service.refresh().await {
        Ok(count) => log::info!("Loaded {} inventory records", count),
        Err(e) => log::warn!("Initial inventory fetch failed, starting empty: {}", e),
    }

    if let Err(e) = tire_stock::web::serve(service, args.web_port).await {
        log::error!("Web server error: {}", e);
        std::process::exit(1);
    }
}

/// Run a single lookup and print the matches
async fn run_query<S: InventorySource>(service: &StockLookupService<S>, text: &str) {
    match service.query_key(text) {
        Some(key) if key.is_flotation() => log::info!("Size key: {} (flotation)", key),
        Some(key) => log::info!("Size key: {}", key),
        None => log::info!("Not a size query: {:?}", text),
    }

    let matches = service.lookup(text).await;
    for record in &matches {
        log::info!(
            "{} {} [{}] {}",
            record.brand,
            record.display_size(),
            record.year,
            record.price
        );
    }

    match serde_json::to_string_pretty(&matches) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize matches: {}", e);
            std::process::exit(1);
        }
    }
}
