use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

use hotel_merger::apis::create_suppliers;
use hotel_merger::domain::HotelCatalog;
use hotel_merger::observability::{self, metrics};
use hotel_merger::{HotelFilter, HotelPipeline, MergerConfig, MergerError};

const EXIT_FETCH_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;

#[derive(Parser)]
#[command(name = "hotel_merger")]
#[command(about = "Fetch hotel data from every supplier, merge it, and print the matching hotels as JSON")]
#[command(version)]
struct Cli {
    /// Comma-separated hotel ids; "none" or omitted for every hotel
    #[arg(default_value = "")]
    hotel_ids: String,
    /// Comma-separated destination ids; "none" or omitted for every destination
    #[arg(default_value = "")]
    destination_ids: String,
    /// Path to a TOML config file (defaults to ./hotel_merger.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
    /// Include contributing suppliers and per-field provenance in the output
    #[arg(long)]
    with_provenance: bool,
    /// Print Prometheus metrics to stderr on exit
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = match MergerConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("hotel_merger: {e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    // Keep the guard alive so file logs flush on exit
    let _log_guard = observability::init_logging(config.log_dir.as_deref());

    let prometheus = if cli.metrics {
        match metrics::init() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Failed to install metrics recorder: {}", e);
                None
            }
        }
    } else {
        None
    };

    // Bad filter arguments are rejected before any supplier is contacted
    let filter = match HotelFilter::parse(&cli.hotel_ids, &cli.destination_ids) {
        Ok(filter) => filter,
        Err(e) => {
            error!("{}", e);
            eprintln!("hotel_merger: {e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let code = match run(&cli, config, &filter).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("hotel_merger: {e:#}");
            match e.downcast_ref::<MergerError>() {
                Some(MergerError::InvalidFilterInput(_)) | Some(MergerError::Config(_)) => ExitCode::from(EXIT_USAGE),
                _ => ExitCode::from(EXIT_FETCH_FAILURE),
            }
        }
    };

    if let Some(handle) = prometheus {
        eprintln!("{}", handle.render());
    }
    code
}

async fn run(cli: &Cli, config: MergerConfig, filter: &HotelFilter) -> anyhow::Result<()> {
    let sources = create_suppliers(&config)?;
    info!(suppliers = sources.len(), "Configured supplier sources");

    let pipeline = HotelPipeline::new(config, sources);
    let (catalog, report) = pipeline.run_with_report(filter).await?;
    for failed in report.failed_suppliers() {
        warn!(supplier = %failed.supplier, "Supplier contributed no data: {}", failed.error.as_deref().unwrap_or("unknown error"));
    }

    let output = render(&catalog, cli.pretty, cli.with_provenance).context("Failed to serialize hotel catalog")?;
    println!("{output}");
    Ok(())
}

fn render(catalog: &HotelCatalog, pretty: bool, with_provenance: bool) -> serde_json::Result<String> {
    if with_provenance {
        let view: Vec<_> = catalog.iter().map(|hotel| hotel.with_provenance()).collect();
        if pretty {
            serde_json::to_string_pretty(&view)
        } else {
            serde_json::to_string(&view)
        }
    } else if pretty {
        serde_json::to_string_pretty(catalog)
    } else {
        serde_json::to_string(catalog)
    }
}
