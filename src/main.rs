use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use solarscope::{
    analysis::{Analysis, AnalysisRequest},
    config::{Config, ConfigLoader},
    export::{export_to_dir, export_to_path, ExportFilter},
    geo::Coordinate,
    telemetry, web,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Synthetic solar feasibility estimator")]
struct Cli {
    /// Path to a YAML config file (built-in defaults when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate conditions and feasibility for one site
    Analyze {
        #[command(flatten)]
        site: SiteArgs,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write neighbour points to CSV
    Export {
        #[command(flatten)]
        site: SiteArgs,

        /// Include points that are not feasible
        #[arg(long)]
        all: bool,

        /// Output file; defaults to puntos_factibles_<lat>_<lon>.csv in the
        /// current directory
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Serve the JSON/CSV API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Args)]
struct SiteArgs {
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Search radius in km (config default when omitted)
    #[arg(long)]
    radius_km: Option<f64>,

    /// Number of neighbour points (config default when omitted)
    #[arg(long)]
    count: Option<usize>,

    /// Calendar month 1-12 (current month when omitted)
    #[arg(long)]
    month: Option<u32>,
}

impl SiteArgs {
    fn request(&self, config: &Config) -> AnalysisRequest {
        let mut request = AnalysisRequest::new(Coordinate::new(self.lat, self.lon))
            .with_radius_km(self.radius_km.unwrap_or(config.defaults.radius_km))
            .with_neighbor_count(self.count.unwrap_or(config.defaults.neighbor_count));
        if let Some(month) = self.month {
            request = request.with_month(month);
        }
        request
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ConfigLoader::new(".").load(path)?,
        None => Config::default(),
    };
    telemetry::init_tracing(&config.logging.level);

    match cli.command {
        Command::Analyze { site, json } => {
            let analysis = Analysis::run(&config.estimator(), site.request(&config));
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_summary(&analysis);
            }
        }
        Command::Export { site, all, output } => {
            let request = site.request(&config);
            let analysis = Analysis::run(&config.estimator(), request);
            let filter = if all {
                ExportFilter::All
            } else {
                ExportFilter::FeasibleOnly
            };
            let path = match output {
                Some(path) => {
                    export_to_path(&path, &analysis.neighbors, filter)?;
                    path
                }
                None => export_to_dir(".", &request.coordinate, &analysis.neighbors, filter)?,
            };
            println!("Wrote {}", path.display());
        }
        Command::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            info!(host = %config.server.host, port = config.server.port, "starting API");
            web::run(config).await?;
        }
    }
    Ok(())
}

fn print_summary(analysis: &Analysis) {
    let request = &analysis.request;
    let sample = &analysis.sample;
    println!("Site {} (month {})", request.coordinate, request.month);
    println!("  Solar radiation   {:>7.1} W/m²", sample.radiation_w_m2);
    println!("  Temperature       {:>7.1} °C", sample.temperature_c);
    println!("  Relative humidity {:>7.1} %", sample.humidity_pct);
    println!(
        "  Verdict: {} (score {}) - {}",
        analysis.verdict.verdict, analysis.verdict.score, analysis.verdict.message
    );
    println!(
        "{} of {} neighbour points feasible within {} km",
        analysis.feasible_count,
        analysis.neighbors.len(),
        request.radius_km
    );
    for point in analysis.feasible_neighbors() {
        println!(
            "  {:>9.4} {:>10.4}  {:>7.1} W/m²  {:>5.1} °C  {:>5.1} %",
            point.coordinate.latitude,
            point.coordinate.longitude,
            point.sample.radiation_w_m2,
            point.sample.temperature_c,
            point.sample.humidity_pct
        );
    }
}
