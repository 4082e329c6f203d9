//! Subscriber forecasting dashboard binary

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use subscriber_forecast::presentation::diagnostics::{correlogram_text, ACF_TITLE, PACF_TITLE};
use subscriber_forecast::presentation::page::render_page;
use subscriber_forecast::presentation::tables::{
    export_forecast_csv, forecast_table_text, raw_data_table_text,
};
use subscriber_forecast::{run_pipeline, DashboardConfig, DashboardView, ForecastParams, Integration};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "subscriber-dash")]
#[command(about = "Quarterly subscriber forecasting with ARIMA", version)]
struct Cli {
    /// Subscriber CSV file (`Time Period`, `Subscribers`)
    #[arg(long, env = "SUBSCRIBER_DATA", global = true)]
    data: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Page and report title
    #[arg(long, global = true)]
    title: Option<String>,

    /// Logging level, overridden by RUST_LOG
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the dashboard over HTTP
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one forecast and print it
    Forecast(ForecastArgs),
}

#[derive(Args)]
struct ForecastArgs {
    /// AR order (0-5)
    #[arg(short = 'p', long = "ar")]
    p: Option<usize>,

    /// Difference order (0-2)
    #[arg(short = 'd', long = "diff")]
    d: Option<usize>,

    /// MA order (0-5)
    #[arg(short = 'q', long = "ma")]
    q: Option<usize>,

    /// Number of quarters to forecast (1-10)
    #[arg(short = 'n', long)]
    horizon: Option<usize>,

    /// How forecasts are mapped back to subscriber levels
    #[arg(long)]
    integration: Option<Integration>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also write the forecast table to this CSV file
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Html,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_json_file(path)
            .with_context(|| format!("reading configuration {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(data) = &cli.data {
        config = config.with_data_path(data);
    }
    if let Some(title) = &cli.title {
        config = config.with_title(title);
    }
    Ok(config)
}

fn render_text(config: &DashboardConfig, view: &DashboardView) -> String {
    let summary = view.forecast.model();
    let mut out = format!("{}\n{}\n\n", config.title, "=".repeat(config.title.len()));
    out.push_str(&format!(
        "{} on {} observations ({}), horizon {} quarters\n",
        summary.name,
        view.observations.len(),
        view.forecast.integration(),
        view.forecast.horizon()
    ));
    out.push_str(&format!(
        "AR {:?}  MA {:?}  intercept {:.2}  sigma2 {:.4e}  AIC {:.2}  BIC {:.2}\n\n",
        summary.ar_coefficients,
        summary.ma_coefficients,
        summary.intercept,
        summary.sigma2,
        summary.aic,
        summary.bic
    ));
    out.push_str("Forecasted Subscription Counts\n");
    out.push_str(&forecast_table_text(&view.forecast));
    out.push('\n');
    out.push_str(&correlogram_text(ACF_TITLE, &view.acf, 25));
    out.push('\n');
    out.push_str(&correlogram_text(PACF_TITLE, &view.pacf, 25));
    out.push_str("\nSubscription Data\n");
    out.push_str(&raw_data_table_text(view.data()));
    out.push('\n');
    out
}

fn run_forecast(config: &DashboardConfig, args: &ForecastArgs) -> Result<()> {
    let defaults = &config.defaults;
    let params = ForecastParams {
        p: args.p.unwrap_or(defaults.p),
        d: args.d.unwrap_or(defaults.d),
        q: args.q.unwrap_or(defaults.q),
        horizon: args.horizon.unwrap_or(defaults.horizon),
        integration: args.integration.unwrap_or(defaults.integration),
    };

    let view = run_pipeline(config, &params)
        .with_context(|| format!("forecasting from {}", config.data_path.display()))?;

    let output = match args.format {
        OutputFormat::Text => render_text(config, &view),
        OutputFormat::Json => serde_json::to_string_pretty(&view)?,
        OutputFormat::Html => render_page(config, &view)?,
    };
    println!("{}", output);

    if let Some(path) = &args.export {
        export_forecast_csv(path, &view.forecast)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let mut config = load_config(&cli)?;
    info!(data = %config.data_path.display(), "subscriber-dash starting");

    match &cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }
            subscriber_forecast::server::serve(config)
                .await
                .context("running the dashboard server")?;
        }
        Command::Forecast(args) => run_forecast(&config, args)?,
    }
    Ok(())
}
