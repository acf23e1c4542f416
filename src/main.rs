//! Sample instrumented HTTP service entry point.

use clap::{Parser, Subcommand};
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sample_app::api::AppState;
use sample_app::config::Config;
use sample_app::metrics;
use sample_app::server;
use sample_app::utils::shutdown_signal;

/// Sample HTTP service exposing root, health and Prometheus metrics endpoints.
#[derive(Parser, Debug)]
#[command(name = "sample-app")]
#[command(about = "Sample HTTP service with request instrumentation")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// HTTP listening port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Run,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load()?;
    if let Some(port) = args.port {
        config.port = port;
    }

    init_tracing(&config, args.verbose);

    match args.command.unwrap_or(Command::Run) {
        Command::Run => cmd_run(config).await,
        Command::CheckConfig => cmd_check_config(&config),
    }
}

fn init_tracing(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sample_app=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Print and validate the effective configuration.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("Configuration Summary:");
    println!("  Host: {}", config.host);
    println!("  Port: {}", config.port);
    println!("  Log Filter: {}", config.rust_log);
    println!("  JSON Logs: {}", config.log_json);

    match config.validate() {
        Ok(()) => {
            println!("CONFIGURATION CHECK PASSED");
            Ok(())
        }
        Err(e) => {
            println!("CONFIGURATION CHECK FAILED: {}", e);
            Err(e.into())
        }
    }
}

/// Run the HTTP server until Ctrl-C or SIGTERM.
async fn cmd_run(config: Config) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    let handle = metrics::install()?;
    let state = AppState::new(handle.clone());
    info!(hostname = %state.hostname, "Starting sample app");

    // Histogram samples are buffered until upkeep runs, scraped or not.
    let (stop_upkeep, upkeep_stopped) = oneshot::channel::<()>();
    let upkeep = tokio::spawn(metrics::run_upkeep(
        handle,
        metrics::UPKEEP_INTERVAL,
        async move {
            let _ = upkeep_stopped.await;
        },
    ));

    let listener = server::bind(&config).await?;
    let served = server::serve(listener, state, shutdown_signal()).await;

    let _ = stop_upkeep.send(());
    upkeep.await?;
    served?;

    Ok(())
}
