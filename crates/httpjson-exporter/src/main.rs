//! httpjson exporter binary.
//!
//! - Scrapes one JSON endpoint per pull of the telemetry path
//! - Republishes every numeric leaf as `http_json_value{path=...}`
//! - `http_json_up` tracks whether the last scrape succeeded

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use httpjson_exporter::{app_state, config, router};

#[derive(Debug, Parser)]
#[command(name = "httpjson-exporter", version, about = "Expose a JSON endpoint as Prometheus gauges")]
struct Args {
    /// Optional YAML config file; built-in defaults apply when absent.
    #[arg(long)]
    config: Option<String>,

    /// Address to listen on for web interface and telemetry.
    #[arg(long = "web.listen-address")]
    listen_address: Option<String>,

    /// Path under which to expose metrics.
    #[arg(long = "web.telemetry-path")]
    telemetry_path: Option<String>,

    /// URL of the HTTP JSON API to scrape.
    #[arg(long = "actuator.scrape-uri")]
    scrape_uri: Option<String>,

    /// Timeout for fetching the JSON document, in milliseconds.
    #[arg(long = "actuator.timeout-ms")]
    timeout_ms: Option<u64>,
}

impl Args {
    fn overrides(&self) -> config::Overrides {
        config::Overrides {
            listen: self.listen_address.clone(),
            telemetry_path: self.telemetry_path.clone(),
            scrape_uri: self.scrape_uri.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "httpjson-exporter failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> httpjson_core::Result<()> {
    let cfg = config::resolve(args.config.as_deref(), args.overrides())?;
    let listen = cfg.web.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    tracing::info!(
        %listen,
        telemetry_path = %state.cfg().web.telemetry_path,
        target = %state.cfg().target.scrape_uri,
        timeout_ms = state.cfg().target.timeout_ms,
        "httpjson-exporter starting"
    );
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| httpjson_core::ExporterError::Io(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| httpjson_core::ExporterError::Io(format!("server failed: {e}")))?;

    tracing::info!("httpjson-exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable; running until killed");
        std::future::pending::<()>().await;
    }
}
