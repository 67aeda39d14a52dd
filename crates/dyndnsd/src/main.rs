// # dyndnsd - dynamic DNS daemon
//
// Thin integration shell over dyndns-core:
// 1. Parse configuration from CLI flags and environment variables
// 2. Initialize logging and the runtime
// 3. Wire the Cloudflare provider and the HTTP IP source into a reconciler
// 4. Run one synchronous sync, then the scheduling loop until a signal
//
// All reconciliation logic lives in dyndns-core; nothing here decides
// when or what to update.
//
// ## Configuration
//
// Every option is available as a long flag and an environment variable:
//
// - `--cloudflare-api-token` / `CLOUDFLARE_API_TOKEN`: API token (required)
// - `--cloudflare-zone-id` / `CLOUDFLARE_ZONE_ID`: zone id (required)
// - `--cloudflare-record` / `CLOUDFLARE_RECORD`: record name (required)
// - `--interval-secs` / `DYNDNS_INTERVAL_SECS`: sync interval, default 300
// - `--debug` / `DYNDNS_DEBUG`: verbose logging
//
// ## Example
//
// ```bash
// export CLOUDFLARE_API_TOKEN=your_token
// export CLOUDFLARE_ZONE_ID=023e105f4ecef8ad9ca31a8372d0c353
// export CLOUDFLARE_RECORD=home.example.com
//
// dyndnsd --interval-secs 120
// ```

use anyhow::Result;
use clap::Parser;
use dyndns_core::{Reconciler, Settings};
use dyndns_ip_http::HttpIpSource;
use dyndns_provider_cloudflare::CloudflareProvider;
use std::process::ExitCode;
use tokio::sync::oneshot;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration error or startup failure (including the first sync)
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    StartupError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Keep one DNS address record pointed at the current public IP
#[derive(Debug, Parser)]
#[command(name = "dyndnsd", version, about)]
struct Cli {
    /// Cloudflare API token
    #[arg(long = "cloudflare-api-token", env = "CLOUDFLARE_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Cloudflare zone id
    #[arg(long = "cloudflare-zone-id", env = "CLOUDFLARE_ZONE_ID")]
    zone_id: Option<String>,

    /// Cloudflare record name
    #[arg(long = "cloudflare-record", env = "CLOUDFLARE_RECORD")]
    record: Option<String>,

    /// Sync interval in seconds
    #[arg(long, env = "DYNDNS_INTERVAL_SECS", default_value_t = 300)]
    interval_secs: u64,

    /// Debug mode
    #[arg(long, env = "DYNDNS_DEBUG")]
    debug: bool,
}

impl Cli {
    fn into_settings(self) -> Settings {
        Settings {
            api_token: self.api_token.unwrap_or_default(),
            zone_id: self.zone_id.unwrap_or_default(),
            record: self.record.unwrap_or_default(),
            interval_secs: self.interval_secs,
            debug: self.debug,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    println!("dyndnsd {}", env!("CARGO_PKG_VERSION"));

    let settings = cli.into_settings();
    if let Err(e) = settings.validate() {
        eprintln!("{e}");
        return DaemonExitCode::StartupError.into();
    }

    // Initialize tracing
    let log_level = if settings.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {e}");
        return DaemonExitCode::StartupError.into();
    }

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {e}");
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        let mut reconciler = match build_reconciler(&settings) {
            Ok(reconciler) => reconciler,
            Err(e) => {
                error!("startup: {e}");
                return DaemonExitCode::StartupError;
            }
        };

        // The first cycle runs synchronously; a failure here is fatal.
        if let Err(e) = reconciler.sync().await {
            error!("sync: {e}");
            return DaemonExitCode::StartupError;
        }

        match run_daemon(reconciler).await {
            Ok(()) => DaemonExitCode::CleanShutdown,
            Err(e) => {
                error!("daemon error: {e}");
                DaemonExitCode::RuntimeError
            }
        }
    });

    code.into()
}

/// Wire the provider and IP source into a reconciler
fn build_reconciler(settings: &Settings) -> Result<Reconciler> {
    let provider = CloudflareProvider::new(&settings.api_token, &settings.zone_id)?;
    let ip_source = HttpIpSource::default_endpoint()?;

    Ok(Reconciler::new(
        Box::new(provider),
        Box::new(ip_source),
        settings,
    )?)
}

/// Run the scheduling loop until a termination signal arrives
async fn run_daemon(mut reconciler: Reconciler) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    tokio::spawn(async move {
        match wait_for_shutdown().await {
            Ok(signal_name) => info!("received {signal_name}"),
            Err(e) => error!("signal handler error: {e}"),
        }
        let _ = shutdown_tx.send(());
    });

    reconciler.run(shutdown_rx).await?;
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to setup SIGTERM handler: {e}"))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to setup SIGINT handler: {e}"))?;

    let signal_name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    Ok(signal_name)
}

/// Wait for shutdown (ctrl-c only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("failed to wait for ctrl-c: {e}"))?;
    Ok("SIGINT")
}
