use realit::api::ApiClient;
use realit::auth::SessionEvent;
use realit::cli::{handle_version_command, parse_args, run_cli_command, CliCommand};
use realit::config::ClientConfig;
use realit::services::Services;

use color_eyre::Result;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log to stderr so command output on stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("realit=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .init();
}

/// Tell the user when the session ends underneath a command.
async fn watch_session(mut events: broadcast::Receiver<SessionEvent>) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::Invalidated) => {
                eprintln!("Your session has expired. Run `realit login` to sign in again.");
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!("Session watcher lagged, missed {} events", n);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    // Handle --version before any initialization
    if command == CliCommand::Version {
        handle_version_command();
    }

    color_eyre::install()?;
    init_tracing();

    let config = ClientConfig::from_env();
    tracing::debug!("Using API at {}", config.base_url);

    let client = Arc::new(ApiClient::from_config(&config)?);
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        let watcher = tokio::spawn(watch_session(client.subscribe()));

        let services = Services::new(client);
        let result = run_cli_command(command, &services).await;

        // Let the watcher print anything emitted by the last request.
        tokio::task::yield_now().await;
        watcher.abort();
        result
    })
}
