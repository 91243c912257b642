//! `holocron`: browse SWAPI characters from the terminal

mod log;
mod render;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use holocron_loader::view_model::{CatalogCard, DetailScreen, FailureView};
use holocron_loader::{
    ApiConfig, CatalogClient, DetailLoader, HttpTransport, LoadFailure, LoadState,
};
use tracing::info;

use crate::log::TracingLevel;

#[derive(Parser, Debug)]
#[command(name = "holocron", version, about = "Browse SWAPI characters from the terminal")]
struct Cli {
    /// Base URL of the API, overriding `HOLOCRON_API_BASE_URL`
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Level written to the trace log file
    #[arg(long, env = "HOLOCRON_LOG", default_value = "warn", global = true)]
    log_level: TracingLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the characters on the first catalog page
    List,
    /// Show one character together with its homeworld
    Show {
        /// Character identifier, e.g. `1`
        id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    TracingLevel::init_file_tracing(cli.log_level);
    info!(
        "holocron starting with trace level {}",
        TracingLevel::get_current_tracing_level().as_str()
    );

    let config = ApiConfig::resolve(cli.base_url.as_deref())
        .map_err(|report| anyhow!("{}", report.current_context()))?;
    info!("Using API at {}", config.base_url());

    let transport = Arc::new(HttpTransport::new());

    match cli.command {
        Command::List => list(transport, config).await,
        Command::Show { id } => show(transport, config, id).await,
    }
}

async fn list(transport: Arc<HttpTransport>, config: ApiConfig) -> anyhow::Result<ExitCode> {
    let client = CatalogClient::new(transport, config);

    match client.fetch_entries().await {
        Ok(entries) => {
            render::render_cards(&mut io::stdout(), &CatalogCard::deck(&entries))?;
            Ok(ExitCode::SUCCESS)
        },
        Err(report) => {
            let failure =
                FailureView::from_failure(&LoadFailure::from_error(report.current_context()));
            render::render_failure(&mut io::stderr(), &failure)?;
            print_trace_hint();
            Ok(ExitCode::FAILURE)
        },
    }
}

async fn show(
    transport: Arc<HttpTransport>,
    config: ApiConfig,
    id: Option<String>,
) -> anyhow::Result<ExitCode> {
    let loader = Arc::new(DetailLoader::new(transport, config));

    // Subscribe before starting so no transition is missed
    let mut updates = loader.updates();
    let load = loader.spawn_load(id);

    let mut failed = false;
    while let Some(snapshot) = updates.next().await {
        let screen = DetailScreen::from_state(&snapshot.state);
        match &snapshot.state {
            LoadState::Failed(_) => render::render_screen(&mut io::stderr(), &screen)?,
            _ => render::render_screen(&mut io::stdout(), &screen)?,
        }

        if snapshot.state.is_terminal() {
            failed = matches!(snapshot.state, LoadState::Failed(_));
            break;
        }
    }

    load.await?;

    if failed {
        print_trace_hint();
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_trace_hint() {
    eprintln!(
        "Details were logged to {}",
        TracingLevel::get_trace_log_path().display()
    );
}
