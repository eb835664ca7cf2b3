use anyhow::Context;
use checkmed_core::comparator::{FakeComparator, GeminiComparator};
use checkmed_core::report::LogSink;
use checkmed_core::Comparator;
use checkmed_server::{router, AppState};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "checkmed-server", version, about = "CheckMed verification API")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "CHECKMED_BIND", default_value = "0.0.0.0:8000")]
    bind: SocketAddr,

    /// SQLite database path.
    #[arg(long, env = "CHECKMED_DB", default_value = "checkmed.db")]
    db: PathBuf,

    /// Root directory for golden reference images.
    #[arg(long, env = "CHECKMED_IMAGES_DIR", default_value = "medicine_images")]
    images_dir: PathBuf,

    /// Visual comparator provider: "gemini" or "fake" (offline, always
    /// verifies — for local development only).
    #[arg(long, env = "CHECKMED_COMPARATOR", default_value = "gemini")]
    comparator: String,
}

fn comparator_for(name: &str) -> anyhow::Result<Arc<dyn Comparator>> {
    match name {
        "gemini" => Ok(Arc::new(GeminiComparator::from_env()?)),
        "fake" => Ok(Arc::new(FakeComparator::new())),
        other => anyhow::bail!("unknown comparator provider '{other}' (expected gemini or fake)"),
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let comparator = comparator_for(&args.comparator)?;
    if args.comparator == "fake" {
        tracing::warn!("running with the fake comparator; visual checks always pass");
    }

    let state = AppState::build(&args.db, &args.images_dir, comparator, Arc::new(LogSink))
        .context("failed to initialize application state")?;

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    tracing::info!(addr = %args.bind, db = %args.db.display(), "checkmed server listening");

    axum::serve(listener, router(state))
        .await
        .context("server terminated")?;
    Ok(())
}
