use anyhow::Context;
use clap::Parser;
use hdb_resale_predictor::{context::AppContext, web};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hdb-resale-predictor", version, about = "HDB resale price prediction demo server")]
struct Cli {
    /// Directory holding the trained model and option list artifacts
    #[arg(long, env = "HDB_ARTIFACT_DIR", default_value = "artifacts")]
    artifacts: PathBuf,
    /// Address to bind the HTTP server on
    #[arg(long, env = "HDB_BIND_ADDR", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let ctx = AppContext::load(&cli.artifacts).with_context(|| {
        format!(
            "failed to load artifacts from {}",
            cli.artifacts.display()
        )
    })?;
    info!(
        columns = ctx.schema().len(),
        towns = ctx.catalog().towns().len(),
        "model artifacts loaded"
    );

    let app = web::router(Arc::new(ctx));
    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    info!("listening on http://{}", cli.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
