use anyhow::{Context, Result};
use scms_query::{service, Config, DeliveryEngine};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,scms_query=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let config = Config::from_env().context("reading configuration")?;
    info!(
        dataset = %config.dataset_path.display(),
        addr = %config.socket_addr(),
        eager = config.eager_load,
        "configured"
    );

    // ─── 3) engine (dataset loads on first query unless eager) ───────
    let engine = Arc::new(DeliveryEngine::from_path(config.dataset_path.clone()));
    if config.eager_load {
        let rows = tokio::task::spawn_blocking({
            let engine = Arc::clone(&engine);
            move || engine.warm_up()
        })
        .await?
        .map_err(|e| {
            error!("eager load failed: {}", e);
            e
        })
        .context("loading dataset")?;
        info!(rows, "dataset ready");
    }

    // ─── 4) serve ────────────────────────────────────────────────────
    let addr = config.socket_addr();
    info!("listening on http://{}", addr);
    warp::serve(service::routes(engine)).run(addr).await;

    Ok(())
}
