use std::{path::PathBuf, sync::Arc, time::Duration};

use craftquiz::{
    render::{load_template, Renderer},
    server::{router, RenderState},
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    telemetry::init_telemetry("craftquiz-render")
        .map_err(|e| anyhow::anyhow!("failed to initialize telemetry: {e}"))?;

    tracing::info!("initializing render service...");

    let listen_addr =
        std::env::var("RENDER_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
    let template_path = PathBuf::from(
        std::env::var("RENDER_TEMPLATE_PATH").unwrap_or_else(|_| "template.png".to_string()),
    );
    let results_dir = PathBuf::from(
        std::env::var("RENDER_RESULTS_DIR").unwrap_or_else(|_| "results".to_string()),
    );
    let asset_root =
        PathBuf::from(std::env::var("RENDER_ASSET_ROOT").unwrap_or_else(|_| ".".to_string()));

    tokio::fs::create_dir_all(&results_dir).await.inspect_err(
        |e| tracing::error!(err = ?e, "an error occurred when creating results directory"),
    )?;

    let template = load_template(&template_path).await.inspect_err(
        |e| tracing::error!(err = ?e, "an error occurred when loading template"),
    )?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()?;

    let state = RenderState {
        renderer: Renderer::new(template, client, asset_root),
        results_dir: Arc::new(results_dir),
    };

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!("render service listening on http://{}", listen_addr);

    axum::serve(listener, router(state)).await?;

    Ok(())
}
