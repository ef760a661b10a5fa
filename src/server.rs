use std::{path::PathBuf, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    constants::grid::{RESULT_ROUTE, SLOT_COUNT},
    models::render::{GenerateRequest, GenerateResponse},
    render::{save_png, RenderError, Renderer},
};

#[derive(Clone)]
pub struct RenderState {
    pub renderer: Renderer,
    pub results_dir: Arc<PathBuf>,
}

pub fn router(state: RenderState) -> Router {
    let results = ServeDir::new(state.results_dir.as_path());

    Router::new()
        .route("/generate", post(generate))
        .nest_service(RESULT_ROUTE, results)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

type ApiError = (StatusCode, String);

#[tracing::instrument(skip_all)]
async fn generate(
    State(state): State<RenderState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(req) = body.map_err(|e| {
        tracing::warn!(err = ?e, "rejected malformed generate request");
        (StatusCode::BAD_REQUEST, e.body_text())
    })?;

    let items = match req.items {
        Some(items) if items.len() == SLOT_COUNT => items,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("an \"items\" array of {SLOT_COUNT} elements is required."),
            ))
        }
    };

    let canvas = state.renderer.render(&items).await.map_err(internal_error)?;
    let file_name = save_png(canvas, &state.results_dir)
        .await
        .map_err(internal_error)?;

    tracing::info!(file_name = %file_name, "rendered crafting grid");

    Ok(Json(GenerateResponse {
        url: format!("{RESULT_ROUTE}/{file_name}"),
    }))
}

fn internal_error(e: RenderError) -> ApiError {
    tracing::error!(err = ?e, "an error occurred when rendering crafting grid");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "failed to render the image.".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::render::{
        default_template,
        tests::{slot_center, solid_png, RED},
    };

    struct Fixture {
        _dir: tempfile::TempDir,
        results: PathBuf,
        app: Router,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::TempDir::new().unwrap();
        let assets = dir.path().join("assets");
        let results = dir.path().join("results");
        tokio::fs::create_dir_all(&assets).await.unwrap();
        tokio::fs::create_dir_all(&results).await.unwrap();
        tokio::fs::write(assets.join("red.png"), solid_png(RED)).await.unwrap();

        let state = RenderState {
            renderer: Renderer::new(default_template(), reqwest::Client::new(), &assets),
            results_dir: Arc::new(results.clone()),
        };

        Fixture {
            _dir: dir,
            results,
            app: router(state),
        }
    }

    fn post_json(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn result_count(results: &Path) -> usize {
        let mut entries = tokio::fs::read_dir(results).await.unwrap();
        let mut count = 0;
        while entries.next_entry().await.unwrap().is_some() {
            count += 1;
        }
        count
    }

    #[tokio::test]
    async fn renders_and_serves_result() {
        let fixture = fixture().await;
        let body = serde_json::json!({
            "items": [null, "red.png", null, null, "red.png", null, null, "nope.png", null]
        });

        let resp = fixture
            .app
            .clone()
            .oneshot(post_json(body.to_string()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let GenerateResponse { url } = serde_json::from_slice(&bytes).unwrap();
        let file_name = url.strip_prefix("/result/").unwrap();
        assert!(fixture.results.join(file_name).exists());

        let resp = fixture
            .app
            .clone()
            .oneshot(Request::get(url.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let png = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let image = image::load_from_memory(&png).unwrap().to_rgba8();
        let (cx, cy) = slot_center(1);
        assert_eq!(*image.get_pixel(cx, cy), RED);
        let (cx, cy) = slot_center(4);
        assert_eq!(*image.get_pixel(cx, cy), RED);
    }

    #[tokio::test]
    async fn every_call_writes_a_new_file() {
        let fixture = fixture().await;
        let body = serde_json::json!({ "items": vec![serde_json::Value::Null; 9] }).to_string();

        for _ in 0..3 {
            let resp = fixture
                .app
                .clone()
                .oneshot(post_json(body.clone()))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }

        assert_eq!(result_count(&fixture.results).await, 3);
    }

    #[tokio::test]
    async fn rejects_wrong_item_count_without_rendering() {
        let fixture = fixture().await;

        for body in [
            serde_json::json!({ "items": vec!["red.png"; 8] }),
            serde_json::json!({ "items": vec![serde_json::Value::Null; 10] }),
            serde_json::json!({ "items": [] }),
            serde_json::json!({}),
            serde_json::json!({ "items": "red.png" }),
        ] {
            let resp = fixture
                .app
                .clone()
                .oneshot(post_json(body.to_string()))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
        }

        let resp = fixture
            .app
            .clone()
            .oneshot(post_json("{ not json".to_string()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        assert_eq!(result_count(&fixture.results).await, 0);
    }

    #[tokio::test]
    async fn unknown_results_are_not_found() {
        let fixture = fixture().await;

        let resp = fixture
            .app
            .oneshot(
                Request::get("/result/does-not-exist.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
