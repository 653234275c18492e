use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    serve, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::{
    artifact, fetch,
    model::PriceModel,
    transform::{self, RawRecord},
};

/// Shared read-only state: artifacts loaded once at startup, cloned per
/// request. No locking, nothing mutates after construction.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<PriceModel>,
    pub feature_cols: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(model: PriceModel, feature_cols: Vec<String>) -> Self {
        Self {
            model: Arc::new(model),
            feature_cols: Arc::new(feature_cols),
        }
    }
}

fn no_input() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "No input data provided"})),
    )
        .into_response()
}

/// POST /predict - one raw record in, one predicted price out.
///
/// The body is taken as a string so that an empty or unparseable payload can
/// be answered with the fixed "No input data provided" message instead of
/// the framework's rejection. Client-side mistakes (bad field types, unknown
/// grade labels, features the model needs but the caller omitted) come back
/// as 400s; only a failing model call is a 500.
async fn predict(State(state): State<AppState>, body: String) -> Response {
    let raw: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(_) => return no_input(),
    };
    if !raw.as_object().is_some_and(|m| !m.is_empty()) {
        return no_input();
    }

    let record: RawRecord = match serde_json::from_value(raw.clone()) {
        Ok(r) => r,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": format!("invalid input: {e}")})),
            )
                .into_response()
        }
    };

    let row = match transform::transform(&record, &state.feature_cols) {
        Ok(row) => row,
        Err(e) => {
            tracing::warn!("rejecting request: {e}");
            return (StatusCode::BAD_REQUEST, Json(json!({"error": e.to_string()}))).into_response();
        }
    };

    match state.model.predict(&row) {
        Ok(price) => (
            StatusCode::OK,
            Json(json!({
                "input": raw,
                "predicted_price": price,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("model predict failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

/// GET /health - Health check
async fn health() -> impl IntoResponse {
    Json(json!({"status": "healthy"})).into_response()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    let dir = artifact::artifact_dir();
    fetch::ensure_artifacts(&dir).await;

    let model = artifact::load_model(&dir.join(artifact::MODEL_FILE))?;
    let feature_cols = artifact::load_features(&dir.join(artifact::FEATURES_FILE))?;
    anyhow::ensure!(
        model.n_features() == feature_cols.len(),
        "model expects {} features but {} lists {}",
        model.n_features(),
        artifact::FEATURES_FILE,
        feature_cols.len()
    );
    tracing::info!("loaded model over features {:?}", feature_cols);

    let app = router(AppState::new(model, feature_cols));

    let addr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| crate::defaults::DEFAULT_BIND_ADDR.to_string());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("prediction API listening on {addr}");
    serve(listener, app).await?;
    Ok(())
}
