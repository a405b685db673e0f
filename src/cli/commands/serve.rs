//! HTTP API server.
//!
//! Serves the question-answering pipeline over a small REST API plus a
//! single-page client at `/`.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::RagError;
use crate::pipeline::RagPipeline;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

const INDEX_HTML: &str = include_str!("../../../static/index.html");

/// Shared application state.
struct AppState {
    pipeline: Arc<RagPipeline>,
}

/// Build the API router around a ready pipeline.
pub fn router(pipeline: Arc<RagPipeline>) -> Router {
    let state = Arc::new(AppState { pipeline });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ask", post(ask))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'netflix-rag doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let spinner = Output::spinner("Initializing RAG pipeline...");
    let pipeline = match RagPipeline::build(&settings) {
        Ok(p) => {
            spinner.finish_and_clear();
            Arc::new(p)
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to initialize pipeline: {}", e));
            return Err(e.into());
        }
    };

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Netflix RAG API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Web client", "GET  /");
    Output::kv("Ask", "POST /ask     - Answer a question about Netflix movies");
    Output::kv("Health", "GET  /health  - Health check");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, router(pipeline))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AskRequest {
    #[serde(default)]
    question: Option<String>,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    sources: Vec<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let Some(question) = req.question else {
        return error_response(StatusCode::BAD_REQUEST, "Missing 'question' field");
    };

    match state.pipeline.ask(&question).await {
        Ok(result) => Json(AskResponse {
            answer: result.answer,
            sources: result.sources,
        })
        .into_response(),
        Err(e) if e.is_client_error() => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            error!("Failed to answer question: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, internal_message(&e))
        }
    }
}

fn internal_message(e: &RagError) -> String {
    match e {
        RagError::Embedding(_) | RagError::OpenAI(_) | RagError::Generation(_) => {
            format!("Model backend unavailable: {}", e)
        }
        _ => e.to_string(),
    }
}
