//! HTTP API for the Codiny dashboard.
//!
//! Every failure is reported as a small JSON body with a status code;
//! details stay in the server log.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Path, Query, Request, State,
    },
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::analysis::AnalysisService;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::mail::InvitationService;
use crate::metrics::Metrics;
use crate::service::ResultService;
use crate::types::{
    AnalysisKind, AnalysisRequest, InvitationRequest, InvitationResponse, ResultQuery,
    SaveRequest,
};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub analysis: AnalysisService,
    pub invitations: InvitationService,
    pub results: Arc<ResultService>,
    pub metrics: Arc<Metrics>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/review", post(review))
        .route("/refactor", post(refactor))
        .route("/send-invitation", post(send_invitation))
        .route("/results", post(save_result))
        .route("/results/{id}", get(get_result))
        .route("/repositories/{owner}/{repo}", delete(delete_repository))
        .route("/repositories/{owner}/{repo}/results", get(list_results))
        .route("/repositories/{owner}/{repo}/stats", get(repository_stats))
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(crate::MAX_BODY_SIZE))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)),
        )
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn start_server(config: &Config, state: AppState) -> Result<()> {
    let app = router(state);

    let addr = config.bind_addr();
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn count_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.metrics.inc_requests();
    next.run(request).await
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Map an analysis failure to its client-facing message.
fn analysis_error(kind: AnalysisKind, err: &Error) -> Response {
    let message = match err {
        Error::InvalidInput(message) => {
            warn!(%kind, reason = %message, "Rejected analysis request");
            message.as_str()
        }
        Error::ResponseParse(_) => "Failed to parse AI response",
        Error::ResponseShape(_) => "AI response doesn't match expected format",
        _ => match kind {
            AnalysisKind::Review => "Failed to generate review",
            AnalysisKind::Refactor => "Failed to refactor code",
        },
    };
    error_body(err.status_code(), message)
}

/// Map a store failure; internals are logged, not returned.
fn store_error(err: &Error) -> Response {
    match err {
        Error::InvalidInput(message) => {
            warn!(reason = %message, "Rejected result store request");
            error_body(StatusCode::BAD_REQUEST, message.as_str())
        }
        Error::NotFound(message) => {
            warn!(missing = %message, "Result lookup failed");
            error_body(StatusCode::NOT_FOUND, format!("Not found: {}", message))
        }
        other => {
            error!(error = %other, "Result store operation failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to access saved results")
        }
    }
}

fn bad_json(rejection: JsonRejection) -> Response {
    warn!(error = %rejection.body_text(), "Rejected request body");
    error_body(StatusCode::BAD_REQUEST, rejection.body_text())
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Prometheus metrics endpoint.
async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [("content-type", "text/plain; version=0.0.4")],
        state.metrics.to_prometheus(),
    )
}

/// `POST /review`
async fn review(
    State(state): State<AppState>,
    body: std::result::Result<Json<AnalysisRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_json(rejection),
    };

    match state.analysis.review(&request).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => analysis_error(AnalysisKind::Review, &e),
    }
}

/// `POST /refactor`
async fn refactor(
    State(state): State<AppState>,
    body: std::result::Result<Json<AnalysisRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_json(rejection),
    };

    match state.analysis.refactor(&request).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => analysis_error(AnalysisKind::Refactor, &e),
    }
}

/// `POST /send-invitation`
async fn send_invitation(
    State(state): State<AppState>,
    body: std::result::Result<Json<InvitationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected invitation body");
            return (
                StatusCode::BAD_REQUEST,
                Json(InvitationResponse::rejected(rejection.body_text())),
            )
                .into_response()
        }
    };

    match state.invitations.send_invitation(&request).await {
        Ok(message_id) => Json(InvitationResponse::sent(message_id)).into_response(),
        Err(Error::InvalidInput(message)) => {
            warn!(reason = %message, "Rejected invitation request");
            (
                StatusCode::BAD_REQUEST,
                Json(InvitationResponse::rejected(message)),
            )
                .into_response()
        }
        Err(e) => {
            // Transport failures are already logged by the mailer
            if matches!(e, Error::MailNotConfigured) {
                error!(error = %e, "Invitation requested without mail credentials");
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(InvitationResponse::failed(e.to_string())),
            )
                .into_response()
        }
    }
}

/// `POST /results`
async fn save_result(
    State(state): State<AppState>,
    body: std::result::Result<Json<SaveRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_json(rejection),
    };

    match state.results.save_result(request).await {
        Ok((saved, created)) => {
            if created {
                state.metrics.inc_results_saved();
            }
            Json(saved).into_response()
        }
        Err(e) => store_error(&e),
    }
}

/// `GET /results/{id}`
async fn get_result(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.results.get(&id).await {
        Ok(saved) => Json(saved).into_response(),
        Err(e) => store_error(&e),
    }
}

/// `GET /repositories/{owner}/{repo}/results`
async fn list_results(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
    query: std::result::Result<Query<ResultQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected result query");
            return error_body(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    Json(state.results.list(&owner, &repo, &query).await).into_response()
}

/// `GET /repositories/{owner}/{repo}/stats`
async fn repository_stats(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> Response {
    Json(state.results.stats(&owner, &repo).await).into_response()
}

/// `DELETE /repositories/{owner}/{repo}`
async fn delete_repository(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> Response {
    match state.results.delete_repository(&owner, &repo).await {
        Ok(removed) => Json(json!({ "removed": removed })).into_response(),
        Err(e) => store_error(&e),
    }
}
