// HTTP API routes (keep-alive, command relay, JSON queries, metrics)

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Json, MatchedPath, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::dispatch::command::{DEFAULT_LEADERBOARD_SIZE, MAX_LIMIT};
use crate::dispatch::Dispatcher;
use crate::error::{ErrorCategory, QueryError};
use crate::metrics;
use crate::query::RankingPolicy;
use crate::rate_limit::{RateLimitType, RateLimiter};
use crate::sheets::SheetBackend;

// ── Request types ─────────────────────────────────────────────────────

/// A chat message relayed from the chat gateway.
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub content: String,
    pub author: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub reply: String,
}

#[derive(Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct FixtureParams {
    pub a: String,
    pub b: String,
    pub games: Option<usize>,
}

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher<SheetBackend>>,
    pub rate_limiter: RateLimiter,
}

// ── Error helpers ─────────────────────────────────────────────────────

fn json_error(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "error": msg }))).into_response()
}

fn query_error(e: QueryError) -> Response {
    let category = e.category();
    let status = match category {
        ErrorCategory::UnknownEntity | ErrorCategory::EmptyGroup => StatusCode::NOT_FOUND,
        ErrorCategory::MalformedTable => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCategory::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    };
    if status.is_server_error() {
        tracing::error!("query failed: {e}");
    }
    (
        status,
        Json(json!({ "error": e.to_string(), "category": category.as_str() })),
    )
        .into_response()
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(dispatcher: Arc<Dispatcher<SheetBackend>>, rate_limiter: RateLimiter) -> Router {
    let state = AppState {
        dispatcher,
        rate_limiter,
    };

    Router::new()
        .route("/", get(keep_alive))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        // Chat relay
        .route("/api/commands", post(run_command))
        // Read-only queries
        .route("/api/standings", get(standings))
        .route("/api/leaderboards/{policy}", get(leaderboard))
        .route("/api/players/{name}", get(player))
        .route("/api/teams/{name}", get(team))
        .route("/api/fixtures", get(fixtures))
        .route_layer(middleware::from_fn(track_duration))
        .with_state(state)
}

async fn track_duration(req: Request, next: Next) -> Response {
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let started = Instant::now();
    let response = next.run(req).await;
    metrics::API_REQUEST_DURATION_SECONDS
        .with_label_values(&[endpoint.as_str()])
        .observe(started.elapsed().as_secs_f64());
    response
}

// ── Service handlers ──────────────────────────────────────────────────

/// Liveness probe for uptime pingers. At most one answer every two seconds.
async fn keep_alive(State(state): State<AppState>) -> Response {
    match state
        .rate_limiter
        .check_limit("keep-alive", RateLimitType::KeepAlive)
    {
        Ok(()) => {
            metrics::KEEPALIVE_PINGS_TOTAL
                .with_label_values(&["inbound", "200"])
                .inc();
            (StatusCode::OK, "Bot is alive").into_response()
        }
        Err(_) => {
            metrics::KEEPALIVE_PINGS_TOTAL
                .with_label_values(&["inbound", "429"])
                .inc();
            StatusCode::TOO_MANY_REQUESTS.into_response()
        }
    }
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "sheet-relay",
        "backend": state.dispatcher.client().kind(),
    }))
}

async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
}

// ── Command relay ─────────────────────────────────────────────────────

async fn run_command(
    State(state): State<AppState>,
    Json(req): Json<CommandRequest>,
) -> Response {
    let author = req
        .author
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or("anonymous");

    if let Err(e) = state
        .rate_limiter
        .check_limit(author, RateLimitType::Commands)
    {
        tracing::debug!(author, "command rate limited");
        return json_error(StatusCode::TOO_MANY_REQUESTS, &e.to_string());
    }

    match state.dispatcher.handle(&req.content).await {
        Some(reply) => (StatusCode::OK, Json(CommandResponse { reply })).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

// ── Query handlers ────────────────────────────────────────────────────

async fn standings(State(state): State<AppState>, Query(params): Query<LimitParams>) -> Response {
    let limit = params.limit.map(|n| n.min(MAX_LIMIT));
    match state.dispatcher.standings(limit).await {
        Ok(rows) => (StatusCode::OK, Json(json!(rows))).into_response(),
        Err(e) => query_error(e),
    }
}

async fn leaderboard(
    State(state): State<AppState>,
    Path(policy): Path<String>,
    Query(params): Query<LimitParams>,
) -> Response {
    let Some(policy) = RankingPolicy::from_str_name(&policy) else {
        return json_error(StatusCode::NOT_FOUND, "Unknown leaderboard");
    };
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_SIZE)
        .clamp(1, MAX_LIMIT);
    match state.dispatcher.leaderboard(policy, limit).await {
        Ok(players) => (StatusCode::OK, Json(json!(players))).into_response(),
        Err(e) => query_error(e),
    }
}

async fn player(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.dispatcher.player(&name).await {
        Ok(p) => (StatusCode::OK, Json(json!(p))).into_response(),
        Err(e) => query_error(e),
    }
}

async fn team(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.dispatcher.roster(&name).await {
        Ok(roster) => (StatusCode::OK, Json(json!(roster))).into_response(),
        Err(e) => query_error(e),
    }
}

async fn fixtures(
    State(state): State<AppState>,
    Query(params): Query<FixtureParams>,
) -> Response {
    let games = params.games.unwrap_or(1).clamp(1, MAX_LIMIT);
    match state
        .dispatcher
        .fixtures(&params.a, &params.b, games)
        .await
    {
        Ok(games) => (StatusCode::OK, Json(json!(games))).into_response(),
        Err(e) => query_error(e),
    }
}
