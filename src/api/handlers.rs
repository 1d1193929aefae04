//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{debug, error, info, warn};

use crate::{
    error::TimerError,
    state::{AppState, TimerSnapshot},
};
use super::responses::{ApiResponse, ErrorResponse, HealthResponse, StatusResponse};

type HandlerResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn reject(err: TimerError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        TimerError::InvalidDigit(_) | TimerError::NotADigit(_) => StatusCode::BAD_REQUEST,
        TimerError::StatePoisoned(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("Request failed: {}", err);
    } else {
        warn!("Request rejected: {}", err);
    }
    (status, Json(ErrorResponse::new(err.to_string())))
}

fn intent_response(
    intent: &str,
    result: Result<(bool, TimerSnapshot), TimerError>,
) -> HandlerResult<ApiResponse> {
    let (changed, timer) = result.map_err(reject)?;
    if changed {
        info!("{} endpoint called - timer now {:?} at {}", intent, timer.phase, timer.clock());
    }
    Ok(Json(ApiResponse::outcome(changed, intent, timer)))
}

/// Handle POST /digit/:digit - Append a keypad digit
pub async fn digit_handler(
    State(state): State<Arc<AppState>>,
    Path(digit): Path<String>,
) -> HandlerResult<ApiResponse> {
    // Numeric segments too wide for u8 saturate so the controller reports InvalidDigit
    let digit = match digit.chars().find(|c| !c.is_ascii_digit()) {
        Some(c) => return Err(reject(TimerError::NotADigit(c))),
        None => digit.parse::<u8>().unwrap_or(u8::MAX),
    };

    let (duration_ms, timer) = state.add_digit(digit).map_err(reject)?;
    debug!("Digit endpoint called - duration {}ms", duration_ms);
    Ok(Json(ApiResponse::applied(
        format!("Duration set to {}", timer.clock()),
        timer,
    )))
}

/// Handle POST /start - Start the armed countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    intent_response("start", state.start())
}

/// Handle POST /pause - Pause the running countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    intent_response("pause", state.pause())
}

/// Handle POST /resume - Continue from the paused remaining time
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    intent_response("resume", state.resume())
}

/// Handle POST /restart - Start the paused countdown over from its full duration
pub async fn restart_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    intent_response("restart", state.restart())
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> HandlerResult<StatusResponse> {
    let timer = state.snapshot().map_err(reject)?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        clock: timer.clock(),
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream a snapshot on every published change
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, (StatusCode, Json<ErrorResponse>)> {
    let mut rx = state.subscribe().map_err(reject)?;
    // Emit the current state first
    rx.mark_changed();

    let events = stream::unfold(rx, |mut rx| async move {
        rx.changed().await.ok()?;
        let snapshot = rx.borrow_and_update().clone();
        let event = match serde_json::to_string(&snapshot) {
            Ok(data) => Event::default().event("snapshot").data(data),
            Err(e) => {
                warn!("Failed to serialize snapshot: {}", e);
                Event::default().comment("snapshot unavailable")
            }
        };
        Some((Ok(event), rx))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
