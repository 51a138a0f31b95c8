//!
//! HTTP surface for the request translator.
//!
//! Exposes `POST /v1/translate`, which turns an incoming chat request body into
//! the canonical backend request, and `GET /health` with request counters.
//! Translation itself is synchronous and stateless; the handlers only add
//! metrics, error mapping and optional capture around it.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::capture::RequestCapture;
use crate::config::Config;
use crate::error::{BridgeError, Result};
use crate::translator::RequestTranslator;

/* --- types ----------------------------------------------------------------------------------- */

///
/// Application state shared by all handlers.
pub struct AppState {
    /** application configuration */
    pub config: Config,
    /** stateless request translator */
    pub translator: RequestTranslator,
    /** capture writer, present when capture is enabled */
    pub capture: Option<RequestCapture>,
    /** metrics for monitoring */
    pub metrics: AppMetrics,
}

///
/// Application metrics for monitoring and observability.
#[derive(Debug, Default)]
pub struct AppMetrics {
    /** total number of translate requests received */
    pub total_requests: AtomicU64,
    /** total number of successful translations */
    pub successful_requests: AtomicU64,
    /** total number of rejected or failed translations */
    pub failed_requests: AtomicU64,
    /** total number of capture writes that failed */
    pub capture_failures: AtomicU64,
}

///
/// Query parameters of the translate endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct TranslateParams {
    /** target model; falls back to the body, then the configured default */
    #[serde(default)]
    pub model: Option<String>,
    /** overrides `translator.grounding` for this request */
    #[serde(default)]
    pub grounding: Option<bool>,
}

/* --- constants ------------------------------------------------------------------------------ */

/** Content type of translated bodies */
const CONTENT_TYPE_JSON: &str = "application/json";

/* --- start of code -------------------------------------------------------------------------- */

impl AppState {
    ///
    /// Create application state from configuration.
    ///
    /// # Arguments
    ///  * `config` - application configuration
    ///
    /// # Returns
    ///  * Application state with translator and optional capture
    ///  * `BridgeError::Config` if the capture directory cannot be resolved
    pub fn new(config: Config) -> Result<Self> {
        let translator = RequestTranslator::new(config.translate_options());
        let capture = config.capture_dir()?.map(RequestCapture::new);

        if let Some(capture) = &capture {
            tracing::info!("Capturing requests into {}", capture.dir().display());
        }

        Ok(Self { config, translator, capture, metrics: AppMetrics::default() })
    }
}

///
/// Handle the translate endpoint.
///
/// # Arguments
///  * `state` - shared application state
///  * `params` - `model` and `grounding` query parameters, or why they failed to parse
///  * `body` - incoming chat request bytes
///
/// # Returns
///  * Canonical request JSON, or a JSON error response
pub async fn translate(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<TranslateParams>, QueryRejection>,
    body: Bytes,
) -> Response {
    state.metrics.total_requests.fetch_add(1, Ordering::Relaxed);

    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            state.metrics.failed_requests.fetch_add(1, Ordering::Relaxed);
            let error = BridgeError::MalformedRequest(format!(
                "invalid query parameters: {}",
                rejection.body_text()
            ));
            tracing::warn!("Translation rejected: {}", error);
            return create_error_response(&error);
        }
    };

    let grounding = params.grounding.unwrap_or(state.config.translator.grounding);
    let model = params.model.unwrap_or_default();
    let result = state.translator.translate(&model, &body, grounding);

    capture_exchange(&state, &body, result.as_ref().ok().map(Vec::as_slice)).await;

    match result {
        Ok(translated) => {
            state.metrics.successful_requests.fetch_add(1, Ordering::Relaxed);
            ([(header::CONTENT_TYPE, CONTENT_TYPE_JSON)], translated).into_response()
        }
        Err(e) => {
            state.metrics.failed_requests.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Translation rejected: {}", e);
            create_error_response(&e)
        }
    }
}

///
/// Write the exchange to the capture directory, if enabled.
///
/// Capture failures are counted and logged, never returned.
async fn capture_exchange(state: &AppState, body: &[u8], translated: Option<&[u8]>) {
    let Some(capture) = &state.capture else {
        return;
    };

    if let Err(e) = capture.record(body, translated).await {
        state.metrics.capture_failures.fetch_add(1, Ordering::Relaxed);
        tracing::warn!("Failed to capture request into {}: {}", capture.dir().display(), e);
    }
}

///
/// Create standardized error response from BridgeError.
///
/// # Arguments
///  * `error` - error to convert to HTTP response
///
/// # Returns
///  * HTTP error response with JSON error details
pub fn create_error_response(error: &BridgeError) -> Response {
    let (status_code, error_type) = if error.is_client_error() {
        (StatusCode::BAD_REQUEST, "invalid_request_error")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
    };

    let error_response = json!({
      "error": {
        "message": error.to_string(),
        "type": error_type,
        "code": status_code.as_u16()
      }
    });

    (status_code, Json(error_response)).into_response()
}

///
/// Handle health check endpoint.
///
/// # Arguments
///  * `state` - shared application state with metrics
///
/// # Returns
///  * JSON response with health status and metrics
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let total_requests = state.metrics.total_requests.load(Ordering::Relaxed);
    let successful_requests = state.metrics.successful_requests.load(Ordering::Relaxed);
    let failed_requests = state.metrics.failed_requests.load(Ordering::Relaxed);
    let capture_failures = state.metrics.capture_failures.load(Ordering::Relaxed);

    Json(json!({
      "status": "ok",
      "version": env!("CARGO_PKG_VERSION"),
      "capture_enabled": state.capture.is_some(),
      "metrics": {
        "total_requests": total_requests,
        "successful_requests": successful_requests,
        "failed_requests": failed_requests,
        "capture_failures": capture_failures,
        "success_rate": if total_requests > 0 {
          (successful_requests as f64 / total_requests as f64 * 100.0).round()
        } else {
          100.0
        }
      }
    }))
}

/* --- tests ----------------------------------------------------------------------------------- */
