//! # toolbridge - mixed OpenAI / Claude request translator
//!
//! Translates chat requests written in the OpenAI chat-completion format, the
//! Claude content-block format, or a mix of both, into one canonical backend
//! request in the `contents` / `functionDeclarations` schema. Tool calls and
//! tool results are correlated across formats so every result carries the
//! name of the tool that produced it.
//!
//! ## Library Usage
//!
//! ```rust
//! use toolbridge::translator;
//!
//! let body = br#"{"messages":[{"role":"user","content":"Hello"}]}"#;
//! let translated = translator::translate("gemini-2.5-pro", body, false).unwrap();
//! let value: serde_json::Value = serde_json::from_slice(&translated).unwrap();
//! assert_eq!(value["request"]["contents"][0]["role"], "user");
//! ```
//!
//! ## Modules
//!
//! - [`translator`] - request translation (declarations, correlation, rewriting)
//! - [`config`] - layered TOML / environment configuration
//! - [`server`] - HTTP route handlers
//! - [`capture`] - optional on-disk capture of translated requests
//! - [`error`] - error types and handling

pub mod capture;
pub mod config;
pub mod error;
pub mod server;
pub mod translator;

// Re-export commonly used types
pub use config::{Config, ValidationIssue, ValidationSeverity};
pub use error::BridgeError;
pub use translator::{CorrelationPolicy, RequestTranslator, TranslateOptions};

/// Creates the toolbridge HTTP application for the given configuration.
///
/// # Arguments
///
/// * `config` - Application configuration
///
/// # Returns
///
/// Returns an Axum Router that can be served directly.
///
/// # Errors
///
/// Returns a `BridgeError` if the capture directory cannot be resolved.
///
/// # Examples
///
/// ```rust,no_run
/// use toolbridge::{Config, create_app};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::load(None)?;
///     let app = create_app(config)?;
///
///     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
///     axum::serve(listener, app).await?;
///     Ok(())
/// }
/// ```
pub fn create_app(config: Config) -> Result<axum::Router, BridgeError> {
    use axum::Router;
    use axum::extract::DefaultBodyLimit;
    use axum::routing::{get, post};
    use std::sync::Arc;
    use tower_http::cors::CorsLayer;
    use tower_http::limit::RequestBodyLimitLayer;
    use tower_http::trace::TraceLayer;

    let max_body_bytes = config.server.max_body_bytes;
    let app_state = Arc::new(server::AppState::new(config)?);

    Ok(Router::new()
        .route("/v1/translate", post(server::translate))
        .route("/health", get(server::health))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
