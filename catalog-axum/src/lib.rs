#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod product_routes;
mod review_routes;
mod validate;

use aide::{
    axum::{ApiRouter, routing::get},
    openapi::OpenApi,
};
use axum::{Extension, Json, http::StatusCode};
use catalog_core::ports::{Application, CatalogRepository};
use schemars::JsonSchema;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Level, event};

mod openapi;
use openapi::{api_docs, docs_routes};

pub mod config;
use config::AxumConfig;

/// Response for the health check endpoint
#[derive(Serialize, JsonSchema)]
#[schemars(inline)]
struct HealthResponse {
    status: String,
}

/// Simple health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Construct a full API router with the given state
pub fn router<T: ApiApplication>(state: T) -> axum::Router {
    let mut api = OpenApi::default();
    ApiRouter::new()
        .api_route("/health", get(health_check))
        .nest("/products", product_routes::router().merge(review_routes::router()))
        .nest_api_service("/docs", docs_routes())
        .finish_api_with(&mut api, api_docs)
        .layer(Extension(Arc::new(api))) // Arc is very important here or you will face massive memory and performance issues
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the HTTP server with the provided configuration
pub async fn start_server<T: ApiApplication>(
    config: AxumConfig,
    app: T,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    tracing::info!("Listening for requests on {}", listener.local_addr()?);

    let service = router(app);
    axum::serve(listener, service).await
}

/// Axum imposes all sorts of constraints on what can pass for state. This
/// trait, coupled with a blanket implementation, specifies it all upfront and
/// in one place. If a function takes a generic `T: ApiApplication`, then
/// everything one might reasonably want to do should work.
pub trait ApiApplication:
    Clone
    + Send
    + Sync
    + 'static
    + Application<Repository: CatalogRepository + Clone + Send + Sync + 'static>
{
}

// this is the blanket implementation
impl<T> ApiApplication for T where
    T: Clone
        + Send
        + Sync
        + 'static
        + Application<Repository: CatalogRepository + Clone + Send + Sync + 'static>
{
}

/// The error half of every handler's result: a status code and a message.
type ApiError = (StatusCode, String);

/// Log a storage failure and turn it into a `503 Service Unavailable`.
fn store_unavailable<E: std::error::Error>(context: String) -> impl FnOnce(E) -> ApiError {
    move |err| {
        event!(Level::ERROR, err = err.to_string(), context = %context);
        (StatusCode::SERVICE_UNAVAILABLE, context)
    }
}
