// src/service.rs

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{convert::Infallible, sync::Arc};
use tracing::{error, warn};
use warp::{
    http::StatusCode,
    reply::{self, Reply, Response},
    Filter, Rejection,
};

use crate::engine::DeliveryEngine;
use crate::error::EngineError;

/// `?country=` / `?vendor=` / `?shipment_mode=` on `GET /deliveries`.
#[derive(Debug, Default, Deserialize)]
pub struct DeliveryFilter {
    pub country: Option<String>,
    pub vendor: Option<String>,
    pub shipment_mode: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_reply(status: StatusCode, message: impl Into<String>) -> Response {
    reply::with_status(
        reply::json(&ErrorResponse {
            error: message.into(),
        }),
        status,
    )
    .into_response()
}

fn engine_error_reply(err: EngineError) -> Response {
    if err.is_caller_error() {
        warn!("rejected request: {}", err);
        error_reply(StatusCode::BAD_REQUEST, err.to_string())
    } else {
        error!("request failed: {}", err);
        error_reply(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

/// Run an engine call on the blocking pool (the first call may read the
/// whole dataset) and turn the outcome into a JSON reply.
async fn run<T, F>(engine: Arc<DeliveryEngine>, op: F) -> Result<Response, Infallible>
where
    T: Serialize + Send + 'static,
    F: FnOnce(&DeliveryEngine) -> Result<T, EngineError> + Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(move || op(engine.as_ref())).await;
    Ok(match outcome {
        Ok(Ok(value)) => reply::json(&value).into_response(),
        Ok(Err(err)) => engine_error_reply(err),
        Err(join_err) => {
            error!("engine task failed: {}", join_err);
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    })
}

async fn health() -> Result<impl Reply, Infallible> {
    Ok(reply::json(&json!({ "status": "ok" })))
}

async fn delivery_by_id(
    raw_id: String,
    engine: Arc<DeliveryEngine>,
) -> Result<Response, Infallible> {
    run(engine, move |e| e.get_by_raw_id(&raw_id)).await
}

async fn deliveries(
    filter: DeliveryFilter,
    engine: Arc<DeliveryEngine>,
) -> Result<Response, Infallible> {
    match (filter.country, filter.vendor, filter.shipment_mode) {
        (Some(country), None, None) => {
            run(engine, move |e| Ok(e.filter_by_country(&country)?.to_vec())).await
        }
        (None, Some(vendor), None) => {
            run(engine, move |e| Ok(e.filter_by_vendor(&vendor)?.to_vec())).await
        }
        (None, None, Some(mode)) => {
            run(engine, move |e| Ok(e.filter_by_shipment_mode(&mode)?.to_vec())).await
        }
        _ => Ok(error_reply(
            StatusCode::BAD_REQUEST,
            "exactly one of country, vendor or shipment_mode is required",
        )),
    }
}

async fn countries(engine: Arc<DeliveryEngine>) -> Result<Response, Infallible> {
    run(engine, |e| e.list_distinct_countries()).await
}

async fn vendors(engine: Arc<DeliveryEngine>) -> Result<Response, Infallible> {
    run(engine, |e| e.list_distinct_vendors()).await
}

async fn statistics(engine: Arc<DeliveryEngine>) -> Result<Response, Infallible> {
    run(engine, |e| e.compute_statistics()).await
}

fn with_engine(
    engine: Arc<DeliveryEngine>,
) -> impl Filter<Extract = (Arc<DeliveryEngine>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&engine))
}

/// All HTTP routes, read-only:
///
/// - `GET /health`
/// - `GET /deliveries/{id}`
/// - `GET /deliveries?country=..|vendor=..|shipment_mode=..`
/// - `GET /countries`, `GET /vendors`
/// - `GET /statistics`
pub fn routes(
    engine: Arc<DeliveryEngine>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health_route = warp::path!("health").and(warp::get()).and_then(health);

    let by_id = warp::path!("deliveries" / String)
        .and(warp::get())
        .and(with_engine(engine.clone()))
        .and_then(delivery_by_id);

    let filtered = warp::path!("deliveries")
        .and(warp::get())
        .and(warp::query::<DeliveryFilter>())
        .and(with_engine(engine.clone()))
        .and_then(deliveries);

    let countries_route = warp::path!("countries")
        .and(warp::get())
        .and(with_engine(engine.clone()))
        .and_then(countries);

    let vendors_route = warp::path!("vendors")
        .and(warp::get())
        .and(with_engine(engine.clone()))
        .and_then(vendors);

    let statistics_route = warp::path!("statistics")
        .and(warp::get())
        .and(with_engine(engine))
        .and_then(statistics);

    health_route
        .or(by_id)
        .or(filtered)
        .or(countries_route)
        .or(vendors_route)
        .or(statistics_route)
        .with(warp::trace::request())
}
