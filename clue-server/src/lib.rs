use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;

use crate::dispatcher::Dispatcher;
use clue_types::InboundEvent;

pub mod config;
pub mod dispatcher;
pub mod media_cache;
pub mod render;
pub mod transport;

#[derive(serde::Serialize)]
struct EventAck {
    status: &'static str,
}

pub fn create_routes(
    dispatcher: Arc<Dispatcher>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let dispatcher_filter = warp::any().map({
        let dispatcher = dispatcher.clone();
        move || dispatcher.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    // Inbound chat events: free text or button payloads
    let events = warp::path("events")
        .and(warp::post())
        .and(warp::body::json())
        .and(dispatcher_filter)
        .and_then(handle_event);

    health.or(events).with(warp::log("clue_bot"))
}

async fn handle_event(
    event: InboundEvent,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    dispatcher.handle_event(event).await;
    Ok(warp::reply::with_status(
        warp::reply::json(&EventAck { status: "ok" }),
        StatusCode::OK,
    ))
}
