use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::State;

use crate::config;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ShutdownResponse {
    status: String,
}

/// Stops the server once in-flight requests finish. Answers 404 unless
/// `allow_shutdown` is set.
#[get("/shutdown")]
pub fn shutdown(
    shutdown: rocket::Shutdown,
    config: &State<config::Config>,
) -> Option<Json<ShutdownResponse>> {
    if !config.allow_shutdown {
        tracing::warn!("shutdown requested but not allowed by the configuration");
        return None;
    }
    tracing::info!("shutdown requested");
    shutdown.notify();
    Some(Json(ShutdownResponse {
        status: "OK".into(),
    }))
}
