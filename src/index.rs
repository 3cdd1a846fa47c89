use std::collections::BTreeMap;

use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct IndexResponse {
    message: String,
    endpoints: BTreeMap<String, String>,
}

#[get("/")]
pub fn index() -> Json<IndexResponse> {
    let endpoints = [
        ("cpu", "/cpu?n=10000"),
        ("json", "/json?n=2000"),
        ("io", "/io?size=32768&iter=50"),
        ("io_disk", "/io?size=32768&iter=50&mode=disk"),
    ]
    .into_iter()
    .map(|(name, path)| (name.to_string(), path.to_string()))
    .collect();
    Json(IndexResponse {
        message: "Rust benchmark endpoints".into(),
        endpoints,
    })
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PingResponse {
    status: String,
    ping: String,
}

#[get("/ping")]
pub fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "OK".into(),
        ping: "pong".into(),
    })
}
