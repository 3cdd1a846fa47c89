#[macro_use]
extern crate rocket;

use rocket::figment::Figment;
use rocket::serde::json::Json;
use rocket::{Build, Request, Rocket};
use tracing_subscriber::EnvFilter;

mod config;
mod cpu;
mod index;
mod io;
mod json;
mod model;
mod shutdown;
mod timing;

use timing::ErrorResponse;

#[catch(404)]
fn not_found(req: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new(None, format!("not found: {}", req.uri().path())))
}

pub fn rocket_from(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .attach(config::load_rocket_config())
        .mount(
            "/",
            routes![
                index::index,
                index::ping,
                shutdown::shutdown,
                cpu::cpu,
                json::json,
                io::io_workload,
            ],
        )
        .register("/", catchers![not_found])
}

pub fn main_rocket() -> Rocket<Build> {
    rocket_from(rocket::Config::figment())
}

#[launch]
fn rocket() -> _ {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("could not install the tracing subscriber: {e}");
    }
    main_rocket()
}
