// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::config::AppConfig;
use crate::service::JobService;
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, routes, Request, Response, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new("Access-Control-Allow-Methods", "GET, OPTIONS"));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[get("/jobs?<platform>")]
pub async fn get_jobs(
    platform: Option<&str>,
    service: &State<JobService>,
) -> Result<JobsResponse, ApiError> {
    handlers::get_jobs_handler(platform, service).await
}

#[get("/health")]
pub async fn health() -> Json<HealthResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorBody> {
    Json(ErrorBody {
        error: "Invalid request".to_string(),
    })
}

#[rocket::catch(404)]
pub fn not_found() -> Json<ErrorBody> {
    Json(ErrorBody {
        error: "Not found".to_string(),
    })
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorBody> {
    Json(ErrorBody {
        error: "No se pudieron obtener las vacantes. Intenta más tarde.".to_string(),
    })
}

// Main server start function
pub async fn start_web_server(config: AppConfig, port: u16) -> Result<()> {
    let service = JobService::new(config);

    info!("Starting job listings API server on port {}", port);

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    rocket::custom(figment)
        .attach(Cors)
        .manage(service)
        .register("/api", catchers![bad_request, not_found, internal_error])
        .mount("/api", routes![get_jobs, health, options])
        .launch()
        .await?;

    Ok(())
}
