// src/web/handlers.rs

use crate::error::ServiceError;
use crate::service::JobService;
use crate::web::types::{ApiError, HealthResponse, JobsResponse};
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn get_jobs_handler(
    platform: Option<&str>,
    service: &State<JobService>,
) -> Result<JobsResponse, ApiError> {
    let Some(platform) = platform else {
        return Err(ApiError::bad_request(
            "Missing required query parameter: platform",
        ));
    };

    info!("Querying listings for platform: {}", platform);

    match service.get_platform(platform).await {
        Ok(listings) => {
            info!("[{}] returning {} listings", platform, listings.len());
            Ok(JobsResponse::new(listings))
        }
        Err(ServiceError::UnknownPlatform(name)) => {
            Err(ApiError::bad_request(format!("Unknown platform: {}", name)))
        }
        Err(e @ ServiceError::Upstream(_)) => {
            error!("Scrape pass failed for {}: {}", platform, e);
            Err(ApiError::internal(
                "No se pudieron obtener las vacantes. Intenta más tarde.",
            ))
        }
    }
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
