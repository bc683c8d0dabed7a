// src/web/types.rs

use crate::types::Listing;
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder};
use rocket::serde::Serialize;
use rocket::{Request, Response};
use std::io::Cursor;

/// JSON array of listings with the CDN caching header the front end
/// expects.
pub struct JobsResponse {
    pub listings: Vec<Listing>,
}

impl JobsResponse {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }
}

impl<'r> Responder<'r, 'static> for JobsResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let body = serde_json::to_vec(&self.listings).map_err(|_| Status::InternalServerError)?;

        Response::build()
            .header(ContentType::JSON)
            .raw_header("Cache-Control", "s-maxage=3600, stale-while-revalidate")
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorBody {
    pub error: String,
}

/// Error responder carrying the status code and a `{"error": ...}` body.
pub struct ApiError {
    pub status: Status,
    pub error: String,
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self {
            status: Status::BadRequest,
            error: error.into(),
        }
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self {
            status: Status::InternalServerError,
            error: error.into(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let body = serde_json::to_vec(&ErrorBody { error: self.error })
            .map_err(|_| Status::InternalServerError)?;

        Response::build()
            .status(self.status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthResponse {
    pub status: String,
}
