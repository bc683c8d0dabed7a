pub mod cache;
pub mod composer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod scorer;
pub mod service;
pub mod types;
pub mod web;

pub use web::start_web_server;
