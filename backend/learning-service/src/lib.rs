/// Learning Service Library
///
/// Social learning platform backend: posts with capped knowledge-point
/// awards, comments, reactions, tags, follows, direct messages and
/// notifications, plus schools, courses, enrollments, mentor/tutor
/// listings, quizzes, webinars and debates.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `routes`: `/api` route table and extractor error handlers
/// - `services`: transactional business rules
/// - `db`: PostgreSQL repositories and migrations
/// - `models`: row types, request and response bodies
/// - `security`: password hashing
/// - `error`: error types and the JSON error envelope
/// - `config`: environment configuration
/// - `metrics`: Prometheus collectors
/// - `openapi`: OpenAPI document
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod security;
pub mod services;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};
