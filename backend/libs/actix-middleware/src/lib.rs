//! # Actix Middleware Library
//!
//! Shared middleware components for the learning platform's actix services
//!
//! ## Modules
//! - `jwt_auth`: JWT authentication (bearer header or `token` cookie) and the `AuthUser` extractor
//! - `role`: platform roles and role guards
//! - `error`: JSON `{error, code}` rejections produced by the middleware
//! - `metrics`: Prometheus request metrics
//! - `logging`: request/response logging via tracing
//! - `correlation_id`: `x-correlation-id` propagation

pub mod correlation_id;
pub mod error;
pub mod jwt_auth;
pub mod logging;
pub mod metrics;
pub mod role;

pub use correlation_id::{get_correlation_id, CorrelationIdMiddleware};
pub use error::AuthError;
pub use jwt_auth::{AuthUser, JwtAuthMiddleware, AUTH_COOKIE_NAME};
pub use logging::Logging;
pub use metrics::MetricsMiddleware;
pub use role::Role;
