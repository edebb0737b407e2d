/// HTTP handlers for the learning platform
///
/// Handlers validate input, resolve the caller from the JWT extractor and
/// delegate to `services` for anything with more than one write. Plain
/// catalog CRUD goes straight to the repositories in `db`.
pub mod activities;
pub mod auth;
pub mod comments;
pub mod courses;
pub mod health;
pub mod knowledge_points;
pub mod listings;
pub mod messages;
pub mod notifications;
pub mod posts;
pub mod reactions;
pub mod schools;
pub mod tags;
pub mod users;

pub use health::{health, readiness};
pub use knowledge_points::{award_points, points_summary};
