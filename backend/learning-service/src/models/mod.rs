//! Row types, request bodies and response shapes shared by handlers and services.

pub mod activity;
pub mod course;
pub mod knowledge;
pub mod listing;
pub mod messaging;
pub mod pagination;
pub mod post;
pub mod social;
pub mod user;

pub use activity::*;
pub use course::*;
pub use knowledge::*;
pub use listing::*;
pub use messaging::*;
pub use pagination::{PageParams, Paginated};
pub use post::*;
pub use social::*;
pub use user::*;
