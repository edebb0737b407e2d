//! PostgreSQL repositories.
//!
//! Free functions over `&PgPool`, `&mut PgConnection` (inside a service
//! transaction) or any `PgExecutor` when both are needed.

use db_pool::{create_pool as create_pg_pool, DbConfig as DbPoolConfig};
use sqlx::migrate::Migrator;
use sqlx::PgPool;

pub mod comment_repo;
pub mod course_repo;
pub mod debate_repo;
pub mod enrollment_repo;
pub mod follow_repo;
pub mod knowledge_repo;
pub mod listing_repo;
pub mod message_repo;
pub mod notification_repo;
pub mod post_repo;
pub mod quiz_repo;
pub mod reaction_repo;
pub mod saved_post_repo;
pub mod school_repo;
pub mod tag_repo;
pub mod user_repo;
pub mod webinar_repo;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create the pool from `DATABASE_URL`/`DB_*` and optionally migrate.
pub async fn init_pool(run_migrations: bool) -> anyhow::Result<PgPool> {
    let cfg = DbPoolConfig::from_env("learning-service").map_err(anyhow::Error::msg)?;
    cfg.log_config();
    let pool = create_pg_pool(cfg).await?;

    if run_migrations {
        MIGRATOR.run(&pool).await?;
        tracing::info!("Database migrations completed");
    } else {
        tracing::info!("Skipping database migrations (RUN_MIGRATIONS=false)");
    }

    Ok(pool)
}

/// `%term%` for ILIKE searches, with LIKE wildcards in the input escaped.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// `term%` for prefix searches.
pub(crate) fn prefix_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(" rust "), "%rust%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("snake_case"), "%snake\\_case%");
    }

    #[test]
    fn prefix_pattern_anchors_start() {
        assert_eq!(prefix_pattern("ma"), "ma%");
    }
}
