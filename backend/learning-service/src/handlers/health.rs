/// Liveness and readiness probes
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use std::time::Instant;

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    postgres: &'static str,
    latency_ms: u64,
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "learning-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn readiness(pool: web::Data<PgPool>) -> HttpResponse {
    let start = Instant::now();
    let result = sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HttpResponse::Ok().json(ReadinessResponse {
            ready: true,
            postgres: "healthy",
            latency_ms,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            HttpResponse::ServiceUnavailable().json(ReadinessResponse {
                ready: false,
                postgres: "unhealthy",
                latency_ms,
            })
        }
    }
}
