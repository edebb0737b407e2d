//! Logging middleware
//!
//! Logs HTTP request/response information using tracing, tagged with the
//! correlation id when `CorrelationIdMiddleware` runs first.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::time::Instant;

use crate::correlation_id::CorrelationId;

/// Middleware that logs HTTP requests and responses
#[derive(Clone, Default)]
pub struct Logging;

impl<S, B> Transform<S, ServiceRequest> for Logging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = LoggingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggingService { service }))
    }
}

pub struct LoggingService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for LoggingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_string();
        let correlation_id = req
            .extensions()
            .get::<CorrelationId>()
            .map(|c| c.0.clone())
            .unwrap_or_default();

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &res {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if status >= 500 {
                        tracing::error!(%method, %path, status, duration_ms = elapsed_ms, %correlation_id, "HTTP request failed");
                    } else {
                        tracing::info!(%method, %path, status, duration_ms = elapsed_ms, %correlation_id, "HTTP request completed");
                    }
                }
                Err(err) => {
                    let status = err.as_response_error().status_code().as_u16();
                    tracing::info!(%method, %path, status, duration_ms = elapsed_ms, %correlation_id, "HTTP request rejected");
                }
            }

            res
        })
    }
}
