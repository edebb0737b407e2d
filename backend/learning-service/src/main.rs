use actix_cors::Cors;
use actix_middleware::{CorrelationIdMiddleware, Logging, MetricsMiddleware};
use actix_web::{web, App, HttpResponse, HttpServer};
use crypto_core::jwt;
use learning_service::config::{Config, LogFormat};
use learning_service::openapi::ApiDoc;
use learning_service::{db, metrics, routes};
use std::io;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Learning Service
///
/// # Routes
///
/// - `/api/auth/*`, `/api/users/*` - accounts, profiles, follows
/// - `/api/posts/*`, `/api/feed`, `/api/tags/*` - posts, polls, comments, reactions, knowledge points
/// - `/api/messages/*`, `/api/notifications/*`
/// - `/api/schools/*`, `/api/courses/*`, `/api/enrollments`
/// - `/api/mentorships/*`, `/api/tutors/*`
/// - `/api/quizzes/*`, `/api/webinars/*`, `/api/debates/*`
/// - `/api/health`, `/api/health/ready`, `/metrics`, `/swagger-ui/`
#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.log.format);

    tracing::info!("Starting learning-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let (private_key, public_key) = jwt::load_keys_from_env().map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to load JWT keys: {e}"),
        )
    })?;
    jwt::initialize_jwt_keys(&private_key, &public_key).map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to initialize JWT keys: {e}"),
        )
    })?;

    let db_pool = match db::init_pool(config.app.run_migrations).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database initialization failed: {:#}", e);
            eprintln!("ERROR: Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let bind_address = config.app.bind_address();
    tracing::info!("Starting HTTP server at {}", bind_address);

    let pool_data = web::Data::new(db_pool);
    let config_data = web::Data::new(config.clone());

    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in config.cors.origins() {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        let openapi_doc = ApiDoc::openapi();

        App::new()
            .app_data(web::Data::new(openapi_doc.clone()))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url(ApiDoc::openapi_json_path(), openapi_doc.clone()),
            )
            .route(ApiDoc::openapi_json_path(), web::get().to(openapi_json))
            .app_data(pool_data.clone())
            .app_data(config_data.clone())
            .wrap(MetricsMiddleware)
            .wrap(Logging)
            .wrap(CorrelationIdMiddleware)
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(cors)
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .configure(routes::configure)
    })
    .bind(&bind_address)?
    .shutdown_timeout(30)
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, stopping HTTP server");
        handle.stop(true).await;
    });

    server.await?;
    tracing::info!("learning-service stopped");
    Ok(())
}
