/// Error types for Learning Service
///
/// Every failure leaves the service as a JSON `{error, code}` envelope.
/// Domain rejections carry a specific machine-readable code; anything
/// unexpected is logged and rendered as a generic `INTERNAL_ERROR`.
use actix_middleware::AuthError;
use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use serde::Serialize;
use validator::ValidationErrors;

/// Result type for learning-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 400 with a domain code such as `INVALID_POINTS`
    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    /// 404 with a `*_NOT_FOUND` code
    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    #[error("{message}")]
    Unauthorized { code: &'static str, message: String },

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        AppError::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        AppError::NotFound {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            code,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Unauthorized { code, .. } => code,
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Auth(e) => e.code(),
            AppError::Database(_) | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Auth(e) => e.status_code(),
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error = if status.is_server_error() {
            tracing::error!(error = %self, "request failed with internal error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(ErrorResponse {
            error,
            code: self.code().to_string(),
        })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => {
                    return AppError::bad_request("DUPLICATE_ENTRY", "Resource already exists")
                }
                // foreign_key_violation
                Some("23503") => {
                    return AppError::bad_request(
                        "REFERENCE_NOT_FOUND",
                        "Referenced resource does not exist",
                    )
                }
                // check_violation
                Some("23514") => {
                    return AppError::bad_request("CONSTRAINT_VIOLATION", "Value out of range")
                }
                _ => {}
            }
        }
        AppError::Database(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::bad_request("VALIDATION_ERROR", describe_validation_errors(&errors))
    }
}

/// Flatten validator output into `field: message` pairs sorted by field.
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let detail = errs
                .first()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .unwrap_or_default();
            format!("{field}: {detail}")
        })
        .collect();
    parts.sort();
    parts.join(", ")
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::bad_request("INVALID_JSON", format!("Invalid JSON body: {err}")).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::bad_request("INVALID_QUERY", format!("Invalid query string: {err}")).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::bad_request("INVALID_PATH", format!("Invalid path parameter: {err}")).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "too short"))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn status_codes_follow_variant() {
        assert_eq!(
            AppError::bad_request("INVALID_POINTS", "x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("POST_NOT_FOUND", "x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::forbidden("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Auth(AuthError::MissingCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_rt::test]
    async fn internal_errors_do_not_leak_detail() {
        let resp = AppError::Internal("connection refused at 10.0.0.5".into()).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"], "Internal server error");
    }

    #[actix_rt::test]
    async fn domain_errors_render_envelope() {
        let resp = AppError::bad_request("CANNOT_FOLLOW_SELF", "You cannot follow yourself")
            .error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "CANNOT_FOLLOW_SELF");
        assert_eq!(json["error"], "You cannot follow yourself");
    }

    #[test]
    fn row_not_found_is_internal() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn validation_errors_list_fields() {
        let sample = Sample {
            name: "ab".into(),
            email: "nope".into(),
        };
        let err: AppError = sample.validate().unwrap_err().into();

        assert_eq!(err.code(), "VALIDATION_ERROR");
        let message = err.to_string();
        assert!(message.contains("name: too short"));
        assert!(message.contains("email"));
    }
}
