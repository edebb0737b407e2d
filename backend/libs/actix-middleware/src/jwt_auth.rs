use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, Ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use uuid::Uuid;

use crate::error::AuthError;
use crate::role::Role;

/// Cookie that carries the access token for browser clients.
pub const AUTH_COOKIE_NAME: &str = "token";

/// Identity extracted from a validated JWT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Allow the request when the caller holds one of `roles` (admins always pass).
    pub fn require_any(&self, roles: &[Role]) -> Result<(), AuthError> {
        if self.is_admin() || roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden(format!(
                "Role '{}' is not allowed to perform this action",
                self.role
            )))
        }
    }

    /// Allow the request when the caller owns the resource or is an admin.
    pub fn require_owner_or_admin(&self, owner_id: Uuid) -> Result<(), AuthError> {
        if self.user_id == owner_id || self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Forbidden(
                "You don't have permission to modify this resource".to_string(),
            ))
        }
    }
}

/// JWT Authentication Middleware
///
/// `required()` rejects requests without a valid token. `optional()` attaches
/// the identity when a valid token is present and lets anonymous requests
/// through; handlers then decide with `AuthUser` / `Option<AuthUser>`.
#[derive(Clone, Copy)]
pub struct JwtAuthMiddleware {
    required: bool,
}

impl JwtAuthMiddleware {
    pub fn required() -> Self {
        Self { required: true }
    }

    pub fn optional() -> Self {
        Self { required: false }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = JwtAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
            required: self.required,
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
    required: bool,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let required = self.required;

        Box::pin(async move {
            match authenticate(&req) {
                Ok(Some(user)) => {
                    req.extensions_mut().insert(user);
                }
                Ok(None) if required => return Err(AuthError::MissingCredentials.into()),
                Ok(None) => {}
                Err(e) if required => return Err(e.into()),
                Err(e) => {
                    tracing::debug!(error = %e, "ignoring unusable credentials on public route");
                }
            }

            service.call(req).await
        })
    }
}

/// Pull a token from the Authorization header, falling back to the auth cookie.
fn extract_token(req: &ServiceRequest) -> Result<Option<String>, AuthError> {
    if let Some(header) = req.headers().get("Authorization") {
        let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MalformedHeader)?
            .trim();
        if token.is_empty() {
            return Err(AuthError::MalformedHeader);
        }
        return Ok(Some(token.to_string()));
    }

    Ok(req
        .cookie(AUTH_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty()))
}

fn authenticate(req: &ServiceRequest) -> Result<Option<AuthUser>, AuthError> {
    let Some(token) = extract_token(req)? else {
        return Ok(None);
    };

    let token_data = crypto_core::jwt::validate_token(&token).map_err(|e| {
        tracing::warn!("JWT validation failed: {}", e);
        match e {
            crypto_core::jwt::TokenError::Expired => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    })?;

    let claims = token_data.claims;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::error!("Invalid user_id UUID in token: {}", e);
        AuthError::InvalidToken
    })?;
    let role = claims.role.parse::<Role>().map_err(|e| {
        tracing::error!("Invalid role in token: {}", e);
        AuthError::InvalidToken
    })?;

    Ok(Some(AuthUser {
        user_id,
        email: claims.email,
        role,
    }))
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AuthError::MissingCredentials.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{cookie::Cookie, http::StatusCode, test as actix_test, web, App, HttpResponse};
    use crypto_core::{jwt, testing::init_test_keys};

    async fn whoami(user: AuthUser) -> HttpResponse {
        HttpResponse::Ok().body(format!("{}:{}", user.user_id, user.role))
    }

    async fn maybe_whoami(user: Option<AuthUser>) -> HttpResponse {
        match user {
            Some(u) => HttpResponse::Ok().body(u.role.to_string()),
            None => HttpResponse::Ok().body("anonymous"),
        }
    }

    #[actix_rt::test]
    async fn required_rejects_missing_token() {
        let app = actix_test::init_service(
            App::new()
                .wrap(JwtAuthMiddleware::required())
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/me").to_request();
        let resp = actix_test::try_call_service(&app, req).await;
        let err = resp.err().expect("request must be rejected");
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_rt::test]
    async fn required_accepts_bearer_token() {
        init_test_keys();
        let user_id = Uuid::new_v4();
        let token = jwt::generate_access_token(user_id, "ada@example.com", "teacher").unwrap();

        let app = actix_test::init_service(
            App::new()
                .wrap(JwtAuthMiddleware::required())
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body, format!("{user_id}:teacher").as_bytes());
    }

    #[actix_rt::test]
    async fn required_accepts_cookie_token() {
        init_test_keys();
        let token =
            jwt::generate_access_token(Uuid::new_v4(), "ada@example.com", "student").unwrap();

        let app = actix_test::init_service(
            App::new()
                .wrap(JwtAuthMiddleware::required())
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/me")
            .cookie(Cookie::new(AUTH_COOKIE_NAME, token))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_rt::test]
    async fn optional_lets_anonymous_through() {
        let app = actix_test::init_service(
            App::new()
                .wrap(JwtAuthMiddleware::optional())
                .route("/maybe", web::get().to(maybe_whoami)),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/maybe").to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body, "anonymous".as_bytes());
    }

    #[actix_rt::test]
    async fn optional_ignores_garbage_token() {
        init_test_keys();
        let app = actix_test::init_service(
            App::new()
                .wrap(JwtAuthMiddleware::optional())
                .route("/maybe", web::get().to(maybe_whoami)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/maybe")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body, "anonymous".as_bytes());
    }

    #[test]
    fn role_guards() {
        let owner = Uuid::new_v4();
        let student = AuthUser {
            user_id: owner,
            email: "s@example.com".into(),
            role: Role::Student,
        };
        let admin = AuthUser {
            user_id: Uuid::new_v4(),
            email: "a@example.com".into(),
            role: Role::Admin,
        };

        assert!(student.require_any(&[Role::Teacher]).is_err());
        assert!(student.require_any(&[Role::Student, Role::Teacher]).is_ok());
        assert!(admin.require_any(&[Role::Teacher]).is_ok());

        assert!(student.require_owner_or_admin(owner).is_ok());
        assert!(student.require_owner_or_admin(Uuid::new_v4()).is_err());
        assert!(admin.require_owner_or_admin(owner).is_ok());
    }
}
