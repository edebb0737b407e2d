/// Auth handlers - register, login, logout and the current user
use crate::config::Config;
use crate::error::Result;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::services::AuthService;
use actix_middleware::{AuthUser, AUTH_COOKIE_NAME};
use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

fn auth_cookie(token: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE_NAME, token.to_string())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_secs))
        .finish()
}

fn with_cookie(mut builder: actix_web::HttpResponseBuilder, auth: AuthResponse, secure: bool) -> HttpResponse {
    builder
        .cookie(auth_cookie(&auth.access_token, auth.expires_in, secure))
        .json(auth)
}

pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let auth = AuthService::new(pool.get_ref().clone()).register(&req).await?;
    Ok(with_cookie(HttpResponse::Created(), auth, config.auth.cookie_secure))
}

pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let auth = AuthService::new(pool.get_ref().clone()).login(&req).await?;
    Ok(with_cookie(HttpResponse::Ok(), auth, config.auth.cookie_secure))
}

pub async fn logout(config: web::Data<Config>) -> HttpResponse {
    let mut cookie = auth_cookie("", 0, config.auth.cookie_secure);
    cookie.make_removal();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(serde_json::json!({ "success": true }))
}

pub async fn me(pool: web::Data<PgPool>, user: AuthUser) -> Result<HttpResponse> {
    let me = AuthService::new(pool.get_ref().clone()).me(user.user_id).await?;
    Ok(HttpResponse::Ok().json(me))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_cookie_is_http_only() {
        let cookie = auth_cookie("abc", 3600, true);
        assert_eq!(cookie.name(), AUTH_COOKIE_NAME);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }
}
