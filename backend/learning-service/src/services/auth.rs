/// Auth service - registration, login and profile management
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::models::{
    AuthResponse, LoginRequest, PageParams, Paginated, RegisterRequest, UpdateProfileRequest,
    User, UserProfile, UserSearchQuery,
};
use crate::security::{hash_password, verify_password};
use actix_middleware::Role;
use sqlx::PgPool;
use uuid::Uuid;

/// Self-registration may pick any role except `admin`; default is `student`.
pub fn registration_role(requested: Option<Role>) -> Result<Role> {
    match requested {
        Some(Role::Admin) => Err(AppError::bad_request(
            "INVALID_ROLE",
            "The admin role cannot be self-assigned",
        )),
        Some(role) => Ok(role),
        None => Ok(Role::Student),
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("INVALID_CREDENTIALS", "Invalid email or password")
}

fn issue_token(user: User) -> Result<AuthResponse> {
    let token = crypto_core::jwt::generate_token_response(user.id, &user.email, &user.role)
        .map_err(|e| AppError::Internal(format!("Failed to issue token: {e}")))?;

    Ok(AuthResponse {
        access_token: token.access_token,
        token_type: token.token_type,
        expires_in: token.expires_in,
        user,
    })
}

pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse> {
        let role = registration_role(req.role)?;
        let email = normalize_email(&req.email);
        let username = req.username.trim();

        if user_repo::email_exists(&self.pool, &email).await? {
            return Err(AppError::bad_request("EMAIL_TAKEN", "Email is already registered"));
        }
        if user_repo::username_exists(&self.pool, username).await? {
            return Err(AppError::bad_request("USERNAME_TAKEN", "Username is already taken"));
        }

        let password_hash = hash_password(&req.password)?;
        let record = user_repo::create_user(
            &self.pool,
            &email,
            username,
            &password_hash,
            req.display_name.as_deref(),
            role.as_str(),
        )
        .await?;

        tracing::info!(user_id = %record.id, role = role.as_str(), "user registered");
        issue_token(record.into())
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse> {
        let email = normalize_email(&req.email);
        let record = user_repo::find_by_email(&self.pool, &email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(&req.password, &record.password_hash)? {
            tracing::debug!(user_id = %record.id, "login rejected: wrong password");
            return Err(invalid_credentials());
        }

        issue_token(record.into())
    }

    pub async fn me(&self, user_id: Uuid) -> Result<User> {
        user_repo::find_by_id(&self.pool, user_id)
            .await?
            .map(User::from)
            .ok_or_else(|| AppError::not_found("USER_NOT_FOUND", "User not found"))
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile> {
        user_repo::get_profile(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("USER_NOT_FOUND", "User not found"))
    }

    pub async fn update_profile(&self, user_id: Uuid, req: &UpdateProfileRequest) -> Result<User> {
        user_repo::update_profile(
            &self.pool,
            user_id,
            req.display_name.as_deref().map(str::trim),
            req.bio.as_deref(),
            req.avatar_url.as_deref(),
        )
        .await?
        .map(User::from)
        .ok_or_else(|| AppError::not_found("USER_NOT_FOUND", "User not found"))
    }

    pub async fn search(&self, query: &UserSearchQuery) -> Result<Paginated<UserProfile>> {
        let params = PageParams::new(query.page, query.limit);
        let q = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
        let role = query.role.map(|r| r.as_str());

        let items =
            user_repo::search_users(&self.pool, q, role, params.limit(), params.offset()).await?;
        let total = user_repo::count_users(&self.pool, q, role).await?;
        Ok(Paginated::new(items, params, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_cannot_self_register() {
        let err = registration_role(Some(Role::Admin)).unwrap_err();
        assert_eq!(err.code(), "INVALID_ROLE");
    }

    #[test]
    fn default_role_is_student() {
        assert_eq!(registration_role(None).unwrap(), Role::Student);
        assert_eq!(registration_role(Some(Role::Teacher)).unwrap(), Role::Teacher);
        assert_eq!(
            registration_role(Some(Role::SchoolAdmin)).unwrap(),
            Role::SchoolAdmin
        );
    }

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
