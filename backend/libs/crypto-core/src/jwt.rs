/// Shared JWT module for the learning platform
///
/// Tokens are signed with RS256 only. The claims carry the user id (`sub`),
/// the email and the platform role so that handlers can authorize requests
/// without a database round trip.
///
/// ## Usage
///
/// ```rust,ignore
/// use crypto_core::jwt;
///
/// let (private_key, public_key) = jwt::load_keys_from_env()?;
/// jwt::initialize_jwt_keys(&private_key, &public_key)?;
///
/// let token = jwt::generate_access_token(user_id, "ada@example.com", "student")?;
/// let claims = jwt::validate_token(&token)?.claims;
/// ```
use anyhow::{anyhow, Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, TokenData,
    Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

/// Access tokens double as the session cookie, so they live for a week.
pub const ACCESS_TOKEN_EXPIRY_DAYS: i64 = 7;

const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

const TOKEN_TYPE_ACCESS: &str = "access";

// ============================================================================
// Data Structures
// ============================================================================

/// JWT claims: standard registered claims plus the platform identity.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type, always "access" for now
    pub token_type: String,
    pub email: String,
    /// Platform role name (`student`, `teacher`, ..., `admin`)
    pub role: String,
}

impl Claims {
    /// Parse the subject as a user id.
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|e| anyhow!("Invalid user ID format in token: {e}"))
    }
}

/// Token payload returned to clients after login or registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Why a token was rejected.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("JWT keys not initialized")]
    NotInitialized,
}

// ============================================================================
// Key Storage
// ============================================================================

static JWT_ENCODING_KEY: OnceCell<EncodingKey> = OnceCell::new();
static JWT_DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

// ============================================================================
// Initialization
// ============================================================================

/// Read both PEM keys from `JWT_PRIVATE_KEY_PEM` and `JWT_PUBLIC_KEY_PEM`.
///
/// Literal `\n` sequences are expanded so keys can live on one line in a
/// `.env` file.
pub fn load_keys_from_env() -> Result<(String, String)> {
    let private_key = std::env::var("JWT_PRIVATE_KEY_PEM")
        .context("JWT_PRIVATE_KEY_PEM environment variable not set")?;
    let public_key = std::env::var("JWT_PUBLIC_KEY_PEM")
        .context("JWT_PUBLIC_KEY_PEM environment variable not set")?;

    Ok((unescape_pem(&private_key), unescape_pem(&public_key)))
}

fn unescape_pem(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// Initialize JWT keys from PEM-formatted strings.
///
/// Can only be called once per process; subsequent calls return an error.
pub fn initialize_jwt_keys(private_key_pem: &str, public_key_pem: &str) -> Result<()> {
    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA private key: {e}"))?;

    let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA public key: {e}"))?;

    JWT_ENCODING_KEY
        .set(encoding_key)
        .map_err(|_| anyhow!("JWT encoding key already initialized"))?;

    JWT_DECODING_KEY
        .set(decoding_key)
        .map_err(|_| anyhow!("JWT decoding key already initialized"))?;

    Ok(())
}

fn get_encoding_key() -> Result<&'static EncodingKey> {
    JWT_ENCODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT keys not initialized. Call initialize_jwt_keys() during startup.")
    })
}

// ============================================================================
// Token Generation
// ============================================================================

/// Generate an access token for a user.
pub fn generate_access_token(user_id: Uuid, email: &str, role: &str) -> Result<String> {
    let now = Utc::now();
    let expiry = now + Duration::days(ACCESS_TOKEN_EXPIRY_DAYS);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
        token_type: TOKEN_TYPE_ACCESS.to_string(),
        email: email.to_string(),
        role: role.to_string(),
    };

    let encoding_key = get_encoding_key()?;
    encode(&Header::new(JWT_ALGORITHM), &claims, encoding_key)
        .map_err(|e| anyhow!("Failed to generate access token: {e}"))
}

/// Generate an access token wrapped in the client-facing response shape.
pub fn generate_token_response(user_id: Uuid, email: &str, role: &str) -> Result<TokenResponse> {
    let access_token = generate_access_token(user_id, email, role)?;

    Ok(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: ACCESS_TOKEN_EXPIRY_DAYS * 24 * 3600,
    })
}

// ============================================================================
// Token Validation
// ============================================================================

/// Validate signature, expiry and token type, returning the decoded claims.
pub fn validate_token(token: &str) -> std::result::Result<TokenData<Claims>, TokenError> {
    let decoding_key = JWT_DECODING_KEY.get().ok_or(TokenError::NotInitialized)?;

    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, decoding_key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
    })?;

    if data.claims.token_type != TOKEN_TYPE_ACCESS {
        return Err(TokenError::Invalid(format!(
            "unexpected token type '{}'",
            data.claims.token_type
        )));
    }

    Ok(data)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{init_test_keys, TEST_PRIVATE_KEY};

    #[test]
    fn test_generate_access_token() {
        init_test_keys();

        let token = generate_access_token(Uuid::new_v4(), "ada@example.com", "student")
            .expect("token generation");

        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_validate_round_trip_keeps_identity() {
        init_test_keys();

        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, "ada@example.com", "teacher")
            .expect("token generation");

        let claims = validate_token(&token).expect("valid token").claims;
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.role, "teacher");
        assert_eq!(claims.token_type, "access");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_validate_garbage_token() {
        init_test_keys();

        let result = validate_token("invalid.token.here");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_validate_tampered_token() {
        init_test_keys();

        let token = generate_access_token(Uuid::new_v4(), "ada@example.com", "student")
            .expect("token generation");
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = "eyJzdWIiOiJ4In0";
        parts[1] = forged_payload;

        assert!(validate_token(&parts.join(".")).is_err());
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        init_test_keys();

        let past = Utc::now() - Duration::days(2);
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: past.timestamp(),
            exp: (past + Duration::hours(1)).timestamp(),
            token_type: "access".to_string(),
            email: "old@example.com".to_string(),
            role: "student".to_string(),
        };
        let key = EncodingKey::from_rsa_pem(TEST_PRIVATE_KEY.as_bytes()).unwrap();
        let token = encode(&Header::new(JWT_ALGORITHM), &claims, &key).unwrap();

        assert!(matches!(validate_token(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_non_access_token_rejected() {
        init_test_keys();

        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
            token_type: "refresh".to_string(),
            email: "ada@example.com".to_string(),
            role: "student".to_string(),
        };
        let key = EncodingKey::from_rsa_pem(TEST_PRIVATE_KEY.as_bytes()).unwrap();
        let token = encode(&Header::new(JWT_ALGORITHM), &claims, &key).unwrap();

        assert!(matches!(validate_token(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_token_response_shape() {
        init_test_keys();

        let response = generate_token_response(Uuid::new_v4(), "ada@example.com", "mentor")
            .expect("token response");
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 7 * 24 * 3600);
        assert!(validate_token(&response.access_token).is_ok());
    }

    #[test]
    fn test_unescape_pem() {
        assert_eq!(unescape_pem("a\\nb"), "a\nb");
        assert_eq!(unescape_pem("a\nb"), "a\nb");
    }
}
