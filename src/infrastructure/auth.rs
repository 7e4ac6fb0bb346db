use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Json},
    http::{request::Parts, StatusCode},
};
use serde_json::json;

use super::state::AppState;

pub const TOKEN_SUBJECT: &str = "booklist_user";
pub const TOKEN_EXPIRY_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Secret used to sign and check bearer tokens.
#[derive(Clone)]
pub struct JwtSecret(pub String);

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        JwtSecret(state.jwt_secret.clone())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Missing Authorization header" })),
            ))?;

        let Some(token) = auth_header.strip_prefix("Bearer ") else {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid authorization header" })),
            ));
        };

        let JwtSecret(secret) = JwtSecret::from_ref(state);
        decode_jwt(token, &secret).map_err(|e| {
            let message = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token has expired",
                _ => "Invalid token",
            };
            (StatusCode::UNAUTHORIZED, Json(json!({ "error": message })))
        })
    }
}

/// Check `provided` against the configured passcode and mint a token.
///
/// Returns `None` when the passcode is wrong or none is configured.
pub fn verify_passcode(
    expected: Option<&str>,
    provided: &str,
    secret: &str,
) -> Result<Option<String>, String> {
    match expected {
        Some(expected) if expected == provided => create_jwt(secret).map(Some),
        _ => Ok(None),
    }
}

pub fn create_jwt(secret: &str) -> Result<String, String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_EXPIRY_HOURS))
        .ok_or_else(|| "token expiry out of range".to_string())?
        .timestamp();

    let claims = Claims {
        sub: TOKEN_SUBJECT.to_owned(),
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| e.to_string())
}

pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
