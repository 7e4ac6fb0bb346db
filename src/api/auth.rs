use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::verify_passcode;
use crate::infrastructure::AppState;

#[derive(Deserialize)]
pub struct PasscodeRequest {
    passcode: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    token: String,
}

pub async fn verify(
    State(state): State<AppState>,
    Json(payload): Json<PasscodeRequest>,
) -> impl IntoResponse {
    match verify_passcode(state.passcode.as_deref(), &payload.passcode, &state.jwt_secret) {
        Ok(Some(token)) => {
            tracing::info!("Passcode verified, token issued");
            (StatusCode::OK, Json(TokenResponse { token })).into_response()
        }
        Ok(None) => {
            tracing::warn!("Rejected passcode attempt");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid passcode" })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to issue token: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e })),
            )
                .into_response()
        }
    }
}
