use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use homehaven_db::models::Role;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub role: Role,
}

/// Strict issue policy: a token is only signed for an email that already
/// exists in the users collection, and the role it reports is the stored one,
/// never caller input.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = state
        .users
        .find_by_email(&body.email)
        .await
        .map_err(|e| ApiError::from_lookup(e, "User not found"))?;

    let token = state.auth.issue_token(&user.email, user.role)?;

    Ok(Json(TokenResponse {
        token,
        role: user.role,
    }))
}
