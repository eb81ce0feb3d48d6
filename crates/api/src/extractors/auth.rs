use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use homehaven_db::models::{Role, User};
use homehaven_services::auth::Claims;
use homehaven_services::dao::base::DaoError;

use crate::{error::ApiError, state::AppState};

/// Authentication half of the gate: requires a verifiable bearer token and
/// carries the decoded claims. Rejects with 401.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub claims: Claims,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized access".to_string()))?;

        let claims = state.auth.verify_token(token)?;

        Ok(AuthUser {
            email: claims.email.clone(),
            claims,
        })
    }
}

/// Authorization half of the gate. The role embedded in the token can go
/// stale within its validity window, so the current role is always re-read
/// from the users collection. Rejects with 403 unless that role is admin.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user: User,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;

        let user = match state.users.find_by_email(&auth.email).await {
            Ok(user) => user,
            // A token for a since-deleted user carries no privileges.
            Err(DaoError::NotFound) => {
                return Err(ApiError::Forbidden("Forbidden access".to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        if user.role != Role::Admin {
            return Err(ApiError::Forbidden("Forbidden access".to_string()));
        }

        Ok(AdminUser { user })
    }
}
