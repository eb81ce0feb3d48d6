use axum::{
    Json,
    extract::{Path, State},
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use homehaven_db::models::{Agreement, AgreementStatus, Role};
use homehaven_services::dao::base::DaoError;

use crate::{
    error::ApiError,
    extractors::{AdminUser, AuthUser},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct AgreementResponse {
    pub id: String,
    pub user_email: String,
    pub apartment_id: String,
    pub rent: f64,
    pub status: AgreementStatus,
    pub accepted_at: Option<String>,
    pub last_payment_month: Option<String>,
    pub created_at: String,
}

fn to_response(agreement: Agreement) -> AgreementResponse {
    AgreementResponse {
        id: agreement.id.map(|id| id.to_hex()).unwrap_or_default(),
        user_email: agreement.user_email,
        apartment_id: agreement.apartment_id.to_hex(),
        rent: agreement.rent,
        status: agreement.status,
        accepted_at: agreement
            .accepted_at
            .and_then(|at| at.try_to_rfc3339_string().ok()),
        last_payment_month: agreement.last_payment_month,
        created_at: agreement
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAgreementRequest {
    pub apartment_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAgreementRequest {
    pub status: AgreementStatus,
}

pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<AgreementResponse>>, ApiError> {
    let agreements = state.agreements.find_all().await?;
    Ok(Json(agreements.into_iter().map(to_response).collect()))
}

/// Pending requests awaiting an admin decision, oldest first.
pub async fn requests(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<AgreementResponse>>, ApiError> {
    let agreements = state.agreements.find_pending().await?;
    Ok(Json(agreements.into_iter().map(to_response).collect()))
}

pub async fn by_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(email): Path<String>,
) -> Result<Json<Vec<AgreementResponse>>, ApiError> {
    if email != auth.email && !is_admin(&state, &auth.email).await? {
        return Err(ApiError::Forbidden("Forbidden access".to_string()));
    }

    let agreements = state.agreements.find_by_user(&email).await?;
    Ok(Json(agreements.into_iter().map(to_response).collect()))
}

/// A signed-in user requests tenancy of an apartment; the agreement starts
/// pending and the rent is copied from the apartment.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateAgreementRequest>,
) -> Result<Json<AgreementResponse>, ApiError> {
    let apartment_id = ObjectId::parse_str(&body.apartment_id)
        .map_err(|_| ApiError::BadRequest("Invalid apartment ID".to_string()))?;

    let agreement = state
        .agreement_flow
        .request(auth.email, apartment_id)
        .await?;
    Ok(Json(to_response(agreement)))
}

/// Admin decision on a pending agreement. Accepting promotes the requester to
/// member and books the apartment.
pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateAgreementRequest>,
) -> Result<Json<AgreementResponse>, ApiError> {
    let oid = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid agreement ID".to_string()))?;

    let agreement = match body.status {
        AgreementStatus::Accepted => state.agreement_flow.accept(oid).await?,
        AgreementStatus::Rejected => state.agreement_flow.reject(oid).await?,
        AgreementStatus::Pending => {
            return Err(ApiError::BadRequest(
                "Status must be accepted or rejected".to_string(),
            ));
        }
    };

    Ok(Json(to_response(agreement)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let oid = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid agreement ID".to_string()))?;

    // Authoritative role from the users collection, not the token. A missing
    // user document means no elevated role; anything else is a real failure.
    let role = match state.users.find_by_email(&auth.email).await {
        Ok(user) => user.role,
        Err(DaoError::NotFound) => Role::User,
        Err(e) => return Err(e.into()),
    };

    let deleted = state.agreement_flow.remove(oid, &auth.email, role).await?;
    Ok(Json(serde_json::json!({ "deleted_count": deleted })))
}

async fn is_admin(state: &AppState, email: &str) -> Result<bool, ApiError> {
    match state.users.find_by_email(email).await {
        Ok(user) => Ok(user.role == Role::Admin),
        Err(DaoError::NotFound) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
