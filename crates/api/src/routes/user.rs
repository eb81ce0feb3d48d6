use axum::{
    Json,
    extract::{Path, State},
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use homehaven_db::models::{Role, User};
use homehaven_services::dao::base::{DaoError, UpdateOutcome};

use crate::{
    error::ApiError,
    extractors::{AdminUser, AuthUser},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub apartment_id: Option<String>,
}

fn to_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
        email: user.email,
        name: user.name,
        role: user.role,
        apartment_id: user.apartment_id.map(|id| id.to_hex()),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpsertUserRequest {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpsertUserResponse {
    pub inserted_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.find_all().await?;
    Ok(Json(users.into_iter().map(to_response).collect()))
}

pub async fn get_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::from_lookup(e, "User not found"))?;
    Ok(Json(to_response(user)))
}

/// First-sign-in upsert. Existing emails are acknowledged, not duplicated.
pub async fn upsert(
    State(state): State<AppState>,
    Json(body): Json<UpsertUserRequest>,
) -> Result<Json<UpsertUserResponse>, ApiError> {
    if body.email.is_empty() {
        return Err(ApiError::BadRequest("Email is required".to_string()));
    }

    let inserted = state.users.upsert_by_email(body.email, body.name).await?;

    Ok(Json(match inserted {
        Some(id) => UpsertUserResponse {
            inserted_id: Some(id.to_hex()),
            message: None,
        },
        None => UpsertUserResponse {
            inserted_id: None,
            message: Some("User already exists".to_string()),
        },
    }))
}

/// Self-only role probe used by the frontend route guards.
pub async fn is_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(email): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if email != auth.email {
        return Err(ApiError::Forbidden("Forbidden access".to_string()));
    }
    let admin = match state.users.find_by_email(&email).await {
        Ok(user) => user.role == Role::Admin,
        Err(DaoError::NotFound) => false,
        Err(e) => return Err(e.into()),
    };
    Ok(Json(serde_json::json!({ "admin": admin })))
}

pub async fn is_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(email): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if email != auth.email {
        return Err(ApiError::Forbidden("Forbidden access".to_string()));
    }
    let member = match state.users.find_by_email(&email).await {
        Ok(user) => user.role == Role::Member,
        Err(DaoError::NotFound) => false,
        Err(e) => return Err(e.into()),
    };
    Ok(Json(serde_json::json!({ "member": member })))
}

pub async fn make_admin(
    state: State<AppState>,
    admin: AdminUser,
    id: Path<String>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    update_role(state, admin, id, Role::Admin).await
}

pub async fn make_member(
    state: State<AppState>,
    admin: AdminUser,
    id: Path<String>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    update_role(state, admin, id, Role::Member).await
}

pub async fn make_user(
    state: State<AppState>,
    admin: AdminUser,
    id: Path<String>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    update_role(state, admin, id, Role::User).await
}

async fn update_role(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
    role: Role,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let target_id =
        ObjectId::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid user ID".to_string()))?;

    // An admin demoting themselves would lock the last admin out.
    if admin.user.id == Some(target_id) {
        return Err(ApiError::Forbidden(
            "You cannot modify your own role".to_string(),
        ));
    }

    let outcome = state.users.set_role(target_id, role).await?;
    if outcome.matched_count == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(outcome))
}

pub async fn delete(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let target_id =
        ObjectId::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid user ID".to_string()))?;

    if admin.user.id == Some(target_id) {
        return Err(ApiError::Forbidden(
            "You cannot delete your own account".to_string(),
        ));
    }

    let deleted = state.users.base.delete_by_id(target_id).await?;
    Ok(Json(serde_json::json!({ "deleted_count": deleted })))
}
