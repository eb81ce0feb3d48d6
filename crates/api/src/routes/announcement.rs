use axum::{
    Json,
    extract::{Path, State},
};
use bson::{DateTime, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use homehaven_db::models::Announcement;

use crate::{error::ApiError, extractors::AdminUser, state::AppState};

#[derive(Debug, Serialize)]
pub struct AnnouncementResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

fn to_response(announcement: Announcement) -> AnnouncementResponse {
    AnnouncementResponse {
        id: announcement.id.map(|id| id.to_hex()).unwrap_or_default(),
        title: announcement.title,
        content: announcement.content,
        created_at: announcement
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
        updated_at: announcement
            .updated_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    }
}

#[derive(Debug, Deserialize)]
pub struct AnnouncementRequest {
    pub title: String,
    pub content: String,
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnnouncementResponse>>, ApiError> {
    let announcements = state.announcements.list_latest().await?;
    Ok(Json(announcements.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<AnnouncementRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if body.title.is_empty() || body.content.is_empty() {
        return Err(ApiError::BadRequest(
            "Title and content are required".to_string(),
        ));
    }

    let now = DateTime::now();
    let announcement = Announcement {
        id: None,
        title: body.title,
        content: body.content,
        created_at: now,
        updated_at: now,
    };

    let id = state.announcements.base.insert_one(&announcement).await?;
    Ok(Json(serde_json::json!({ "inserted_id": id.to_hex() })))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(body): Json<AnnouncementRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let oid = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid announcement ID".to_string()))?;

    let outcome = state
        .announcements
        .base
        .set_fields_by_id(oid, doc! { "title": body.title, "content": body.content })
        .await?;
    if outcome.matched_count == 0 {
        return Err(ApiError::NotFound("Announcement not found".to_string()));
    }

    Ok(Json(
        serde_json::json!({ "message": "Announcement updated successfully" }),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let oid = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid announcement ID".to_string()))?;

    let deleted = state.announcements.base.delete_by_id(oid).await?;
    Ok(Json(serde_json::json!({ "deleted_count": deleted })))
}
