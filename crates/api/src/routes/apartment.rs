use axum::{
    Json,
    extract::{Path, State},
};
use bson::{DateTime, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use homehaven_db::models::{Apartment, ApartmentStatus};
use homehaven_services::dao::base::UpdateOutcome;

use crate::{error::ApiError, extractors::AdminUser, state::AppState};

#[derive(Debug, Serialize)]
pub struct ApartmentResponse {
    pub id: String,
    pub apartment_no: String,
    pub block_name: String,
    pub floor_no: i32,
    pub rent: f64,
    pub image: Option<String>,
    pub status: ApartmentStatus,
}

fn to_response(apartment: Apartment) -> ApartmentResponse {
    ApartmentResponse {
        id: apartment.id.map(|id| id.to_hex()).unwrap_or_default(),
        apartment_no: apartment.apartment_no,
        block_name: apartment.block_name,
        floor_no: apartment.floor_no,
        rent: apartment.rent,
        image: apartment.image,
        status: apartment.status,
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateApartmentRequest {
    pub apartment_no: String,
    pub block_name: String,
    pub floor_no: i32,
    pub rent: f64,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateApartmentRequest {
    pub apartment_no: Option<String>,
    pub block_name: Option<String>,
    pub floor_no: Option<i32>,
    pub rent: Option<f64>,
    pub image: Option<String>,
    pub status: Option<ApartmentStatus>,
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApartmentResponse>>, ApiError> {
    let apartments = state.apartments.find_all().await?;
    Ok(Json(apartments.into_iter().map(to_response).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApartmentResponse>, ApiError> {
    let oid = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid apartment ID".to_string()))?;
    let apartment = state
        .apartments
        .base
        .find_by_id(oid)
        .await
        .map_err(|e| ApiError::from_lookup(e, "Apartment not found"))?;
    Ok(Json(to_response(apartment)))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<CreateApartmentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if body.rent <= 0.0 {
        return Err(ApiError::BadRequest("Rent must be positive".to_string()));
    }

    let now = DateTime::now();
    let apartment = Apartment {
        id: None,
        apartment_no: body.apartment_no,
        block_name: body.block_name,
        floor_no: body.floor_no,
        rent: body.rent,
        image: body.image,
        status: ApartmentStatus::Available,
        created_at: now,
        updated_at: now,
    };

    let id = state.apartments.base.insert_one(&apartment).await?;
    Ok(Json(serde_json::json!({ "inserted_id": id.to_hex() })))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateApartmentRequest>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let oid = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid apartment ID".to_string()))?;

    let mut set = doc! {};
    if let Some(apartment_no) = body.apartment_no {
        set.insert("apartment_no", apartment_no);
    }
    if let Some(block_name) = body.block_name {
        set.insert("block_name", block_name);
    }
    if let Some(floor_no) = body.floor_no {
        set.insert("floor_no", floor_no);
    }
    if let Some(rent) = body.rent {
        if rent <= 0.0 {
            return Err(ApiError::BadRequest("Rent must be positive".to_string()));
        }
        set.insert("rent", rent);
    }
    if let Some(image) = body.image {
        set.insert("image", image);
    }
    if let Some(status) = body.status {
        let status = bson::to_bson(&status).map_err(|e| ApiError::Internal(e.to_string()))?;
        set.insert("status", status);
    }

    if set.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let outcome = state.apartments.base.set_fields_by_id(oid, set).await?;
    if outcome.matched_count == 0 {
        return Err(ApiError::NotFound("Apartment not found".to_string()));
    }
    Ok(Json(outcome))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let oid = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid apartment ID".to_string()))?;

    let deleted = state.apartments.base.delete_by_id(oid).await?;
    Ok(Json(serde_json::json!({ "deleted_count": deleted })))
}
