use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::{doc, oid::ObjectId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use homehaven_db::models::{Coupon, CouponStatus};
use homehaven_services::workflows::CouponTerms;

use crate::{
    error::ApiError,
    extractors::{AdminUser, AuthUser},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct CouponResponse {
    pub id: String,
    pub code: String,
    pub discount: f64,
    pub description: Option<String>,
    pub min_amount: Option<f64>,
    pub expiry_date: String,
    pub status: CouponStatus,
    pub reusable: bool,
}

fn to_response(coupon: Coupon) -> CouponResponse {
    CouponResponse {
        id: coupon.id.map(|id| id.to_hex()).unwrap_or_default(),
        code: coupon.code,
        discount: coupon.discount,
        description: coupon.description,
        min_amount: coupon.min_amount,
        expiry_date: coupon
            .expiry_date
            .try_to_rfc3339_string()
            .unwrap_or_default(),
        status: coupon.status,
        reusable: coupon.reusable,
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCouponRequest {
    pub code: String,
    pub discount: f64,
    pub expiry_date: String,
    pub description: Option<String>,
    pub min_amount: Option<f64>,
    #[serde(default)]
    pub reusable: bool,
}

/// Whitelisted patch fields; unknown keys are rejected at deserialization.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCouponRequest {
    pub code: Option<String>,
    pub discount: Option<f64>,
    pub expiry_date: Option<String>,
    pub description: Option<String>,
    pub min_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCouponStatusRequest {
    pub status: CouponStatus,
}

#[derive(Debug, Deserialize)]
pub struct ApplyCouponRequest {
    pub code: String,
}

fn parse_expiry(raw: &str) -> Result<bson::DateTime, ApiError> {
    // Accept either a full RFC 3339 timestamp or a plain date.
    if let Ok(dt) = bson::DateTime::parse_rfc3339_str(raw) {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest("Invalid expiry date".to_string()))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ApiError::BadRequest("Invalid expiry date".to_string()))?;
    Ok(bson::DateTime::from_millis(
        midnight.and_utc().timestamp_millis(),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<CouponResponse>>, ApiError> {
    let coupons = state.coupons.find_all().await?;
    Ok(Json(coupons.into_iter().map(to_response).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<CouponResponse>, ApiError> {
    let oid = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid coupon ID".to_string()))?;
    let coupon = state
        .coupons
        .base
        .find_by_id(oid)
        .await
        .map_err(|e| ApiError::from_lookup(e, "Coupon not found"))?;
    Ok(Json(to_response(coupon)))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<CreateCouponRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if body.code.is_empty() {
        return Err(ApiError::BadRequest("Coupon code is required".to_string()));
    }
    if body.discount <= 0.0 || body.discount > 100.0 {
        return Err(ApiError::BadRequest(
            "Discount must be a percentage between 0 and 100".to_string(),
        ));
    }
    let expiry_date = parse_expiry(&body.expiry_date)?;

    if state.coupons.find_by_code(&body.code).await?.is_some() {
        return Err(ApiError::Conflict(
            "Coupon code already exists".to_string(),
        ));
    }

    let now = bson::DateTime::now();
    let coupon = Coupon {
        id: None,
        code: body.code,
        discount: body.discount,
        description: body.description,
        min_amount: body.min_amount,
        expiry_date,
        status: CouponStatus::Active,
        reusable: body.reusable,
        created_at: now,
        updated_at: now,
    };

    let id = state.coupons.base.insert_one(&coupon).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "inserted_id": id.to_hex() })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateCouponRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let oid = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid coupon ID".to_string()))?;

    let mut set = doc! {};
    if let Some(code) = body.code {
        set.insert("code", code);
    }
    if let Some(discount) = body.discount {
        if discount <= 0.0 || discount > 100.0 {
            return Err(ApiError::BadRequest(
                "Discount must be a percentage between 0 and 100".to_string(),
            ));
        }
        set.insert("discount", discount);
    }
    if let Some(expiry_date) = body.expiry_date {
        set.insert("expiry_date", parse_expiry(&expiry_date)?);
    }
    if let Some(description) = body.description {
        set.insert("description", description);
    }
    if let Some(min_amount) = body.min_amount {
        set.insert("min_amount", min_amount);
    }

    if set.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let outcome = state.coupons.base.set_fields_by_id(oid, set).await?;
    if outcome.matched_count == 0 {
        return Err(ApiError::NotFound("Coupon not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Coupon updated successfully" })))
}

pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateCouponStatusRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let oid = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid coupon ID".to_string()))?;

    let outcome = state.coupons.set_status(oid, body.status).await?;
    if outcome.matched_count == 0 {
        return Err(ApiError::NotFound("Coupon not found".to_string()));
    }

    Ok(Json(
        serde_json::json!({ "message": "Coupon status updated successfully" }),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let oid = ObjectId::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid coupon ID".to_string()))?;

    let deleted = state.coupons.base.delete_by_id(oid).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Coupon not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Coupon deleted successfully" })))
}

/// Dry validation of a coupon against the caller's payment history.
pub async fn apply(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ApplyCouponRequest>,
) -> Result<Json<CouponTerms>, ApiError> {
    if body.code.is_empty() {
        return Err(ApiError::BadRequest("Coupon code is required".to_string()));
    }

    let terms = state.coupon_flow.apply(&body.code, &auth.email).await?;
    Ok(Json(terms))
}
