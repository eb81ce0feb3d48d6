use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use homehaven_db::models::{Payment, PaymentStatus, Role};
use homehaven_services::dao::base::DaoError;
use homehaven_services::workflows::{NewPayment, PaymentKind};

use crate::{
    error::ApiError,
    extractors::{AdminUser, AuthUser},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub member_email: String,
    pub agreement_id: Option<String>,
    pub month: String,
    pub amount: f64,
    pub coupon_code: Option<String>,
    pub status: PaymentStatus,
    pub created_at: String,
}

fn to_response(payment: Payment) -> PaymentResponse {
    PaymentResponse {
        id: payment.id.map(|id| id.to_hex()).unwrap_or_default(),
        member_email: payment.member_email,
        agreement_id: payment.agreement_id.map(|id| id.to_hex()),
        month: payment.month,
        amount: payment.amount,
        coupon_code: payment.coupon_code,
        status: payment.status,
        created_at: payment
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    }
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub member_email: String,
    pub agreement_id: Option<String>,
    pub month: String,
    pub amount: f64,
    pub coupon_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthFilter {
    pub month: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let payments = state.payments.find_all().await?;
    Ok(Json(payments.into_iter().map(to_response).collect()))
}

pub async fn by_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(email): Path<String>,
    Query(filter): Query<MonthFilter>,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    if email != auth.email && !is_admin(&state, &auth.email).await? {
        return Err(ApiError::Forbidden("Forbidden access".to_string()));
    }

    let payments = state
        .payments
        .find_by_user(&email, filter.month.as_deref())
        .await?;
    Ok(Json(payments.into_iter().map(to_response).collect()))
}

/// Checkout-confirmed payment, stored completed.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    let new = new_payment(&auth, body, false)?;
    let payment = state.payment_flow.record(new, PaymentKind::Completed).await?;
    Ok((StatusCode::CREATED, Json(to_response(payment))))
}

/// Manual payment request, stored pending until settled by an admin.
pub async fn request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    let new = new_payment(&auth, body, true)?;
    let payment = state.payment_flow.record(new, PaymentKind::Requested).await?;
    Ok((StatusCode::CREATED, Json(to_response(payment))))
}

fn new_payment(
    auth: &AuthUser,
    body: PaymentRequest,
    require_agreement: bool,
) -> Result<NewPayment, ApiError> {
    // Members pay for themselves only.
    if body.member_email != auth.email {
        return Err(ApiError::Forbidden(
            "Payments can only be recorded for your own account".to_string(),
        ));
    }

    let agreement_id = body
        .agreement_id
        .as_deref()
        .map(ObjectId::parse_str)
        .transpose()
        .map_err(|_| ApiError::BadRequest("Invalid agreement ID".to_string()))?;

    if require_agreement && agreement_id.is_none() {
        return Err(ApiError::BadRequest("Missing agreement ID".to_string()));
    }

    Ok(NewPayment {
        member_email: body.member_email,
        agreement_id,
        month: body.month,
        amount: body.amount,
        coupon_code: body.coupon_code,
    })
}

async fn is_admin(state: &AppState, email: &str) -> Result<bool, ApiError> {
    match state.users.find_by_email(email).await {
        Ok(user) => Ok(user.role == Role::Admin),
        Err(DaoError::NotFound) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
