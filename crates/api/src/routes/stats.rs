use axum::{Json, extract::State};
use bson::doc;
use serde::Serialize;

use crate::{error::ApiError, extractors::AdminUser, state::AppState};

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub users: u64,
    pub members: u64,
    pub apartments: u64,
    pub available_apartments: u64,
    pub payments: u64,
    pub revenue: f64,
}

/// Dashboard aggregate. The queries are independent read-only counts, so
/// they fan out concurrently.
pub async fn admin_stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<AdminStats>, ApiError> {
    let (users, members, apartments, available_apartments, payments, revenue) = tokio::try_join!(
        state.users.base.estimated_count(),
        state.users.base.count(doc! { "role": "member" }),
        state.apartments.base.estimated_count(),
        state.apartments.base.count(doc! { "status": "available" }),
        state.payments.base.estimated_count(),
        state.payments.total_revenue(),
    )?;

    Ok(Json(AdminStats {
        users,
        members,
        apartments,
        available_apartments,
        payments,
        revenue,
    }))
}
