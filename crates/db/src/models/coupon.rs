use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub code: String,
    /// Percent discount applied to the monthly rent.
    pub discount: f64,
    pub description: Option<String>,
    pub min_amount: Option<f64>,
    pub expiry_date: DateTime,
    #[serde(default)]
    pub status: CouponStatus,
    #[serde(default)]
    pub reusable: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    #[default]
    Active,
    Inactive,
    Expired,
}

impl Coupon {
    pub const COLLECTION: &'static str = "coupons";
}
