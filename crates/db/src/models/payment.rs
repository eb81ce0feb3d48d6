use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub member_email: String,
    pub agreement_id: Option<ObjectId>,
    /// Billing month, "YYYY-MM".
    pub month: String,
    pub amount: f64,
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub status: PaymentStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
}

impl Payment {
    pub const COLLECTION: &'static str = "payments";
}
