use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agreement {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_email: String,
    pub apartment_id: ObjectId,
    pub rent: f64,
    #[serde(default)]
    pub status: AgreementStatus,
    pub accepted_at: Option<DateTime>,
    pub last_payment_month: Option<String>,
    pub last_payment_date: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgreementStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl Agreement {
    pub const COLLECTION: &'static str = "agreements";
}
