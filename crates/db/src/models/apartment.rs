use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Apartment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub apartment_no: String,
    pub block_name: String,
    pub floor_no: i32,
    pub rent: f64,
    pub image: Option<String>,
    #[serde(default)]
    pub status: ApartmentStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApartmentStatus {
    #[default]
    Available,
    Booked,
}

impl Apartment {
    pub const COLLECTION: &'static str = "apartments";
}
