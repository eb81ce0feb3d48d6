use bson::DateTime;
use chrono::NaiveDate;
use mongodb::Database;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::models::{Apartment, ApartmentStatus, Coupon, CouponStatus};

const APARTMENTS_JSON: &str = include_str!("../data/apartments.json");
const COUPONS_JSON: &str = include_str!("../data/coupons.json");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("Invalid seed fixture: {0}")]
    Fixture(#[from] serde_json::Error),
    #[error("Invalid seed date: {0}")]
    Date(String),
}

#[derive(Debug, Deserialize)]
struct ApartmentFixture {
    apartment_no: String,
    block_name: String,
    floor_no: i32,
    rent: f64,
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CouponFixture {
    code: String,
    discount: f64,
    description: Option<String>,
    min_amount: Option<f64>,
    expiry_date: String,
    #[serde(default)]
    reusable: bool,
}

/// Seeds apartments and coupons from the bundled fixtures when the
/// collections are empty. Idempotent across restarts.
pub async fn seed_if_empty(db: &Database) -> Result<(), SeedError> {
    let apartments = db.collection::<Apartment>(Apartment::COLLECTION);
    if apartments.estimated_document_count().await? == 0 {
        let fixtures: Vec<ApartmentFixture> = serde_json::from_str(APARTMENTS_JSON)?;
        let now = DateTime::now();
        let docs: Vec<Apartment> = fixtures
            .into_iter()
            .map(|f| Apartment {
                id: None,
                apartment_no: f.apartment_no,
                block_name: f.block_name,
                floor_no: f.floor_no,
                rent: f.rent,
                image: f.image,
                status: ApartmentStatus::Available,
                created_at: now,
                updated_at: now,
            })
            .collect();
        apartments.insert_many(&docs).await?;
        info!(count = docs.len(), "Apartments seeded");
    }

    let coupons = db.collection::<Coupon>(Coupon::COLLECTION);
    if coupons.estimated_document_count().await? == 0 {
        let fixtures: Vec<CouponFixture> = serde_json::from_str(COUPONS_JSON)?;
        let now = DateTime::now();
        let docs = fixtures
            .into_iter()
            .map(|f| {
                let expiry = parse_expiry(&f.expiry_date)?;
                Ok(Coupon {
                    id: None,
                    code: f.code,
                    discount: f.discount,
                    description: f.description,
                    min_amount: f.min_amount,
                    expiry_date: expiry,
                    status: CouponStatus::Active,
                    reusable: f.reusable,
                    created_at: now,
                    updated_at: now,
                })
            })
            .collect::<Result<Vec<Coupon>, SeedError>>()?;
        coupons.insert_many(&docs).await?;
        info!(count = docs.len(), "Coupons seeded");
    }

    Ok(())
}

fn parse_expiry(date: &str) -> Result<DateTime, SeedError> {
    let naive = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| SeedError::Date(format!("{date}: {e}")))?;
    let midnight = naive
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| SeedError::Date(date.to_string()))?;
    Ok(DateTime::from_millis(midnight.and_utc().timestamp_millis()))
}
