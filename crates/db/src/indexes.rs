use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users
    create_indexes(
        db,
        "users",
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index(bson::doc! { "role": 1 }),
        ],
    )
    .await?;

    // Apartments
    create_indexes(db, "apartments", vec![index(bson::doc! { "status": 1 })]).await?;

    // Coupons
    create_indexes(
        db,
        "coupons",
        vec![
            index_unique(bson::doc! { "code": 1 }),
            index(bson::doc! { "status": 1, "expiry_date": 1 }),
        ],
    )
    .await?;

    // Announcements
    create_indexes(
        db,
        "announcements",
        vec![index(bson::doc! { "created_at": -1 })],
    )
    .await?;

    // Agreements
    create_indexes(
        db,
        "agreements",
        vec![
            index(bson::doc! { "user_email": 1, "status": 1 }),
            index(bson::doc! { "apartment_id": 1, "status": 1 }),
        ],
    )
    .await?;

    // Payments
    create_indexes(
        db,
        "payments",
        vec![
            index(bson::doc! { "member_email": 1, "month": 1, "status": 1 }),
            index(bson::doc! { "member_email": 1, "coupon_code": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
