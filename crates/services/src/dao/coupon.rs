use bson::{doc, oid::ObjectId};
use mongodb::Database;

use homehaven_db::models::{Coupon, CouponStatus};

use super::base::{BaseDao, DaoResult, UpdateOutcome};

pub struct CouponDao {
    pub base: BaseDao<Coupon>,
}

impl CouponDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Coupon::COLLECTION),
        }
    }

    pub async fn find_all(&self) -> DaoResult<Vec<Coupon>> {
        self.base.find_many(doc! {}, Some(doc! { "created_at": -1 })).await
    }

    pub async fn find_by_code(&self, code: &str) -> DaoResult<Option<Coupon>> {
        self.base.find_one(doc! { "code": code }).await
    }

    pub async fn set_status(
        &self,
        id: ObjectId,
        status: CouponStatus,
    ) -> DaoResult<UpdateOutcome> {
        let status = bson::to_bson(&status).map_err(bson::ser::Error::from)?;
        self.base.set_fields_by_id(id, doc! { "status": status }).await
    }

    /// Persists the expired flag once a stale expiry date is observed.
    /// Filtering on the current status keeps repeat calls idempotent.
    pub async fn mark_expired(&self, id: ObjectId) -> DaoResult<UpdateOutcome> {
        let expired = bson::to_bson(&CouponStatus::Expired).map_err(bson::ser::Error::from)?;
        let active = bson::to_bson(&CouponStatus::Active).map_err(bson::ser::Error::from)?;
        self.base
            .set_fields(doc! { "_id": id, "status": active }, doc! { "status": expired })
            .await
    }
}
