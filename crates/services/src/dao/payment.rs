use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::Database;

use homehaven_db::models::{Payment, PaymentStatus};

use super::base::{BaseDao, DaoResult};

pub struct PaymentDao {
    pub base: BaseDao<Payment>,
}

impl PaymentDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Payment::COLLECTION),
        }
    }

    pub async fn find_all(&self) -> DaoResult<Vec<Payment>> {
        self.base.find_many(doc! {}, Some(doc! { "created_at": -1 })).await
    }

    pub async fn find_by_user(&self, email: &str, month: Option<&str>) -> DaoResult<Vec<Payment>> {
        let mut filter = doc! { "member_email": email };
        if let Some(month) = month {
            filter.insert("month", month);
        }
        self.base.find_many(filter, Some(doc! { "created_at": -1 })).await
    }

    /// Looks up an existing payment for the member's billing month among the
    /// given statuses.
    pub async fn find_for_month(
        &self,
        email: &str,
        month: &str,
        statuses: &[PaymentStatus],
    ) -> DaoResult<Option<Payment>> {
        let statuses = statuses
            .iter()
            .map(|s| bson::to_bson(s).map_err(bson::ser::Error::from))
            .collect::<Result<Vec<_>, _>>()?;
        self.base
            .find_one(doc! {
                "member_email": email,
                "month": month,
                "status": { "$in": statuses },
            })
            .await
    }

    pub async fn has_used_coupon(&self, email: &str, code: &str) -> DaoResult<bool> {
        Ok(self
            .base
            .find_one(doc! { "member_email": email, "coupon_code": code })
            .await?
            .is_some())
    }

    pub async fn insert(&self, payment: &Payment) -> DaoResult<ObjectId> {
        self.base.insert_one(payment).await
    }

    pub async fn total_revenue(&self) -> DaoResult<f64> {
        let pipeline = vec![doc! {
            "$group": {
                "_id": null,
                "total": { "$sum": "$amount" },
            }
        }];

        let mut cursor = self.base.collection().aggregate(pipeline).await?;
        if let Some(doc) = cursor.try_next().await? {
            // $sum yields an int when every amount is integral
            let total = doc
                .get_f64("total")
                .or_else(|_| doc.get_i64("total").map(|v| v as f64))
                .or_else(|_| doc.get_i32("total").map(|v| v as f64))
                .unwrap_or(0.0);
            return Ok(total);
        }
        Ok(0.0)
    }
}
