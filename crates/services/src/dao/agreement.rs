use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;

use homehaven_db::models::{Agreement, AgreementStatus};

use super::base::{BaseDao, DaoResult, UpdateOutcome};

pub struct AgreementDao {
    pub base: BaseDao<Agreement>,
}

impl AgreementDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Agreement::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        user_email: String,
        apartment_id: ObjectId,
        rent: f64,
    ) -> DaoResult<Agreement> {
        let now = DateTime::now();
        let agreement = Agreement {
            id: None,
            user_email,
            apartment_id,
            rent,
            status: AgreementStatus::Pending,
            accepted_at: None,
            last_payment_month: None,
            last_payment_date: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&agreement).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_all(&self) -> DaoResult<Vec<Agreement>> {
        self.base.find_many(doc! {}, Some(doc! { "created_at": -1 })).await
    }

    pub async fn find_by_user(&self, email: &str) -> DaoResult<Vec<Agreement>> {
        self.base
            .find_many(doc! { "user_email": email }, Some(doc! { "created_at": -1 }))
            .await
    }

    pub async fn find_pending(&self) -> DaoResult<Vec<Agreement>> {
        let pending = bson::to_bson(&AgreementStatus::Pending).map_err(bson::ser::Error::from)?;
        self.base
            .find_many(doc! { "status": pending }, Some(doc! { "created_at": 1 }))
            .await
    }

    /// An agreement that is pending or accepted. Used to block a second
    /// request from the same user before the first one is resolved.
    pub async fn find_active_for_user(&self, email: &str) -> DaoResult<Option<Agreement>> {
        let rejected = bson::to_bson(&AgreementStatus::Rejected).map_err(bson::ser::Error::from)?;
        self.base
            .find_one(doc! { "user_email": email, "status": { "$ne": rejected } })
            .await
    }

    pub async fn set_status(
        &self,
        id: ObjectId,
        status: AgreementStatus,
    ) -> DaoResult<UpdateOutcome> {
        let status_bson = bson::to_bson(&status).map_err(bson::ser::Error::from)?;
        let mut set = doc! { "status": status_bson };
        if status == AgreementStatus::Accepted {
            set.insert("accepted_at", DateTime::now());
        }
        self.base.set_fields_by_id(id, set).await
    }

    pub async fn set_last_payment(&self, id: ObjectId, month: &str) -> DaoResult<UpdateOutcome> {
        self.base
            .set_fields_by_id(
                id,
                doc! { "last_payment_month": month, "last_payment_date": DateTime::now() },
            )
            .await
    }
}
