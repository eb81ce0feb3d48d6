use bson::{doc, oid::ObjectId};
use mongodb::Database;

use homehaven_db::models::{Apartment, ApartmentStatus};

use super::base::{BaseDao, DaoResult, UpdateOutcome};

pub struct ApartmentDao {
    pub base: BaseDao<Apartment>,
}

impl ApartmentDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Apartment::COLLECTION),
        }
    }

    pub async fn find_all(&self) -> DaoResult<Vec<Apartment>> {
        self.base
            .find_many(doc! {}, Some(doc! { "block_name": 1, "apartment_no": 1 }))
            .await
    }

    pub async fn set_status(
        &self,
        id: ObjectId,
        status: ApartmentStatus,
    ) -> DaoResult<UpdateOutcome> {
        let status = bson::to_bson(&status).map_err(bson::ser::Error::from)?;
        self.base.set_fields_by_id(id, doc! { "status": status }).await
    }
}
