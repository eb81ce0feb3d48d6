use bson::doc;
use mongodb::Database;

use homehaven_db::models::Announcement;

use super::base::{BaseDao, DaoResult};

pub struct AnnouncementDao {
    pub base: BaseDao<Announcement>,
}

impl AnnouncementDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Announcement::COLLECTION),
        }
    }

    pub async fn list_latest(&self) -> DaoResult<Vec<Announcement>> {
        self.base.find_many(doc! {}, Some(doc! { "created_at": -1 })).await
    }
}
