use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;

use homehaven_db::models::{Role, User};

use super::base::{BaseDao, DaoError, DaoResult, UpdateOutcome};

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    /// First-sign-in upsert: inserts the user if the email is new, otherwise
    /// leaves the existing document untouched and returns `None`.
    pub async fn upsert_by_email(
        &self,
        email: String,
        name: Option<String>,
    ) -> DaoResult<Option<ObjectId>> {
        if self.base.find_one(doc! { "email": &email }).await?.is_some() {
            return Ok(None);
        }

        let now = DateTime::now();
        let user = User {
            id: None,
            email,
            name,
            role: Role::User,
            apartment_id: None,
            created_at: now,
            updated_at: now,
        };

        match self.base.insert_one(&user).await {
            Ok(id) => Ok(Some(id)),
            // Lost a race with a concurrent first sign-in; treat as existing.
            Err(DaoError::DuplicateKey(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<User> {
        self.base
            .find_one(doc! { "email": email })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_all(&self) -> DaoResult<Vec<User>> {
        self.base.find_many(doc! {}, Some(doc! { "created_at": 1 })).await
    }

    pub async fn set_role(&self, id: ObjectId, role: Role) -> DaoResult<UpdateOutcome> {
        self.base
            .set_fields_by_id(id, doc! { "role": role.as_str() })
            .await
    }

    /// Promotion on agreement acceptance: member role plus apartment link.
    pub async fn set_membership(
        &self,
        email: &str,
        apartment_id: ObjectId,
    ) -> DaoResult<UpdateOutcome> {
        self.base
            .set_fields(
                doc! { "email": email },
                doc! { "role": Role::Member.as_str(), "apartment_id": apartment_id },
            )
            .await
    }

    /// Reverts a member back to a plain user and unlinks the apartment.
    pub async fn clear_membership(&self, email: &str) -> DaoResult<UpdateOutcome> {
        self.base
            .set_fields(
                doc! { "email": email },
                doc! { "role": Role::User.as_str(), "apartment_id": null },
            )
            .await
    }
}
