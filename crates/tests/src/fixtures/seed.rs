use bson::{DateTime, oid::ObjectId};
use serde_json::Value;

use homehaven_db::models::{
    Apartment, ApartmentStatus, Coupon, CouponStatus, Role, User,
};

use super::test_app::TestApp;

/// A seeded user with a freshly issued token.
pub struct SeededUser {
    pub id: ObjectId,
    pub email: String,
    pub token: String,
}

impl TestApp {
    /// Insert a user with the given role directly and issue a token via
    /// `POST /jwt`.
    pub async fn seed_user(&self, email: &str, role: Role) -> SeededUser {
        let now = DateTime::now();
        let user = User {
            id: None,
            email: email.to_string(),
            name: Some(email.split('@').next().unwrap_or("user").to_string()),
            role,
            apartment_id: None,
            created_at: now,
            updated_at: now,
        };
        let result = self
            .db
            .collection::<User>(User::COLLECTION)
            .insert_one(&user)
            .await
            .expect("Failed to seed user");
        let id = result.inserted_id.as_object_id().unwrap();

        let resp = self
            .client
            .post(self.url("/jwt"))
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .expect("Token request failed");
        assert_eq!(resp.status().as_u16(), 200, "Token issue should succeed");
        let json: Value = resp.json().await.unwrap();
        let token = json["token"].as_str().expect("token in response").to_string();

        SeededUser {
            id,
            email: email.to_string(),
            token,
        }
    }

    pub async fn seed_admin(&self, email: &str) -> SeededUser {
        self.seed_user(email, Role::Admin).await
    }

    pub async fn seed_apartment(&self, apartment_no: &str, rent: f64) -> ObjectId {
        let now = DateTime::now();
        let apartment = Apartment {
            id: None,
            apartment_no: apartment_no.to_string(),
            block_name: "A".to_string(),
            floor_no: 1,
            rent,
            image: None,
            status: ApartmentStatus::Available,
            created_at: now,
            updated_at: now,
        };
        self.db
            .collection::<Apartment>(Apartment::COLLECTION)
            .insert_one(&apartment)
            .await
            .expect("Failed to seed apartment")
            .inserted_id
            .as_object_id()
            .unwrap()
    }

    pub async fn seed_coupon(
        &self,
        code: &str,
        status: CouponStatus,
        expiry: DateTime,
        reusable: bool,
    ) -> ObjectId {
        let now = DateTime::now();
        let coupon = Coupon {
            id: None,
            code: code.to_string(),
            discount: 10.0,
            description: None,
            min_amount: None,
            expiry_date: expiry,
            status,
            reusable,
            created_at: now,
            updated_at: now,
        };
        self.db
            .collection::<Coupon>(Coupon::COLLECTION)
            .insert_one(&coupon)
            .await
            .expect("Failed to seed coupon")
            .inserted_id
            .as_object_id()
            .unwrap()
    }

    /// Full path from request to accepted agreement: the user requests the
    /// apartment and an admin accepts it. Returns the agreement id (hex).
    pub async fn seed_accepted_agreement(
        &self,
        user: &SeededUser,
        admin: &SeededUser,
        apartment_id: ObjectId,
    ) -> String {
        let resp = self
            .auth_post("/agreements", &user.token)
            .json(&serde_json::json!({ "apartment_id": apartment_id.to_hex() }))
            .send()
            .await
            .expect("Agreement request failed");
        assert_eq!(resp.status().as_u16(), 200);
        let json: Value = resp.json().await.unwrap();
        let agreement_id = json["id"].as_str().unwrap().to_string();

        let resp = self
            .auth_patch(&format!("/agreements/{agreement_id}"), &admin.token)
            .json(&serde_json::json!({ "status": "accepted" }))
            .send()
            .await
            .expect("Agreement accept failed");
        assert_eq!(resp.status().as_u16(), 200);

        agreement_id
    }
}
