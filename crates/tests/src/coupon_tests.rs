use bson::DateTime;
use chrono::{Duration, Utc};

use crate::fixtures::test_app::TestApp;
use homehaven_db::models::{CouponStatus, Role};
use serde_json::Value;

fn days_from_now(days: i64) -> DateTime {
    DateTime::from_chrono(Utc::now() + Duration::days(days))
}

#[tokio::test]
async fn admin_creates_coupon_and_duplicate_code_conflicts() {
    let app = TestApp::spawn().await;
    let admin = app.seed_admin("admin@test.com").await;

    let body = serde_json::json!({
        "code": "SPRING15",
        "discount": 15.0,
        "expiry_date": "2030-03-31",
    });

    let resp = app
        .auth_post("/coupons", &admin.token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert!(json["inserted_id"].is_string());

    let resp = app
        .auth_post("/coupons", &admin.token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
}

#[tokio::test]
async fn coupon_creation_requires_admin() {
    let app = TestApp::spawn().await;
    let member = app.seed_user("member@test.com", Role::Member).await;

    let resp = app
        .auth_post("/coupons", &member.token)
        .json(&serde_json::json!({
            "code": "NOPE",
            "discount": 5.0,
            "expiry_date": "2030-01-01",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn apply_valid_coupon_returns_terms_without_consuming() {
    let app = TestApp::spawn().await;
    let member = app.seed_user("member@test.com", Role::Member).await;
    app.seed_coupon("SAVE10", CouponStatus::Active, days_from_now(30), false)
        .await;

    for _ in 0..2 {
        // Dry validation: applying twice without a payment in between
        // succeeds both times.
        let resp = app
            .auth_post("/coupons/apply", &member.token)
            .json(&serde_json::json!({ "code": "SAVE10" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["discount"], 10.0);
    }
}

#[tokio::test]
async fn apply_unknown_coupon_is_not_found() {
    let app = TestApp::spawn().await;
    let member = app.seed_user("member@test.com", Role::Member).await;

    let resp = app
        .auth_post("/coupons/apply", &member.token)
        .json(&serde_json::json!({ "code": "MISSING" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn apply_expired_coupon_flips_status_once() {
    let app = TestApp::spawn().await;
    let member = app.seed_user("member@test.com", Role::Member).await;
    let id = app
        .seed_coupon("OLD10", CouponStatus::Active, days_from_now(-1), false)
        .await;

    for _ in 0..2 {
        // Idempotent: the second application still reports expired.
        let resp = app
            .auth_post("/coupons/apply", &member.token)
            .json(&serde_json::json!({ "code": "OLD10" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 409);
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["message"], "Coupon has expired");
    }

    let doc = app
        .db
        .collection::<bson::Document>("coupons")
        .find_one(bson::doc! { "_id": id })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.get_str("status").unwrap(), "expired");
}

#[tokio::test]
async fn single_use_coupon_rejected_after_payment() {
    let app = TestApp::spawn().await;
    let admin = app.seed_admin("admin@test.com").await;
    let member = app.seed_user("member@test.com", Role::Member).await;
    app.seed_coupon("ONCE10", CouponStatus::Active, days_from_now(30), false)
        .await;
    let apartment_id = app.seed_apartment("A-101", 1200.0).await;
    let agreement_id = app
        .seed_accepted_agreement(&member, &admin, apartment_id)
        .await;

    // Record a payment that consumed the coupon.
    let resp = app
        .auth_post("/payments", &member.token)
        .json(&serde_json::json!({
            "member_email": "member@test.com",
            "agreement_id": agreement_id,
            "month": "2026-08",
            "amount": 1080.0,
            "coupon_code": "ONCE10",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .auth_post("/coupons/apply", &member.token)
        .json(&serde_json::json!({ "code": "ONCE10" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Coupon has already been used");

    // A different member is unaffected.
    let other = app.seed_user("other@test.com", Role::Member).await;
    let resp = app
        .auth_post("/coupons/apply", &other.token)
        .json(&serde_json::json!({ "code": "ONCE10" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn inactive_coupon_is_rejected() {
    let app = TestApp::spawn().await;
    let member = app.seed_user("member@test.com", Role::Member).await;
    app.seed_coupon("PAUSED", CouponStatus::Inactive, days_from_now(30), false)
        .await;

    let resp = app
        .auth_post("/coupons/apply", &member.token)
        .json(&serde_json::json!({ "code": "PAUSED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Coupon is not active");
}

#[tokio::test]
async fn patch_rejects_unknown_fields() {
    let app = TestApp::spawn().await;
    let admin = app.seed_admin("admin@test.com").await;
    let id = app
        .seed_coupon("EDITME", CouponStatus::Active, days_from_now(30), false)
        .await;

    // `status` is not patchable here; it has its own endpoint.
    let resp = app
        .auth_patch(&format!("/coupons/{}", id.to_hex()), &admin.token)
        .json(&serde_json::json!({ "status": "inactive" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);

    let resp = app
        .auth_patch(&format!("/coupons/{}", id.to_hex()), &admin.token)
        .json(&serde_json::json!({ "discount": 20.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn status_endpoint_validates_enum() {
    let app = TestApp::spawn().await;
    let admin = app.seed_admin("admin@test.com").await;
    let id = app
        .seed_coupon("TOGGLE", CouponStatus::Active, days_from_now(30), false)
        .await;

    let resp = app
        .auth_patch(&format!("/coupons/{}/status", id.to_hex()), &admin.token)
        .json(&serde_json::json!({ "status": "inactive" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_patch(&format!("/coupons/{}/status", id.to_hex()), &admin.token)
        .json(&serde_json::json!({ "status": "bogus" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn listing_coupons_requires_a_token() {
    let app = TestApp::spawn().await;
    let user = app.seed_user("plain@test.com", Role::User).await;
    app.seed_coupon("VISIBLE", CouponStatus::Active, days_from_now(30), true)
        .await;

    let resp = app.client.get(app.url("/coupons")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let resp = app.auth_get("/coupons", &user.token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let coupons: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(coupons.len(), 1);
}
