use crate::fixtures::test_app::TestApp;
use homehaven_db::models::Role;
use serde_json::Value;

#[tokio::test]
async fn jwt_for_unknown_user_is_rejected() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/jwt"))
        .json(&serde_json::json!({ "email": "ghost@test.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 404);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "User not found");
}

#[tokio::test]
async fn jwt_reports_stored_role_not_caller_input() {
    let app = TestApp::spawn().await;
    app.seed_user("admin@test.com", Role::Admin).await;

    // The body carries only an email; any role claim is ignored.
    let resp = app
        .client
        .post(app.url("/jwt"))
        .json(&serde_json::json!({ "email": "admin@test.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert!(json["token"].is_string());
    assert_eq!(json["role"], "admin");
}

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/coupons")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn protected_route_with_garbage_token_is_unauthorized() {
    let app = TestApp::spawn().await;

    let resp = app
        .auth_get("/coupons", "definitely.not.a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let app = TestApp::spawn().await;
    app.seed_user("mallory@test.com", Role::User).await;

    let forged = {
        use jsonwebtoken::{EncodingKey, Header, encode};
        let claims = serde_json::json!({
            "sub": "mallory@test.com",
            "email": "mallory@test.com",
            "role": "admin",
            "iat": chrono::Utc::now().timestamp(),
            "exp": chrono::Utc::now().timestamp() + 3600,
            "iss": "homehaven",
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"wrong-secret"),
        )
        .unwrap()
    };

    let resp = app.auth_get("/coupons", &forged).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn stale_admin_claim_in_token_does_not_authorize() {
    let app = TestApp::spawn().await;
    let admin = app.seed_admin("demoted@test.com").await;

    // Demote directly in the database after the token was issued.
    app.db
        .collection::<bson::Document>("users")
        .update_one(
            bson::doc! { "email": "demoted@test.com" },
            bson::doc! { "$set": { "role": "user" } },
        )
        .await
        .unwrap();

    // The token still carries role=admin, but authorization re-reads the
    // users collection.
    let resp = app.auth_get("/users", &admin.token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn health_check_is_public() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
}
