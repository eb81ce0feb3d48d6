use crate::fixtures::test_app::TestApp;
use homehaven_db::models::Role;
use serde_json::Value;

async fn member_with_agreement(app: &TestApp) -> (crate::fixtures::seed::SeededUser, String) {
    let admin = app.seed_admin("admin@test.com").await;
    let member = app.seed_user("member@test.com", Role::User).await;
    let apartment_id = app.seed_apartment("A-101", 1200.0).await;
    let agreement_id = app
        .seed_accepted_agreement(&member, &admin, apartment_id)
        .await;
    (member, agreement_id)
}

fn payment_body(agreement_id: &str, month: &str, amount: f64) -> Value {
    serde_json::json!({
        "member_email": "member@test.com",
        "agreement_id": agreement_id,
        "month": month,
        "amount": amount,
        "coupon_code": null,
    })
}

#[tokio::test]
async fn completed_payment_updates_the_agreement() {
    let app = TestApp::spawn().await;
    let (member, agreement_id) = member_with_agreement(&app).await;

    let resp = app
        .auth_post("/payments", &member.token)
        .json(&payment_body(&agreement_id, "2026-08", 1200.0))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "completed");
    assert_eq!(json["month"], "2026-08");

    let doc = app
        .db
        .collection::<bson::Document>("agreements")
        .find_one(bson::doc! { "_id": bson::oid::ObjectId::parse_str(&agreement_id).unwrap() })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.get_str("last_payment_month").unwrap(), "2026-08");
}

#[tokio::test]
async fn second_payment_for_the_same_month_conflicts() {
    let app = TestApp::spawn().await;
    let (member, agreement_id) = member_with_agreement(&app).await;

    let resp = app
        .auth_post("/payments", &member.token)
        .json(&payment_body(&agreement_id, "2026-08", 1200.0))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .auth_post("/payments", &member.token)
        .json(&payment_body(&agreement_id, "2026-08", 1200.0))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Payment for this month already exists");

    // The next month is fine.
    let resp = app
        .auth_post("/payments", &member.token)
        .json(&payment_body(&agreement_id, "2026-09", 1200.0))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
}

#[tokio::test]
async fn malformed_month_and_amount_are_rejected() {
    let app = TestApp::spawn().await;
    let (member, agreement_id) = member_with_agreement(&app).await;

    let resp = app
        .auth_post("/payments", &member.token)
        .json(&payment_body(&agreement_id, "August 2026", 1200.0))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let resp = app
        .auth_post("/payments", &member.token)
        .json(&payment_body(&agreement_id, "2026-08", 0.0))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn paying_for_another_member_is_forbidden() {
    let app = TestApp::spawn().await;
    let (_, agreement_id) = member_with_agreement(&app).await;
    let outsider = app.seed_user("outsider@test.com", Role::Member).await;

    let resp = app
        .auth_post("/payments", &outsider.token)
        .json(&payment_body(&agreement_id, "2026-08", 1200.0))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn payment_request_stays_pending_and_blocks_repeats() {
    let app = TestApp::spawn().await;
    let (member, agreement_id) = member_with_agreement(&app).await;

    let resp = app
        .auth_post("/payments/request", &member.token)
        .json(&payment_body(&agreement_id, "2026-08", 1200.0))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "pending");

    let resp = app
        .auth_post("/payments/request", &member.token)
        .json(&payment_body(&agreement_id, "2026-08", 1200.0))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Pending payment already exists for this month");
}

#[tokio::test]
async fn payment_request_requires_an_agreement_id() {
    let app = TestApp::spawn().await;
    let (member, _) = member_with_agreement(&app).await;

    let resp = app
        .auth_post("/payments/request", &member.token)
        .json(&serde_json::json!({
            "member_email": "member@test.com",
            "agreement_id": null,
            "month": "2026-08",
            "amount": 1200.0,
            "coupon_code": null,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Missing agreement ID");
}

#[tokio::test]
async fn payment_history_is_self_or_admin_only() {
    let app = TestApp::spawn().await;
    let (member, agreement_id) = member_with_agreement(&app).await;

    for month in ["2026-07", "2026-08"] {
        let resp = app
            .auth_post("/payments", &member.token)
            .json(&payment_body(&agreement_id, month, 1200.0))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 201);
    }

    let resp = app
        .auth_get("/payments/user/member@test.com", &member.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let list: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(list.len(), 2);

    // The month filter narrows the history.
    let resp = app
        .auth_get("/payments/user/member@test.com?month=2026-07", &member.token)
        .send()
        .await
        .unwrap();
    let list: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["month"], "2026-07");

    let outsider = app.seed_user("outsider@test.com", Role::Member).await;
    let resp = app
        .auth_get("/payments/user/member@test.com", &outsider.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn listing_all_payments_requires_admin() {
    let app = TestApp::spawn().await;
    let (member, agreement_id) = member_with_agreement(&app).await;

    let resp = app
        .auth_post("/payments", &member.token)
        .json(&payment_body(&agreement_id, "2026-08", 1200.0))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .auth_get("/payments", &member.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    let admin = app.seed_user("viewer@test.com", Role::Admin).await;
    let resp = app.auth_get("/payments", &admin.token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let list: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(list.len(), 1);
}
