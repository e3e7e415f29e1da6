//! Integration tests for the user-provisioning workflow

mod common;

use axum::http::StatusCode;
use gym_manager_backend::store::DocumentStore;
use serde_json::json;

#[tokio::test]
async fn provisions_member_end_to_end() {
    let app = common::TestApp::new();
    let gym_id = app.seed_gym("Iron Temple").await;

    let (status, body) = app
        .post(
            "/add-user",
            &json!({
                "name": "Asha",
                "role": "Member",
                "gender": "Female",
                "contact_details": { "email": "asha@example.com", "phone": "+91 9876543210" },
                "active_gym": { "gym_name": "Iron Temple" },
                "date_of_birth": "1995-04-23",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], json!(true));
    assert_eq!(body["message"], json!("User created successfully"));
    let user_id = body["user_id"].as_str().unwrap();
    let password = body["generated_password"].as_str().unwrap();
    assert_eq!(password.len(), 12);

    // Profile stored under the principal id, with the id written back.
    let doc = app.store.get("users", user_id).await.unwrap().unwrap();
    assert_eq!(doc["user_id"], json!(user_id));
    assert_eq!(doc["is_active"], json!(true));

    // The member was linked into the gym's member list.
    let gym = app.store.get("gym", &gym_id).await.unwrap().unwrap();
    assert_eq!(gym["member_list"], json!([user_id]));
}

#[tokio::test]
async fn owner_provisioning_sets_owner_id() {
    let app = common::TestApp::new();
    let gym_id = app.seed_gym("Iron Temple").await;

    let (status, body) = app
        .post(
            "/add-user",
            &json!({
                "name": "Owner",
                "role": "Owner",
                "contact_details": { "email": "owner@example.com" },
                "active_gym": { "gym_name": "Iron Temple" },
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let gym = app.store.get("gym", &gym_id).await.unwrap().unwrap();
    assert_eq!(gym["owner_id"], body["user_id"]);
}

#[tokio::test]
async fn unknown_gym_returns_404_and_leaves_no_orphan_principal() {
    let app = common::TestApp::new();
    app.seed_gym("Iron Temple").await;

    let payload = |gym: &str| {
        json!({
            "name": "Asha",
            "role": "Owner",
            "contact_details": { "email": "asha@example.com" },
            "active_gym": { "gym_name": gym },
        })
    };

    let (status, body) = app.post("/add-user", &payload("Nowhere Gym")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], json!(false));
    assert_eq!(body["error"], json!("NotFound"));
    assert_eq!(
        body["message"],
        json!("No gym found with gym_name='Nowhere Gym' to assign Owner")
    );

    // The identity principal was compensated away: provisioning again with
    // the same email succeeds.
    assert!(!app.identity.has_email("asha@example.com"));
    let (status, _) = app.post("/add-user", &payload("Iron Temple")).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn missing_email_is_bad_request() {
    let app = common::TestApp::new();

    let (status, body) = app.post("/add-user", &json!({ "name": "Asha" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("BadRequest"));
    assert_eq!(body["message"], json!("contact_details.email is required"));
    assert!(app.identity.is_empty());
    assert!(app.store.is_empty("users"));
}

#[tokio::test]
async fn duplicate_email_is_authentication_error() {
    let app = common::TestApp::new();
    app.seed_gym("Iron Temple").await;
    app.seed_member("Asha", "asha@example.com", "Iron Temple")
        .await;

    let (status, body) = app
        .post(
            "/add-user",
            &json!({
                "name": "Asha Again",
                "contact_details": { "email": "asha@example.com" },
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("AuthenticationError"));
    assert_eq!(
        body["message"],
        json!("The email address is already in use by another account.")
    );
}

#[tokio::test]
async fn invalid_payload_is_rejected_before_any_side_effect() {
    let app = common::TestApp::new();

    let (status, body) = app
        .post(
            "/add-user",
            &json!({
                "name": "Asha",
                "role": "Janitor",
                "contact_details": { "email": "asha@example.com" },
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("ValidationError"));
    assert_eq!(body["details"][0]["path"], json!("role"));
    assert!(app.identity.is_empty());
    assert!(app.store.is_empty("users"));
}

#[tokio::test]
async fn two_members_both_join_the_member_list() {
    let app = common::TestApp::new();
    let gym_id = app.seed_gym("Iron Temple").await;

    let first = app
        .seed_member("Asha", "asha@example.com", "Iron Temple")
        .await;
    let second = app
        .seed_member("Bela", "bela@example.com", "Iron Temple")
        .await;

    let gym = app.store.get("gym", &gym_id).await.unwrap().unwrap();
    let members = gym["member_list"].as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert!(members.contains(&json!(first)));
    assert!(members.contains(&json!(second)));
}

#[tokio::test]
async fn admin_role_skips_gym_mutation() {
    let app = common::TestApp::new();
    let gym_id = app.seed_gym("Iron Temple").await;

    let (status, _) = app
        .post(
            "/add-user",
            &json!({
                "name": "Staffer",
                "role": "Admin",
                "contact_details": { "email": "admin@example.com" },
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let gym = app.store.get("gym", &gym_id).await.unwrap().unwrap();
    assert_eq!(gym["member_list"], json!([]));
    assert!(gym.get("owner_id").is_none());
}
