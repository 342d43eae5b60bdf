mod common;

use axum::http::StatusCode;
use common::{award_names, spawn_app};
use serde_json::{Value, json};

fn suggestion(name: &str) -> Value {
    json!({
        "name": name,
        "category": "jibbing",
        "description": "Slide a rail with the nose lifted",
        "technique": "Weight on the tail",
        "video_url": ""
    })
}

#[tokio::test]
async fn approving_a_suggestion_adds_it_to_the_catalog() {
    let app = spawn_app().await;
    let admin = app.admin_key().await;
    let (author, key) = app.register("suggester").await;

    let (status, created) = app
        .post("/api/suggestions/tricks", Some(&key), suggestion("Tail Press"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["data"]["status"], "pending");
    assert_eq!(created["data"]["suggested_by"], author);
    assert!(created["data"]["video_url"].is_null());
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, pending) = app
        .get("/api/suggestions/tricks?status=pending", Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    let pending = pending["data"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["name"], "Tail Press");
    assert_eq!(pending[0]["suggester"]["username"], "suggester");

    let (status, result) = app
        .request(
            "PUT",
            &format!("/api/suggestions/tricks/{id}/moderate"),
            Some(&admin),
            Some(json!({ "status": "approved", "moderation_comment": "Nice one" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["data"]["status"], "approved");
    let trick_id = result["data"]["trick_id"].as_i64().unwrap();

    let (status, trick) = app.get(&format!("/api/tricks/{trick_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trick["data"]["name"], "Tail Press");
    assert_eq!(trick["data"]["category"], "jibbing");

    let (_, mine) = app
        .get(&format!("/api/users/{author}/suggestions"), Some(&key))
        .await;
    assert_eq!(mine["data"][0]["status"], "approved");
    assert_eq!(mine["data"][0]["moderation_comment"], "Nice one");

    let (_, pending) = app
        .get("/api/suggestions/tricks?status=pending", Some(&admin))
        .await;
    assert!(pending["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn moderation_happens_once() {
    let app = spawn_app().await;
    let admin = app.admin_key().await;
    let (_, key) = app.register("once").await;

    let (_, created) = app
        .post("/api/suggestions/tricks", Some(&key), suggestion("Butter 360"))
        .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/suggestions/tricks/{id}/moderate");

    let (status, _) = app
        .request("PUT", &uri, Some(&admin), Some(json!({ "status": "pending" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, result) = app
        .request("PUT", &uri, Some(&admin), Some(json!({ "status": "rejected" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(result["data"]["trick_id"].is_null());

    let (status, _) = app
        .request("PUT", &uri, Some(&admin), Some(json!({ "status": "approved" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(
            "PUT",
            "/api/suggestions/tricks/9999/moderate",
            Some(&admin),
            Some(json!({ "status": "approved" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, tricks) = app.get("/api/tricks", None).await;
    assert!(tricks["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn suggestions_need_a_name_and_category() {
    let app = spawn_app().await;
    let (_, key) = app.register("sloppy").await;

    let (status, _) = app
        .post(
            "/api/suggestions/tricks",
            Some(&key),
            json!({ "name": "  ", "category": "spins" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/suggestions/tricks", None, suggestion("Anonymous"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn only_the_author_or_staff_may_delete() {
    let app = spawn_app().await;
    let admin = app.admin_key().await;
    let (_, author_key) = app.register("author").await;
    let (_, other_key) = app.register("bystander").await;

    let (_, first) = app
        .post("/api/suggestions/tricks", Some(&author_key), suggestion("Nose Roll"))
        .await;
    let (_, second) = app
        .post("/api/suggestions/tricks", Some(&author_key), suggestion("Tail Roll"))
        .await;
    let first = first["data"]["id"].as_i64().unwrap();
    let second = second["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .request(
            "DELETE",
            &format!("/api/suggestions/tricks/{first}"),
            Some(&other_key),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(
            "DELETE",
            &format!("/api/suggestions/tricks/{first}"),
            Some(&author_key),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            "DELETE",
            &format!("/api/suggestions/tricks/{second}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            "DELETE",
            &format!("/api/suggestions/tricks/{first}"),
            Some(&author_key),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn suggesting_unlocks_contributor() {
    let app = spawn_app().await;
    let (author, key) = app.register("helper").await;

    app.post("/api/suggestions/tricks", Some(&key), suggestion("Ollie North"))
        .await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/users/{author}/check-achievements"),
            Some(&key),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(award_names(&body, "data"), vec!["Contributor"]);

    let (_, again) = app
        .request(
            "POST",
            &format!("/api/users/{author}/check-achievements"),
            Some(&key),
            None,
        )
        .await;
    assert!(again["data"].as_array().unwrap().is_empty());
}
