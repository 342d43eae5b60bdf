mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{spawn_app, spawn_app_with_config, temp_root, test_config};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const BOUNDARY: &str = "snowtricks-boundary";

fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(app: &common::TestApp, key: &str, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/upload/image")
        .header("X-Api-Key", key)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn health_reports_database_state() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/system/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["database"], true);
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let app = spawn_app().await;

    let request = Request::builder()
        .uri("/api/tricks")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
}

#[tokio::test]
async fn metrics_require_authentication() {
    let app = spawn_app().await;

    let (status, _) = app.get("/api/metrics", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let key = app.admin_key().await;
    let request = Request::builder()
        .uri("/api/metrics")
        .header("X-Api-Key", key)
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn staff_manage_the_catalog() {
    let app = spawn_app().await;
    let admin = app.admin_key().await;

    let (status, _) = app.get("/api/quiz/random", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let ollie = app.create_trick(&admin, "Ollie", "basics").await;
    app.create_trick(&admin, "Nollie", "basics").await;
    app.create_trick(&admin, "Frontside 180", "spins").await;
    app.create_trick(&admin, "Method", "grabs").await;

    let (status, _) = app
        .post(
            "/api/admin/tricks",
            Some(&admin),
            json!({ "name": "", "category": "basics" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, categories) = app.get("/api/categories", None).await;
    assert_eq!(categories["data"], json!(["basics", "grabs", "spins"]));

    let (_, basics) = app.get("/api/tricks?category=basics", None).await;
    assert_eq!(basics["data"].as_array().unwrap().len(), 2);

    let (status, quiz) = app.get("/api/quiz/random?category=spins", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quiz["data"]["category"], "spins");
    let options = quiz["data"]["options"].as_array().unwrap();
    assert_eq!(options.len(), 4);
    let correct = quiz["data"]["correct_answer_id"].clone();
    assert!(options.iter().any(|o| o["id"] == correct));

    let (status, updated) = app
        .request(
            "PUT",
            &format!("/api/admin/tricks/{ollie}"),
            Some(&admin),
            Some(json!({
                "name": "Ollie",
                "category": "basics",
                "description": "Pop off the tail",
                "video_url": "https://example.com/ollie"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["description"], "Pop off the tail");

    let (status, _) = app
        .request("DELETE", &format!("/api/admin/tricks/{ollie}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/tricks/{ollie}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/api/tricks/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catalog_is_imported_on_first_start() {
    let root = temp_root();
    let catalog = root.join("tricks.json");
    std::fs::write(
        &catalog,
        json!({
            "tricks": [
                { "name": "Ollie", "category": "basics", "description": "Pop" },
                { "name": "Indy", "category": "grabs", "image": "/images/indy.jpg" }
            ]
        })
        .to_string(),
    )
    .unwrap();

    let mut config = test_config(&root);
    config.general.tricks_json_path = Some(catalog.display().to_string());
    let app = spawn_app_with_config(config, root).await;

    let (_, tricks) = app.get("/api/tricks", None).await;
    let tricks = tricks["data"].as_array().unwrap();
    assert_eq!(tricks.len(), 2);
    assert!(tricks.iter().any(|t| t["image_url"] == "/images/indy.jpg"));

    // A second bootstrap leaves a populated catalog alone.
    app.state.shared.bootstrap().await.unwrap();
    let (_, tricks) = app.get("/api/tricks", None).await;
    assert_eq!(tricks["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn uploaded_images_are_stored_and_served() {
    let app = spawn_app().await;
    let (_, key) = app.register("photographer").await;
    let png = b"\x89PNG\r\n\x1a\nnot-really-a-png";

    let (status, body) = upload(&app, &key, multipart_body("file", "jump.png", "image/png", png)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let url = body["data"]["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/images/"));
    assert!(url.ends_with(".png"));
    assert_eq!(body["data"]["size"], png.len());

    let request = Request::builder().uri(&url).body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let served = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&served[..], &png[..]);

    let (status, _) = upload(
        &app,
        &key,
        multipart_body("file", "notes.txt", "text/plain", b"hello"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = upload(
        &app,
        &key,
        multipart_body("other", "jump.png", "image/png", png),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_images_are_rejected() {
    let root = temp_root();
    let mut config = test_config(&root);
    config.uploads.max_image_bytes = 1024;
    let app = spawn_app_with_config(config, root).await;
    let (_, key) = app.register("bigfile").await;

    let big = vec![0_u8; 4096];
    let (status, body) = upload(&app, &key, multipart_body("file", "huge.jpg", "image/jpeg", &big)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
}
