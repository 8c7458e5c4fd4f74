
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::Value;

use portfolio_admin::routes::configure_routes;
use test_utils::*;

fn create_request(cookie: &Cookie<'static>, id: &str) -> test::TestRequest {
    MultipartBuilder::new()
        .text("id", id)
        .text("title", "Acme Dashboard")
        .text("description", "Internal metrics dashboard")
        .text("tech", r#"["Rust","SQLite"]"#)
        .text("status", "in-progress")
        .build(
            test::TestRequest::post()
                .uri("/api/projects")
                .cookie(cookie.clone()),
        )
}

#[actix_rt::test]
async fn health_endpoint_reports_ok() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[actix_rt::test]
async fn listing_is_public_and_initially_empty() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/projects").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!([]));
}

#[actix_rt::test]
async fn create_requires_authentication() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let req = MultipartBuilder::new()
        .text("id", "acme")
        .text("title", "Acme")
        .text("description", "Desc")
        .build(test::TestRequest::post().uri("/api/projects"));

    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn created_project_is_shaped_on_read() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let login =
        test::call_service(&app, login_request(ADMIN_USERNAME, ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let resp = test::call_service(&app, create_request(&cookie, "acme").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Project created successfully");
    assert_eq!(body["project"]["id"], "acme");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/projects/acme").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let project: Value = test::read_body_json(resp).await;
    assert_eq!(project["id"], "acme");
    assert_eq!(project["title"], "Acme Dashboard");
    assert_eq!(project["tech"], serde_json::json!(["Rust", "SQLite"]));
    assert_eq!(project["features"], serde_json::json!([]));
    assert_eq!(project["results"], serde_json::json!([]));
    assert_eq!(project["testimonial"], Value::Null);
    assert_eq!(project["status"], "in-progress");
    assert_eq!(project["images"], serde_json::json!({}));
}

#[actix_rt::test]
async fn duplicate_project_id_is_a_bad_request() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let login =
        test::call_service(&app, login_request(ADMIN_USERNAME, ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let first = test::call_service(&app, create_request(&cookie, "acme").to_request()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = test::call_service(&app, create_request(&cookie, "acme").to_request()).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["error"], "Project ID already exists");
}

#[actix_rt::test]
async fn traversal_shaped_project_id_is_rejected() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let login =
        test::call_service(&app, login_request(ADMIN_USERNAME, ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let req = MultipartBuilder::new()
        .text("id", "..")
        .text("title", "Evil")
        .text("description", "Desc")
        .build(
            test::TestRequest::post()
                .uri("/api/projects")
                .cookie(cookie),
        );

    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn executable_upload_is_unsupported_media_type() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let login =
        test::call_service(&app, login_request(ADMIN_USERNAME, ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let req = MultipartBuilder::new()
        .text("id", "acme")
        .text("title", "Acme")
        .text("description", "Desc")
        .file("cardImage", "payload.exe", "application/octet-stream", b"MZ\x90\x00")
        .build(
            test::TestRequest::post()
                .uri("/api/projects")
                .cookie(cookie),
        );

    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    // Validation failures must not leave a project behind.
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/projects/acme").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn oversize_image_is_payload_too_large() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let login =
        test::call_service(&app, login_request(ADMIN_USERNAME, ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let req = MultipartBuilder::new()
        .text("id", "acme")
        .text("title", "Acme")
        .text("description", "Desc")
        .file(
            "cardImage",
            "huge.png",
            "image/png",
            &png_bytes(11 * 1024 * 1024),
        )
        .build(
            test::TestRequest::post()
                .uri("/api/projects")
                .cookie(cookie),
        );

    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[actix_rt::test]
async fn gallery_upload_above_cap_is_rejected() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let login =
        test::call_service(&app, login_request(ADMIN_USERNAME, ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let mut builder = MultipartBuilder::new()
        .text("id", "acme")
        .text("title", "Acme")
        .text("description", "Desc");
    for i in 0..11 {
        builder = builder.file(
            "galleryImages",
            &format!("g{i}.png"),
            "image/png",
            &png_bytes(64),
        );
    }
    let req = builder.build(
        test::TestRequest::post()
            .uri("/api/projects")
            .cookie(cookie),
    );

    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn uploaded_image_is_registered_and_served() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let login =
        test::call_service(&app, login_request(ADMIN_USERNAME, ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let req = MultipartBuilder::new()
        .text("id", "acme")
        .text("title", "Acme")
        .text("description", "Desc")
        .file(
            "cardImage",
            "card.png",
            "image/png",
            &png_bytes(9 * 1024 * 1024),
        )
        .build(
            test::TestRequest::post()
                .uri("/api/projects")
                .cookie(cookie),
        );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/projects/acme").to_request(),
    )
    .await;
    let project: Value = test::read_body_json(resp).await;
    let card = &project["images"]["card"][0];
    assert_eq!(card["original_filename"], "card.png");
    let url = card["url"].as_str().expect("image url");
    assert!(url.starts_with("/uploads/acme/"));

    let resp =
        test::call_service(&app, test::TestRequest::get().uri(url).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").map(|v| v.as_bytes()),
        Some(b"image/png".as_ref())
    );
    let body = test::read_body(resp).await;
    assert_eq!(body.len(), 9 * 1024 * 1024);
}

#[actix_rt::test]
async fn newest_card_image_wins_after_replacement() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let login =
        test::call_service(&app, login_request(ADMIN_USERNAME, ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let req = MultipartBuilder::new()
        .text("id", "acme")
        .text("title", "Acme")
        .text("description", "Desc")
        .file("cardImage", "card-old.png", "image/png", &png_bytes(256))
        .build(
            test::TestRequest::post()
                .uri("/api/projects")
                .cookie(cookie.clone()),
        );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = MultipartBuilder::new()
        .text("title", "Acme")
        .text("description", "Desc")
        .file("cardImage", "card-new.png", "image/png", &png_bytes(256))
        .build(
            test::TestRequest::put()
                .uri("/api/projects/acme")
                .cookie(cookie),
        );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Both rows stay in the store; the most recent upload is index 0.
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/projects/acme").to_request(),
    )
    .await;
    let project: Value = test::read_body_json(resp).await;
    let cards = project["images"]["card"].as_array().expect("card images");
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["original_filename"], "card-new.png");
    assert_eq!(cards[1]["original_filename"], "card-old.png");

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/api/projects").to_request()).await;
    let listing: Value = test::read_body_json(resp).await;
    assert_eq!(
        listing[0]["images"]["card"][0]["original_filename"],
        "card-new.png"
    );
}

#[actix_rt::test]
async fn traversal_in_upload_path_is_not_found() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/uploads/%2e%2e/%2e%2e/etc-passwd")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn update_replaces_fields_and_refreshes_timestamp() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let login =
        test::call_service(&app, login_request(ADMIN_USERNAME, ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let resp = test::call_service(&app, create_request(&cookie, "acme").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/projects/acme").to_request(),
    )
    .await;
    let before: Value = test::read_body_json(resp).await;

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let req = MultipartBuilder::new()
        .text("title", "Acme Dashboard v2")
        .text("description", "Rebuilt dashboard")
        .text("status", "live")
        .build(
            test::TestRequest::put()
                .uri("/api/projects/acme")
                .cookie(cookie),
        );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Project updated successfully");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/projects/acme").to_request(),
    )
    .await;
    let after: Value = test::read_body_json(resp).await;
    assert_eq!(after["title"], "Acme Dashboard v2");
    assert_eq!(after["status"], "live");
    // Update is a full replacement; fields omitted from the form are cleared.
    assert_eq!(after["tech"], serde_json::json!([]));
    assert_ne!(after["updated_at"], before["updated_at"]);
    assert_eq!(after["created_at"], before["created_at"]);
}

#[actix_rt::test]
async fn updating_missing_project_is_not_found() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let login =
        test::call_service(&app, login_request(ADMIN_USERNAME, ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let req = MultipartBuilder::new()
        .text("title", "Ghost")
        .text("description", "Desc")
        .build(
            test::TestRequest::put()
                .uri("/api/projects/ghost")
                .cookie(cookie),
        );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Project not found");
}

#[actix_rt::test]
async fn deleting_an_image_removes_row_and_file() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let login =
        test::call_service(&app, login_request(ADMIN_USERNAME, ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let req = MultipartBuilder::new()
        .text("id", "acme")
        .text("title", "Acme")
        .text("description", "Desc")
        .file("cardImage", "card.png", "image/png", &png_bytes(256))
        .build(
            test::TestRequest::post()
                .uri("/api/projects")
                .cookie(cookie.clone()),
        );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/projects/acme").to_request(),
    )
    .await;
    let project: Value = test::read_body_json(resp).await;
    let image_id = project["images"]["card"][0]["id"].as_i64().expect("image id");
    let url = project["images"]["card"][0]["url"]
        .as_str()
        .expect("image url")
        .to_string();

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/projects/acme/images/{image_id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Image deleted successfully");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/projects/acme").to_request(),
    )
    .await;
    let project: Value = test::read_body_json(resp).await;
    assert_eq!(project["images"], serde_json::json!({}));

    let resp = test::call_service(&app, test::TestRequest::get().uri(&url).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn deleting_a_project_removes_it_and_its_uploads() {
    let state = test_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let login =
        test::call_service(&app, login_request(ADMIN_USERNAME, ADMIN_PASSWORD).to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let req = MultipartBuilder::new()
        .text("id", "acme")
        .text("title", "Acme")
        .text("description", "Desc")
        .file("cardImage", "card.png", "image/png", &png_bytes(256))
        .build(
            test::TestRequest::post()
                .uri("/api/projects")
                .cookie(cookie.clone()),
        );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/projects/acme").to_request(),
    )
    .await;
    let project: Value = test::read_body_json(resp).await;
    let url = project["images"]["card"][0]["url"]
        .as_str()
        .expect("image url")
        .to_string();

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/projects/acme")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/projects/acme").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Project not found");

    let resp = test::call_service(&app, test::TestRequest::get().uri(&url).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
