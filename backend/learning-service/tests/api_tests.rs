/// HTTP surface tests
///
/// Every request here is rejected (or answered) before a handler touches
/// the database, so the pool is lazy and points at nothing.
mod common;

use actix_middleware::Role;
use actix_web::{http::StatusCode, test, web, App};
use learning_service::routes;
use serde_json::{json, Value};
use uuid::Uuid;

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(common::lazy_pool()))
                .app_data(web::Data::new(common::test_config()))
                .configure(routes::configure),
        )
        .await
    };
}

async fn error_code(resp: actix_web::dev::ServiceResponse) -> String {
    let body: Value = test::read_body_json(resp).await;
    body["code"].as_str().unwrap_or_default().to_string()
}

#[actix_web::test]
async fn health_does_not_need_database() {
    let app = app!();
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn readiness_reports_unreachable_database() {
    let app = app!();
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/health/ready").to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["ready"], false);
}

#[actix_web::test]
async fn writes_require_authentication() {
    let app = app!();
    let post_id = Uuid::new_v4();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{post_id}/knowledge-points"))
            .set_json(json!({ "points": 10 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(resp).await, "UNAUTHORIZED");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/feed").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn garbage_token_is_rejected_on_protected_route() {
    let app = app!();
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn award_must_be_a_multiple_of_ten() {
    let app = app!();
    let post_id = Uuid::new_v4();

    for points in [0, 5, 15, 110] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/posts/{post_id}/knowledge-points"))
                .insert_header(common::bearer(Uuid::new_v4(), Role::Student))
                .set_json(json!({ "points": points }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "points = {points}");
        assert_eq!(error_code(resp).await, "INVALID_POINTS");
    }
}

#[actix_web::test]
async fn malformed_json_uses_error_envelope() {
    let app = app!();
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{}/knowledge-points", Uuid::new_v4()))
            .insert_header(common::bearer(Uuid::new_v4(), Role::Student))
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{\"points\": ")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "INVALID_JSON");
}

#[actix_web::test]
async fn non_uuid_path_is_rejected() {
    let app = app!();
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/posts/not-a-uuid/knowledge-points")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "INVALID_PATH");
}

#[actix_web::test]
async fn cannot_follow_yourself() {
    let app = app!();
    let me = Uuid::new_v4();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/users/{me}/follow"))
            .insert_header(common::bearer(me, Role::Student))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "CANNOT_FOLLOW_SELF");
}

#[actix_web::test]
async fn cannot_message_yourself() {
    let app = app!();
    let me = Uuid::new_v4();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/messages")
            .insert_header(common::bearer(me, Role::Student))
            .set_json(json!({ "recipient_id": me, "content": "hi me" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "CANNOT_MESSAGE_SELF");
}

#[actix_web::test]
async fn progress_outside_range_is_rejected() {
    let app = app!();

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/courses/{}/progress", Uuid::new_v4()))
            .insert_header(common::bearer(Uuid::new_v4(), Role::Student))
            .set_json(json!({ "progress": 120 }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "INVALID_PROGRESS");
}

#[actix_web::test]
async fn students_cannot_create_courses_or_schools() {
    let app = app!();
    let student = Uuid::new_v4();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/courses")
            .insert_header(common::bearer(student, Role::Student))
            .set_json(json!({ "title": "Intro to Rust" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(resp).await, "FORBIDDEN");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/schools")
            .insert_header(common::bearer(student, Role::Student))
            .set_json(json!({ "name": "Rust Academy" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn registration_rejects_bad_input_before_lookup() {
    let app = app!();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "email": "not-an-email",
                "username": "learner",
                "password": "correct horse battery"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "VALIDATION_ERROR");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "email": "root@example.com",
                "username": "root",
                "password": "correct horse battery",
                "role": "admin"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "INVALID_ROLE");
}

#[actix_web::test]
async fn logout_clears_cookie() {
    let app = app!();
    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/api/auth/logout").to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == actix_middleware::AUTH_COOKIE_NAME)
        .expect("token cookie");
    assert_eq!(cleared.value(), "");
}

#[actix_web::test]
async fn whitespace_only_text_is_rejected() {
    let app = app!();
    let me = Uuid::new_v4();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(common::bearer(me, Role::Student))
            .set_json(json!({ "post_type": "article", "title": "    ", "content": "   " }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "VALIDATION_ERROR");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{}/comments", Uuid::new_v4()))
            .insert_header(common::bearer(me, Role::Student))
            .set_json(json!({ "content": "   " }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "VALIDATION_ERROR");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/messages")
            .insert_header(common::bearer(me, Role::Student))
            .set_json(json!({ "recipient_id": Uuid::new_v4(), "content": "\n\t " }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "VALIDATION_ERROR");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "email": "ab@example.com",
                "username": " ab ",
                "password": "correct horse battery"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "VALIDATION_ERROR");
}
