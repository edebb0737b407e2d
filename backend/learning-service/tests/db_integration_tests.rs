/// Integration tests against a real PostgreSQL
///
/// Run with:
/// TEST_DATABASE_URL=postgres://... cargo test -p learning-service -- --ignored
mod common;

use actix_middleware::{AuthUser, Role};
use learning_service::db::notification_repo;
use learning_service::models::{AuthResponse, CreateCourseRequest, CreatePostRequest, RegisterRequest};
use learning_service::services::{
    AuthService, CommentService, CourseService, FollowService, KnowledgePointService, PostService,
};
use serde_json::json;
use serial_test::serial;
use sqlx::PgPool;
use uuid::Uuid;

async fn register(pool: &PgPool, role: &str) -> AuthResponse {
    crypto_core::testing::init_test_keys();
    let tag = Uuid::new_v4().simple().to_string();
    let req: RegisterRequest = serde_json::from_value(json!({
        "email": format!("{}@example.com", &tag[..12]),
        "username": format!("u{}", &tag[..12]),
        "password": "correct horse battery",
        "role": role,
    }))
    .expect("register request");

    AuthService::new(pool.clone())
        .register(&req)
        .await
        .expect("register")
}

async fn article_post(pool: &PgPool, author_id: Uuid) -> Uuid {
    let req: CreatePostRequest = serde_json::from_value(json!({
        "post_type": "article",
        "title": "Ownership in one page",
        "content": "Every value has exactly one owner.",
        "tags": ["rust", "ownership"],
    }))
    .expect("post request");

    PostService::new(pool.clone())
        .create_post(author_id, &req)
        .await
        .expect("create post")
        .id
}

#[actix_rt::test]
#[ignore = "Requires PostgreSQL database"]
#[serial]
async fn awards_are_capped_at_one_hundred_per_awarder() {
    let pool = common::migrated_pool().await;
    let author = register(&pool, "student").await;
    let awarder = register(&pool, "mentor").await;
    let post_id = article_post(&pool, author.user.id).await;
    let service = KnowledgePointService::new(pool.clone());

    let first = service.award(post_id, awarder.user.id, 60).await.expect("first award");
    assert_eq!(first.awarded_by_you, 60);
    assert_eq!(first.remaining_budget, 40);

    let err = service.award(post_id, awarder.user.id, 50).await.unwrap_err();
    assert_eq!(err.code(), "POINTS_LIMIT_EXCEEDED");

    let second = service.award(post_id, awarder.user.id, 40).await.expect("top up");
    assert_eq!(second.awarded_by_you, 100);
    assert_eq!(second.post_total, 100);

    let err = service.award(post_id, awarder.user.id, 10).await.unwrap_err();
    assert_eq!(err.code(), "POINTS_LIMIT_EXCEEDED");

    let summary = service.summary(post_id, Some(awarder.user.id)).await.expect("summary");
    assert_eq!(summary.total_points, 100);
    assert_eq!(summary.remaining_budget, Some(0));
}

#[actix_rt::test]
#[ignore = "Requires PostgreSQL database"]
#[serial]
async fn concurrent_awards_never_exceed_budget() {
    let pool = common::migrated_pool().await;
    let author = register(&pool, "student").await;
    let awarder = register(&pool, "tutor").await;
    let post_id = article_post(&pool, author.user.id).await;

    let attempts = (0..8).map(|_| {
        let service = KnowledgePointService::new(pool.clone());
        let awarder_id = awarder.user.id;
        async move { service.award(post_id, awarder_id, 30).await }
    });
    let results = futures::future::join_all(attempts).await;

    let granted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(granted, 3, "only three awards of 30 fit in 100");

    let summary = KnowledgePointService::new(pool.clone())
        .summary(post_id, Some(awarder.user.id))
        .await
        .expect("summary");
    assert_eq!(summary.awarded_by_you, Some(90));
}

#[actix_rt::test]
#[ignore = "Requires PostgreSQL database"]
#[serial]
async fn authors_cannot_award_their_own_posts() {
    let pool = common::migrated_pool().await;
    let author = register(&pool, "student").await;
    let post_id = article_post(&pool, author.user.id).await;

    let err = KnowledgePointService::new(pool.clone())
        .award(post_id, author.user.id, 10)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CANNOT_AWARD_OWN_POST");
}

#[actix_rt::test]
#[ignore = "Requires PostgreSQL database"]
#[serial]
async fn duplicate_enrollment_is_rejected() {
    let pool = common::migrated_pool().await;
    let teacher = register(&pool, "teacher").await;
    let student = register(&pool, "student").await;
    let courses = CourseService::new(pool.clone());

    let req: CreateCourseRequest = serde_json::from_value(json!({
        "title": "Async Rust",
        "max_students": 2,
        "is_published": true,
    }))
    .expect("course request");
    let course = courses
        .create_course(teacher.user.id, &req)
        .await
        .expect("create course");

    courses.enroll(course.id, student.user.id).await.expect("enroll");
    let err = courses.enroll(course.id, student.user.id).await.unwrap_err();
    assert_eq!(err.code(), "ALREADY_ENROLLED");

    let other = register(&pool, "student").await;
    courses.enroll(course.id, other.user.id).await.expect("second seat");
    let late = register(&pool, "student").await;
    let err = courses.enroll(course.id, late.user.id).await.unwrap_err();
    assert_eq!(err.code(), "COURSE_FULL");
}

#[actix_rt::test]
#[ignore = "Requires PostgreSQL database"]
#[serial]
async fn follow_rejects_self_and_duplicates() {
    let pool = common::migrated_pool().await;
    let alice = register(&pool, "student").await;
    let bob = register(&pool, "mentor").await;
    let follows = FollowService::new(pool.clone());

    let err = follows.follow(alice.user.id, alice.user.id).await.unwrap_err();
    assert_eq!(err.code(), "CANNOT_FOLLOW_SELF");

    follows.follow(alice.user.id, bob.user.id).await.expect("follow");
    let err = follows.follow(alice.user.id, bob.user.id).await.unwrap_err();
    assert_eq!(err.code(), "ALREADY_FOLLOWING");

    let followers = follows
        .followers(bob.user.id, Default::default())
        .await
        .expect("followers");
    assert_eq!(followers.total, 1);

    // the rejected duplicate must not leave a second notification behind
    let notified = notification_repo::count_notifications(&pool, bob.user.id, false)
        .await
        .expect("count notifications");
    assert_eq!(notified, 1);
}

#[actix_rt::test]
#[ignore = "Requires PostgreSQL database"]
#[serial]
async fn concurrent_posts_with_shared_tags_all_commit() {
    let pool = common::migrated_pool().await;
    let author = register(&pool, "student").await;
    let salt = &Uuid::new_v4().simple().to_string()[..6];
    let tags: Vec<String> = (0..8).map(|i| format!("shared{i}-{salt}")).collect();

    for round in 0..10 {
        let writes = (0..6).map(|i| {
            let service = PostService::new(pool.clone());
            let mut order = tags.clone();
            if i % 2 == 1 {
                order.reverse();
            }
            let req: CreatePostRequest = serde_json::from_value(json!({
                "post_type": "article",
                "title": format!("round {round} post {i}"),
                "content": "Tags shared across writers.",
                "tags": order,
            }))
            .expect("post request");
            let author_id = author.user.id;
            async move { service.create_post(author_id, &req).await }
        });

        for result in futures::future::join_all(writes).await {
            let post = result.expect("concurrent create must not fail");
            assert_eq!(post.tags.len(), 8);
        }
    }

    let usage: i32 = sqlx::query_scalar("SELECT usage_count FROM tags WHERE name = $1")
        .bind(&tags[0])
        .fetch_one(&pool)
        .await
        .expect("tag row");
    assert_eq!(usage, 60);
}

#[actix_rt::test]
#[ignore = "Requires PostgreSQL database"]
#[serial]
async fn comment_on_deleted_post_cannot_be_deleted() {
    let pool = common::migrated_pool().await;
    let author = register(&pool, "student").await;
    let post_id = article_post(&pool, author.user.id).await;
    let user = AuthUser {
        user_id: author.user.id,
        email: author.user.email.clone(),
        role: Role::Student,
    };

    let comments = CommentService::new(pool.clone());
    let comment = comments
        .create_comment(post_id, author.user.id, None, "First!")
        .await
        .expect("comment");

    PostService::new(pool.clone())
        .delete_post(&user, post_id)
        .await
        .expect("delete post");

    let err = comments.delete_comment(&user, comment.id).await.unwrap_err();
    assert_eq!(err.code(), "POST_NOT_FOUND");
}
