/// Route table for the `/api` surface
///
/// Every route sits behind `JwtAuthMiddleware::optional()`: a valid token
/// attaches an `AuthUser`, and handlers that take `AuthUser` (rather than
/// `Option<AuthUser>`) reject anonymous callers with 401.
use crate::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::handlers::{
    activities, auth, comments, courses, health, knowledge_points, listings, messages,
    notifications, posts, reactions, schools, tags, users,
};
use actix_middleware::JwtAuthMiddleware;
use actix_web::web;

/// 1 MiB; post bodies are text only.
const JSON_LIMIT: usize = 1024 * 1024;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(json_error_handler),
    )
    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
    .app_data(web::PathConfig::default().error_handler(path_error_handler))
    .route("/api/health", web::get().to(health::health))
    .route("/api/health/ready", web::get().to(health::readiness))
    .service(
        web::scope("/api")
            .wrap(JwtAuthMiddleware::optional())
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::post().to(auth::logout))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list_users))
                    .service(
                        web::resource("/{user_id}")
                            .route(web::get().to(users::get_user))
                            .route(web::put().to(users::update_user)),
                    )
                    .service(
                        web::resource("/{user_id}/follow")
                            .route(web::post().to(users::follow_user))
                            .route(web::delete().to(users::unfollow_user)),
                    )
                    .route("/{user_id}/followers", web::get().to(users::list_followers))
                    .route("/{user_id}/following", web::get().to(users::list_following)),
            )
            .route("/feed", web::get().to(posts::get_feed))
            .route("/saved-posts", web::get().to(posts::list_saved))
            .service(
                web::scope("/posts")
                    .service(
                        web::resource("")
                            .route(web::get().to(posts::list_posts))
                            .route(web::post().to(posts::create_post)),
                    )
                    .service(
                        web::resource("/{post_id}")
                            .route(web::get().to(posts::get_post))
                            .route(web::put().to(posts::update_post))
                            .route(web::delete().to(posts::delete_post)),
                    )
                    .route("/{post_id}/vote", web::post().to(posts::vote))
                    .route("/{post_id}/poll", web::get().to(posts::poll_results))
                    .service(
                        web::resource("/{post_id}/save")
                            .route(web::post().to(posts::save_post))
                            .route(web::delete().to(posts::unsave_post)),
                    )
                    .service(
                        web::resource("/{post_id}/comments")
                            .route(web::get().to(comments::list_comments))
                            .route(web::post().to(comments::create_comment)),
                    )
                    .service(
                        web::resource("/{post_id}/reactions")
                            .route(web::get().to(reactions::reaction_summary))
                            .route(web::post().to(reactions::react))
                            .route(web::delete().to(reactions::remove_reaction)),
                    )
                    .service(
                        web::resource("/{post_id}/knowledge-points")
                            .route(web::get().to(knowledge_points::points_summary))
                            .route(web::post().to(knowledge_points::award_points)),
                    ),
            )
            .service(
                web::resource("/comments/{comment_id}")
                    .route(web::put().to(comments::update_comment))
                    .route(web::delete().to(comments::delete_comment)),
            )
            .service(
                web::scope("/tags")
                    .service(
                        web::resource("")
                            .route(web::get().to(tags::list_tags))
                            .route(web::post().to(tags::create_tag)),
                    )
                    .route("/trending", web::get().to(tags::trending_tags))
                    .route("/{name}/posts", web::get().to(tags::posts_by_tag)),
            )
            .service(
                web::scope("/messages")
                    .route("", web::post().to(messages::send_message))
                    .route("/conversations", web::get().to(messages::list_conversations))
                    .route("/with/{user_id}", web::get().to(messages::get_conversation))
                    .route(
                        "/with/{user_id}/read",
                        web::put().to(messages::mark_conversation_read),
                    )
                    .route("/{message_id}/read", web::put().to(messages::mark_read)),
            )
            .service(
                web::scope("/notifications")
                    .route("", web::get().to(notifications::list_notifications))
                    .route("/read-all", web::put().to(notifications::mark_all_read))
                    .route("/{notification_id}/read", web::put().to(notifications::mark_read)),
            )
            .service(
                web::scope("/schools")
                    .service(
                        web::resource("")
                            .route(web::get().to(schools::list_schools))
                            .route(web::post().to(schools::create_school)),
                    )
                    .service(
                        web::resource("/{school_id}")
                            .route(web::get().to(schools::get_school))
                            .route(web::put().to(schools::update_school))
                            .route(web::delete().to(schools::delete_school)),
                    ),
            )
            .route("/enrollments", web::get().to(courses::my_enrollments))
            .service(
                web::scope("/courses")
                    .service(
                        web::resource("")
                            .route(web::get().to(courses::list_courses))
                            .route(web::post().to(courses::create_course)),
                    )
                    .service(
                        web::resource("/{course_id}")
                            .route(web::get().to(courses::get_course))
                            .route(web::put().to(courses::update_course))
                            .route(web::delete().to(courses::delete_course)),
                    )
                    .service(
                        web::resource("/{course_id}/enroll")
                            .route(web::post().to(courses::enroll))
                            .route(web::delete().to(courses::unenroll)),
                    )
                    .route("/{course_id}/progress", web::put().to(courses::update_progress)),
            )
            .service(
                web::scope("/mentorships")
                    .service(
                        web::resource("")
                            .route(web::get().to(listings::list_mentorships))
                            .route(web::post().to(listings::create_mentorship)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(listings::get_mentorship))
                            .route(web::put().to(listings::update_mentorship))
                            .route(web::delete().to(listings::delete_mentorship)),
                    ),
            )
            .service(
                web::scope("/tutors")
                    .service(
                        web::resource("")
                            .route(web::get().to(listings::list_tutors))
                            .route(web::post().to(listings::create_tutor)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(listings::get_tutor))
                            .route(web::put().to(listings::update_tutor))
                            .route(web::delete().to(listings::delete_tutor)),
                    ),
            )
            .service(
                web::scope("/quizzes")
                    .service(
                        web::resource("")
                            .route(web::get().to(activities::list_quizzes))
                            .route(web::post().to(activities::create_quiz)),
                    )
                    .service(
                        web::resource("/{quiz_id}")
                            .route(web::get().to(activities::get_quiz))
                            .route(web::put().to(activities::update_quiz))
                            .route(web::delete().to(activities::delete_quiz)),
                    )
                    .service(
                        web::resource("/{quiz_id}/attempts")
                            .route(web::get().to(activities::my_attempts))
                            .route(web::post().to(activities::submit_attempt)),
                    ),
            )
            .service(
                web::scope("/webinars")
                    .service(
                        web::resource("")
                            .route(web::get().to(activities::list_webinars))
                            .route(web::post().to(activities::create_webinar)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(activities::get_webinar))
                            .route(web::put().to(activities::update_webinar))
                            .route(web::delete().to(activities::delete_webinar)),
                    ),
            )
            .service(
                web::scope("/debates")
                    .service(
                        web::resource("")
                            .route(web::get().to(activities::list_debates))
                            .route(web::post().to(activities::create_debate)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(activities::get_debate))
                            .route(web::put().to(activities::update_debate))
                            .route(web::delete().to(activities::delete_debate)),
                    ),
            ),
    );
}
