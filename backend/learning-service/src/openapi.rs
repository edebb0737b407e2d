/// OpenAPI documentation for the Learning Service
use crate::models::{
    AuthResponse, AwardPointsRequest, AwardPointsResponse, Comment, ConversationSummary, Course,
    CreateCommentRequest, CreateCourseRequest, CreateDebateRequest, CreateMentorshipRequest,
    CreatePostRequest, CreateQuizRequest, CreateSchoolRequest, CreateTagRequest,
    CreateTutorRequest, CreateWebinarRequest, Debate, Enrollment, EnrollmentWithCourse,
    KnowledgePointAward, KnowledgePointsSummary, LoginRequest, Mentorship, Message, Notification,
    PollResults, PollVoteRequest, Post, Quiz, QuizAttempt, ReactRequest, Reaction,
    ReactionSummary, RegisterRequest, School, SendMessageRequest, SubmitQuizRequest, Tag, Tutor,
    UpdateCommentRequest, UpdateCourseRequest, UpdateDebateRequest, UpdateMentorshipRequest,
    UpdatePostRequest, UpdateProfileRequest, UpdateProgressRequest, UpdateQuizRequest,
    UpdateSchoolRequest, UpdateTutorRequest, UpdateWebinarRequest, User, UserProfile, Webinar,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Learning Service API",
        version = "1.0.0",
        description = "Social learning platform: posts with knowledge-point awards, comments, reactions and tags, follows and direct messages, schools, courses and enrollments, mentor and tutor listings, quizzes, webinars and debates.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "auth", description = "Registration, login and session cookie"),
        (name = "users", description = "Profiles, search and follows"),
        (name = "posts", description = "Posts, polls, saved posts and the follow feed"),
        (name = "knowledge-points", description = "Capped per-user point awards on posts"),
        (name = "comments", description = "Threaded comments on posts"),
        (name = "reactions", description = "One reaction per user per post"),
        (name = "tags", description = "Tag catalog and trending tags"),
        (name = "messages", description = "Direct messages between users"),
        (name = "notifications", description = "Activity notifications"),
        (name = "courses", description = "Schools, courses and enrollments"),
        (name = "listings", description = "Mentor and tutor marketplace"),
        (name = "activities", description = "Quizzes, webinars and debates"),
    ),
    components(schemas(
        RegisterRequest, LoginRequest, AuthResponse, User, UserProfile, UpdateProfileRequest,
        Post, CreatePostRequest, UpdatePostRequest, PollVoteRequest, PollResults,
        AwardPointsRequest, AwardPointsResponse, KnowledgePointAward, KnowledgePointsSummary,
        Comment, CreateCommentRequest, UpdateCommentRequest,
        Reaction, ReactRequest, ReactionSummary, Tag, CreateTagRequest,
        Message, SendMessageRequest, ConversationSummary, Notification,
        School, CreateSchoolRequest, UpdateSchoolRequest,
        Course, CreateCourseRequest, UpdateCourseRequest, Enrollment, EnrollmentWithCourse,
        UpdateProgressRequest,
        Mentorship, CreateMentorshipRequest, UpdateMentorshipRequest,
        Tutor, CreateTutorRequest, UpdateTutorRequest,
        Quiz, CreateQuizRequest, UpdateQuizRequest, SubmitQuizRequest, QuizAttempt,
        Webinar, CreateWebinarRequest, UpdateWebinarRequest,
        Debate, CreateDebateRequest, UpdateDebateRequest,
    )),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /api/auth/login, also accepted as the `token` cookie"))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/openapi.json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_registers_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("AwardPointsRequest"));
        assert!(components.schemas.contains_key("Course"));
    }
}
