/// Business logic layer
///
/// Services own the multi-step operations (transactions, invariants,
/// notifications). Plain CRUD handlers call the `db` repositories directly.
pub mod auth;
pub mod comments;
pub mod courses;
pub mod follows;
pub mod knowledge_points;
pub mod posts;
pub mod quizzes;
pub mod reactions;

pub use auth::AuthService;
pub use comments::CommentService;
pub use courses::CourseService;
pub use follows::FollowService;
pub use knowledge_points::KnowledgePointService;
pub use posts::PostService;
pub use quizzes::QuizService;
pub use reactions::ReactionService;
