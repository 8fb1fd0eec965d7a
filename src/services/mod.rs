pub mod article_service;
pub mod auth_service;
pub mod integrity_service;
pub mod question_service;
pub mod quiz_service;
pub mod seed_service;

pub use article_service::ArticleService;
pub use auth_service::AuthService;
pub use integrity_service::{IntegrityService, ReconcileReport};
pub use question_service::QuestionService;
pub use quiz_service::QuizService;
