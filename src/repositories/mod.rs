pub mod article_repository;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod question_repository;
pub mod quiz_repository;
pub mod user_repository;

pub use article_repository::{ArticleRepository, MongoArticleRepository};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
