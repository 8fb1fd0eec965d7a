pub mod article;
pub mod question;
pub mod quiz;
pub mod user;

pub use article::Article;
pub use question::Question;
pub use quiz::{Quiz, QuizSummary};
pub use user::User;
