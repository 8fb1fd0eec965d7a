use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{Article, Question, Quiz, QuizSummary, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserDto,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummaryDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<QuizSummary> for QuizSummaryDto {
    fn from(summary: QuizSummary) -> Self {
        QuizSummaryDto {
            id: summary.id,
            title: summary.title,
            description: summary.description,
            created_at: summary.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub question_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Quiz> for QuizDto {
    fn from(quiz: Quiz) -> Self {
        QuizDto {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            question_ids: quiz.question_ids,
            created_at: quiz.created_at,
            updated_at: quiz.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: String,
    pub quiz_id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Question> for QuestionDto {
    fn from(question: Question) -> Self {
        QuestionDto {
            id: question.id,
            quiz_id: question.quiz_id,
            text: question.text,
            options: question.options,
            correct_index: question.correct_index,
            created_at: question.created_at,
            updated_at: question.updated_at,
        }
    }
}

/// A quiz with its questions populated in quiz order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDetailDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<QuestionDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuizDetailDto {
    pub fn new(quiz: Quiz, questions: Vec<Question>) -> Self {
        QuizDetailDto {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            questions: questions.into_iter().map(QuestionDto::from).collect(),
            created_at: quiz.created_at,
            updated_at: quiz.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDto {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Article> for ArticleDto {
    fn from(article: Article) -> Self {
        ArticleDto {
            id: article.id,
            title: article.title,
            body: article.body,
            author: article.author_id,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_dto_hides_password() {
        let user = User::new("johndoe", "$2b$12$secret", true);

        let dto: UserDto = user.into();
        let json = serde_json::to_string(&dto).unwrap();

        assert!(json.contains("\"isAdmin\":true"));
        assert!(!json.contains("secret"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_question_dto_uses_camel_case() {
        let question = Question::new("quiz-1", "2 + 2?", vec!["3".into(), "4".into()], 1);
        let json = serde_json::to_value(QuestionDto::from(question)).unwrap();

        assert_eq!(json["correctIndex"], 1);
        assert_eq!(json["quizId"], "quiz-1");
    }

    #[test]
    fn test_quiz_detail_keeps_question_order() {
        let quiz = Quiz::new("Order", "");
        let first = Question::new(&quiz.id, "first", vec!["a".into(), "b".into()], 0);
        let second = Question::new(&quiz.id, "second", vec!["a".into(), "b".into()], 1);

        let detail = QuizDetailDto::new(quiz, vec![first.clone(), second.clone()]);

        assert_eq!(detail.questions[0].id, first.id);
        assert_eq!(detail.questions[1].id, second.id);
    }
}
