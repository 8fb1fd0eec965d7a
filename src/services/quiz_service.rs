use std::{collections::HashMap, sync::Arc};

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::Quiz,
        dto::{
            request::{CreateQuizRequest, UpdateQuizRequest},
            response::{QuizDetailDto, QuizDto, QuizSummaryDto},
        },
    },
    repositories::{QuestionRepository, QuizRepository},
};

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl QuizService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self { quizzes, questions }
    }

    pub async fn list_quizzes(&self) -> AppResult<Vec<QuizSummaryDto>> {
        let summaries = self.quizzes.list_summaries().await?;
        Ok(summaries.into_iter().map(QuizSummaryDto::from).collect())
    }

    /// The quiz with its questions in the quiz's own order. Ids whose question
    /// record is missing are skipped.
    pub async fn get_quiz(&self, id: &str) -> AppResult<QuizDetailDto> {
        let quiz = self.find_quiz(id).await?;

        let mut by_id: HashMap<String, _> = self
            .questions
            .find_by_ids(&quiz.question_ids)
            .await?
            .into_iter()
            .map(|q| (q.id.clone(), q))
            .collect();

        let questions = quiz
            .question_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();

        Ok(QuizDetailDto::new(quiz, questions))
    }

    pub async fn create_quiz(&self, request: CreateQuizRequest) -> AppResult<QuizDto> {
        request.validate()?;

        let quiz = Quiz::new(
            request.title.trim(),
            request.description.as_deref().unwrap_or_default().trim(),
        );
        let quiz = self.quizzes.create(quiz).await?;

        log::info!("Created quiz '{}' ({})", quiz.title, quiz.id);
        Ok(quiz.into())
    }

    pub async fn update_quiz(&self, id: &str, request: UpdateQuizRequest) -> AppResult<QuizDto> {
        request.validate()?;

        let existing = self.find_quiz(id).await?;
        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .unwrap_or(existing.title.as_str());
        let description = request
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or(existing.description.as_str());

        let quiz = self
            .quizzes
            .update_details(id, title, description)
            .await?
            .ok_or_else(|| quiz_not_found(id))?;

        log::info!("Updated quiz {}", quiz.id);
        Ok(quiz.into())
    }

    /// Deletes the quiz and every question that belongs to it.
    pub async fn delete_quiz(&self, id: &str) -> AppResult<()> {
        let quiz = self.find_quiz(id).await?;

        let removed = self
            .questions
            .delete_for_quiz(&quiz.id, &quiz.question_ids)
            .await?;

        if !self.quizzes.delete(&quiz.id).await? {
            return Err(quiz_not_found(id));
        }

        log::info!("Deleted quiz {} and {} question(s)", quiz.id, removed);
        Ok(())
    }

    async fn find_quiz(&self, id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(id)
            .await?
            .ok_or_else(|| quiz_not_found(id))
    }
}

fn quiz_not_found(id: &str) -> AppError {
    log::debug!("Quiz {} not found", id);
    AppError::NotFound("Quiz not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::Question,
        repositories::{
            question_repository::MockQuestionRepository, quiz_repository::MockQuizRepository,
        },
    };

    fn question(quiz_id: &str, text: &str) -> Question {
        Question::new(quiz_id, text, vec!["a".into(), "b".into()], 0)
    }

    #[actix_web::test]
    async fn test_get_quiz_restores_question_order() {
        let mut quiz = Quiz::new("Ordering", "");
        let first = question(&quiz.id, "first");
        let second = question(&quiz.id, "second");
        quiz.question_ids = vec![first.id.clone(), "missing".to_string(), second.id.clone()];

        let mut quizzes = MockQuizRepository::new();
        let stored = quiz.clone();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let mut questions = MockQuestionRepository::new();
        let (a, b) = (first.clone(), second.clone());
        // Store returns them in the opposite order.
        questions
            .expect_find_by_ids()
            .returning(move |_| Ok(vec![b.clone(), a.clone()]));

        let service = QuizService::new(Arc::new(quizzes), Arc::new(questions));
        let detail = service.get_quiz(&quiz.id).await.unwrap();

        let texts: Vec<_> = detail.questions.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[actix_web::test]
    async fn test_get_missing_quiz() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(|_| Ok(None));

        let service = QuizService::new(Arc::new(quizzes), Arc::new(MockQuestionRepository::new()));
        let result = service.get_quiz("nope").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn test_create_quiz_requires_title() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_create().never();

        let service = QuizService::new(Arc::new(quizzes), Arc::new(MockQuestionRepository::new()));
        let result = service
            .create_quiz(CreateQuizRequest {
                title: "   ".to_string(),
                description: None,
            })
            .await;

        match result {
            Err(AppError::ValidationError(errors)) => assert_eq!(errors[0].field, "title"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_update_keeps_absent_fields() {
        let quiz = Quiz::new("Old title", "Kept description");

        let mut quizzes = MockQuizRepository::new();
        let stored = quiz.clone();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        let base = quiz.clone();
        quizzes
            .expect_update_details()
            .withf(|_, title, description| title == "New title" && description == "Kept description")
            .returning(move |_, title, description| {
                let mut updated = base.clone();
                updated.title = title.to_string();
                updated.description = description.to_string();
                Ok(Some(updated))
            });

        let service = QuizService::new(Arc::new(quizzes), Arc::new(MockQuestionRepository::new()));
        let updated = service
            .update_quiz(
                &quiz.id,
                UpdateQuizRequest {
                    title: Some("New title".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "New title");
        assert_eq!(updated.description, "Kept description");
    }

    #[actix_web::test]
    async fn test_delete_cascades_to_questions() {
        let mut quiz = Quiz::new("Cascade", "");
        quiz.question_ids = vec!["q1".to_string(), "q2".to_string()];

        let mut quizzes = MockQuizRepository::new();
        let stored = quiz.clone();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        quizzes.expect_delete().times(1).returning(|_| Ok(true));

        let mut questions = MockQuestionRepository::new();
        let quiz_id = quiz.id.clone();
        questions
            .expect_delete_for_quiz()
            .withf(move |id, ids| id == quiz_id && ids.len() == 2)
            .times(1)
            .returning(|_, _| Ok(2));

        let service = QuizService::new(Arc::new(quizzes), Arc::new(questions));
        service.delete_quiz(&quiz.id).await.unwrap();
    }
}
