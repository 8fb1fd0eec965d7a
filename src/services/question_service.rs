use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{question::check_answer_key, Question},
        dto::{
            request::{CreateQuestionRequest, UpdateQuestionRequest},
            response::QuestionDto,
        },
    },
    repositories::{QuestionRepository, QuizRepository},
};

pub struct QuestionService {
    quizzes: Arc<dyn QuizRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl QuestionService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self { quizzes, questions }
    }

    pub async fn get_question(&self, id: &str) -> AppResult<QuestionDto> {
        Ok(self.find_question(id).await?.into())
    }

    /// Stores the question, then appends it to the quiz. The store offers no
    /// multi-document transaction, so a failed append is compensated by
    /// deleting the new question again; anything the compensation misses is
    /// picked up by the reconciliation pass.
    pub async fn create_question(
        &self,
        quiz_id: &str,
        request: CreateQuestionRequest,
    ) -> AppResult<QuestionDto> {
        request.validate()?;
        check_answer_key(&request.options, request.correct_index)?;

        if self.quizzes.find_by_id(quiz_id).await?.is_none() {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }

        let question = Question::new(
            quiz_id,
            request.text.trim(),
            request.options,
            request.correct_index,
        );
        let question = self.questions.create(question).await?;

        match self.quizzes.push_question(quiz_id, &question.id).await {
            Ok(true) => {
                log::info!("Added question {} to quiz {}", question.id, quiz_id);
                Ok(question.into())
            }
            Ok(false) => {
                self.compensate_create(&question.id).await;
                Err(AppError::NotFound("Quiz not found".to_string()))
            }
            Err(err) => {
                self.compensate_create(&question.id).await;
                Err(err)
            }
        }
    }

    pub async fn update_question(
        &self,
        id: &str,
        request: UpdateQuestionRequest,
    ) -> AppResult<QuestionDto> {
        request.validate()?;

        let mut question = self.find_question(id).await?;
        if let Some(text) = request.text {
            question.text = text.trim().to_string();
        }
        if let Some(options) = request.options {
            question.options = options;
        }
        if let Some(correct_index) = request.correct_index {
            question.correct_index = correct_index;
        }
        question.check_answer_key()?;
        question.touch();

        if !self.questions.update(question.clone()).await? {
            return Err(question_not_found());
        }

        log::info!("Updated question {}", question.id);
        Ok(question.into())
    }

    /// Unlinks the question from its quiz, then deletes it.
    pub async fn delete_question(&self, id: &str) -> AppResult<()> {
        let question = self.find_question(id).await?;

        if !self
            .quizzes
            .pull_question(&question.quiz_id, &question.id)
            .await?
        {
            log::warn!(
                "Question {} referenced missing quiz {}",
                question.id,
                question.quiz_id
            );
        }

        if !self.questions.delete(&question.id).await? {
            return Err(question_not_found());
        }

        log::info!("Deleted question {} from quiz {}", question.id, question.quiz_id);
        Ok(())
    }

    async fn compensate_create(&self, question_id: &str) {
        match self.questions.delete(question_id).await {
            Ok(_) => log::warn!("Rolled back question {} after failed quiz update", question_id),
            Err(err) => log::error!(
                "Could not roll back question {} ({}); reconciliation will remove it",
                question_id,
                err
            ),
        }
    }

    async fn find_question(&self, id: &str) -> AppResult<Question> {
        self.questions
            .find_by_id(id)
            .await?
            .ok_or_else(question_not_found)
    }
}

fn question_not_found() -> AppError {
    AppError::NotFound("Question not found".to_string())
}
