//! In-memory repositories backing tests and local experiments without MongoDB.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Article, Question, Quiz, QuizSummary, User},
    repositories::{ArticleRepository, QuestionRepository, QuizRepository, UserRepository},
};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn remove(&self, id: &str) -> Option<User> {
        self.users.write().await.remove(id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::Conflict(format!(
                "Quiz with id '{}' already exists",
                quiz.id
            )));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }

    async fn list_summaries(&self) -> AppResult<Vec<QuizSummary>> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<QuizSummary> = quizzes.values().map(Quiz::summary).collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn find_all(&self) -> AppResult<Vec<Quiz>> {
        Ok(self.quizzes.read().await.values().cloned().collect())
    }

    async fn update_details(
        &self,
        id: &str,
        title: &str,
        description: &str,
    ) -> AppResult<Option<Quiz>> {
        let mut quizzes = self.quizzes.write().await;
        Ok(quizzes.get_mut(id).map(|quiz| {
            quiz.title = title.to_string();
            quiz.description = description.to_string();
            quiz.updated_at = Utc::now();
            quiz.clone()
        }))
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.quizzes.write().await.remove(id).is_some())
    }

    async fn push_question(&self, quiz_id: &str, question_id: &str) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        Ok(quizzes
            .get_mut(quiz_id)
            .map(|quiz| {
                quiz.question_ids.push(question_id.to_string());
                quiz.updated_at = Utc::now();
            })
            .is_some())
    }

    async fn pull_question(&self, quiz_id: &str, question_id: &str) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        Ok(quizzes
            .get_mut(quiz_id)
            .map(|quiz| {
                quiz.question_ids.retain(|id| id != question_id);
                quiz.updated_at = Utc::now();
            })
            .is_some())
    }

    async fn set_question_ids(&self, quiz_id: &str, question_ids: Vec<String>) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        Ok(quizzes
            .get_mut(quiz_id)
            .map(|quiz| {
                quiz.question_ids = question_ids;
                quiz.updated_at = Utc::now();
            })
            .is_some())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuestionRepository {
    questions: Arc<RwLock<HashMap<String, Question>>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        questions.insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        Ok(self.questions.read().await.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;
        Ok(ids.iter().filter_map(|id| questions.get(id).cloned()).collect())
    }

    async fn find_all(&self) -> AppResult<Vec<Question>> {
        Ok(self.questions.read().await.values().cloned().collect())
    }

    async fn update(&self, question: Question) -> AppResult<bool> {
        let mut questions = self.questions.write().await;
        match questions.get_mut(&question.id) {
            Some(existing) => {
                *existing = question;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.questions.write().await.remove(id).is_some())
    }

    async fn delete_for_quiz(&self, quiz_id: &str, ids: &[String]) -> AppResult<u64> {
        let mut questions = self.questions.write().await;
        let before = questions.len();
        questions.retain(|id, q| q.quiz_id != quiz_id && !ids.contains(id));
        Ok((before - questions.len()) as u64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryArticleRepository {
    articles: Arc<RwLock<HashMap<String, Article>>>,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn create(&self, article: Article) -> AppResult<Article> {
        let mut articles = self.articles.write().await;
        articles.insert(article.id.clone(), article.clone());
        Ok(article)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Article>> {
        Ok(self.articles.read().await.get(id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Article>> {
        let articles = self.articles.read().await;
        let mut items: Vec<Article> = articles.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn update(&self, article: Article) -> AppResult<bool> {
        let mut articles = self.articles.write().await;
        match articles.get_mut(&article.id) {
            Some(existing) => {
                *existing = article;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.articles.write().await.remove(id).is_some())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}
