use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{Quiz, QuizSummary},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    /// Newest first.
    async fn list_summaries(&self) -> AppResult<Vec<QuizSummary>>;
    async fn find_all(&self) -> AppResult<Vec<Quiz>>;
    /// Sets title and description only, so concurrent question edits are not
    /// clobbered. Returns the updated quiz, or `None` if it does not exist.
    async fn update_details(
        &self,
        id: &str,
        title: &str,
        description: &str,
    ) -> AppResult<Option<Quiz>>;
    async fn delete(&self, id: &str) -> AppResult<bool>;
    /// Appends a question id. Returns false when the quiz does not exist.
    async fn push_question(&self, quiz_id: &str, question_id: &str) -> AppResult<bool>;
    /// Removes a question id. Returns false when the quiz does not exist.
    async fn pull_question(&self, quiz_id: &str, question_id: &str) -> AppResult<bool>;
    async fn set_question_ids(&self, quiz_id: &str, question_ids: Vec<String>) -> AppResult<bool>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quizzes");
        Self { collection }
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn list_summaries(&self) -> AppResult<Vec<QuizSummary>> {
        let cursor = self
            .collection
            .clone_with_type::<QuizSummary>()
            .find(doc! {})
            .projection(doc! { "_id": 0, "id": 1, "title": 1, "description": 1, "created_at": 1 })
            .await?;
        let mut items: Vec<QuizSummary> = cursor.try_collect().await?;

        // Timestamps are stored as RFC 3339 strings, so order on the parsed values.
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn find_all(&self) -> AppResult<Vec<Quiz>> {
        let cursor = self.collection.find(doc! {}).await?;
        let quizzes: Vec<Quiz> = cursor.try_collect().await?;
        Ok(quizzes)
    }

    async fn update_details(
        &self,
        id: &str,
        title: &str,
        description: &str,
    ) -> AppResult<Option<Quiz>> {
        let update = doc! {
            "$set": {
                "title": title,
                "description": description,
                "updated_at": to_bson(&Utc::now())?,
            }
        };

        let quiz = self
            .collection
            .find_one_and_update(doc! { "id": id }, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(quiz)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn push_question(&self, quiz_id: &str, question_id: &str) -> AppResult<bool> {
        let update = doc! {
            "$push": { "question_ids": question_id },
            "$set": { "updated_at": to_bson(&Utc::now())? },
        };
        let result = self
            .collection
            .update_one(doc! { "id": quiz_id }, update)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn pull_question(&self, quiz_id: &str, question_id: &str) -> AppResult<bool> {
        let update = doc! {
            "$pull": { "question_ids": question_id },
            "$set": { "updated_at": to_bson(&Utc::now())? },
        };
        let result = self
            .collection
            .update_one(doc! { "id": quiz_id }, update)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn set_question_ids(&self, quiz_id: &str, question_ids: Vec<String>) -> AppResult<bool> {
        let update = doc! {
            "$set": {
                "question_ids": question_ids,
                "updated_at": to_bson(&Utc::now())?,
            }
        };
        let result = self
            .collection
            .update_one(doc! { "id": quiz_id }, update)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}
