use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Question};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, question: Question) -> AppResult<Question>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>>;
    /// Unordered; callers restore quiz order themselves.
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>>;
    async fn find_all(&self) -> AppResult<Vec<Question>>;
    async fn update(&self, question: Question) -> AppResult<bool>;
    async fn delete(&self, id: &str) -> AppResult<bool>;
    /// Deletes questions listed by the quiz as well as any whose back-reference
    /// points at it. Returns the number removed.
    async fn delete_for_quiz(&self, quiz_id: &str, ids: &[String]) -> AppResult<u64>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuestionRepository {
    collection: Collection<Question>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("questions");
        Self { collection }
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        self.collection.insert_one(&question).await?;
        Ok(question)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        let question = self.collection.find_one(doc! { "id": id }).await?;
        Ok(question)
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .collection
            .find(doc! { "id": { "$in": ids.to_vec() } })
            .await?;
        let questions: Vec<Question> = cursor.try_collect().await?;
        Ok(questions)
    }

    async fn find_all(&self) -> AppResult<Vec<Question>> {
        let cursor = self.collection.find(doc! {}).await?;
        let questions: Vec<Question> = cursor.try_collect().await?;
        Ok(questions)
    }

    async fn update(&self, question: Question) -> AppResult<bool> {
        let result = self
            .collection
            .replace_one(doc! { "id": &question.id }, &question)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_for_quiz(&self, quiz_id: &str, ids: &[String]) -> AppResult<u64> {
        let filter = doc! {
            "$or": [
                { "quiz_id": quiz_id },
                { "id": { "$in": ids.to_vec() } },
            ]
        };
        let result = self.collection.delete_many(filter).await?;
        Ok(result.deleted_count)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for questions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let quiz_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1 })
            .options(IndexOptions::builder().name("quiz_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(quiz_index).await?;

        log::info!("Successfully created indexes for questions collection");
        Ok(())
    }
}
