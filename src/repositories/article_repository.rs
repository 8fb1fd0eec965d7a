use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Article};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn create(&self, article: Article) -> AppResult<Article>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Article>>;
    /// Newest first.
    async fn list(&self) -> AppResult<Vec<Article>>;
    async fn update(&self, article: Article) -> AppResult<bool>;
    async fn delete(&self, id: &str) -> AppResult<bool>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoArticleRepository {
    collection: Collection<Article>,
}

impl MongoArticleRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("articles");
        Self { collection }
    }
}

#[async_trait]
impl ArticleRepository for MongoArticleRepository {
    async fn create(&self, article: Article) -> AppResult<Article> {
        self.collection.insert_one(&article).await?;
        Ok(article)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Article>> {
        let article = self.collection.find_one(doc! { "id": id }).await?;
        Ok(article)
    }

    async fn list(&self) -> AppResult<Vec<Article>> {
        let cursor = self.collection.find(doc! {}).await?;
        let mut articles: Vec<Article> = cursor.try_collect().await?;
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(articles)
    }

    async fn update(&self, article: Article) -> AppResult<bool> {
        let result = self
            .collection
            .replace_one(doc! { "id": &article.id }, &article)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
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
        log::info!("Created unique index on articles.id");
        Ok(())
    }
}
