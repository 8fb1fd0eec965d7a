use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::Identity,
    errors::{AppError, AppResult},
    models::{
        domain::Article,
        dto::{
            request::{CreateArticleRequest, UpdateArticleRequest},
            response::ArticleDto,
        },
    },
    repositories::ArticleRepository,
};

pub struct ArticleService {
    articles: Arc<dyn ArticleRepository>,
}

impl ArticleService {
    pub fn new(articles: Arc<dyn ArticleRepository>) -> Self {
        Self { articles }
    }

    pub async fn list_articles(&self) -> AppResult<Vec<ArticleDto>> {
        let articles = self.articles.list().await?;
        Ok(articles.into_iter().map(ArticleDto::from).collect())
    }

    pub async fn get_article(&self, id: &str) -> AppResult<ArticleDto> {
        Ok(self.find_article(id).await?.into())
    }

    pub async fn create_article(
        &self,
        request: CreateArticleRequest,
        author: &Identity,
    ) -> AppResult<ArticleDto> {
        request.validate()?;

        let article = Article::new(request.title.trim(), &request.body, &author.id);
        let article = self.articles.create(article).await?;

        log::info!("{} published article {}", author.username, article.id);
        Ok(article.into())
    }

    pub async fn update_article(
        &self,
        id: &str,
        request: UpdateArticleRequest,
    ) -> AppResult<ArticleDto> {
        request.validate()?;

        let mut article = self.find_article(id).await?;
        if let Some(title) = request.title {
            article.title = title.trim().to_string();
        }
        if let Some(body) = request.body {
            article.body = body;
        }
        article.touch();

        if !self.articles.update(article.clone()).await? {
            return Err(article_not_found());
        }
        Ok(article.into())
    }

    pub async fn delete_article(&self, id: &str) -> AppResult<()> {
        if !self.articles.delete(id).await? {
            return Err(article_not_found());
        }
        log::info!("Deleted article {}", id);
        Ok(())
    }

    async fn find_article(&self, id: &str) -> AppResult<Article> {
        self.articles
            .find_by_id(id)
            .await?
            .ok_or_else(article_not_found)
    }
}

fn article_not_found() -> AppError {
    AppError::NotFound("Article not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::article_repository::MockArticleRepository;

    fn admin() -> Identity {
        Identity {
            id: "admin-1".to_string(),
            username: "admin".to_string(),
            is_admin: true,
        }
    }

    #[actix_web::test]
    async fn test_create_article_records_author() {
        let mut articles = MockArticleRepository::new();
        articles
            .expect_create()
            .withf(|article| article.author_id == "admin-1")
            .returning(Ok);

        let service = ArticleService::new(Arc::new(articles));
        let article = service
            .create_article(
                CreateArticleRequest {
                    title: " Welcome ".to_string(),
                    body: "Hello".to_string(),
                },
                &admin(),
            )
            .await
            .unwrap();

        assert_eq!(article.title, "Welcome");
        assert_eq!(article.author, "admin-1");
    }

    #[actix_web::test]
    async fn test_create_article_requires_body() {
        let mut articles = MockArticleRepository::new();
        articles.expect_create().never();

        let service = ArticleService::new(Arc::new(articles));
        let result = service
            .create_article(
                CreateArticleRequest {
                    title: "Title".to_string(),
                    body: "".to_string(),
                },
                &admin(),
            )
            .await;

        match result {
            Err(AppError::ValidationError(errors)) => assert_eq!(errors[0].field, "body"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_delete_missing_article() {
        let mut articles = MockArticleRepository::new();
        articles.expect_delete().returning(|_| Ok(false));

        let service = ArticleService::new(Arc::new(articles));
        assert!(matches!(
            service.delete_article("nope").await,
            Err(AppError::NotFound(_))
        ));
    }
}
