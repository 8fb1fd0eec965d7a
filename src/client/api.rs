use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use crate::{
    client::{
        cache::{EntityCache, ListCache},
        error::{ClientError, ClientResult},
    },
    errors::ErrorResponse,
    models::dto::{
        request::{
            CreateArticleRequest, CreateQuestionRequest, CreateQuizRequest, LoginRequest,
            RegisterRequest, UpdateArticleRequest, UpdateQuestionRequest, UpdateQuizRequest,
        },
        response::{
            ArticleDto, AuthResponse, MessageResponse, QuestionDto, QuizDetailDto, QuizDto,
            QuizSummaryDto, UserDto,
        },
    },
};

#[derive(Debug, Clone)]
struct Session {
    token: String,
    user: UserDto,
}

/// API client mirroring server state in a local cache.
///
/// Reads go through the cache; every successful mutation invalidates the
/// entries it could have changed, so the next read refetches them.
pub struct QuizClient {
    http: reqwest::Client,
    base_url: String,
    session: RwLock<Option<Session>>,
    quiz_list: ListCache<QuizSummaryDto>,
    quizzes: EntityCache<QuizDetailDto>,
    article_list: ListCache<ArticleDto>,
    articles: EntityCache<ArticleDto>,
}

impl QuizClient {
    /// `base_url` may be given with or without the trailing `/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: api_root(&base_url.into()),
            session: RwLock::new(None),
            quiz_list: ListCache::new(),
            quizzes: EntityCache::new(),
            article_list: ListCache::new(),
            articles: EntityCache::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn current_user(&self) -> Option<UserDto> {
        self.session.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn token(&self) -> Option<String> {
        self.session.read().await.as_ref().map(|s| s.token.clone())
    }

    // Auth

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<UserDto> {
        let response: AuthResponse = self
            .send(self.request(Method::POST, "/auth/register").json(request))
            .await?;
        Ok(self.start_session(response).await)
    }

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<UserDto> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self
            .send(self.request(Method::POST, "/auth/login").json(&request))
            .await?;
        Ok(self.start_session(response).await)
    }

    pub async fn logout(&self) {
        *self.session.write().await = None;
        self.clear_cache().await;
    }

    async fn start_session(&self, response: AuthResponse) -> UserDto {
        let user = response.user.clone();
        *self.session.write().await = Some(Session {
            token: response.token,
            user: response.user,
        });
        self.clear_cache().await;
        log::debug!("Signed in as {}", user.username);
        user
    }

    pub async fn clear_cache(&self) {
        self.quiz_list.invalidate().await;
        self.quizzes.clear().await;
        self.article_list.invalidate().await;
        self.articles.clear().await;
    }

    // Quizzes

    pub async fn quizzes(&self) -> ClientResult<Vec<QuizSummaryDto>> {
        self.quiz_list
            .get_or_fetch(|| self.authorized::<Vec<QuizSummaryDto>, ()>(Method::GET, "/quizzes", None))
            .await
    }

    pub async fn quiz(&self, id: &str) -> ClientResult<QuizDetailDto> {
        let path = format!("/quizzes/{}", id);
        self.quizzes
            .get_or_fetch(id, || self.authorized::<QuizDetailDto, ()>(Method::GET, &path, None))
            .await
    }

    pub async fn create_quiz(&self, request: &CreateQuizRequest) -> ClientResult<QuizDto> {
        let quiz: QuizDto = self
            .authorized(Method::POST, "/quizzes", Some(request))
            .await?;
        self.quiz_list.invalidate().await;
        Ok(quiz)
    }

    pub async fn update_quiz(&self, id: &str, request: &UpdateQuizRequest) -> ClientResult<QuizDto> {
        let quiz: QuizDto = self
            .authorized(Method::PUT, &format!("/quizzes/{}", id), Some(request))
            .await?;
        self.quiz_list.invalidate().await;
        self.quizzes.invalidate(id).await;
        Ok(quiz)
    }

    pub async fn delete_quiz(&self, id: &str) -> ClientResult<MessageResponse> {
        let message: MessageResponse = self
            .authorized::<_, ()>(Method::DELETE, &format!("/quizzes/{}", id), None)
            .await?;
        self.quiz_list.invalidate().await;
        self.quizzes.invalidate(id).await;
        Ok(message)
    }

    // Questions

    pub async fn create_question(
        &self,
        quiz_id: &str,
        request: &CreateQuestionRequest,
    ) -> ClientResult<QuestionDto> {
        let question: QuestionDto = self
            .authorized(Method::POST, &format!("/questions/{}", quiz_id), Some(request))
            .await?;
        self.quizzes.invalidate(quiz_id).await;
        Ok(question)
    }

    pub async fn update_question(
        &self,
        id: &str,
        request: &UpdateQuestionRequest,
    ) -> ClientResult<QuestionDto> {
        let question: QuestionDto = self
            .authorized(Method::PUT, &format!("/questions/{}", id), Some(request))
            .await?;
        self.quizzes.invalidate(&question.quiz_id).await;
        Ok(question)
    }

    pub async fn delete_question(&self, id: &str) -> ClientResult<MessageResponse> {
        let message: MessageResponse = self
            .authorized::<_, ()>(Method::DELETE, &format!("/questions/{}", id), None)
            .await?;
        self.quizzes
            .invalidate_where(|quiz| quiz.questions.iter().any(|q| q.id == id))
            .await;
        Ok(message)
    }

    // Articles

    pub async fn articles(&self) -> ClientResult<Vec<ArticleDto>> {
        self.article_list
            .get_or_fetch(|| self.authorized::<Vec<ArticleDto>, ()>(Method::GET, "/articles", None))
            .await
    }

    pub async fn article(&self, id: &str) -> ClientResult<ArticleDto> {
        let path = format!("/articles/{}", id);
        self.articles
            .get_or_fetch(id, || self.authorized::<ArticleDto, ()>(Method::GET, &path, None))
            .await
    }

    pub async fn create_article(&self, request: &CreateArticleRequest) -> ClientResult<ArticleDto> {
        let article: ArticleDto = self
            .authorized(Method::POST, "/articles", Some(request))
            .await?;
        self.article_list.invalidate().await;
        Ok(article)
    }

    pub async fn update_article(
        &self,
        id: &str,
        request: &UpdateArticleRequest,
    ) -> ClientResult<ArticleDto> {
        let article: ArticleDto = self
            .authorized(Method::PUT, &format!("/articles/{}", id), Some(request))
            .await?;
        self.article_list.invalidate().await;
        self.articles.invalidate(id).await;
        Ok(article)
    }

    pub async fn delete_article(&self, id: &str) -> ClientResult<MessageResponse> {
        let message: MessageResponse = self
            .authorized::<_, ()>(Method::DELETE, &format!("/articles/{}", id), None)
            .await?;
        self.article_list.invalidate().await;
        self.articles.invalidate(id).await;
        Ok(message)
    }

    // Transport

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn authorized<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let token = self.token().await.ok_or(ClientError::NotAuthenticated)?;

        let mut builder = self.request(method, path).bearer_auth(token);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(builder).await
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let fallback = status.canonical_reason().unwrap_or("Request failed").to_string();
    let error = match response.json::<ErrorResponse>().await {
        Ok(body) => ClientError::Api {
            status: status.as_u16(),
            code: Some(body.code),
            message: body.message,
            errors: body.errors,
        },
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            code: None,
            message: fallback,
            errors: vec![],
        },
    };
    log::debug!("Request failed: {}", error);
    Err(error)
}

fn api_root(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/api") {
        trimmed.to_string()
    } else {
        format!("{}/api", trimmed)
    }
}
