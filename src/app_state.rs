use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        ArticleRepository, MongoArticleRepository, MongoQuestionRepository, MongoQuizRepository,
        MongoUserRepository, QuestionRepository, QuizRepository, UserRepository,
    },
    services::{ArticleService, AuthService, IntegrityService, QuestionService, QuizService},
};

/// The storage backends the services are built on.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub articles: Arc<dyn ArticleRepository>,
}

impl Repositories {
    pub fn mongo(db: &Database) -> Self {
        Self {
            users: Arc::new(MongoUserRepository::new(db)),
            quizzes: Arc::new(MongoQuizRepository::new(db)),
            questions: Arc::new(MongoQuestionRepository::new(db)),
            articles: Arc::new(MongoArticleRepository::new(db)),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.users.ensure_indexes().await?;
        self.quizzes.ensure_indexes().await?;
        self.questions.ensure_indexes().await?;
        self.articles.ensure_indexes().await?;
        Ok(())
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub fn in_memory() -> Self {
        use crate::repositories::memory::{
            InMemoryArticleRepository, InMemoryQuestionRepository, InMemoryQuizRepository,
            InMemoryUserRepository,
        };

        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            quizzes: Arc::new(InMemoryQuizRepository::new()),
            questions: Arc::new(InMemoryQuestionRepository::new()),
            articles: Arc::new(InMemoryArticleRepository::new()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub quiz_service: Arc<QuizService>,
    pub question_service: Arc<QuestionService>,
    pub article_service: Arc<ArticleService>,
    pub integrity_service: Arc<IntegrityService>,
    pub jwt_service: Arc<JwtService>,
    /// `None` when running on in-memory repositories.
    pub db: Option<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let repositories = Repositories::mongo(&db);
        repositories.ensure_indexes().await?;

        Ok(Self::from_repositories(config, repositories, Some(db)))
    }

    pub fn from_repositories(config: Config, repositories: Repositories, db: Option<Database>) -> Self {
        let jwt_service = Arc::new(JwtService::from_hours(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));

        let auth_service = Arc::new(AuthService::new(
            repositories.users.clone(),
            jwt_service.clone(),
            config.bcrypt_cost,
            config.allow_admin_signup,
        ));
        let quiz_service = Arc::new(QuizService::new(
            repositories.quizzes.clone(),
            repositories.questions.clone(),
        ));
        let question_service = Arc::new(QuestionService::new(
            repositories.quizzes.clone(),
            repositories.questions.clone(),
        ));
        let article_service = Arc::new(ArticleService::new(repositories.articles.clone()));
        let integrity_service = Arc::new(IntegrityService::new(
            repositories.quizzes,
            repositories.questions,
        ));

        Self {
            auth_service,
            quiz_service,
            question_service,
            article_service,
            integrity_service,
            jwt_service,
            db,
            config: Arc::new(config),
        }
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub fn in_memory(config: Config) -> Self {
        Self::from_repositories(config, Repositories::in_memory(), None)
    }
}
