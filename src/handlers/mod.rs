pub mod article_handler;
pub mod auth_handler;
pub mod health_handler;
pub mod question_handler;
pub mod quiz_handler;

use actix_web::web;

use crate::{auth::AuthMiddleware, errors::json_error_handler};

/// Registers every route. `AppState` must already be attached as
/// `web::Data<AppState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .default_service(web::to(health_handler::not_found))
        .service(health_handler::root)
        .service(health_handler::health_check)
        .service(health_handler::liveness)
        .service(health_handler::readiness)
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .service(auth_handler::register)
                        .service(auth_handler::login),
                )
                .service(
                    web::scope("/quizzes")
                        .wrap(AuthMiddleware)
                        .service(quiz_handler::list_quizzes)
                        .service(quiz_handler::get_quiz)
                        .service(quiz_handler::create_quiz)
                        .service(quiz_handler::update_quiz)
                        .service(quiz_handler::delete_quiz),
                )
                .service(
                    web::scope("/questions")
                        .wrap(AuthMiddleware)
                        .service(question_handler::get_question)
                        .service(question_handler::create_question)
                        .service(question_handler::update_question)
                        .service(question_handler::delete_question),
                )
                .service(
                    web::scope("/articles")
                        .wrap(AuthMiddleware)
                        .service(article_handler::list_articles)
                        .service(article_handler::get_article)
                        .service(article_handler::create_article)
                        .service(article_handler::update_article)
                        .service(article_handler::delete_article),
                ),
        );
}
