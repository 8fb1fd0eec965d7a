use serde::Serialize;

use crate::{
    app_state::AppState,
    auth::Identity,
    errors::AppResult,
    models::dto::request::{CreateArticleRequest, CreateQuestionRequest, CreateQuizRequest},
};

#[derive(Debug, Serialize)]
pub struct SeedSummary {
    pub admin: String,
    pub user: String,
    pub quiz_id: String,
    pub questions: usize,
    pub article_id: String,
}

/// Populates an empty database with the demo accounts and content.
pub async fn seed_demo_data(state: &AppState) -> AppResult<SeedSummary> {
    let admin = state
        .auth_service
        .create_user("admin", "admin123".to_string(), true)
        .await?
        .user;

    let user = state
        .auth_service
        .create_user("john", "john123".to_string(), false)
        .await?
        .user;

    let quiz = state
        .quiz_service
        .create_quiz(CreateQuizRequest {
            title: "General Knowledge".to_string(),
            description: Some("Basics".to_string()),
        })
        .await?;

    let questions = [
        (
            "What is the capital of Germany?",
            ["Paris", "London", "Berlin", "Madrid"],
            2,
        ),
        (
            "Who developed the theory of relativity?",
            ["Einstein", "Newton", "Tesla", "Galileo"],
            0,
        ),
    ];
    for (text, options, correct_index) in &questions {
        state
            .question_service
            .create_question(
                &quiz.id,
                CreateQuestionRequest {
                    text: text.to_string(),
                    options: options.iter().map(|o| o.to_string()).collect(),
                    correct_index: *correct_index,
                },
            )
            .await?;
    }

    let author = Identity {
        id: admin.id.clone(),
        username: admin.username.clone(),
        is_admin: admin.is_admin,
    };
    let article = state
        .article_service
        .create_article(
            CreateArticleRequest {
                title: "Welcome to the Quiz App".to_string(),
                body: "This is a demo article. Feel free to extend it.".to_string(),
            },
            &author,
        )
        .await?;

    Ok(SeedSummary {
        admin: admin.username,
        user: user.username,
        quiz_id: quiz.id,
        questions: questions.len(),
        article_id: article.id,
    })
}
