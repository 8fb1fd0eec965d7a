use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{AdminUser, AuthenticatedUser},
    errors::AppError,
    models::dto::{
        request::{CreateQuestionRequest, UpdateQuestionRequest},
        response::MessageResponse,
    },
};

#[get("/{id}")]
pub async fn get_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let question = state.question_service.get_question(&id).await?;
    Ok(HttpResponse::Ok().json(question))
}

/// Adds a question to the quiz named in the path.
#[post("/{quiz_id}")]
pub async fn create_question(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    request: web::Json<CreateQuestionRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let question = state
        .question_service
        .create_question(&quiz_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(question))
}

#[put("/{id}")]
pub async fn update_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuestionRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let question = state
        .question_service
        .update_question(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(question))
}

#[delete("/{id}")]
pub async fn delete_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    state.question_service.delete_question(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Question deleted")))
}
