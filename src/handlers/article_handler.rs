use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{AdminUser, AuthenticatedUser},
    errors::AppError,
    models::dto::{
        request::{CreateArticleRequest, UpdateArticleRequest},
        response::MessageResponse,
    },
};

#[get("")]
pub async fn list_articles(
    state: web::Data<AppState>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let articles = state.article_service.list_articles().await?;
    Ok(HttpResponse::Ok().json(articles))
}

#[get("/{id}")]
pub async fn get_article(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let article = state.article_service.get_article(&id).await?;
    Ok(HttpResponse::Ok().json(article))
}

#[post("")]
pub async fn create_article(
    state: web::Data<AppState>,
    request: web::Json<CreateArticleRequest>,
    admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let article = state
        .article_service
        .create_article(request.into_inner(), &admin.0)
        .await?;
    Ok(HttpResponse::Created().json(article))
}

#[put("/{id}")]
pub async fn update_article(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateArticleRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let article = state
        .article_service
        .update_article(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(article))
}

#[delete("/{id}")]
pub async fn delete_article(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    state.article_service.delete_article(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Article deleted")))
}
