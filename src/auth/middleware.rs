use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{Header, AUTHORIZATION},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use futures::future::LocalBoxFuture;

use crate::{
    app_state::AppState,
    auth::{require_admin, Identity},
    errors::{AppError, AppResult},
};

/// Authorization gate for a scope: bearer token → verified claims → current
/// user record. The resolved `Identity` is stored in the request extensions.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req).await {
                Ok(identity) => {
                    req.extensions_mut().insert(identity);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    log::warn!("Rejected {} {}: {}", req.method(), req.path(), err);
                    Ok(req.error_response(err).map_into_right_body())
                }
            }
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> AppResult<Identity> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::InternalError("Application state not configured".to_string()))?;

    let token = bearer_token(req.request())?;
    let claims = state.jwt_service.verify(&token)?;
    state.auth_service.resolve_identity(&claims).await
}

fn bearer_token(req: &HttpRequest) -> AppResult<String> {
    if !req.headers().contains_key(AUTHORIZATION) {
        return Err(AppError::Unauthenticated(
            "Missing authorization header".to_string(),
        ));
    }

    let auth = Authorization::<Bearer>::parse(req).map_err(|_| {
        AppError::Unauthenticated("Invalid authorization header format".to_string())
    })?;

    let scheme = auth.into_scheme();
    let token = scheme.token().trim();
    if token.is_empty() {
        return Err(AppError::Unauthenticated(
            "Invalid authorization header format".to_string(),
        ));
    }
    Ok(token.to_string())
}

fn identity_from(req: &HttpRequest) -> AppResult<Identity> {
    req.extensions()
        .get::<Identity>()
        .cloned()
        .ok_or_else(|| AppError::Unauthenticated("Not authenticated".to_string()))
}

/// Extractor for any caller that passed the authorization gate.
pub struct AuthenticatedUser(pub Identity);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(identity_from(req).map(AuthenticatedUser))
    }
}

/// Extractor for admin-only handlers. Runs after the gate, so a request that
/// skipped `AuthMiddleware` is still rejected as unauthenticated.
pub struct AdminUser(pub Identity);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let result = identity_from(req).and_then(|identity| {
            require_admin(&identity)?;
            Ok(AdminUser(identity))
        });
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{get, http::StatusCode, test, App, HttpResponse};

    use crate::{config::Config, models::domain::User};

    #[get("/whoami")]
    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.0.username)
    }

    #[get("/admin-only")]
    async fn admin_only(admin: AdminUser) -> HttpResponse {
        HttpResponse::Ok().body(admin.0.username)
    }

    #[actix_web::test]
    async fn test_missing_header_is_unauthenticated() {
        let state = AppState::in_memory(Config::test_config());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("").wrap(AuthMiddleware).service(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_admin_extractor_without_gate_is_unauthenticated() {
        let app = test::init_service(App::new().service(admin_only)).await;

        let req = test::TestRequest::get().uri("/admin-only").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_token_for_deleted_user_is_rejected() {
        let state = AppState::in_memory(Config::test_config());
        // A validly signed token whose subject was never stored.
        let token = state.jwt_service.issue(&User::test_admin("ghost")).unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("").wrap(AuthMiddleware).service(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: crate::errors::ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.code, "UNKNOWN_USER");
    }
}
