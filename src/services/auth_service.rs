use std::sync::Arc;

use actix_web::web;
use validator::Validate;

use crate::{
    auth::{
        password::{hash_password, verify_password},
        Claims, Identity, JwtService,
    },
    errors::{AppError, AppResult},
    models::{
        domain::User,
        dto::{
            request::{LoginRequest, RegisterRequest},
            response::AuthResponse,
        },
    },
    repositories::UserRepository,
};

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_service: Arc<JwtService>,
    bcrypt_cost: u32,
    allow_admin_signup: bool,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        jwt_service: Arc<JwtService>,
        bcrypt_cost: u32,
        allow_admin_signup: bool,
    ) -> Self {
        Self {
            users,
            jwt_service,
            bcrypt_cost,
            allow_admin_signup,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let request = request.normalized();
        request.validate()?;

        let is_admin = request.is_admin.unwrap_or(false);
        if is_admin && !self.allow_admin_signup {
            return Err(AppError::Forbidden(
                "Admin registration is disabled".to_string(),
            ));
        }

        self.create_user(&request.username, request.password, is_admin)
            .await
    }

    /// Stores a new account without the public signup rules. Used by
    /// `register` after its checks, and by operator tooling such as the seed.
    pub async fn create_user(
        &self,
        username: &str,
        password: String,
        is_admin: bool,
    ) -> AppResult<AuthResponse> {
        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let cost = self.bcrypt_cost;
        let password_hash = web::block(move || hash_password(&password, cost))
            .await
            .map_err(|e| AppError::InternalError(format!("Password hashing aborted: {}", e)))??;

        // The unique index still guards the race between the check above and this insert.
        let user = self
            .users
            .create(User::new(username, &password_hash, is_admin))
            .await?;

        log::info!("Registered user '{}' (admin: {})", user.username, user.is_admin);
        self.respond(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let user = self
            .users
            .find_by_username(request.username.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = request.password;
        let password_hash = user.password_hash.clone();
        let matches = web::block(move || verify_password(&password, &password_hash))
            .await
            .map_err(|e| AppError::InternalError(format!("Password check aborted: {}", e)))??;

        if !matches {
            log::warn!("Failed login for '{}'", user.username);
            return Err(AppError::InvalidCredentials);
        }

        self.respond(user)
    }

    /// Loads the token subject's current record. The admin flag in the
    /// returned identity comes from the record, never from the token.
    pub async fn resolve_identity(&self, claims: &Claims) -> AppResult<Identity> {
        let user = self
            .users
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::UnknownUser)?;

        if user.is_admin != claims.is_admin {
            log::debug!(
                "Admin flag for '{}' changed since token issue ({} -> {})",
                user.username,
                claims.is_admin,
                user.is_admin
            );
        }

        Ok(Identity::from(&user))
    }

    fn respond(&self, user: User) -> AppResult<AuthResponse> {
        let token = self.jwt_service.issue(&user)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, repositories::user_repository::MockUserRepository};

    fn service(users: MockUserRepository, allow_admin_signup: bool) -> AuthService {
        let config = Config::test_config();
        AuthService::new(
            Arc::new(users),
            Arc::new(JwtService::from_hours(&config.jwt_secret, 1)),
            config.bcrypt_cost,
            allow_admin_signup,
        )
    }

    fn register_request(username: &str, is_admin: Option<bool>) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: "secret1".to_string(),
            is_admin,
        }
    }

    #[actix_web::test]
    async fn test_register_trims_and_hashes() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .withf(|username| username == "alice")
            .returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|user| user.username == "alice" && user.password_hash != "secret1")
            .returning(Ok);

        let response = service(users, true)
            .register(register_request("  alice ", None))
            .await
            .unwrap();

        assert_eq!(response.user.username, "alice");
        assert!(!response.user.is_admin);
        assert!(!response.token.is_empty());
    }

    #[actix_web::test]
    async fn test_register_duplicate_is_conflict() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|name| Ok(Some(User::test_user(name))));
        users.expect_create().never();

        let result = service(users, true)
            .register(register_request("alice", None))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[actix_web::test]
    async fn test_create_user_skips_signup_gate() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|user| user.username == "root" && user.is_admin)
            .returning(Ok);

        let response = service(users, false)
            .create_user("root", "rootpass".to_string(), true)
            .await
            .unwrap();

        assert!(response.user.is_admin);
    }

    #[actix_web::test]
    async fn test_register_admin_can_be_disabled() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().never();

        let result = service(users, false)
            .register(register_request("mallory", Some(true)))
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[actix_web::test]
    async fn test_login_unknown_user_is_invalid_credentials() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));

        let result = service(users, true)
            .login(LoginRequest {
                username: "ghost".to_string(),
                password: "whatever".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[actix_web::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let hash = hash_password("right-password", 4).unwrap();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(move |name| Ok(Some(User::new(name, &hash, false))));

        let result = service(users, true)
            .login(LoginRequest {
                username: "john".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[actix_web::test]
    async fn test_resolve_identity_uses_stored_admin_flag() {
        let stored = User::test_user("demoted");
        let claims = Claims {
            sub: stored.id.clone(),
            is_admin: true,
            iat: 0,
            exp: usize::MAX,
        };

        let mut users = MockUserRepository::new();
        let returned = stored.clone();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(returned.clone())));

        let identity = service(users, true).resolve_identity(&claims).await.unwrap();
        assert!(!identity.is_admin);
        assert_eq!(identity.id, stored.id);
    }

    #[actix_web::test]
    async fn test_resolve_identity_unknown_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let claims = Claims {
            sub: "gone".to_string(),
            is_admin: false,
            iat: 0,
            exp: usize::MAX,
        };

        let result = service(users, true).resolve_identity(&claims).await;
        assert!(matches!(result, Err(AppError::UnknownUser)));
    }
}
