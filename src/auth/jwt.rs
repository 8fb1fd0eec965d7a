use chrono::Duration;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    auth::claims::Claims,
    errors::{AppError, AppResult},
    models::domain::User,
};

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtService {
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            validation,
            ttl,
        }
    }

    pub fn from_hours(secret: &SecretString, hours: i64) -> Self {
        Self::new(secret, Duration::hours(hours))
    }

    pub fn issue(&self, user: &User) -> AppResult<String> {
        let claims = Claims::new(user, self.ttl);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to create JWT: {}", e)))
    }

    /// Bad signatures, malformed tokens and expired tokens all surface as
    /// `InvalidToken`; the reason is only logged.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Token rejected: {}", e);
                AppError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn service(ttl: Duration) -> JwtService {
        JwtService::new(&Config::test_config().jwt_secret, ttl)
    }

    #[test]
    fn test_jwt_issue_and_verify() {
        let jwt_service = service(Duration::hours(1));
        let user = User::test_admin("admin");

        let token = jwt_service.issue(&user).unwrap();
        assert!(!token.is_empty());

        let claims = jwt_service.verify(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert!(claims.is_admin);
    }

    #[test]
    fn test_jwt_invalid_token() {
        let jwt_service = service(Duration::hours(1));

        let result = jwt_service.verify("invalid.token.here");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_jwt_expired_token() {
        let jwt_service = service(Duration::seconds(-30));
        let token = jwt_service.issue(&User::test_user("john")).unwrap();

        assert!(matches!(jwt_service.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_jwt_foreign_secret_rejected() {
        let ours = service(Duration::hours(1));
        let theirs = JwtService::new(
            &SecretString::from("some_other_secret".to_string()),
            Duration::hours(1),
        );
        let token = theirs.issue(&User::test_user("john")).unwrap();

        assert!(matches!(ours.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_jwt_tampered_token_rejected() {
        let jwt_service = service(Duration::hours(1));
        let token = jwt_service.issue(&User::test_user("john")).unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(jwt_service.verify(&tampered).is_err());
    }
}
