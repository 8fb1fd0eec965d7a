use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    /// Admin flag at issue time. Informational only: authorization reads the
    /// flag from the user record loaded for each request.
    pub is_admin: bool,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at (as UTC timestamp)
}

impl Claims {
    pub fn new(user: &User, ttl: Duration) -> Self {
        let now = Utc::now();
        let exp = now + ttl;

        Self {
            sub: user.id.clone(),
            is_admin: user.is_admin,
            iat: now.timestamp().max(0) as usize,
            exp: exp.timestamp().max(0) as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let user = User::test_admin("admin");
        let claims = Claims::new(&user, Duration::days(7));

        assert_eq!(claims.sub, user.id);
        assert!(claims.is_admin);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }
}
