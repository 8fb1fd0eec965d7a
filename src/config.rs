use std::env;

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

const DEFAULT_JWT_SECRET: &str = "dev_secret_key_change_in_production";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
    pub cors_allowed_origin: Option<String>,
    pub allow_admin_signup: bool,
    pub reconcile_on_startup: bool,
    pub production: bool,
}

impl Config {
    /// Reads the process environment once at startup.
    ///
    /// `MONGO_CONN_STRING` has no default: a missing connection string is a
    /// startup error rather than a silent fallback to a local database.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(var: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongo_conn_string = var("MONGO_CONN_STRING").ok_or_else(|| {
            AppError::InternalError("MONGO_CONN_STRING must be set".to_string())
        })?;

        Ok(Self {
            mongo_conn_string,
            mongo_db_name: var("MONGO_DB_NAME").unwrap_or_else(|| "quizhub".to_string()),
            web_server_host: var("WEB_SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_server_port: var("WEB_SERVER_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            jwt_secret: SecretString::from(
                var("JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string()),
            ),
            jwt_expiration_hours: var("JWT_EXPIRATION_HOURS")
                .and_then(|h| h.parse().ok())
                .unwrap_or(168),
            bcrypt_cost: var("BCRYPT_COST")
                .and_then(|c| c.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
            cors_allowed_origin: var("CORS_ALLOWED_ORIGIN")
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty()),
            allow_admin_signup: parse_flag(var("ALLOW_ADMIN_SIGNUP"), true),
            reconcile_on_startup: parse_flag(var("RECONCILE_ON_STARTUP"), false),
            production: var("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
        })
    }

    /// Rejects configurations that would be unsafe outside development.
    pub fn validate_for_production(&self) -> AppResult<()> {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEFAULT_JWT_SECRET {
            return Err(AppError::InternalError(
                "JWT_SECRET is using the default value".to_string(),
            ));
        }

        if jwt_secret.len() < 32 {
            return Err(AppError::InternalError(format!(
                "JWT_SECRET is too short ({}); at least 32 characters are required",
                jwt_secret.len()
            )));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.web_server_host.clone(), self.web_server_port)
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quizhub-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 4000,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            bcrypt_cost: 4,
            cors_allowed_origin: None,
            allow_admin_signup: true,
            reconcile_on_startup: false,
            production: false,
        }
    }
}

fn parse_flag(value: Option<String>, default: bool) -> bool {
    match value.as_deref().map(str::trim) {
        Some("1") | Some("true") | Some("TRUE") | Some("yes") => true,
        Some("0") | Some("false") | Some("FALSE") | Some("no") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.mongo_conn_string, "mongodb://localhost:27017");
        assert_eq!(config.mongo_db_name, "quizhub-test");
        assert!(config.allow_admin_signup);
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_connection_string_is_an_error() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_lookup(lookup(&[("MONGO_CONN_STRING", "mongodb://db:27017")])).unwrap();

        assert_eq!(config.mongo_db_name, "quizhub");
        assert_eq!(config.bind_address(), ("0.0.0.0".to_string(), 4000));
        assert_eq!(config.jwt_expiration_hours, 168);
        assert!(config.allow_admin_signup);
        assert!(!config.reconcile_on_startup);
        assert!(!config.production);
    }

    #[test]
    fn test_reconcile_on_startup_is_opt_in() {
        let config = Config::from_lookup(lookup(&[
            ("MONGO_CONN_STRING", "mongodb://db:27017"),
            ("RECONCILE_ON_STARTUP", "true"),
            ("APP_ENV", "Production"),
        ]))
        .unwrap();

        assert!(config.reconcile_on_startup);
        assert!(config.production);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(None, true));
        assert!(!parse_flag(None, false));
        assert!(parse_flag(Some("yes".into()), false));
        assert!(!parse_flag(Some(" false ".into()), true));
        assert!(parse_flag(Some("garbage".into()), true));
    }

    #[test]
    fn test_production_rejects_default_secret() {
        let mut config = Config::test_config();
        config.jwt_secret = SecretString::from(DEFAULT_JWT_SECRET.to_string());
        assert!(config.validate_for_production().is_err());
    }

    #[test]
    fn test_production_rejects_short_secret() {
        let config = Config::test_config();
        assert!(config.validate_for_production().is_err());
    }

    #[test]
    fn test_production_accepts_long_secret() {
        let mut config = Config::test_config();
        config.jwt_secret = SecretString::from("x".repeat(48));
        assert!(config.validate_for_production().is_ok());
    }
}
