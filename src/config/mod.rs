use serde::Deserialize;
use std::env;
use thiserror::Error;

use crate::models::REGISTERED_GROUP_ID;

#[derive(Debug, Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(String);

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub environment: Environment,
    pub log_level: String,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub hierarchy: HierarchyConfig,
    /// Group assigned to users created by `register`.
    pub registration_group_id: i64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    /// Hashing cost factor (argon2 iteration count).
    pub cost: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HierarchyConfig {
    /// Upper bound on ancestor-chain length. A chain this long is treated
    /// as an undetected cycle, not a legitimate hierarchy.
    pub max_depth: usize,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str.parse().map_err(ConfigError)?;

        let is_prod = environment == Environment::Prod;

        let config = AuthConfig {
            environment,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            database: DatabaseConfig {
                url: get_env("DATABASE_URL", None, is_prod)?,
                max_connections: parse(get_env("DATABASE_MAX_CONNECTIONS", Some("10"), is_prod)?)?,
                min_connections: parse(get_env("DATABASE_MIN_CONNECTIONS", Some("1"), is_prod)?)?,
            },
            jwt: JwtConfig {
                secret: get_env("ACCESS_TOKEN_SECRET", None, is_prod)?,
                access_token_expiry_minutes: parse(get_env(
                    "ACCESS_TOKEN_EXPIRY_MINUTES",
                    Some("5"),
                    is_prod,
                )?)?,
            },
            password: PasswordConfig {
                cost: parse(get_env("PASSWORD_HASH_COST", Some("12"), is_prod)?)?,
            },
            hierarchy: HierarchyConfig {
                max_depth: parse(get_env("GROUP_HIERARCHY_MAX_DEPTH", Some("32"), is_prod)?)?,
            },
            registration_group_id: parse(get_env(
                "REGISTRATION_GROUP_ID",
                Some(&REGISTERED_GROUP_ID.to_string()),
                is_prod,
            )?)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError("ACCESS_TOKEN_SECRET must not be empty".into()));
        }

        if self.jwt.access_token_expiry_minutes <= 0 {
            return Err(ConfigError(
                "ACCESS_TOKEN_EXPIRY_MINUTES must be positive".into(),
            ));
        }

        if self.password.cost == 0 {
            return Err(ConfigError("PASSWORD_HASH_COST must be positive".into()));
        }

        if self.hierarchy.max_depth == 0 {
            return Err(ConfigError(
                "GROUP_HIERARCHY_MAX_DEPTH must be positive".into(),
            ));
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(ConfigError(format!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(ConfigError(format!("{} is required but not set", key)))
            }
        }
    }
}

fn parse<T: std::str::FromStr>(value: String) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| ConfigError(e.to_string()))
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AuthConfig {
        AuthConfig {
            environment: Environment::Dev,
            log_level: "info".to_string(),
            database: DatabaseConfig {
                url: "postgres://localhost/auth_core".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            jwt: JwtConfig {
                secret: "test-secret".to_string(),
                access_token_expiry_minutes: 5,
            },
            password: PasswordConfig { cost: 12 },
            hierarchy: HierarchyConfig { max_depth: 32 },
            registration_group_id: REGISTERED_GROUP_ID,
        }
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_secret() {
        let mut config = base_config();
        config.jwt.secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_expiry() {
        let mut config = base_config();
        config.jwt.access_token_expiry_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_hierarchy_depth() {
        let mut config = base_config();
        config.hierarchy.max_depth = 0;
        assert!(config.validate().is_err());
    }
}
