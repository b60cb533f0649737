use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;

use crate::{Error, Result};

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_duration_min: i64,
    pub jwt_algorithm: Algorithm,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            jwt_secret: env::var("JWT_SECRET")?,
            // 90 days, matching the cookie lifetime.
            token_duration_min: env::var("TOKEN_DURATION_MIN")
                .unwrap_or_else(|_| "129600".to_string())
                .parse::<i64>()
                .unwrap_or(129_600),
            jwt_algorithm: Algorithm::HS256,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (user id)
    pub exp: usize,  // expiration time
    pub iat: usize,  // issued at
}

impl Claims {
    pub fn new(sub: String, config: &AuthConfig) -> Self {
        let iat = Utc::now();
        let exp = iat + Duration::minutes(config.token_duration_min);

        Self {
            sub,
            exp: exp.timestamp() as usize,
            iat: iat.timestamp() as usize,
        }
    }
}

pub struct TokenService;

impl TokenService {
    pub fn create_token(sub: String, config: &AuthConfig) -> Result<String> {
        let claims = Claims::new(sub, config);
        encode(
            &Header::new(config.jwt_algorithm),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .map_err(|_| Error::TokenCreationError)
    }

    pub fn validate_token(token: &str, config: &AuthConfig) -> Result<Claims> {
        let validation = Validation::new(config.jwt_algorithm);

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &validation,
        )?;
        Ok(decoded.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_duration_min: 60,
            jwt_algorithm: Algorithm::HS256,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = test_config();
        let token = TokenService::create_token("user123".to_string(), &config).unwrap();
        assert!(!token.is_empty());

        let claims = TokenService::validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "user123");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = test_config();
        let token = TokenService::create_token("user123".to_string(), &config).unwrap();

        let other = AuthConfig {
            jwt_secret: "other-secret".to_string(),
            ..test_config()
        };
        let err = TokenService::validate_token(&token, &other).unwrap_err();
        assert!(matches!(err, Error::AuthFailInvalidToken));
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = AuthConfig {
            token_duration_min: -10,
            ..test_config()
        };
        let token = TokenService::create_token("user123".to_string(), &config).unwrap();

        let err = TokenService::validate_token(&token, &test_config()).unwrap_err();
        assert!(matches!(err, Error::AuthFailInvalidToken));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let err = TokenService::validate_token("not.a.token", &test_config()).unwrap_err();
        assert!(matches!(err, Error::AuthFailInvalidToken));
    }
}
