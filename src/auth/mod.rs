use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Authenticated user identity carried inside a signed token.
///
/// During a request the token is the sole source of truth for identity;
/// verification never touches the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    fn new(identity: &Identity, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: identity.id,
            name: identity.name.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token generation error: {0}")]
    Generation(String),

    #[error("signing secret is not configured")]
    MissingSecret,

    #[error("invalid token")]
    Invalid,
}

/// Sign an identity into a token expiring at now + `ttl`.
pub fn issue(identity: &Identity, secret: &str, ttl: Duration) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let claims = Claims::new(identity, ttl);
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| TokenError::Generation(e.to_string()))
}

/// Verify signature and expiry, returning the embedded identity.
///
/// A token whose expiry is at or before the current second is rejected;
/// there is no leeway window.
pub fn verify(token: &str, secret: &str) -> Result<Identity, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    let data = decode::<Claims>(token, &decoding_key, &validation).map_err(|_| TokenError::Invalid)?;

    Ok(Identity {
        id: data.claims.sub,
        name: data.claims.name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    fn alice() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
        }
    }

    #[test]
    fn verify_returns_the_issued_identity() {
        let identity = alice();
        let token = issue(&identity, SECRET, Duration::hours(1)).expect("issue");
        let verified = verify(&token, SECRET).expect("verify");
        assert_eq!(verified, identity);
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue(&alice(), SECRET, Duration::seconds(-30)).expect("issue");
        assert!(matches!(verify(&token, SECRET), Err(TokenError::Invalid)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue(&alice(), SECRET, Duration::hours(1)).expect("issue");
        assert!(matches!(verify(&token, "other-secret"), Err(TokenError::Invalid)));
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert!(matches!(verify("not.a.token", SECRET), Err(TokenError::Invalid)));
        assert!(matches!(verify("", SECRET), Err(TokenError::Invalid)));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = issue(&alice(), SECRET, Duration::hours(1)).expect("issue");
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[1] = parts[1].chars().rev().collect();
        assert!(matches!(verify(&parts.join("."), SECRET), Err(TokenError::Invalid)));
    }

    #[test]
    fn empty_secret_refuses_to_sign_or_verify() {
        assert!(matches!(issue(&alice(), "", Duration::hours(1)), Err(TokenError::MissingSecret)));
        assert!(matches!(verify("whatever", ""), Err(TokenError::MissingSecret)));
    }
}
