use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString},
    Argon2, PasswordVerifier,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Registered account document. The password hash is stored inside the
/// document and must never leave through the API; responses use [`PublicUser`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

/// API view of a user: everything except the credential.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let avatar = gravatar_url(&email);
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            avatar,
            created_at: Utc::now(),
        }
    }

    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
            created_at: self.created_at,
        }
    }
}

/// Gravatar URL from the SHA-256 of the normalized email.
pub fn gravatar_url(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("https://www.gravatar.com/avatar/{}?s=300&r=pg&d=mm", digest)
}

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a password against a stored PHC string. A corrupt stored hash
/// verifies as false rather than erroring, so login stays a simple yes/no.
pub fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|hash| Argon2::default().verify_password(password.as_bytes(), &hash).is_ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravatar_url_normalizes_email() {
        assert_eq!(gravatar_url("Alice@Example.COM "), gravatar_url("alice@example.com"));
        assert!(gravatar_url("alice@example.com").contains("s=300&r=pg&d=mm"));
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("hunter2").expect("hash");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "not-a-phc-string"));
    }

    #[test]
    fn public_view_has_no_credential() {
        let user = User::new("Alice".into(), "alice@example.com".into(), "phc".into());
        let value = serde_json::to_value(user.public()).expect("serialize");
        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["name"], "Alice");
    }
}
