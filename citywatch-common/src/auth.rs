//! Capability tokens
//!
//! Two token kinds back the portal's access control:
//! - admin session tokens: opaque random values handed out after a
//!   successful shared-credential login, held server-side with an expiry
//! - image access signatures: time-limited, read-only capabilities embedded
//!   in image URLs, so the dashboard and tracking pages can render photos
//!   without exposing the image store itself
//!
//! This module contains only pure functions and database operations; HTTP
//! middleware lives in the portal crate.

use sha2::{Digest, Sha256};

use sqlx::SqlitePool;

// ========================================
// Error Types
// ========================================

/// Image access validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageAccessError {
    /// The capability's expiry timestamp has passed
    Expired { expires: i64, now: i64 },

    /// The signature does not match the calculated value
    InvalidSignature,

    /// Database error loading the signing secret
    DatabaseError(String),
}

impl std::fmt::Display for ImageAccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageAccessError::Expired { expires, now } => {
                write!(f, "Access token expired at {} (now {})", expires, now)
            }
            ImageAccessError::InvalidSignature => write!(f, "Invalid signature"),
            ImageAccessError::DatabaseError(err) => write!(f, "Database error: {}", err),
        }
    }
}

impl std::error::Error for ImageAccessError {}

// ========================================
// Signing Secret Management
// ========================================

/// Load the image-URL signing secret from database settings.
///
/// Key: `image_url_secret`, value: non-zero i64. Generated and stored on
/// first access so every deployment gets its own secret.
pub async fn load_image_secret(db: &SqlitePool) -> Result<i64, ImageAccessError> {
    let result: Option<(Option<String>,)> =
        sqlx::query_as("SELECT value FROM settings WHERE key = 'image_url_secret'")
            .fetch_optional(db)
            .await
            .map_err(|e| ImageAccessError::DatabaseError(e.to_string()))?;

    match result {
        Some((Some(value),)) => value
            .parse::<i64>()
            .map_err(|e| ImageAccessError::DatabaseError(format!("Invalid i64: {}", e))),
        _ => initialize_image_secret(db).await,
    }
}

/// Generate and store a fresh signing secret (non-zero)
pub async fn initialize_image_secret(db: &SqlitePool) -> Result<i64, ImageAccessError> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let secret: i64 = loop {
        let val = rng.gen::<i64>();
        if val != 0 {
            break val;
        }
    };

    sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES ('image_url_secret', ?)")
        .bind(secret.to_string())
        .execute(db)
        .await
        .map_err(|e| ImageAccessError::DatabaseError(e.to_string()))?;

    Ok(secret)
}

// ========================================
// Session Tokens
// ========================================

/// Generate an opaque admin session token (64 hex characters).
///
/// The token is random, not derived from the credential; possession of a
/// live token is the only thing the middleware checks.
pub fn generate_session_token() -> String {
    use rand::RngCore;

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);

    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

// ========================================
// Image Access Signatures
// ========================================

/// Sign an image reference with an expiry timestamp.
///
/// signature = SHA-256("<image_ref>:<expires_unix>:<secret>") as 64 hex
/// characters. The (ref, expires, sig) triple forms a read-only capability
/// that stops working once `expires_unix` passes.
pub fn sign_image_ref(image_ref: &str, expires_unix: i64, secret: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}:{}", image_ref, expires_unix, secret).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Validate an image access capability.
///
/// Expiry is checked before the signature so a stale link reports
/// `Expired` rather than leaking whether its signature was ever valid.
pub fn verify_image_access(
    image_ref: &str,
    expires_unix: i64,
    signature: &str,
    secret: i64,
    now_unix: i64,
) -> Result<(), ImageAccessError> {
    if now_unix > expires_unix {
        return Err(ImageAccessError::Expired {
            expires: expires_unix,
            now: now_unix,
        });
    }

    let calculated = sign_image_ref(image_ref, expires_unix, secret);
    if calculated != signature {
        return Err(ImageAccessError::InvalidSignature);
    }

    Ok(())
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_tokens_are_unique_hex() {
        let a = generate_session_token();
        let b = generate_session_token();

        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_signature_deterministic() {
        let sig1 = sign_image_ref("AAAA1111_x.jpg", 1_900_000_000, 42);
        let sig2 = sign_image_ref("AAAA1111_x.jpg", 1_900_000_000, 42);
        assert_eq!(sig1, sig2);
        assert_eq!(sig1.len(), 64);
    }

    #[test]
    fn test_signature_varies_with_inputs() {
        let base = sign_image_ref("AAAA1111_x.jpg", 1_900_000_000, 42);
        assert_ne!(base, sign_image_ref("BBBB2222_x.jpg", 1_900_000_000, 42));
        assert_ne!(base, sign_image_ref("AAAA1111_x.jpg", 1_900_000_001, 42));
        assert_ne!(base, sign_image_ref("AAAA1111_x.jpg", 1_900_000_000, 43));
    }

    #[test]
    fn test_valid_capability_accepted() {
        let expires = 2_000_000_000;
        let sig = sign_image_ref("AAAA1111_x.jpg", expires, 42);
        assert!(verify_image_access("AAAA1111_x.jpg", expires, &sig, 42, expires - 10).is_ok());
    }

    #[test]
    fn test_expired_capability_rejected() {
        let expires = 1_000_000_000;
        let sig = sign_image_ref("AAAA1111_x.jpg", expires, 42);
        let err = verify_image_access("AAAA1111_x.jpg", expires, &sig, 42, expires + 1).unwrap_err();
        assert!(matches!(err, ImageAccessError::Expired { .. }));
    }

    #[test]
    fn test_tampered_ref_rejected() {
        let expires = 2_000_000_000;
        let sig = sign_image_ref("AAAA1111_x.jpg", expires, 42);
        let err =
            verify_image_access("BBBB2222_y.jpg", expires, &sig, 42, expires - 10).unwrap_err();
        assert_eq!(err, ImageAccessError::InvalidSignature);
    }

    #[test]
    fn test_extended_expiry_invalidates_signature() {
        // A client cannot stretch a capability's lifetime by editing the
        // expires parameter: the signature covers it
        let expires = 1_000_000_000;
        let sig = sign_image_ref("AAAA1111_x.jpg", expires, 42);
        let err = verify_image_access("AAAA1111_x.jpg", expires + 3600, &sig, 42, expires + 10)
            .unwrap_err();
        assert_eq!(err, ImageAccessError::InvalidSignature);
    }

    #[tokio::test]
    async fn test_image_secret_initialized_once() {
        let pool = crate::db::init::init_memory_database().await.unwrap();

        let first = load_image_secret(&pool).await.unwrap();
        let second = load_image_secret(&pool).await.unwrap();

        assert_ne!(first, 0);
        assert_eq!(first, second);
    }
}
