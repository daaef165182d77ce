use anyhow::anyhow;

use crate::errors::AppError;

const BCRYPT_COST: u32 = 12;

/// Hashes a password on the blocking pool; bcrypt at cost 12 takes ~250ms.
pub async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AppError::Internal(anyhow!("password hashing task failed: {e}")))?
        .map_err(|e| AppError::Internal(anyhow!("password hashing failed: {e}")))
}

/// Checks a password against a stored hash. Malformed hashes count as a mismatch.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| AppError::Internal(anyhow!("password verification task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verify_against_known_hash() {
        // low cost keeps the test fast; verification reads the cost from the hash
        let hash = bcrypt::hash("Admin123!", 4).unwrap();
        assert!(verify_password("Admin123!".into(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrong".into(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_is_mismatch() {
        assert!(!verify_password("x".into(), "not-a-hash".into())
            .await
            .unwrap());
    }
}
