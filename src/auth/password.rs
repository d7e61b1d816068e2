use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

/// Argon2id v1.3 with the crate's recommended cost parameters. Stored hashes
/// carry their own parameters, so verification keeps working if these change.
fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

/// PHC string (`$argon2id$v=19$...`) for a fresh random salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    match hasher().hash_password(plain.as_bytes(), &salt) {
        Ok(phc) => Ok(phc.to_string()),
        Err(e) => {
            error!(error = %e, "password hashing failed");
            anyhow::bail!("password hashing failed: {e}")
        }
    }
}

/// `Ok(false)` on mismatch; `Err` when the stored hash is unreadable or verification itself fails.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let phc = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password hash is unreadable");
        anyhow::anyhow!("unreadable password hash: {e}")
    })?;
    match hasher().verify_password(plain.as_bytes(), &phc) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => {
            error!(error = %e, "password verification failed");
            anyhow::bail!("password verification failed: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("pw1").expect("hashing should succeed");
        assert!(verify_password("pw1", &hash).expect("verify should succeed"));
    }

    #[test]
    fn hash_records_algorithm_and_cost() {
        let hash = hash_password("pw1").unwrap();
        let expected = format!(
            "$argon2id$v=19$m={},t={},p={}$",
            Params::DEFAULT_M_COST,
            Params::DEFAULT_T_COST,
            Params::DEFAULT_P_COST
        );
        assert!(hash.starts_with(&expected), "{hash}");
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("correct-horse").unwrap();
        assert!(!verify_password("wrong-horse", &hash).expect("mismatch is not an error"));
        assert!(!verify_password("", &hash).expect("mismatch is not an error"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("pw1").unwrap();
        let b = hash_password("pw1").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("pw1", &a).unwrap());
        assert!(verify_password("pw1", &b).unwrap());
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(err.to_string().starts_with("unreadable password hash"));
    }
}
