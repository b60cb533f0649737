use bcrypt::{hash, verify, DEFAULT_COST};

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "secret123";
        let hashed_password = hash_password(password).unwrap();
        assert_ne!(hashed_password, password);
        assert!(verify_password(password, &hashed_password).unwrap());
        assert!(!verify_password("wrong", &hashed_password).unwrap());
    }
}
