/*
 * Responsibility
 * - パスワードの hash / verify (bcrypt)
 * - salt は bcrypt が毎回生成して digest に埋め込む
 * - 不一致は Ok(false)、ハッシュ処理の失敗だけが Err
 */
use bcrypt::{BcryptError, DEFAULT_COST};

pub fn hash(plain: &str) -> Result<String, BcryptError> {
    bcrypt::hash(plain, DEFAULT_COST)
}

/// Re-hashes `plain` against the params embedded in `digest` and compares in
/// constant time. A mismatch is not an error.
pub fn verify(digest: &str, plain: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(plain, digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verify_round_trip() {
        let digest = hash("secret123").unwrap();
        assert!(verify(&digest, "secret123").unwrap());
        assert!(!verify(&digest, "secret123x").unwrap());
    }

    #[test]
    fn digest_is_self_describing_and_salted() {
        let a = hash("secret123").unwrap();
        let b = hash("secret123").unwrap();
        // Per-call salt: same input, different digests, both verify.
        assert_ne!(a, b);
        assert!(a.starts_with("$2"));
        assert!(verify(&b, "secret123").unwrap());
    }

    #[test]
    fn malformed_digest_is_an_error_not_a_mismatch() {
        assert!(verify("not-a-bcrypt-digest", "secret123").is_err());
    }
}
