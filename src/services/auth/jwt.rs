/*
 * Responsibility
 * - access token (JWT, HS256) の発行と検証
 * - 署名アルゴリズムはここで固定する (caller から受け取らない)
 * - 検証は decode + strict claim check の二段構え
 */
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use std::{error::Error as StdError, fmt};

/// Tokens expire exactly 24 hours after issuance. There is no renewal; a
/// fresh login issues a fresh token.
pub const TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

const ISSUER: &str = "fitplan-ai";

// Errors returned by token verification + strict claim validation.
#[derive(Debug)]
pub enum TokenError {
    Jwt(jsonwebtoken::errors::Error),
    EmptyClaim(&'static str),
    InvalidSubject,
}

impl TokenError {
    /// True iff the failure was a MAC mismatch, as opposed to a malformed,
    /// expired, or otherwise invalid token.
    pub fn is_signature_mismatch(&self) -> bool {
        matches!(self, Self::Jwt(e) if matches!(e.kind(), ErrorKind::InvalidSignature))
    }

    /// True for failures found after signature/time checks passed
    /// (claims that decode but make no sense for this application).
    pub fn is_claim_failure(&self) -> bool {
        matches!(self, Self::EmptyClaim(_) | Self::InvalidSubject)
    }
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::EmptyClaim(name) => write!(f, "empty '{}' claim", name),
            Self::InvalidSubject => write!(f, "'sub' does not match the user id"),
        }
    }
}

impl StdError for TokenError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// Claims embedded in every token. Immutable once signed.
///
/// `exp` is always `iat + TOKEN_TTL_SECONDS`; `sub` is the stringified
/// user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,

    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,

    pub iss: String,
    pub sub: String,
}

/// 検証済み・アプリ側で使う型。middleware はこれを AuthCtx に詰める。
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    pub user_id: i64,
    pub email: String,
}

/// HS256 token issuer/verifier over the process-wide signing secret.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        // Accept HS256 only. A token declaring any other algorithm fails
        // before the secret is ever used as a MAC key.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a fresh token for `user_id`/`email`. Reads the clock once.
    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id,
            email: email.to_string(),
            iat: now,
            nbf: now,
            exp: now + TOKEN_TTL_SECONDS,
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
        };

        // Header is constructed here with the fixed HMAC algorithm.
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    // Verify signature and registered claims (exp/nbf/iss), decode.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    /// Verify + strict claim validation, then convert into the
    /// application-facing type.
    ///
    /// `jsonwebtoken::Validation` already checks signature, `exp`, `nbf`
    /// and `iss`; this additionally rejects tokens whose identity claims
    /// are empty or inconsistent.
    pub fn verify_strict(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let claims = self.verify(token)?;

        if claims.email.trim().is_empty() {
            return Err(TokenError::EmptyClaim("email"));
        }
        if claims.user_id <= 0 {
            return Err(TokenError::EmptyClaim("user_id"));
        }
        if claims.sub.parse::<i64>() != Ok(claims.user_id) {
            return Err(TokenError::InvalidSubject);
        }

        Ok(VerifiedToken {
            user_id: claims.user_id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn service() -> TokenService {
        TokenService::new(SECRET)
    }

    fn claims_with_exp(iat: i64, exp: i64) -> Claims {
        Claims {
            user_id: 7,
            email: "a@x.com".to_string(),
            iat,
            nbf: iat,
            exp,
            iss: ISSUER.to_string(),
            sub: "7".to_string(),
        }
    }

    fn encode(claims: &Claims, algorithm: Algorithm) -> String {
        jsonwebtoken::encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issue_then_verify_returns_the_same_identity() {
        let svc = service();
        let token = svc.issue(7, "a@x.com").unwrap();

        let verified = svc.verify_strict(&token).unwrap();
        assert_eq!(verified.user_id, 7);
        assert_eq!(verified.email, "a@x.com");

        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.exp, claims.iat + TOKEN_TTL_SECONDS);
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn verification_is_idempotent() {
        let svc = service();
        let token = svc.issue(7, "a@x.com").unwrap();

        let first = svc.verify_strict(&token).unwrap();
        let second = svc.verify_strict(&token).unwrap();
        assert_eq!(first.user_id, second.user_id);
        assert_eq!(first.email, second.email);
    }

    #[test]
    fn rejects_a_token_signed_with_a_different_secret() {
        let svc = service();
        let foreign = TokenService::new("some-other-secret");
        let token = foreign.issue(7, "a@x.com").unwrap();

        let err = svc.verify_strict(&token).unwrap_err();
        assert!(err.is_signature_mismatch());
    }

    #[test]
    fn rejects_a_tampered_payload() {
        let svc = service();
        let token = svc.issue(7, "a@x.com").unwrap();

        // Flip one character inside the payload segment.
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let payload = &mut parts[1];
        let flipped = if payload.ends_with('A') { 'B' } else { 'A' };
        payload.pop();
        payload.push(flipped);

        assert!(svc.verify_strict(&parts.join(".")).is_err());
    }

    #[test]
    fn accepts_a_token_just_before_expiry() {
        let svc = service();
        let now = Utc::now().timestamp();
        // Issued 23h59m ago: one minute of validity left.
        let iat = now - (TOKEN_TTL_SECONDS - 60);
        let token = encode(&claims_with_exp(iat, iat + TOKEN_TTL_SECONDS), Algorithm::HS256);

        assert!(svc.verify_strict(&token).is_ok());
    }

    #[test]
    fn rejects_a_token_just_after_expiry() {
        let svc = service();
        let now = Utc::now().timestamp();
        // Issued 24h01m ago: one minute past expiry, no leeway.
        let iat = now - (TOKEN_TTL_SECONDS + 60);
        let token = encode(&claims_with_exp(iat, iat + TOKEN_TTL_SECONDS), Algorithm::HS256);

        let err = svc.verify_strict(&token).unwrap_err();
        assert!(!err.is_signature_mismatch());
        assert!(!err.is_claim_failure());
    }

    #[test]
    fn rejects_a_caller_chosen_algorithm() {
        let svc = service();
        let now = Utc::now().timestamp();
        // Same secret, different MAC algorithm: the pinned validation must
        // refuse it without consulting the key.
        let token = encode(&claims_with_exp(now, now + TOKEN_TTL_SECONDS), Algorithm::HS384);

        assert!(svc.verify_strict(&token).is_err());
    }

    #[test]
    fn rejects_empty_identity_claims() {
        let svc = service();
        let now = Utc::now().timestamp();

        let mut claims = claims_with_exp(now, now + TOKEN_TTL_SECONDS);
        claims.email = String::new();
        let err = svc.verify_strict(&encode(&claims, Algorithm::HS256)).unwrap_err();
        assert!(err.is_claim_failure());

        let mut claims = claims_with_exp(now, now + TOKEN_TTL_SECONDS);
        claims.sub = "8".to_string();
        let err = svc.verify_strict(&encode(&claims, Algorithm::HS256)).unwrap_err();
        assert!(err.is_claim_failure());
    }
}
