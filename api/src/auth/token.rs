//! Signed, time-bound identity tokens.
//!
//! Tokens are HS256 JWTs carrying `{sub, iat, exp}` where `sub` is the staff
//! account's email. Nothing is stored server-side: a token is valid exactly
//! when its signature checks out under the configured secret and the current
//! time is strictly before `exp`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("token expiry falls outside the representable time range")]
    ExpiryOutOfRange,
}

/// Every verification failure. Deliberately carries no detail so callers
/// cannot tell a bad signature from an expired or garbled token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid token")]
pub struct InvalidToken;

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `verify_at` so the boundary is exclusive and
        // the clock can be pinned in tests.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Claims carry whole seconds, so `expires_at` is read back from `exp`
    /// and always matches what `verify_at` enforces.
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?
            .timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp,
        };
        let expires_at = expiry_of(&claims).ok_or(TokenError::ExpiryOutOfRange)?;
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, InvalidToken> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, InvalidToken> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| InvalidToken)?
            .claims;

        if claims.sub.is_empty() || claims.iat > claims.exp || now.timestamp() >= claims.exp {
            return Err(InvalidToken);
        }
        Ok(claims)
    }
}

/// `exp` as a timestamp.
pub fn expiry_of(claims: &Claims) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(claims.exp, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-testing-minimum-32-chars";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, Duration::hours(24))
    }

    fn at(ts: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(ts, 0).single().unwrap()
    }

    #[test]
    fn issued_token_verifies_to_its_subject() {
        let codec = codec();
        let issued = codec.issue("staff@example.com").unwrap();
        let claims = codec.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "staff@example.com");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(expiry_of(&claims), Some(issued.expires_at));
    }

    #[test]
    fn token_is_valid_until_the_second_before_expiry() {
        let codec = codec();
        let now = at(1_700_000_000);
        let issued = codec.issue_at("staff@example.com", now).unwrap();
        let exp = now + Duration::hours(24);

        assert!(codec.verify_at(&issued.token, now).is_ok());
        assert!(codec
            .verify_at(&issued.token, exp - Duration::seconds(1))
            .is_ok());
        assert_eq!(codec.verify_at(&issued.token, exp), Err(InvalidToken));
        assert_eq!(
            codec.verify_at(&issued.token, exp + Duration::days(3)),
            Err(InvalidToken)
        );
    }

    #[test]
    fn expiry_is_reported_in_whole_seconds() {
        let codec = codec();
        let now = at(1_700_000_000) + Duration::milliseconds(793);
        let issued = codec.issue_at("staff@example.com", now).unwrap();
        assert_eq!(issued.expires_at, at(1_700_000_000 + 24 * 3600));

        // The reported expiry is the first instant the token stops verifying.
        assert!(codec
            .verify_at(&issued.token, issued.expires_at - Duration::seconds(1))
            .is_ok());
        assert_eq!(codec.verify_at(&issued.token, issued.expires_at), Err(InvalidToken));
    }

    #[test]
    fn unrepresentable_expiry_is_an_error() {
        let codec = TokenCodec::new(SECRET, Duration::days(365 * 1_000_000));
        assert!(matches!(
            codec.issue("staff@example.com"),
            Err(TokenError::ExpiryOutOfRange)
        ));
    }

    #[test]
    fn tampered_signature_is_invalid() {
        let codec = codec();
        let token = codec.issue("staff@example.com").unwrap().token;
        let mut bytes = token.into_bytes();
        let last = bytes.len() - 2;
        bytes[last] = if bytes[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();
        assert_eq!(codec.verify(&tampered), Err(InvalidToken));
    }

    #[test]
    fn tampered_payload_is_invalid() {
        let codec = codec();
        let token = codec.issue("staff@example.com").unwrap().token;
        let other = codec.issue("someone-else@example.com").unwrap().token;
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);
        assert_eq!(codec.verify(&spliced), Err(InvalidToken));
    }

    #[test]
    fn token_from_another_secret_is_invalid() {
        let other = TokenCodec::new(b"another-secret-key-that-is-also-32-bytes", Duration::hours(1));
        let token = other.issue("staff@example.com").unwrap().token;
        assert_eq!(codec().verify(&token), Err(InvalidToken));
    }

    #[test]
    fn garbage_is_invalid() {
        let codec = codec();
        for token in ["", "abc", "a.b.c", "....", "Bearer", "eyJhbGciOiJIUzI1NiJ9.e30."] {
            assert_eq!(codec.verify(token), Err(InvalidToken), "{token:?}");
        }
    }

    #[test]
    fn unsigned_token_is_invalid() {
        // {"alg":"none","typ":"JWT"} . {"sub":"staff@example.com","iat":1,"exp":99999999999}
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.\
                     eyJzdWIiOiJzdGFmZkBleGFtcGxlLmNvbSIsImlhdCI6MSwiZXhwIjo5OTk5OTk5OTk5OX0.";
        assert_eq!(codec().verify(token), Err(InvalidToken));
    }

    #[test]
    fn other_algorithm_with_same_secret_is_invalid() {
        let now = Utc::now();
        let claims = Claims {
            sub: "staff@example.com".into(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(codec().verify(&token), Err(InvalidToken));
    }

    #[test]
    fn missing_subject_is_invalid() {
        let now = Utc::now().timestamp();
        let payload = serde_json::json!({ "iat": now, "exp": now + 3600 });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(codec().verify(&token), Err(InvalidToken));

        let empty_sub = serde_json::json!({ "sub": "", "iat": now, "exp": now + 3600 });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &empty_sub,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(codec().verify(&token), Err(InvalidToken));
    }
}
