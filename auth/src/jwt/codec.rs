use std::fmt;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::SessionClaims;
use super::claims::TokenKind;
use super::errors::TokenError;
use crate::clock::Clock;
use crate::session::Identity;
use crate::session::SessionId;

/// Signed token together with its expiration.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Mints and verifies session tokens.
///
/// Stateless apart from the signing secret, which is fixed at construction.
/// Uses HS256 (HMAC with SHA-256) and accepts nothing else.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Self::ALGORITHM)
            .finish()
    }
}

impl TokenCodec {
    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Create a codec bound to a signing secret.
    ///
    /// # Arguments
    /// * `secret` - Shared HMAC secret (at least 32 bytes recommended)
    /// * `clock` - Time source for issue and expiry checks
    ///
    /// # Errors
    /// * `MissingSecret` - The secret is empty
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(Self::ALGORITHM);
        // Expiry is checked against the injected clock after the signature.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
        })
    }

    /// Mint a token asserting `identity` within `session_id`.
    ///
    /// # Returns
    /// Encoded token string
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn mint(
        &self,
        identity: &Identity,
        session_id: &SessionId,
        kind: TokenKind,
    ) -> Result<String, TokenError> {
        self.issue(identity, session_id, kind).map(|issued| issued.token)
    }

    /// Mint a token and report when it expires.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(
        &self,
        identity: &Identity,
        session_id: &SessionId,
        kind: TokenKind,
    ) -> Result<IssuedToken, TokenError> {
        let now = self.clock.now();
        let claims = SessionClaims::issue(identity.clone(), session_id.clone(), kind, now);

        let token = encode(&Header::new(Self::ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: now + kind.lifetime(),
        })
    }

    /// Verify a token of either kind.
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `InvalidSignature` - Bad signature or unexpected algorithm
    /// * `MalformedClaims` - Token or claim set cannot be decoded
    /// * `Expired` - Signature is valid but the lifetime is over
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(Self::classify)?;

        let claims = token_data.claims;
        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Verify a token and require a specific kind.
    ///
    /// # Errors
    /// * `WrongKind` - Token is genuine but of the other kind
    /// * Any error from [`TokenCodec::verify`]
    pub fn verify_kind(&self, token: &str, expected: TokenKind) -> Result<SessionClaims, TokenError> {
        let claims = self.verify(token)?;

        if claims.kind != expected {
            return Err(TokenError::WrongKind {
                expected,
                found: claims.kind,
            });
        }

        Ok(claims)
    }

    fn classify(error: jsonwebtoken::errors::Error) -> TokenError {
        match error.kind() {
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::MalformedClaims(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde::Serialize;

    use super::*;
    use crate::clock::ManualClock;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn codec_with_clock() -> (TokenCodec, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let codec = TokenCodec::new(SECRET, clock.clone()).expect("Failed to build codec");
        (codec, clock)
    }

    fn session() -> SessionId {
        SessionId::generate()
    }

    #[test]
    fn test_mint_and_verify_round_trip() {
        let (codec, _clock) = codec_with_clock();
        let identity = Identity::from(42_i64);
        let session_id = session();

        for kind in [TokenKind::Access, TokenKind::Refresh] {
            let token = codec
                .mint(&identity, &session_id, kind)
                .expect("Failed to mint token");
            let claims = codec.verify(&token).expect("Failed to verify token");

            assert_eq!(claims.identity(), &identity);
            assert_eq!(claims.session_id(), &session_id);
            assert_eq!(claims.kind, kind);
        }
    }

    #[test]
    fn test_access_token_expires_after_fifteen_minutes() {
        let (codec, clock) = codec_with_clock();
        let token = codec
            .mint(&Identity::from(1_i64), &session(), TokenKind::Access)
            .unwrap();

        clock.advance(Duration::minutes(14));
        assert!(codec.verify(&token).is_ok());

        clock.advance(Duration::minutes(1));
        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_refresh_token_outlives_access_token() {
        let (codec, clock) = codec_with_clock();
        let token = codec
            .mint(&Identity::from(1_i64), &session(), TokenKind::Refresh)
            .unwrap();

        clock.advance(Duration::days(6));
        assert!(codec.verify(&token).is_ok());

        clock.advance(Duration::days(1));
        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_expired_tampered_token_reports_signature() {
        let (codec, clock) = codec_with_clock();
        let other = TokenCodec::new(b"another_secret_at_least_32_bytes!!", clock.clone()).unwrap();
        let token = other
            .mint(&Identity::from(1_i64), &session(), TokenKind::Access)
            .unwrap();

        clock.advance(Duration::hours(1));
        assert_eq!(codec.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_issue_reports_expiry() {
        let (codec, clock) = codec_with_clock();
        let issued = codec
            .issue(&Identity::from(1_i64), &session(), TokenKind::Access)
            .unwrap();

        assert_eq!(issued.expires_at, clock.now() + Duration::minutes(15));
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let (codec, clock) = codec_with_clock();
        let other = TokenCodec::new(b"another_secret_at_least_32_bytes!!", clock).unwrap();

        let token = other
            .mint(&Identity::from(1_i64), &session(), TokenKind::Access)
            .unwrap();

        assert_eq!(codec.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_spliced_payload_is_invalid_signature() {
        let (codec, _clock) = codec_with_clock();
        let session_id = session();
        let victim = codec
            .mint(&Identity::from(1_i64), &session_id, TokenKind::Access)
            .unwrap();
        let attacker = codec
            .mint(&Identity::from(2_i64), &session_id, TokenKind::Access)
            .unwrap();

        let victim_parts: Vec<&str> = victim.split('.').collect();
        let attacker_parts: Vec<&str> = attacker.split('.').collect();
        let forged = format!(
            "{}.{}.{}",
            victim_parts[0], attacker_parts[1], victim_parts[2]
        );

        assert_eq!(codec.verify(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_unexpected_algorithm_rejected() {
        let (codec, clock) = codec_with_clock();
        let claims = SessionClaims::issue(
            Identity::from(1_i64),
            session(),
            TokenKind::Access,
            clock.now(),
        );

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(codec.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_unsigned_token_rejected() {
        let (codec, _clock) = codec_with_clock();
        // {"alg":"none","typ":"JWT"} . {"sub":"1","sid":"x","kind":"access","iat":0,"exp":9999999999} .
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.\
                     eyJzdWIiOiIxIiwic2lkIjoieCIsImtpbmQiOiJhY2Nlc3MiLCJpYXQiOjAsImV4cCI6OTk5OTk5OTk5OX0.";

        assert!(codec.verify(token).is_err());
    }

    #[test]
    fn test_garbage_is_malformed() {
        let (codec, _clock) = codec_with_clock();

        let result = codec.verify("invalid.token.here");
        assert!(matches!(result, Err(TokenError::MalformedClaims(_))));
    }

    #[test]
    fn test_missing_claim_is_malformed() {
        #[derive(Serialize)]
        struct PartialClaims {
            sub: String,
            kind: String,
            iat: i64,
            exp: i64,
        }

        let (codec, clock) = codec_with_clock();
        let now = clock.now().timestamp();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &PartialClaims {
                sub: "42".to_string(),
                kind: "access".to_string(),
                iat: now,
                exp: now + 60,
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            codec.verify(&token),
            Err(TokenError::MalformedClaims(_))
        ));
    }

    #[test]
    fn test_verify_kind() {
        let (codec, _clock) = codec_with_clock();
        let token = codec
            .mint(&Identity::from(1_i64), &session(), TokenKind::Access)
            .unwrap();

        assert!(codec.verify_kind(&token, TokenKind::Access).is_ok());
        assert_eq!(
            codec.verify_kind(&token, TokenKind::Refresh),
            Err(TokenError::WrongKind {
                expected: TokenKind::Refresh,
                found: TokenKind::Access,
            })
        );
    }

    #[test]
    fn test_empty_secret_rejected() {
        let clock = Arc::new(ManualClock::starting_now());
        assert!(matches!(
            TokenCodec::new(b"", clock),
            Err(TokenError::MissingSecret)
        ));
    }
}
