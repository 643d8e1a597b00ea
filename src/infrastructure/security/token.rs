// src/infrastructure/security/token.rs
use crate::application::{
    dto::{AuthTokenDto, TokenClaims, auth::BEARER_TOKEN_TYPE},
    error::{ApplicationError, ApplicationResult, TokenError},
    ports::{security::TokenManager, time::Clock},
};
use crate::domain::account::AccountId;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};

/// Wire form of the claim set: subject as a string, times as unix seconds.
#[derive(Debug, Serialize, Deserialize)]
struct RawClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// HS256 JWT bearer tokens.
///
/// The key is fixed when the manager is built and never changes afterwards.
/// There is no rotation and no revocation list: anyone holding the secret can
/// mint a token for any account, and a token is only retired by its `exp`
/// claim or by its account disappearing from the store.
#[derive(Clone)]
pub struct JwtTokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: ChronoDuration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenManager {
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> ApplicationResult<Self> {
        if secret.is_empty() {
            return Err(ApplicationError::infrastructure(
                "token signing secret cannot be empty",
            ));
        }

        let ttl = ChronoDuration::from_std(ttl)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        if ttl < ChronoDuration::seconds(1) {
            return Err(ApplicationError::infrastructure(
                "token ttl must be at least one second",
            ));
        }
        if expiry_after(clock.now(), ttl).is_none() {
            return Err(ApplicationError::infrastructure(
                "token ttl puts the expiry out of range",
            ));
        }

        // Expiry is checked against the injected clock in `verify`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        })
    }
}

fn expiry_after(issued_at: DateTime<Utc>, ttl: ChronoDuration) -> Option<DateTime<Utc>> {
    issued_at
        .timestamp()
        .checked_add(ttl.num_seconds())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

fn timestamp(secs: i64, what: &str) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| TokenError::malformed(format!("{what} is out of range")))
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::malformed(err.to_string()),
    }
}

impl TokenManager for JwtTokenManager {
    fn issue(&self, subject: AccountId) -> ApplicationResult<AuthTokenDto> {
        let now = self.clock.now();
        let issued_at = timestamp(now.timestamp(), "iat")
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let expires_at = expiry_after(issued_at, self.ttl)
            .ok_or_else(|| ApplicationError::infrastructure("token expiration overflow"))?;

        let claims = RawClaims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(AuthTokenDto {
            token,
            token_type: BEARER_TOKEN_TYPE.into(),
            issued_at,
            expires_at,
            expires_in: self.ttl.num_seconds(),
        })
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        // `decode` checks the signature before it parses the claims.
        let raw = decode::<RawClaims>(token, &self.decoding_key, &self.validation)
            .map_err(map_jwt_error)?
            .claims;

        let subject: AccountId = raw
            .sub
            .parse()
            .map_err(|_| TokenError::malformed("invalid subject"))?;
        if raw.exp < raw.iat {
            return Err(TokenError::malformed("token expires before it was issued"));
        }

        if self.clock.now().timestamp() > raw.exp {
            return Err(TokenError::Expired);
        }

        Ok(TokenClaims {
            subject,
            issued_at: timestamp(raw.iat, "iat")?,
            expires_at: timestamp(raw.exp, "exp")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Arc<Self> {
            let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
            Arc::new(Self(Mutex::new(start)))
        }

        fn advance(&self, by: ChronoDuration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn manager(clock: Arc<ManualClock>) -> JwtTokenManager {
        JwtTokenManager::new(SECRET, Duration::from_secs(3 * 60 * 60), clock).unwrap()
    }

    fn alice() -> AccountId {
        AccountId::new(7).unwrap()
    }

    #[test]
    fn issued_token_verifies_to_its_subject() {
        let clock = ManualClock::new();
        let tokens = manager(clock.clone());
        let issued = tokens.issue(alice()).unwrap();

        let claims = tokens.verify(&issued.token).unwrap();
        assert_eq!(claims.subject, alice());
        assert_eq!(claims.expires_at - claims.issued_at, ChronoDuration::hours(3));
        assert_eq!(issued.expires_in, 3 * 60 * 60);
        assert_eq!(issued.token_type, "Bearer");
    }

    #[test]
    fn issued_token_is_a_standard_hs256_jwt() {
        let tokens = manager(ManualClock::new());
        let issued = tokens.issue(alice()).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let decoded = decode::<RawClaims>(
            &issued.token,
            &DecodingKey::from_secret(SECRET),
            &validation,
        )
        .unwrap();

        assert_eq!(decoded.header.alg, Algorithm::HS256);
        assert_eq!(decoded.claims.sub, "7");
        assert_eq!(decoded.claims.iat, 1_700_000_000);
        assert_eq!(decoded.claims.exp, 1_700_000_000 + 3 * 60 * 60);
    }

    #[test]
    fn token_past_its_ttl_is_expired_not_invalid() {
        let clock = ManualClock::new();
        let tokens = manager(clock.clone());
        let issued = tokens.issue(alice()).unwrap();

        clock.advance(ChronoDuration::hours(3));
        assert!(tokens.verify(&issued.token).is_ok());

        clock.advance(ChronoDuration::seconds(1));
        assert_eq!(tokens.verify(&issued.token), Err(TokenError::Expired));
    }

    #[test]
    fn any_mutated_byte_is_rejected() {
        let tokens = manager(ManualClock::new());
        let issued = tokens.issue(alice()).unwrap();
        let original = issued.token.as_bytes();

        for index in 0..original.len() {
            let mut mutated = original.to_vec();
            mutated[index] = if mutated[index] == b'A' { b'B' } else { b'A' };
            let mutated = String::from_utf8(mutated).unwrap();
            match tokens.verify(&mutated) {
                Err(TokenError::InvalidSignature) | Err(TokenError::Malformed(_)) => {}
                other => panic!("byte {index} mutated into {mutated} gave {other:?}"),
            }
        }
    }

    #[test]
    fn forged_claims_with_reused_signature_fail_signature_check() {
        let tokens = manager(ManualClock::new());
        let issued = tokens.issue(alice()).unwrap();
        let (_, signature) = issued.token.rsplit_once('.').unwrap();

        let forged = encode(
            &Header::new(Algorithm::HS256),
            &RawClaims {
                sub: "1".into(),
                iat: 1_700_000_000,
                exp: 4_000_000_000,
            },
            &EncodingKey::from_secret(b"attacker-chosen-key"),
        )
        .unwrap();
        let (signing_input, _) = forged.rsplit_once('.').unwrap();
        let token = format!("{signing_input}.{signature}");

        assert_eq!(tokens.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn token_signed_with_another_secret_is_invalid() {
        let clock = ManualClock::new();
        let other = JwtTokenManager::new(
            b"another-secret-another-secret-xx",
            Duration::from_secs(60),
            clock.clone(),
        )
        .unwrap();
        let issued = other.issue(alice()).unwrap();

        assert_eq!(
            manager(clock).verify(&issued.token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn token_for_another_algorithm_is_malformed() {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &RawClaims {
                sub: "7".into(),
                iat: 1_700_000_000,
                exp: 1_700_000_060,
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            manager(ManualClock::new()).verify(&token),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        let tokens = manager(ManualClock::new());
        for input in ["", "abc", "a.b", "a.b.c.d", "a.b.!!!"] {
            assert!(
                matches!(tokens.verify(input), Err(TokenError::Malformed(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn rejects_empty_secret_and_zero_ttl() {
        assert!(JwtTokenManager::new(b"", Duration::from_secs(60), ManualClock::new()).is_err());
        assert!(JwtTokenManager::new(SECRET, Duration::ZERO, ManualClock::new()).is_err());
    }

    #[test]
    fn rejects_a_ttl_whose_expiry_cannot_be_represented() {
        let huge = Duration::from_secs(10_000_000_000_000);
        assert!(JwtTokenManager::new(SECRET, huge, ManualClock::new()).is_err());

        let long = Duration::from_secs(365 * 24 * 60 * 60);
        let tokens = JwtTokenManager::new(SECRET, long, ManualClock::new()).unwrap();
        assert!(tokens.issue(alice()).is_ok());
    }
}
