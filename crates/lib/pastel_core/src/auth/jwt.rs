//! JWT session token generation and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::config::AuthConfig;
use super::{AuthError, TokenError};
use crate::models::account::Role;
use crate::models::auth::TokenClaims;

/// Issues and verifies HS256 session tokens with a fixed lifetime.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: config.token_ttl,
        }
    }

    /// Generate a signed token for `subject`, valid for the configured TTL.
    pub fn issue(&self, subject: Uuid, email: &str, role: Role) -> Result<String, AuthError> {
        self.issue_at(subject, email, role, Utc::now())
    }

    /// Generate a signed token as if issued at `issued_at`.
    pub fn issue_at(
        &self,
        subject: Uuid,
        email: &str,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = TokenClaims {
            sub: subject.to_string(),
            email: email.to_string(),
            role,
            exp: (issued_at + self.ttl).timestamp(),
            iat: issued_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }

    /// Verify signature and expiry, returning the claims on success.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let claims = decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })?;
        if claims.account_id().is_none() {
            return Err(TokenError::Invalid("subject is not an account id".into()));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(&AuthConfig::new(secret, Duration::hours(2)))
    }

    #[test]
    fn issued_token_verifies() {
        let tokens = issuer("test-secret");
        let id = Uuid::new_v4();
        let token = tokens.issue(id, "ana@mail.com", Role::User).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.account_id(), Some(id));
        assert_eq!(claims.email, "ana@mail.com");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, Duration::hours(2).num_seconds());
    }

    #[test]
    fn token_is_accepted_just_before_expiry() {
        let tokens = issuer("test-secret");
        let issued = Utc::now() - Duration::hours(2) + Duration::seconds(30);
        let token = tokens
            .issue_at(Uuid::new_v4(), "ana@mail.com", Role::User, issued)
            .unwrap();
        assert!(tokens.verify(&token).is_ok());
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let tokens = issuer("test-secret");
        let issued = Utc::now() - Duration::hours(2) - Duration::seconds(5);
        let token = tokens
            .issue_at(Uuid::new_v4(), "ana@mail.com", Role::User, issued)
            .unwrap();
        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = issuer("secret-a")
            .issue(Uuid::new_v4(), "ana@mail.com", Role::User)
            .unwrap();
        assert!(matches!(
            issuer("secret-b").verify(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn tampered_payload_is_invalid() {
        let tokens = issuer("test-secret");
        let token = tokens
            .issue(Uuid::new_v4(), "ana@mail.com", Role::User)
            .unwrap();
        let forged = tokens
            .issue(Uuid::new_v4(), "ana@mail.com", Role::Admin)
            .unwrap();

        // Splice the forged payload onto the original signature.
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);
        assert!(matches!(tokens.verify(&spliced), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn tampered_signature_is_invalid() {
        let tokens = issuer("test-secret");
        let token = tokens
            .issue(Uuid::new_v4(), "ana@mail.com", Role::User)
            .unwrap();
        let mut bytes = token.into_bytes();
        let last = bytes.len() - 2;
        bytes[last] = if bytes[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();
        assert!(matches!(tokens.verify(&tampered), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn garbage_is_invalid() {
        let tokens = issuer("test-secret");
        assert!(matches!(tokens.verify(""), Err(TokenError::Invalid(_))));
        assert!(matches!(
            tokens.verify("not.a.jwt"),
            Err(TokenError::Invalid(_))
        ));
    }
}
