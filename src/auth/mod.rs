//! Account management: registration, password login, code-based verification
//! and reset, and the biometric credential stub.

pub mod identifier;

use std::sync::Arc;
use std::time::Duration;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{biometric_credential, user, verification_code};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::notifications::Notifier;

use identifier::Identifier;

/// How long issued verification / reset codes stay valid.
const CODE_VALIDITY: chrono::Duration = chrono::Duration::minutes(10);

/// JWT claims carried by access tokens. `sub` is the canonical identifier
/// (email or normalized phone), matching the source system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_lifetime: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: String, token_lifetime: Duration) -> Result<Self, ServiceError> {
        if jwt_secret.len() < 32 {
            return Err(ServiceError::InvalidInput(
                "JWT secret must be at least 32 bytes".into(),
            ));
        }
        Ok(Self {
            jwt_secret,
            token_lifetime,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterInput {
    /// Email address (this or `phone` is required)
    pub email: Option<String>,
    /// Turkish mobile number (this or `email` is required)
    pub phone: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1))]
    pub full_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Service owning all account state transitions.
#[derive(Clone)]
pub struct AuthService {
    db: Arc<DbPool>,
    config: AuthConfig,
    notifier: Arc<dyn Notifier>,
    event_sender: EventSender,
}

impl AuthService {
    pub fn new(
        config: AuthConfig,
        db: Arc<DbPool>,
        notifier: Arc<dyn Notifier>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            db,
            config,
            notifier,
            event_sender,
        }
    }

    /// Registers a new account and issues a verification code to the chosen
    /// channel. At least one of email / phone must be supplied.
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: RegisterInput) -> Result<user::Model, ServiceError> {
        input.validate()?;

        let email = input
            .email
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(Identifier::parse)
            .transpose()?;
        let phone = input
            .phone
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(Identifier::parse)
            .transpose()?;

        let email = match email {
            Some(Identifier::Email(v)) => Some(v),
            Some(Identifier::Phone(_)) => {
                return Err(ServiceError::ValidationError(
                    "The email field does not contain an email address".into(),
                ))
            }
            None => None,
        };
        let phone = match phone {
            Some(Identifier::Phone(v)) => Some(v),
            Some(Identifier::Email(_)) => {
                return Err(ServiceError::ValidationError(
                    "The phone field does not contain a phone number".into(),
                ))
            }
            None => None,
        };

        if email.is_none() && phone.is_none() {
            return Err(ServiceError::ValidationError(
                "Either an email address or a phone number is required".into(),
            ));
        }

        let primary = match (&email, &phone) {
            (Some(e), _) => Identifier::Email(e.clone()),
            (_, Some(p)) => Identifier::Phone(p.clone()),
            _ => unreachable!(),
        };

        // Both channels are unique; checking only the primary would let a
        // duplicate secondary fall through to the index as a 500.
        let taken = [
            email.clone().map(Identifier::Email),
            phone.clone().map(Identifier::Phone),
        ];
        for identifier in taken.into_iter().flatten() {
            if self.find_user(&identifier).await?.is_some() {
                return Err(ServiceError::Conflict(
                    "An account with this identifier already exists".into(),
                ));
            }
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            phone: Set(phone),
            full_name: Set(input.full_name.clone()),
            password_hash: Set(password_hash),
            is_verified: Set(false),
            created_at: Set(Utc::now()),
        };

        let created = model.insert(&*self.db).await?;
        self.event_sender.send(Event::UserRegistered(created.id)).await;

        let code = self.issue_code(&primary, CodePurpose::Verify).await?;
        self.notifier
            .send_verification_code(&primary, &created.full_name, &code)
            .await?;

        info!(user_id = %created.id, "user registered");
        Ok(created)
    }

    /// Password login. Returns a bearer token on success.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        identifier_raw: &str,
        password: &str,
    ) -> Result<TokenResponse, ServiceError> {
        let identifier = Identifier::parse(identifier_raw)?;
        let user = self
            .find_user(&identifier)
            .await?
            .ok_or_else(|| ServiceError::AuthError("Invalid credentials".into()))?;

        verify_password(password, &user.password_hash)?;

        Ok(self.token_response(identifier.as_str())?)
    }

    /// Confirms an account with a previously issued verification code.
    #[instrument(skip(self, code))]
    pub async fn verify(&self, identifier_raw: &str, code: &str) -> Result<(), ServiceError> {
        let identifier = Identifier::parse(identifier_raw)?;
        let user = self
            .find_user(&identifier)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Account not found".into()))?;

        self.consume_code(&identifier, CodePurpose::Verify, code)
            .await?;

        let mut active: user::ActiveModel = user.clone().into();
        active.is_verified = Set(true);
        active.update(&*self.db).await?;

        self.event_sender.send(Event::UserVerified(user.id)).await;
        Ok(())
    }

    /// Issues a fresh verification code for an unverified account.
    #[instrument(skip(self))]
    pub async fn resend_verification(&self, identifier_raw: &str) -> Result<(), ServiceError> {
        let identifier = Identifier::parse(identifier_raw)?;
        let user = self
            .find_user(&identifier)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Account not found".into()))?;

        if user.is_verified {
            return Err(ServiceError::InvalidOperation(
                "Account is already verified".into(),
            ));
        }

        let code = self.issue_code(&identifier, CodePurpose::Verify).await?;
        self.notifier
            .send_verification_code(&identifier, &user.full_name, &code)
            .await
    }

    /// Starts a password reset by issuing a reset code.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, identifier_raw: &str) -> Result<(), ServiceError> {
        let identifier = Identifier::parse(identifier_raw)?;
        let user = self
            .find_user(&identifier)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Account not found".into()))?;

        let code = self.issue_code(&identifier, CodePurpose::Reset).await?;
        self.notifier
            .send_password_reset_code(&identifier, &user.full_name, &code)
            .await
    }

    /// Completes a password reset with a valid reset code.
    #[instrument(skip(self, code, new_password))]
    pub async fn reset_password(
        &self,
        identifier_raw: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        if new_password.len() < 6 {
            return Err(ServiceError::ValidationError(
                "Password must be at least 6 characters".into(),
            ));
        }

        let identifier = Identifier::parse(identifier_raw)?;
        let user = self
            .find_user(&identifier)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Account not found".into()))?;

        self.consume_code(&identifier, CodePurpose::Reset, code)
            .await?;

        let mut active: user::ActiveModel = user.clone().into();
        active.password_hash = Set(hash_password(new_password)?);
        active.update(&*self.db).await?;

        self.event_sender.send(Event::PasswordReset(user.id)).await;
        Ok(())
    }

    /// The account behind a decoded token.
    pub async fn current_user(&self, claims: &Claims) -> Result<user::Model, ServiceError> {
        let identifier = Identifier::parse(&claims.sub)?;
        self.find_user(&identifier)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Account no longer exists".into()))
    }

    /// Stores a biometric credential for later credential-id login.
    #[instrument(skip(self, public_key))]
    pub async fn register_biometric(
        &self,
        user_id: Uuid,
        credential_id: &str,
        public_key: &str,
    ) -> Result<biometric_credential::Model, ServiceError> {
        if credential_id.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "credential_id must not be empty".into(),
            ));
        }

        user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Account not found".into()))?;

        let existing = biometric_credential::Entity::find()
            .filter(biometric_credential::Column::CredentialId.eq(credential_id))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "This credential is already registered".into(),
            ));
        }

        let model = biometric_credential::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            credential_id: Set(credential_id.to_string()),
            public_key: Set(public_key.to_string()),
            created_at: Set(Utc::now()),
        };

        Ok(model.insert(&*self.db).await?)
    }

    /// Credential-id login. Stub semantics: the signature and challenge are
    /// accepted without a WebAuthn ceremony, matching the unfinished source
    /// flow. Only the credential id is checked against the store.
    #[instrument(skip(self))]
    pub async fn biometric_login(&self, credential_id: &str) -> Result<TokenResponse, ServiceError> {
        let credential = biometric_credential::Entity::find()
            .filter(biometric_credential::Column::CredentialId.eq(credential_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::AuthError("Unknown credential".into()))?;

        let user = user::Entity::find_by_id(credential.user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::AuthError("Account no longer exists".into()))?;

        let subject = user
            .email
            .or(user.phone)
            .ok_or_else(|| ServiceError::InternalError("Account has no identifier".into()))?;

        Ok(self.token_response(&subject)?)
    }

    /// Decodes and validates an access token.
    pub fn decode_token(&self, token: &str) -> Result<Claims, ServiceError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| ServiceError::JwtError(e.to_string()))?;
        Ok(data.claims)
    }

    fn token_response(&self, subject: &str) -> Result<TokenResponse, ServiceError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::from_std(self.config.token_lifetime)
                .map_err(|e| ServiceError::InternalError(e.to_string()))?)
            .timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::JwtError(e.to_string()))?;

        Ok(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
        })
    }

    async fn find_user(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<user::Model>, ServiceError> {
        let query = match identifier {
            Identifier::Email(v) => user::Entity::find().filter(user::Column::Email.eq(v.clone())),
            Identifier::Phone(v) => user::Entity::find().filter(user::Column::Phone.eq(v.clone())),
        };
        Ok(query.one(&*self.db).await?)
    }

    async fn issue_code(
        &self,
        identifier: &Identifier,
        purpose: CodePurpose,
    ) -> Result<String, ServiceError> {
        let code = generate_code();
        let model = verification_code::ActiveModel {
            id: Set(Uuid::new_v4()),
            identifier: Set(identifier.as_str().to_string()),
            code: Set(code.clone()),
            purpose: Set(purpose.as_str().to_string()),
            expires_at: Set(Utc::now() + CODE_VALIDITY),
            consumed: Set(false),
            created_at: Set(Utc::now()),
        };
        model.insert(&*self.db).await?;
        Ok(code)
    }

    async fn consume_code(
        &self,
        identifier: &Identifier,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<(), ServiceError> {
        let found = verification_code::Entity::find()
            .filter(verification_code::Column::Identifier.eq(identifier.as_str()))
            .filter(verification_code::Column::Purpose.eq(purpose.as_str()))
            .filter(verification_code::Column::Consumed.eq(false))
            .order_by_desc(verification_code::Column::CreatedAt)
            .one(&*self.db)
            .await?;

        let found = match found {
            Some(model) if model.code == code && model.expires_at > Utc::now() => model,
            _ => {
                return Err(ServiceError::ValidationError(
                    "Invalid or expired verification code".into(),
                ))
            }
        };

        let mut active: verification_code::ActiveModel = found.into();
        active.consumed = Set(true);
        active.update(&*self.db).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum CodePurpose {
    Verify,
    Reset,
}

impl CodePurpose {
    fn as_str(self) -> &'static str {
        match self {
            CodePurpose::Verify => "verify",
            CodePurpose::Reset => "reset",
        }
    }
}

fn generate_code() -> String {
    format!("{}", rand::thread_rng().gen_range(100_000..=999_999))
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ServiceError::HashError(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> Result<(), ServiceError> {
    let parsed = PasswordHash::new(hash).map_err(|e| ServiceError::HashError(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ServiceError::AuthError("Invalid credentials".into()))
}

/// Extractor for handlers that require a valid bearer token.
pub struct AuthUser(pub Claims);

impl FromRequestParts<crate::AppState> for AuthUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &crate::AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state)?
            .ok_or_else(|| ServiceError::Unauthorized("Missing bearer token".into()))?;
        Ok(AuthUser(claims))
    }
}

/// Extractor that yields claims when a valid token is present and `None`
/// otherwise. An invalid token is still rejected.
pub struct OptionalAuthUser(pub Option<Claims>);

impl FromRequestParts<crate::AppState> for OptionalAuthUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &crate::AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(claims_from_parts(parts, state)?))
    }
}

fn claims_from_parts(
    parts: &Parts,
    state: &crate::AppState,
) -> Result<Option<Claims>, ServiceError> {
    let header = match parts.headers.get(http::header::AUTHORIZATION) {
        Some(value) => value,
        None => return Ok(None),
    };

    let value = header
        .to_str()
        .map_err(|_| ServiceError::Unauthorized("Malformed authorization header".into()))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ServiceError::Unauthorized("Expected a bearer token".into()))?;

    state.auth.decode_token(token).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("gizli-sifre").unwrap();
        assert!(verify_password("gizli-sifre", &hash).is_ok());
        assert!(verify_password("yanlis", &hash).is_err());
    }

    #[test]
    fn auth_config_rejects_short_secret() {
        assert!(AuthConfig::new("short".into(), Duration::from_secs(60)).is_err());
    }
}
