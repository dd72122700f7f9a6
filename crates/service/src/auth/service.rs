use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, LoginInput, RegisterInput, SocialProfile};
use super::errors::AuthError;
use super::repository::{AuthRepository, NewPasswordUser};

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Token validity window; one day unless configured otherwise.
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self { jwt_secret: jwt_secret.into(), token_ttl: Duration::hours(24) }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }
}

/// Signed-token claims; subject is the user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Hash a password with a per-password random salt (argon2id).
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        Self { repo, cfg }
    }

    /// Register a new user with a hashed password.
    ///
    /// The username/email pre-checks give the friendly message; the store's
    /// unique indexes stay the authoritative guard, so a racing insert still
    /// comes back as `Conflict`.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        for (field, value) in [
            ("username", &input.username),
            ("password", &input.password),
            ("email", &input.email),
            ("instagramId", &input.instagram_id),
        ] {
            if value.trim().is_empty() {
                return Err(AuthError::missing_field(field));
            }
        }

        if let Some(existing) = self.repo.find_user_by_username(&input.username).await? {
            debug!("username taken: {}", existing.username);
            return Err(AuthError::Conflict("username already exists".into()));
        }
        if self.repo.find_user_by_email(&input.email).await?.is_some() {
            return Err(AuthError::Conflict("email already exists".into()));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .repo
            .create_password_user(NewPasswordUser {
                username: input.username,
                email: input.email,
                password_hash,
                instagram_id: input.instagram_id,
            })
            .await?;
        info!(user_id = %user.id, username = %user.username, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a signed token.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        if input.username.trim().is_empty() {
            return Err(AuthError::missing_field("username"));
        }
        if input.password.trim().is_empty() {
            return Err(AuthError::missing_field("password"));
        }

        let user = self
            .repo
            .find_user_by_username(&input.username)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        // Suspension is reported before any password comparison.
        if user.is_deleted {
            return Err(AuthError::Suspended);
        }

        let cred = self
            .repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        // OAuth-only accounts have no password; same message as a mismatch.
        let hash = cred.password_hash.ok_or(AuthError::Unauthorized)?;
        if !verify_password(&input.password, &hash)? {
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(user.id)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Issue an HS256 token with the user id as subject.
    pub fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + self.cfg.token_ttl).timestamp() as usize,
        };
        encode(
            &JwtHeader::default(),
            &claims,
            &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Resolve a token back to its user.
    ///
    /// Signature and expiry are checked; `is_deleted` deliberately is not,
    /// so a suspended user's token keeps working until it expires.
    pub async fn verify_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::TokenError("no token provided".into()));
        }
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AuthError::TokenError(e.to_string()))?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        self.repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthorized)
    }

    /// Login or first-time account creation from an identity-provider profile.
    ///
    /// Repeat logins return the stored user unchanged; no profile re-sync.
    /// A racing first login loses the insert to the unique index and is
    /// resolved by re-reading the winner's row.
    #[instrument(skip(self, profile), fields(provider = ?profile.provider))]
    pub async fn social_login(&self, profile: SocialProfile) -> Result<AuthUser, AuthError> {
        if let Some(user) = self
            .repo
            .find_user_by_provider(profile.provider, &profile.subject)
            .await?
        {
            return Ok(user);
        }

        match self.repo.create_social_user(&profile).await {
            Ok(user) => {
                info!(user_id = %user.id, "social_user_created");
                Ok(user)
            }
            Err(AuthError::Conflict(_)) => self
                .repo
                .find_user_by_provider(profile.provider, &profile.subject)
                .await?
                .ok_or(AuthError::Unauthorized),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::Provider;
    use crate::auth::repository::mock::MockAuthRepository;

    fn service() -> (Arc<MockAuthRepository>, AuthService<MockAuthRepository>) {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = AuthService::new(repo.clone(), AuthConfig::new("test-secret"));
        (repo, svc)
    }

    fn register_input(username: &str) -> RegisterInput {
        RegisterInput {
            username: username.into(),
            password: "pw1".into(),
            email: format!("{username}@x.com"),
            instagram_id: format!("ig_{username}"),
        }
    }

    #[tokio::test]
    async fn register_rejects_missing_fields() {
        let (_, svc) = service();
        let mut input = register_input("alice");
        input.instagram_id = "".into();
        let err = svc.register(input).await.unwrap_err();
        assert_eq!(err.to_string(), "please fill in the instagramId");
        assert_eq!(err.code(), 1001);
    }

    #[tokio::test]
    async fn register_duplicate_username_conflicts_regardless_of_email() {
        let (_, svc) = service();
        svc.register(register_input("alice")).await.unwrap();

        let mut second = register_input("alice");
        second.email = "other@x.com".into();
        second.instagram_id = "ig_other".into();
        let err = svc.register(second).await.unwrap_err();
        assert_eq!(err.to_string(), "username already exists");
    }

    #[tokio::test]
    async fn register_duplicate_email_conflicts() {
        let (_, svc) = service();
        svc.register(register_input("alice")).await.unwrap();

        let mut second = register_input("bob");
        second.email = "alice@x.com".into();
        let err = svc.register(second).await.unwrap_err();
        assert_eq!(err.to_string(), "email already exists");
    }

    #[tokio::test]
    async fn login_roundtrip_issues_verifiable_token() {
        let (_, svc) = service();
        let user = svc.register(register_input("alice")).await.unwrap();

        let session = svc
            .login(LoginInput { username: "alice".into(), password: "pw1".into() })
            .await
            .unwrap();
        assert_eq!(session.user.id, user.id);

        let resolved = svc.verify_token(&session.token).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_share_one_message() {
        let (_, svc) = service();
        svc.register(register_input("alice")).await.unwrap();

        let wrong_pw = svc
            .login(LoginInput { username: "alice".into(), password: "nope".into() })
            .await
            .unwrap_err();
        let unknown = svc
            .login(LoginInput { username: "ghost".into(), password: "pw1".into() })
            .await
            .unwrap_err();
        assert_eq!(wrong_pw.to_string(), unknown.to_string());
        assert_eq!(wrong_pw.to_string(), "invalid username or password");
    }

    #[tokio::test]
    async fn suspended_user_cannot_login_even_with_correct_password() {
        let (repo, svc) = service();
        let user = svc.register(register_input("alice")).await.unwrap();
        repo.set_suspended(user.id, true);

        let err = svc
            .login(LoginInput { username: "alice".into(), password: "pw1".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Suspended));
    }

    #[tokio::test]
    async fn oauth_only_account_cannot_password_login() {
        let (_, svc) = service();
        let profile = SocialProfile {
            provider: Provider::Google,
            subject: "g-123".into(),
            display_name: "alice".into(),
            email: "alice@x.com".into(),
            photo: None,
        };
        svc.social_login(profile).await.unwrap();

        let err = svc
            .login(LoginInput { username: "alice".into(), password: "anything".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn token_expiry_boundary() {
        let (_, svc) = service();
        let user = svc.register(register_input("alice")).await.unwrap();
        let key = EncodingKey::from_secret(b"test-secret");

        // Issued 23h ago with a 24h window: one hour of validity left.
        let now = Utc::now();
        let fresh = Claims {
            sub: user.id.to_string(),
            iat: (now - Duration::hours(23)).timestamp() as usize,
            exp: (now + Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(&JwtHeader::default(), &fresh, &key).unwrap();
        assert!(svc.verify_token(&token).await.is_ok());

        // Issued 25h ago: expired one hour past the window.
        let stale = Claims {
            sub: user.id.to_string(),
            iat: (now - Duration::hours(25)).timestamp() as usize,
            exp: (now - Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(&JwtHeader::default(), &stale, &key).unwrap();
        let err = svc.verify_token(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenError(_)));
    }

    #[tokio::test]
    async fn garbage_and_empty_tokens_are_rejected() {
        let (_, svc) = service();
        assert!(svc.verify_token("").await.is_err());
        assert!(svc.verify_token("not.a.jwt").await.is_err());
    }

    #[tokio::test]
    async fn verify_token_does_not_recheck_suspension() {
        let (repo, svc) = service();
        let user = svc.register(register_input("alice")).await.unwrap();
        let token = svc.issue_token(user.id).unwrap();

        repo.set_suspended(user.id, true);
        // Token stays valid until expiry; suspension is a login-time check.
        let resolved = svc.verify_token(&token).await.unwrap();
        assert!(resolved.is_deleted);
    }

    #[tokio::test]
    async fn social_login_creates_once_and_never_resyncs() {
        let (_, svc) = service();
        let first = SocialProfile {
            provider: Provider::Google,
            subject: "g-123".into(),
            display_name: "alice".into(),
            email: "alice@x.com".into(),
            photo: Some("http://pic/1".into()),
        };
        let created = svc.social_login(first.clone()).await.unwrap();
        assert_eq!(created.username, "alice");
        assert_eq!(created.profile_picture.as_deref(), Some("http://pic/1"));

        // Changed display name on a repeat login must not touch the record.
        let mut repeat = first;
        repeat.display_name = "alice-renamed".into();
        let again = svc.social_login(repeat).await.unwrap();
        assert_eq!(again.id, created.id);
        assert_eq!(again.username, "alice");
    }
}
