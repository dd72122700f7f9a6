use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AuthUser, Credentials, Provider, SocialProfile};
use super::errors::AuthError;

/// Fields persisted for a password registration.
#[derive(Debug, Clone)]
pub struct NewPasswordUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub instagram_id: String,
}

/// Repository abstraction for auth-related persistence.
///
/// Uniqueness of username, email, and provider ids is enforced by the store;
/// `create_*` surface a violation as `AuthError::Conflict`.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_provider(
        &self,
        provider: Provider,
        subject: &str,
    ) -> Result<Option<AuthUser>, AuthError>;

    async fn create_password_user(&self, new: NewPasswordUser) -> Result<AuthUser, AuthError>;
    async fn create_social_user(&self, profile: &SocialProfile) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Inner {
        users: HashMap<Uuid, AuthUser>,
        creds: HashMap<Uuid, Credentials>,
        providers: HashMap<(&'static str, String), Uuid>,
    }

    #[derive(Default)]
    pub struct MockAuthRepository {
        inner: Mutex<Inner>,
    }

    fn provider_key(p: Provider) -> &'static str {
        match p {
            Provider::Google => "google",
            Provider::Facebook => "facebook",
            Provider::Instagram => "instagram",
        }
    }

    impl MockAuthRepository {
        /// Flip the suspension flag on a stored user (test hook).
        pub fn set_suspended(&self, id: Uuid, suspended: bool) {
            let mut inner = self.inner.lock().unwrap();
            if let Some(u) = inner.users.get_mut(&id) {
                u.is_deleted = suspended;
            }
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner.users.values().find(|u| u.username == username).cloned())
        }

        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner.users.values().find(|u| u.email == email).cloned())
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner.users.get(&id).cloned())
        }

        async fn find_user_by_provider(
            &self,
            provider: Provider,
            subject: &str,
        ) -> Result<Option<AuthUser>, AuthError> {
            let inner = self.inner.lock().unwrap();
            let id = inner.providers.get(&(provider_key(provider), subject.to_string()));
            Ok(id.and_then(|id| inner.users.get(id)).cloned())
        }

        async fn create_password_user(&self, new: NewPasswordUser) -> Result<AuthUser, AuthError> {
            let mut inner = self.inner.lock().unwrap();
            if inner.users.values().any(|u| u.username == new.username) {
                return Err(AuthError::Conflict("username already exists".into()));
            }
            if inner.users.values().any(|u| u.email == new.email) {
                return Err(AuthError::Conflict("email already exists".into()));
            }
            let user = AuthUser {
                id: Uuid::new_v4(),
                username: new.username,
                email: new.email,
                profile_picture: None,
                is_deleted: false,
            };
            inner
                .providers
                .insert((provider_key(Provider::Instagram), new.instagram_id), user.id);
            inner.creds.insert(
                user.id,
                Credentials { user_id: user.id, password_hash: Some(new.password_hash) },
            );
            inner.users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn create_social_user(&self, profile: &SocialProfile) -> Result<AuthUser, AuthError> {
            let mut inner = self.inner.lock().unwrap();
            let key = (provider_key(profile.provider), profile.subject.clone());
            if inner.providers.contains_key(&key) {
                return Err(AuthError::Conflict("external id already exists".into()));
            }
            let user = AuthUser {
                id: Uuid::new_v4(),
                username: profile.display_name.clone(),
                email: profile.email.clone(),
                profile_picture: profile.photo.clone(),
                is_deleted: false,
            };
            inner.providers.insert(key, user.id);
            inner
                .creds
                .insert(user.id, Credentials { user_id: user.id, password_hash: None });
            inner.users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner.creds.get(&user_id).cloned())
        }
    }
}
