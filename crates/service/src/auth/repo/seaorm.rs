use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::domain::{AuthUser, Credentials, Provider, SocialProfile};
use crate::auth::errors::AuthError;
use crate::auth::repository::{AuthRepository, NewPasswordUser};
use models::errors::ModelError;
use models::user;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn to_auth_user(u: user::Model) -> AuthUser {
    AuthUser {
        id: u.id,
        username: u.username,
        email: u.email,
        profile_picture: u.profile_picture,
        is_deleted: u.is_deleted,
    }
}

/// Map an insert-time unique violation to the message the pre-check would
/// have produced; anything else stays a repository error.
fn map_create_error(e: ModelError) -> AuthError {
    if e.is_unique_violation() {
        let msg = e.to_string();
        let field = if msg.contains("username") {
            "username"
        } else if msg.contains("email") {
            "email"
        } else {
            "external id"
        };
        return AuthError::Conflict(format!("{field} already exists"));
    }
    match e {
        ModelError::Validation(msg) => AuthError::Validation(msg),
        ModelError::Db(msg) => AuthError::Repository(msg),
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = user::find_by_username(&self.db, username)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_auth_user))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = user::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_auth_user))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        let res = user::find_by_id(&self.db, id)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_auth_user))
    }

    async fn find_user_by_provider(
        &self,
        provider: Provider,
        subject: &str,
    ) -> Result<Option<AuthUser>, AuthError> {
        let res = user::find_by_provider(&self.db, provider, subject)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_auth_user))
    }

    async fn create_password_user(&self, new: NewPasswordUser) -> Result<AuthUser, AuthError> {
        let created = user::create(
            &self.db,
            user::NewUser {
                username: new.username,
                email: new.email,
                password_hash: Some(new.password_hash),
                instagram_id: Some(new.instagram_id),
                ..Default::default()
            },
        )
        .await
        .map_err(map_create_error)?;
        Ok(to_auth_user(created))
    }

    async fn create_social_user(&self, profile: &SocialProfile) -> Result<AuthUser, AuthError> {
        let mut new = user::NewUser {
            username: profile.display_name.clone(),
            email: profile.email.clone(),
            profile_picture: profile.photo.clone(),
            ..Default::default()
        };
        match profile.provider {
            Provider::Google => new.google_id = Some(profile.subject.clone()),
            Provider::Facebook => new.facebook_id = Some(profile.subject.clone()),
            Provider::Instagram => new.instagram_id = Some(profile.subject.clone()),
        }
        let created = user::create(&self.db, new).await.map_err(map_create_error)?;
        Ok(to_auth_user(created))
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = user::find_by_id(&self.db, user_id)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| Credentials { user_id: u.id, password_hash: u.password_hash }))
    }
}
