use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use models::user::Provider;

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub email: String,
    pub instagram_id: String,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Domain user (business view, no credential material)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub is_deleted: bool,
}

/// Stored credential (hashed; `None` for OAuth-only accounts)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: Option<String>,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

/// Normalized identity-provider profile, the single entry point the OAuth
/// callback flow hands to the core.
#[derive(Debug, Clone)]
pub struct SocialProfile {
    pub provider: Provider,
    pub subject: String,
    pub display_name: String,
    pub email: String,
    pub photo: Option<String>,
}
