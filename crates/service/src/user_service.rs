use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::service::hash_password;
use crate::errors::ServiceError;
use models::{link, user};

/// Partial profile update; only provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// What a highlight toggle did to the membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightOutcome {
    Added,
    Removed,
}

/// Soft-delete a user. Terminal through this interface.
pub async fn suspend(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let found = user::find_by_id(db, id).await?.ok_or_else(|| ServiceError::not_found("user"))?;
    if found.is_deleted {
        return Err(ServiceError::AlreadySuspended);
    }
    let mut am: user::ActiveModel = found.into();
    am.is_deleted = Set(true);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(user_id = %id, "user_suspended");
    Ok(())
}

/// Apply a partial profile update; a provided password is re-hashed.
///
/// Username/email uniqueness is not re-validated here; the store's unique
/// indexes are the only guard on this path.
pub async fn update_profile(
    db: &DatabaseConnection,
    id: Uuid,
    update: UpdateProfile,
) -> Result<user::Model, ServiceError> {
    let found = user::find_by_id(db, id).await?.ok_or_else(|| ServiceError::not_found("user"))?;
    if found.is_deleted {
        return Err(ServiceError::AlreadySuspended);
    }

    let mut am: user::ActiveModel = found.into();
    if let Some(username) = update.username {
        user::validate_username(&username)?;
        am.username = Set(username);
    }
    if let Some(email) = update.email {
        user::validate_email(&email)?;
        am.email = Set(email);
    }
    if let Some(password) = update.password {
        let hash = hash_password(&password).map_err(|e| ServiceError::Hash(e.to_string()))?;
        am.password_hash = Set(Some(hash));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Toggle a link's membership in the user's highlighted set.
///
/// Membership decides the direction; the actual mutation runs as an atomic
/// conditional update in the store, so concurrent toggles cannot push the
/// set past its cap.
pub async fn toggle_highlight(
    db: &DatabaseConnection,
    user_id: Uuid,
    link_id: Uuid,
) -> Result<(HighlightOutcome, link::Model), ServiceError> {
    let found_user =
        user::find_by_id(db, user_id).await?.ok_or_else(|| ServiceError::not_found("user"))?;
    let found_link =
        link::find_by_id(db, link_id).await?.ok_or_else(|| ServiceError::not_found("link"))?;

    if found_user.highlighted.contains(&link_id) {
        // Removal needs no capacity check; a concurrent removal winning the
        // race leaves membership false either way.
        user::highlight_remove(db, user_id, link_id).await?;
        return Ok((HighlightOutcome::Removed, found_link));
    }

    if user::highlight_add(db, user_id, link_id).await? {
        return Ok((HighlightOutcome::Added, found_link));
    }

    // The conditional add changed nothing: either the set filled up under
    // us or a concurrent toggle already added this id.
    let reread =
        user::find_by_id(db, user_id).await?.ok_or_else(|| ServiceError::not_found("user"))?;
    if reread.highlighted.contains(&link_id) {
        Ok((HighlightOutcome::Added, found_link))
    } else {
        Err(ServiceError::CapacityExceeded)
    }
}

/// Get a user by id.
pub async fn get_user(db: &DatabaseConnection, id: Uuid) -> Result<user::Model, ServiceError> {
    user::find_by_id(db, id).await?.ok_or_else(|| ServiceError::not_found("user"))
}

/// List every user; password hashes never serialize out of the entity.
pub async fn get_all_users(db: &DatabaseConnection) -> Result<Vec<user::Model>, ServiceError> {
    Ok(user::list_all(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::link::NewLink;
    use models::user::NewUser;
    use sea_orm::EntityTrait;

    fn new_user() -> NewUser {
        let tag = Uuid::new_v4();
        NewUser {
            username: format!("svc_{tag}"),
            email: format!("svc_{tag}@example.com"),
            password_hash: Some("$argon2id$seed".into()),
            ..Default::default()
        }
    }

    async fn make_link(db: &DatabaseConnection, owner: Uuid, n: usize) -> link::Model {
        link::create(
            db,
            owner,
            NewLink { title: format!("l{n}"), url: format!("http://x/{n}"), image: None, thumbnail: None },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn suspend_is_terminal_and_blocks_updates() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let u = user::create(&db, new_user()).await?;

        suspend(&db, u.id).await?;
        assert!(matches!(suspend(&db, u.id).await, Err(ServiceError::AlreadySuspended)));
        assert!(matches!(
            update_profile(
                &db,
                u.id,
                UpdateProfile { username: Some("renamed".into()), ..Default::default() }
            )
            .await,
            Err(ServiceError::AlreadySuspended)
        ));

        user::Entity::delete_by_id(u.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn update_profile_rehashes_password() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let u = user::create(&db, new_user()).await?;

        let updated = update_profile(
            &db,
            u.id,
            UpdateProfile { password: Some("new-pw".into()), ..Default::default() },
        )
        .await?;
        let hash = updated.password_hash.expect("hash present");
        assert_ne!(hash, "new-pw");
        assert!(hash.starts_with("$argon2"));

        user::Entity::delete_by_id(u.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn toggle_respects_cap_and_is_idempotent_on_membership() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let u = user::create(&db, new_user()).await?;
        let mut links = Vec::new();
        for n in 0..4 {
            links.push(make_link(&db, u.id, n).await);
        }

        for l in &links[..3] {
            let (outcome, _) = toggle_highlight(&db, u.id, l.id).await?;
            assert_eq!(outcome, HighlightOutcome::Added);
        }
        // Fourth link hits the cap
        assert!(matches!(
            toggle_highlight(&db, u.id, links[3].id).await,
            Err(ServiceError::CapacityExceeded)
        ));

        // Remove one, the fourth now fits
        let (outcome, _) = toggle_highlight(&db, u.id, links[0].id).await?;
        assert_eq!(outcome, HighlightOutcome::Removed);
        let (outcome, _) = toggle_highlight(&db, u.id, links[3].id).await?;
        assert_eq!(outcome, HighlightOutcome::Added);

        // Add-then-remove restores the original membership
        let before = get_user(&db, u.id).await?.highlighted;
        toggle_highlight(&db, u.id, links[0].id).await?;
        toggle_highlight(&db, u.id, links[0].id).await?;
        assert_eq!(get_user(&db, u.id).await?.highlighted, before);

        user::Entity::delete_by_id(u.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn toggle_unknown_user_or_link_is_not_found() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let u = user::create(&db, new_user()).await?;

        assert!(matches!(
            toggle_highlight(&db, Uuid::new_v4(), Uuid::new_v4()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            toggle_highlight(&db, u.id, Uuid::new_v4()).await,
            Err(ServiceError::NotFound(_))
        ));

        user::Entity::delete_by_id(u.id).exec(&db).await?;
        Ok(())
    }
}
