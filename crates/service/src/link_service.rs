use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::ServiceError;
use models::{link, user};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLink {
    pub title: String,
    #[serde(rename = "link")]
    pub url: String,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
}

/// Partial link update; only provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLink {
    pub title: Option<String>,
    #[serde(rename = "link")]
    pub url: Option<String>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
}

/// Create a link owned by an existing user.
pub async fn create_link(
    db: &DatabaseConnection,
    owner_id: Uuid,
    input: CreateLink,
) -> Result<link::Model, ServiceError> {
    if input.title.trim().is_empty() || input.url.trim().is_empty() {
        return Err(ServiceError::Validation("please fill in all fields".into()));
    }
    user::find_by_id(db, owner_id).await?.ok_or_else(|| ServiceError::not_found("user"))?;

    let created = link::create(
        db,
        owner_id,
        link::NewLink { title: input.title, url: input.url, image: input.image, thumbnail: input.thumbnail },
    )
    .await?;
    info!(link_id = %created.id, user_id = %owner_id, "link_created");
    Ok(created)
}

pub async fn update_link(
    db: &DatabaseConnection,
    id: Uuid,
    update: UpdateLink,
) -> Result<link::Model, ServiceError> {
    let found = link::find_by_id(db, id).await?.ok_or_else(|| ServiceError::not_found("link"))?;

    let mut am: link::ActiveModel = found.into();
    if let Some(title) = update.title {
        am.title = Set(title);
    }
    if let Some(url) = update.url {
        am.url = Set(url);
    }
    if let Some(image) = update.image {
        am.image = Set(Some(image));
    }
    if let Some(thumbnail) = update.thumbnail {
        am.thumbnail = Set(Some(thumbnail));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Delete a link and scrub its id from the owner's highlighted set.
pub async fn delete_link(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let removed =
        link::delete_by_id(db, id).await?.ok_or_else(|| ServiceError::not_found("link"))?;
    // Referential cleanup; a miss just means it was never highlighted.
    user::highlight_remove(db, removed.user_id, removed.id).await?;
    info!(link_id = %id, user_id = %removed.user_id, "link_deleted");
    Ok(())
}

pub async fn get_link(db: &DatabaseConnection, id: Uuid) -> Result<link::Model, ServiceError> {
    link::find_by_id(db, id).await?.ok_or_else(|| ServiceError::not_found("link"))
}

/// All of a user's links, newest first.
pub async fn list_links(
    db: &DatabaseConnection,
    owner_id: Uuid,
) -> Result<Vec<link::Model>, ServiceError> {
    user::find_by_id(db, owner_id).await?.ok_or_else(|| ServiceError::not_found("user"))?;
    Ok(link::list_by_user(db, owner_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use crate::user_service;
    use models::user::NewUser;
    use sea_orm::EntityTrait;

    fn new_user() -> NewUser {
        let tag = Uuid::new_v4();
        NewUser {
            username: format!("lnk_{tag}"),
            email: format!("lnk_{tag}@example.com"),
            ..Default::default()
        }
    }

    fn create_input(n: usize) -> CreateLink {
        CreateLink { title: format!("l{n}"), url: format!("http://x/{n}"), image: None, thumbnail: None }
    }

    #[tokio::test]
    async fn create_requires_existing_owner_and_fields() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let u = user::create(&db, new_user()).await?;

        let mut missing = create_input(0);
        missing.title = "".into();
        assert!(matches!(
            create_link(&db, u.id, missing).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            create_link(&db, Uuid::new_v4(), create_input(0)).await,
            Err(ServiceError::NotFound(_))
        ));

        let created = create_link(&db, u.id, create_input(1)).await?;
        assert_eq!(created.clicks, 0);

        user::Entity::delete_by_id(u.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn update_applies_only_provided_fields() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let u = user::create(&db, new_user()).await?;
        let created = create_link(&db, u.id, create_input(0)).await?;

        let updated = update_link(
            &db,
            created.id,
            UpdateLink { title: Some("renamed".into()), ..Default::default() },
        )
        .await?;
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.url, created.url);

        assert!(matches!(
            update_link(&db, Uuid::new_v4(), UpdateLink::default()).await,
            Err(ServiceError::NotFound(_))
        ));

        user::Entity::delete_by_id(u.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn delete_scrubs_highlight_and_subsequent_fetch_fails() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let u = user::create(&db, new_user()).await?;
        let created = create_link(&db, u.id, create_input(0)).await?;

        user_service::toggle_highlight(&db, u.id, created.id).await?;
        assert!(user_service::get_user(&db, u.id).await?.highlighted.contains(&created.id));

        delete_link(&db, created.id).await?;
        assert!(!user_service::get_user(&db, u.id).await?.highlighted.contains(&created.id));
        assert!(matches!(get_link(&db, created.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(delete_link(&db, created.id).await, Err(ServiceError::NotFound(_))));

        user::Entity::delete_by_id(u.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn list_is_newest_first() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let u = user::create(&db, new_user()).await?;
        let first = create_link(&db, u.id, create_input(0)).await?;
        let second = create_link(&db, u.id, create_input(1)).await?;

        let listed = list_links(&db, u.id).await?;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);

        user::Entity::delete_by_id(u.id).exec(&db).await?;
        Ok(())
    }
}
