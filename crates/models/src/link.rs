use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "link")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    // Wire name kept from the original API
    #[serde(rename = "link")]
    pub url: String,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub clicks: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug)]
pub struct NewLink {
    pub title: String,
    pub url: String,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
}

pub async fn create(db: &DatabaseConnection, user_id: Uuid, new: NewLink) -> Result<Model, ModelError> {
    if new.title.trim().is_empty() {
        return Err(ModelError::Validation("title required".into()));
    }
    if new.url.trim().is_empty() {
        return Err(ModelError::Validation("link required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        title: Set(new.title),
        url: Set(new.url),
        image: Set(new.image),
        thumbnail: Set(new.thumbnail),
        clicks: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// All links owned by a user, newest first.
pub async fn list_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Delete by id, returning the removed row so callers can clean up the
/// owner's highlighted set.
pub async fn delete_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    let found = find_by_id(db, id).await?;
    let Some(found) = found else { return Ok(None) };
    Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(Some(found))
}
