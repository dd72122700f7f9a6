use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, DatabaseConnection, DbBackend, Set, Statement};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::link;

/// Capacity of the highlighted-links set.
pub const HIGHLIGHT_CAP: usize = 3;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    // Never serialized into responses; absent for OAuth-only accounts.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub facebook_id: Option<String>,
    pub instagram_id: Option<String>,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub is_free: bool,
    pub is_deleted: bool,
    /// Highlighted link ids, ordered, capped at `HIGHLIGHT_CAP`.
    #[serde(rename = "links")]
    pub highlighted: Vec<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Link,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Link => Entity::has_many(link::Entity).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// External identity providers a user can be linked to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Provider {
    Google,
    Facebook,
    Instagram,
}

impl Provider {
    fn column(self) -> Column {
        match self {
            Provider::Google => Column::GoogleId,
            Provider::Facebook => Column::FacebookId,
            Provider::Instagram => Column::InstagramId,
        }
    }
}

/// Fields for inserting a new user. Password and provider ids are optional
/// so both registration paths share one entry point.
#[derive(Clone, Debug, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub facebook_id: Option<String>,
    pub instagram_id: Option<String>,
    pub profile_picture: Option<String>,
}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    if username.trim().is_empty() {
        return Err(ModelError::Validation("username required".into()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if !email.contains('@') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, new: NewUser) -> Result<Model, ModelError> {
    validate_username(&new.username)?;
    validate_email(&new.email)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(new.username),
        email: Set(new.email),
        password_hash: Set(new.password_hash),
        google_id: Set(new.google_id),
        facebook_id: Set(new.facebook_id),
        instagram_id: Set(new.instagram_id),
        profile_picture: Set(new.profile_picture),
        bio: Set(None),
        is_free: Set(false),
        is_deleted: Set(false),
        highlighted: Set(Vec::new()),
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

pub async fn find_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::Username.eq(username))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_provider(
    db: &DatabaseConnection,
    provider: Provider,
    external_id: &str,
) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(provider.column().eq(external_id))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Append `link_id` to the highlighted set as a single conditional statement.
///
/// The membership and capacity guards run inside the UPDATE itself, so two
/// concurrent adds can never push the set past `HIGHLIGHT_CAP`. Returns
/// whether a row was changed; `false` means the id was already present or
/// the set is full, which the caller disambiguates by re-reading.
pub async fn highlight_add(
    db: &DatabaseConnection,
    user_id: Uuid,
    link_id: Uuid,
) -> Result<bool, ModelError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"UPDATE "user"
           SET highlighted = array_append(highlighted, $1), updated_at = $2
           WHERE id = $3
             AND NOT ($1 = ANY(highlighted))
             AND cardinality(highlighted) < $4"#,
        [
            link_id.into(),
            Utc::now().into(),
            user_id.into(),
            (HIGHLIGHT_CAP as i32).into(),
        ],
    );
    let res = db.execute(stmt).await.map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected() == 1)
}

/// Remove `link_id` from the highlighted set. Returns whether it was present.
pub async fn highlight_remove(
    db: &DatabaseConnection,
    user_id: Uuid,
    link_id: Uuid,
) -> Result<bool, ModelError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"UPDATE "user"
           SET highlighted = array_remove(highlighted, $1), updated_at = $2
           WHERE id = $3
             AND $1 = ANY(highlighted)"#,
        [link_id.into(), Utc::now().into(), user_id.into()],
    );
    let res = db.execute(stmt).await.map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected() == 1)
}
