//! Create `link` table with FK to `user`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Link::Table)
                    .if_not_exists()
                    .col(uuid(Link::Id).primary_key())
                    .col(uuid(Link::UserId).not_null())
                    .col(string_len(Link::Title, 255).not_null())
                    .col(string(Link::Url).not_null())
                    .col(ColumnDef::new(Link::Image).string().null())
                    .col(ColumnDef::new(Link::Thumbnail).string().null())
                    .col(big_integer(Link::Clicks).not_null().default(0))
                    .col(timestamp_with_time_zone(Link::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Link::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_link_user")
                            .from(Link::Table, Link::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Link::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Link { Table, Id, UserId, Title, Url, Image, Thumbnail, Clicks, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
