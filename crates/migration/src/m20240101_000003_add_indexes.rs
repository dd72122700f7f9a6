use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // External-provider ids: unique when present. Postgres unique indexes
        // admit multiple NULLs, which gives the sparse-unique semantics.
        manager
            .create_index(
                Index::create()
                    .name("uniq_user_google_id")
                    .table(User::Table)
                    .col(User::GoogleId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uniq_user_facebook_id")
                    .table(User::Table)
                    .col(User::FacebookId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uniq_user_instagram_id")
                    .table(User::Table)
                    .col(User::InstagramId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Link: index on user_id for ownership lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_link_user")
                    .table(Link::Table)
                    .col(Link::UserId)
                    .to_owned(),
            )
            .await?;

        // Link: composite (user_id, created_at) for newest-first listings
        manager
            .create_index(
                Index::create()
                    .name("idx_link_user_created")
                    .table(Link::Table)
                    .col(Link::UserId)
                    .col(Link::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_user_google_id").table(User::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_user_facebook_id").table(User::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_user_instagram_id").table(User::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_link_user").table(Link::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_link_user_created").table(Link::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum User { Table, GoogleId, FacebookId, InstagramId }

#[derive(DeriveIden)]
enum Link { Table, UserId, CreatedAt }
