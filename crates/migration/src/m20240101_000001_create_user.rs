//! Create `user` table.
//!
//! Username and email carry unique constraints as the authoritative guard
//! against registration races; the application pre-checks are advisory only.
//! `highlighted` is a uuid[] holding the bounded highlighted-links set.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Username, 128).unique_key().not_null())
                    .col(string_len(User::Email, 255).unique_key().not_null())
                    // Nullable: OAuth-only accounts never get a password
                    .col(ColumnDef::new(User::PasswordHash).string().null())
                    .col(ColumnDef::new(User::GoogleId).string().null())
                    .col(ColumnDef::new(User::FacebookId).string().null())
                    .col(ColumnDef::new(User::InstagramId).string().null())
                    .col(ColumnDef::new(User::ProfilePicture).string().null())
                    .col(ColumnDef::new(User::Bio).string().null())
                    .col(boolean(User::IsFree).not_null().default(false))
                    .col(boolean(User::IsDeleted).not_null().default(false))
                    .col(
                        ColumnDef::new(User::Highlighted)
                            .array(ColumnType::Uuid)
                            .not_null()
                            .default(Expr::cust("'{}'::uuid[]")),
                    )
                    .col(timestamp_with_time_zone(User::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(User::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    GoogleId,
    FacebookId,
    InstagramId,
    ProfilePicture,
    Bio,
    IsFree,
    IsDeleted,
    Highlighted,
    CreatedAt,
    UpdatedAt,
}
