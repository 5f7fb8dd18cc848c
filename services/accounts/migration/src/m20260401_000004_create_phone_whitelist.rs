use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PhoneWhitelist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PhoneWhitelist::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PhoneWhitelist::Phone)
                            .string_len(16)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PhoneWhitelist::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(PhoneWhitelist::AddedBy).uuid())
                    .col(
                        ColumnDef::new(PhoneWhitelist::Notes)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(PhoneWhitelist::AddedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PhoneWhitelist::Table, PhoneWhitelist::AddedBy)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(PhoneWhitelist::Table)
                    .col(PhoneWhitelist::Phone)
                    .name("idx_phone_whitelist_phone")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PhoneWhitelist::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PhoneWhitelist {
    Table,
    Id,
    Phone,
    IsActive,
    AddedBy,
    Notes,
    AddedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
}
