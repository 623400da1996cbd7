//! Migration to create the companies table.
//!
//! Companies are the account entities of the marketplace: both suppliers and
//! buyers, distinguished by the role column. Supplier-only fields such as
//! certification flags live on the same row and simply stay false for buyers.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Companies::Name).text().not_null())
                    .col(ColumnDef::new(Companies::Email).text().not_null())
                    .col(ColumnDef::new(Companies::PasswordDigest).text().not_null())
                    .col(ColumnDef::new(Companies::PasswordSalt).text().not_null())
                    .col(ColumnDef::new(Companies::Role).text().not_null())
                    .col(ColumnDef::new(Companies::Phone).text().null())
                    .col(ColumnDef::new(Companies::Address).text().null())
                    .col(ColumnDef::new(Companies::City).text().null())
                    .col(ColumnDef::new(Companies::Province).text().null())
                    .col(ColumnDef::new(Companies::Description).text().null())
                    .col(
                        ColumnDef::new(Companies::HalalCertified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Companies::HasCoa)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Companies::HasMsds)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Companies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Companies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Email is the login identifier and must be unique across roles.
        manager
            .create_index(
                Index::create()
                    .name("idx_companies_email")
                    .table(Companies::Table)
                    .col(Companies::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Role index for the public supplier directory.
        manager
            .create_index(
                Index::create()
                    .name("idx_companies_role")
                    .table(Companies::Table)
                    .col(Companies::Role)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_companies_email").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_companies_role").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Companies {
    Table,
    Id,
    Name,
    Email,
    PasswordDigest,
    PasswordSalt,
    Role,
    Phone,
    Address,
    City,
    Province,
    Description,
    HalalCertified,
    HasCoa,
    HasMsds,
    CreatedAt,
    UpdatedAt,
}
