//! Migration to create the inquiries table.
//!
//! An inquiry is a buyer's request for quotation addressed to a single
//! supplier. Quote fields stay null until the supplier responds.

use sea_orm_migration::prelude::*;

use crate::m2025_06_01_000001_create_companies::Companies;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Inquiries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Inquiries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Inquiries::BuyerId).uuid().not_null())
                    .col(ColumnDef::new(Inquiries::SupplierId).uuid().not_null())
                    .col(ColumnDef::new(Inquiries::Message).text().not_null())
                    .col(
                        ColumnDef::new(Inquiries::Status)
                            .text()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Inquiries::QuotedPriceIdr)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Inquiries::QuoteNotes).text().null())
                    .col(
                        ColumnDef::new(Inquiries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Inquiries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inquiries_buyer_id")
                            .from(Inquiries::Table, Inquiries::BuyerId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inquiries_supplier_id")
                            .from(Inquiries::Table, Inquiries::SupplierId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inquiries_buyer_id")
                    .table(Inquiries::Table)
                    .col(Inquiries::BuyerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inquiries_supplier_id")
                    .table(Inquiries::Table)
                    .col(Inquiries::SupplierId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_inquiries_buyer_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_inquiries_supplier_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Inquiries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Inquiries {
    Table,
    Id,
    BuyerId,
    SupplierId,
    Message,
    Status,
    QuotedPriceIdr,
    QuoteNotes,
    CreatedAt,
    UpdatedAt,
}
