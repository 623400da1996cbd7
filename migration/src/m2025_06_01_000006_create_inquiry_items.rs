//! Migration to create the inquiry_items table.

use sea_orm_migration::prelude::*;

use crate::m2025_06_01_000003_create_products::Products;
use crate::m2025_06_01_000005_create_inquiries::Inquiries;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InquiryItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InquiryItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InquiryItems::InquiryId).uuid().not_null())
                    .col(ColumnDef::new(InquiryItems::ProductId).uuid().not_null())
                    .col(ColumnDef::new(InquiryItems::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(InquiryItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inquiry_items_inquiry_id")
                            .from(InquiryItems::Table, InquiryItems::InquiryId)
                            .to(Inquiries::Table, Inquiries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inquiry_items_product_id")
                            .from(InquiryItems::Table, InquiryItems::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inquiry_items_inquiry_id")
                    .table(InquiryItems::Table)
                    .col(InquiryItems::InquiryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_inquiry_items_inquiry_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(InquiryItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum InquiryItems {
    Table,
    Id,
    InquiryId,
    ProductId,
    Quantity,
    CreatedAt,
}
