//! Product entity model
//!
//! This module contains the SeaORM entity model for the products table,
//! which stores supplier listings. Prices are integer rupiah.

use super::company::Entity as Company;
use super::product_category::Entity as ProductCategory;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

/// Product entity representing a supplier listing
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Owning supplier company
    pub supplier_id: Uuid,

    /// Category reference; null when the category was deleted
    pub category_id: Option<Uuid>,

    /// Product name
    pub name: String,

    /// Free-text description (optional)
    pub description: Option<String>,

    /// Unit price in integer rupiah
    pub price_idr: i64,

    /// Unit of sale (e.g. kg, liter)
    pub unit: String,

    /// Available stock in units
    pub stock_qty: i32,

    /// Minimum order quantity in units
    pub min_order_qty: i32,

    /// Inactive products are hidden from buyer browsing
    pub is_active: bool,

    /// Timestamp when the product was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the product was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Company",
        from = "Column::SupplierId",
        to = "super::company::Column::Id"
    )]
    Supplier,

    #[sea_orm(
        belongs_to = "ProductCategory",
        from = "Column::CategoryId",
        to = "super::product_category::Column::Id"
    )]
    Category,

    #[sea_orm(has_many = "super::product_image::Entity")]
    Images,
}

impl Related<Company> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<ProductCategory> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::product_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
