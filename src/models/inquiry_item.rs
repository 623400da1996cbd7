//! Inquiry line item entity model

use super::inquiry::Entity as Inquiry;
use super::product::Entity as Product;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

/// Line item owned by an inquiry, referencing a product and a quantity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "inquiry_items")]
pub struct Model {
    /// Unique identifier for the line item (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Owning inquiry
    pub inquiry_id: Uuid,

    /// Requested product
    pub product_id: Uuid,

    /// Requested quantity in product units (>= product MOQ at submission)
    pub quantity: i32,

    /// Timestamp when the line item was created
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Inquiry",
        from = "Column::InquiryId",
        to = "super::inquiry::Column::Id"
    )]
    Inquiry,

    #[sea_orm(
        belongs_to = "Product",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<Inquiry> for Entity {
    fn to() -> RelationDef {
        Relation::Inquiry.def()
    }
}

impl Related<Product> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
