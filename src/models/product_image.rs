//! Product image entity model

use super::product::Entity as Product;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

/// Image reference owned by a product. At most one image per product is
/// primary; the invariant is maintained by the image repository.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_images")]
pub struct Model {
    /// Unique identifier for the image (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Owning product
    pub product_id: Uuid,

    /// Public URL of the stored object
    pub url: String,

    /// Whether this image is the product's primary image
    pub is_primary: bool,

    /// Display ordering within the product gallery
    pub sort_order: i32,

    /// Timestamp when the image was uploaded
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Product",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<Product> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
