//! # Data Models
//!
//! This module contains all the data models used throughout the Aromara API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod company;
pub mod inquiry;
pub mod inquiry_item;
pub mod product;
pub mod product_category;
pub mod product_image;

pub use company::Entity as Company;
pub use inquiry::Entity as Inquiry;
pub use inquiry_item::Entity as InquiryItem;
pub use product::Entity as Product;
pub use product_category::Entity as ProductCategory;
pub use product_image::Entity as ProductImage;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "aromara".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
