//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM
//! operations for database entities, providing a clean API for data access
//! with ownership-scoped methods.

pub mod company;
pub mod inquiry;
pub mod product;
pub mod product_category;
pub mod product_image;

pub use company::{
    CompanyRepository, RegisterCompanyRequest, SupplierFilter, UpdateProfileRequest,
};
pub use inquiry::{
    BuyerAction, CreateInquiryRequest, InquiryCounts, InquiryItemRequest, InquiryRepository,
    ItemWithProduct, SupplierAction,
};
pub use product::{
    BrowseFilter, CreateProductRequest, ProductDetail, ProductListing, ProductRepository,
    UpdateProductRequest,
};
pub use product_category::{CategoryRepository, slugify};
pub use product_image::ProductImageRepository;
