//! Company entity model
//!
//! This module contains the SeaORM entity model for the companies table.
//! A company is either a supplier or a buyer account, distinguished by the
//! role column; certification flags are only meaningful for suppliers.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

/// Company entity representing a supplier or buyer account
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    /// Unique identifier for the company (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Display name of the company
    pub name: String,

    /// Login email (unique)
    pub email: String,

    /// Hex-encoded salted password digest
    pub password_digest: String,

    /// Hex-encoded per-account salt
    pub password_salt: String,

    /// Account role: supplier|buyer
    pub role: String,

    /// Contact phone number (optional)
    pub phone: Option<String>,

    /// Street address (optional)
    pub address: Option<String>,

    /// City (optional)
    pub city: Option<String>,

    /// Province (optional)
    pub province: Option<String>,

    /// Free-text company description (optional)
    pub description: Option<String>,

    /// Whether the supplier holds halal certification
    pub halal_certified: bool,

    /// Whether the supplier provides Certificates of Analysis
    pub has_coa: bool,

    /// Whether the supplier provides Material Safety Data Sheets
    pub has_msds: bool,

    /// Timestamp when the account was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the account was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Account roles understood by the session gate and role extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyRole {
    Supplier,
    Buyer,
}

impl CompanyRole {
    /// Database/wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyRole::Supplier => "supplier",
            CompanyRole::Buyer => "buyer",
        }
    }

    /// Parse a stored role string; unknown values yield None.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "supplier" => Some(CompanyRole::Supplier),
            "buyer" => Some(CompanyRole::Buyer),
            _ => None,
        }
    }
}

impl std::fmt::Display for CompanyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
