//! Inquiry entity model
//!
//! This module contains the SeaORM entity model for the inquiries table.
//! An inquiry is a buyer's request for quotation addressed to one supplier
//! and moves through pending -> quoted -> accepted/rejected.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

/// Inquiry entity representing a buyer RFQ
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "inquiries")]
pub struct Model {
    /// Unique identifier for the inquiry (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Buyer company that submitted the inquiry
    pub buyer_id: Uuid,

    /// Supplier company the inquiry is addressed to
    pub supplier_id: Uuid,

    /// Buyer's free-text message (required, non-empty)
    pub message: String,

    /// Lifecycle status: pending|quoted|accepted|rejected
    pub status: String,

    /// Supplier's quoted total in integer rupiah (set on quote)
    pub quoted_price_idr: Option<i64>,

    /// Supplier's notes attached to the quote (optional)
    pub quote_notes: Option<String>,

    /// Timestamp when the inquiry was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the inquiry was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::BuyerId",
        to = "super::company::Column::Id"
    )]
    Buyer,

    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::SupplierId",
        to = "super::company::Column::Id"
    )]
    Supplier,

    #[sea_orm(has_many = "super::inquiry_item::Entity")]
    Items,
}

impl Related<super::inquiry_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Inquiry lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InquiryStatus {
    Pending,
    Quoted,
    Accepted,
    Rejected,
}

impl InquiryStatus {
    /// Database/wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::Pending => "pending",
            InquiryStatus::Quoted => "quoted",
            InquiryStatus::Accepted => "accepted",
            InquiryStatus::Rejected => "rejected",
        }
    }

    /// Parse a stored status string; unknown values yield None.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(InquiryStatus::Pending),
            "quoted" => Some(InquiryStatus::Quoted),
            "accepted" => Some(InquiryStatus::Accepted),
            "rejected" => Some(InquiryStatus::Rejected),
            _ => None,
        }
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    ///
    /// Accepted and rejected are terminal. Quoting requires a price, which
    /// is checked by the repository, not here.
    pub fn can_transition_to(&self, next: InquiryStatus) -> bool {
        matches!(
            (self, next),
            (InquiryStatus::Pending, InquiryStatus::Quoted)
                | (InquiryStatus::Pending, InquiryStatus::Rejected)
                | (InquiryStatus::Quoted, InquiryStatus::Accepted)
                | (InquiryStatus::Quoted, InquiryStatus::Rejected)
        )
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
