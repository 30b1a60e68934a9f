//! Core transaction domain types.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    category::{Category, CategoryId, CategoryType},
    user::UserID,
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// An amount of money that came in or went out on a given day.
///
/// Whether it is income or an expense is decided by its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserID,
    pub category_id: CategoryId,
    pub category: Category,
    /// The amount in the smallest unit of the currency, e.g. cents.
    pub amount: i64,
    #[serde(with = "iso_date")]
    pub date: Date,
    /// A note about the transaction, empty if the user did not give one.
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The body of a response with a single transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub transaction: Transaction,
}

/// The body of a response with a list of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

/// Optional constraints on a list of transactions.
///
/// Deserialized from the query string of a list transactions request. The
/// date range is inclusive at both ends.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    #[serde(default, with = "iso_date::option")]
    pub start_date: Option<Date>,
    #[serde(default, with = "iso_date::option")]
    pub end_date: Option<Date>,
    /// Only transactions in categories of this type.
    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,
    pub category_id: Option<CategoryId>,
}
