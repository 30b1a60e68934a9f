//! Income and expense transactions, each filed under one of the user's categories.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod get;
mod list;
mod validate;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AppState, Error, FieldErrors, Reason};

pub use create::create_transaction_endpoint;
pub use db::{
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    get_transactions, update_transaction,
};
pub use delete::delete_transaction_endpoint;
pub use domain::{
    Transaction, TransactionId, TransactionQuery, TransactionResponse, TransactionsResponse,
};
pub use edit::update_transaction_endpoint;
pub use get::get_transaction_endpoint;
pub use list::list_transactions_endpoint;
pub use validate::{NewTransaction, TransactionPatch};

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Transaction payloads report validation failures with their own reason.
fn invalid_transaction(fields: FieldErrors) -> Error {
    Error::Validation {
        reason: Reason::InvalidAmount,
        fields,
    }
}
