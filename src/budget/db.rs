//! Database operations for budgets.

use rusqlite::{Connection, OptionalExtension, Row, named_params};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    budget::{Budget, BudgetId, BudgetPatch, NewBudget},
    category::{CATEGORY_COLUMNS, CategoryId, map_category_row_with_offset},
    db::is_foreign_key_violation,
    user::UserID,
};

const BUDGET_COLUMNS: &str =
    "b.id, b.user_id, b.category_id, b.amount, b.month, b.created_at, b.updated_at";
const BUDGET_COLUMN_COUNT: usize = 7;

/// Create the budget table.
///
/// A user has at most one budget per category and month. Categories that
/// have budgets cannot be deleted.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            amount INTEGER NOT NULL,
            month TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(user_id, category_id, month),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_budget_category_id ON budget(category_id);",
    )?;

    Ok(())
}

/// Create a budget for `user_id` and return it with its category.
///
/// # Errors
///
/// - [Error::BudgetAlreadyExists] if the user already has a budget for the category and month.
/// - [Error::InvalidCategory] if the category does not exist.
pub fn create_budget(
    user_id: UserID,
    new_budget: &NewBudget,
    connection: &Connection,
) -> Result<Budget, Error> {
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO budget (user_id, category_id, amount, month, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        (
            user_id.as_i64(),
            new_budget.category_id,
            new_budget.amount,
            &new_budget.month,
            now,
        ),
    )
    .map_err(|error| {
        if is_foreign_key_violation(&error) {
            Error::InvalidCategory(Some(new_budget.category_id))
        } else {
            error.into()
        }
    })?;

    get_budget(connection.last_insert_rowid(), user_id, connection)
}

/// Retrieve a single budget owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::BudgetNotFound] if there is no such budget, or it belongs to another user.
pub fn get_budget(
    budget_id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(&format!(
            "SELECT {BUDGET_COLUMNS}, {CATEGORY_COLUMNS}
             FROM budget b INNER JOIN category c ON c.id = b.category_id
             WHERE b.id = :id AND b.user_id = :user_id"
        ))?
        .query_row(
            named_params! {":id": budget_id, ":user_id": user_id.as_i64()},
            map_row,
        )
        .optional()?
        .ok_or(Error::BudgetNotFound)
}

/// Optional constraints on the budgets returned by [get_budgets].
///
/// Deserialized from the query string of a list budgets request.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetQuery {
    /// Only budgets for this month, formatted as `YYYY-MM`.
    pub month: Option<String>,
    /// Only budgets for this category.
    pub category_id: Option<CategoryId>,
}

/// Retrieve the budgets owned by `user_id`, newest month first and by
/// category within a month.
pub fn get_budgets(
    user_id: UserID,
    query: &BudgetQuery,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(&format!(
            "SELECT {BUDGET_COLUMNS}, {CATEGORY_COLUMNS}
             FROM budget b INNER JOIN category c ON c.id = b.category_id
             WHERE b.user_id = :user_id
                AND (:month IS NULL OR b.month = :month)
                AND (:category_id IS NULL OR b.category_id = :category_id)
             ORDER BY b.month DESC, b.category_id ASC"
        ))?
        .query_map(
            named_params! {
                ":user_id": user_id.as_i64(),
                ":month": query.month,
                ":category_id": query.category_id,
            },
            map_row,
        )?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Whether `user_id` has a budget for `category_id` in `month`, ignoring the
/// budget `excluding` if given.
pub fn budget_exists(
    user_id: UserID,
    category_id: CategoryId,
    month: &str,
    excluding: Option<BudgetId>,
    connection: &Connection,
) -> Result<bool, Error> {
    connection
        .prepare(
            "SELECT EXISTS (
                SELECT 1 FROM budget
                WHERE user_id = :user_id AND category_id = :category_id AND month = :month
                    AND (:excluding IS NULL OR id != :excluding)
            )",
        )?
        .query_row(
            named_params! {
                ":user_id": user_id.as_i64(),
                ":category_id": category_id,
                ":month": month,
                ":excluding": excluding,
            },
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Apply `patch` to a budget in a single statement and return the updated budget.
///
/// # Errors
///
/// - [Error::BudgetNotFound] if there is no such budget, or it belongs to another user.
/// - [Error::BudgetAlreadyExists] if the change collides with another budget.
/// - [Error::InvalidCategory] if the new category does not exist.
pub fn update_budget(
    budget_id: BudgetId,
    user_id: UserID,
    patch: &BudgetPatch,
    connection: &Connection,
) -> Result<Budget, Error> {
    let rows_affected = connection.execute(
        "UPDATE budget
         SET category_id = COALESCE(:category_id, category_id),
             amount = COALESCE(:amount, amount),
             month = COALESCE(:month, month),
             updated_at = :updated_at
         WHERE id = :id AND user_id = :user_id",
        named_params! {
            ":category_id": patch.category_id,
            ":amount": patch.amount,
            ":month": patch.month,
            ":updated_at": OffsetDateTime::now_utc(),
            ":id": budget_id,
            ":user_id": user_id.as_i64(),
        },
    )
    .map_err(|error| {
        if is_foreign_key_violation(&error) {
            Error::InvalidCategory(patch.category_id)
        } else {
            error.into()
        }
    })?;

    if rows_affected == 0 {
        return Err(Error::BudgetNotFound);
    }

    get_budget(budget_id, user_id, connection)
}

/// Delete a budget.
///
/// # Errors
///
/// Returns [Error::BudgetNotFound] if there is no such budget, or it belongs to another user.
pub fn delete_budget(
    budget_id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
        (budget_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::BudgetNotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category_id: row.get(2)?,
        amount: row.get(3)?,
        month: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
        category: map_category_row_with_offset(row, BUDGET_COLUMN_COUNT)?,
    })
}
