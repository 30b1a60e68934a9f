//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row, named_params};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{Category, CategoryId, CategoryPatch, CategoryType, NewCategory},
    db::is_foreign_key_violation,
    user::UserID,
};

/// The category columns in the order [map_category_row_with_offset] expects,
/// for queries that join on the category table aliased as `c`.
pub(crate) const CATEGORY_COLUMNS: &str =
    "c.id, c.user_id, c.name, c.type, c.color, c.created_at, c.updated_at";

/// Create the category table.
///
/// Categories are deleted along with their user.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            color TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_id ON category(user_id);",
    )?;

    Ok(())
}

/// Create a category for `user_id` and return it with its generated ID.
pub fn create_category(
    user_id: UserID,
    new_category: &NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO category (user_id, name, type, color, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        (
            user_id.as_i64(),
            &new_category.name,
            new_category.category_type,
            &new_category.color,
            now,
        ),
    )?;

    get_category(connection.last_insert_rowid(), user_id, connection)
}

/// Retrieve a single category owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if there is no such category, or it
/// belongs to another user.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type, color, created_at, updated_at
             FROM category WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            named_params! {":id": category_id, ":user_id": user_id.as_i64()},
            map_row,
        )
        .optional()?
        .ok_or(Error::CategoryNotFound)
}

/// Retrieve the categories owned by `user_id`, optionally of a single type,
/// ordered by ID.
pub fn get_categories(
    user_id: UserID,
    category_type: Option<CategoryType>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type, color, created_at, updated_at
             FROM category
             WHERE user_id = :user_id AND (:type IS NULL OR type = :type)
             ORDER BY id ASC",
        )?
        .query_map(
            named_params! {":user_id": user_id.as_i64(), ":type": category_type},
            map_row,
        )?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Whether the category `category_id` exists and is owned by `user_id`.
pub fn category_belongs_to_user(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<bool, Error> {
    connection
        .prepare("SELECT EXISTS (SELECT 1 FROM category WHERE id = ?1 AND user_id = ?2)")?
        .query_row((category_id, user_id.as_i64()), |row| row.get(0))
        .map_err(|error| error.into())
}

/// Apply `patch` to a category and return the updated category.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if there is no such category, or it
/// belongs to another user.
pub fn update_category(
    category_id: CategoryId,
    user_id: UserID,
    patch: &CategoryPatch,
    connection: &Connection,
) -> Result<Category, Error> {
    let rows_affected = connection.execute(
        "UPDATE category
         SET name = COALESCE(:name, name),
             type = COALESCE(:type, type),
             color = COALESCE(:color, color),
             updated_at = :updated_at
         WHERE id = :id AND user_id = :user_id",
        named_params! {
            ":name": patch.name,
            ":type": patch.category_type,
            ":color": patch.color,
            ":updated_at": OffsetDateTime::now_utc(),
            ":id": category_id,
            ":user_id": user_id.as_i64(),
        },
    )?;

    if rows_affected == 0 {
        return Err(Error::CategoryNotFound);
    }

    get_category(category_id, user_id, connection)
}

/// Delete a category.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if there is no such category, or it
/// belongs to another user, and [Error::CategoryInUse] if a budget or
/// transaction still refers to it.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
            (category_id, user_id.as_i64()),
        )
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                Error::CategoryInUse
            } else {
                error.into()
            }
        })?;

    if rows_affected == 0 {
        return Err(Error::CategoryNotFound);
    }

    Ok(())
}

/// Map the category columns starting at `offset` in `row`.
pub(crate) fn map_category_row_with_offset(
    row: &Row,
    offset: usize,
) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(offset)?,
        user_id: UserID::new(row.get(offset + 1)?),
        name: row.get(offset + 2)?,
        category_type: row.get(offset + 3)?,
        color: row.get(offset + 4)?,
        created_at: row.get(offset + 5)?,
        updated_at: row.get(offset + 6)?,
    })
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    map_category_row_with_offset(row, 0)
}
