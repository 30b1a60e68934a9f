//! Database operations for transactions.

use rusqlite::{Connection, OptionalExtension, Row, named_params};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{CATEGORY_COLUMNS, map_category_row_with_offset},
    db::is_foreign_key_violation,
    transaction::{
        NewTransaction, Transaction, TransactionId, TransactionPatch, TransactionQuery,
    },
    user::UserID,
};

const TRANSACTION_COLUMNS: &str = "t.id, t.user_id, t.category_id, t.amount, t.date, \
    t.description, t.created_at, t.updated_at";
const TRANSACTION_COLUMN_COUNT: usize = 8;

/// Create the transaction table.
///
/// Categories that have transactions cannot be deleted.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            amount INTEGER NOT NULL,
            date TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_transaction_category_id ON \"transaction\"(category_id);",
    )?;

    Ok(())
}

/// Create a transaction for `user_id` and return it with its category.
///
/// # Errors
///
/// Returns [Error::InvalidCategory] if the category does not exist.
pub fn create_transaction(
    user_id: UserID,
    new_transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO \"transaction\"
            (user_id, category_id, amount, date, description, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        (
            user_id.as_i64(),
            new_transaction.category_id,
            new_transaction.amount,
            new_transaction.date,
            &new_transaction.description,
            now,
        ),
    )
    .map_err(|error| {
        if is_foreign_key_violation(&error) {
            Error::InvalidCategory(Some(new_transaction.category_id))
        } else {
            error.into()
        }
    })?;

    get_transaction(connection.last_insert_rowid(), user_id, connection)
}

/// Retrieve a single transaction owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::TransactionNotFound] if there is no such transaction, or
/// it belongs to another user.
pub fn get_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS}, {CATEGORY_COLUMNS}
             FROM \"transaction\" t INNER JOIN category c ON c.id = t.category_id
             WHERE t.id = :id AND t.user_id = :user_id"
        ))?
        .query_row(
            named_params! {":id": transaction_id, ":user_id": user_id.as_i64()},
            map_row,
        )
        .optional()?
        .ok_or(Error::TransactionNotFound)
}

/// Retrieve the transactions owned by `user_id` that match `query`, latest
/// date first, and most recently created first within a day.
pub fn get_transactions(
    user_id: UserID,
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS}, {CATEGORY_COLUMNS}
             FROM \"transaction\" t INNER JOIN category c ON c.id = t.category_id
             WHERE t.user_id = :user_id
                AND (:start_date IS NULL OR t.date >= :start_date)
                AND (:end_date IS NULL OR t.date <= :end_date)
                AND (:type IS NULL OR c.type = :type)
                AND (:category_id IS NULL OR t.category_id = :category_id)
             ORDER BY t.date DESC, t.id DESC"
        ))?
        .query_map(
            named_params! {
                ":user_id": user_id.as_i64(),
                ":start_date": query.start_date,
                ":end_date": query.end_date,
                ":type": query.category_type,
                ":category_id": query.category_id,
            },
            map_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Apply `patch` to a transaction in a single statement and return the updated transaction.
///
/// # Errors
///
/// - [Error::TransactionNotFound] if there is no such transaction, or it belongs to another user.
/// - [Error::InvalidCategory] if the new category does not exist.
pub fn update_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    patch: &TransactionPatch,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET category_id = COALESCE(:category_id, category_id),
             amount = COALESCE(:amount, amount),
             date = COALESCE(:date, date),
             description = COALESCE(:description, description),
             updated_at = :updated_at
         WHERE id = :id AND user_id = :user_id",
        named_params! {
            ":category_id": patch.category_id,
            ":amount": patch.amount,
            ":date": patch.date,
            ":description": patch.description,
            ":updated_at": OffsetDateTime::now_utc(),
            ":id": transaction_id,
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
        return Err(Error::TransactionNotFound);
    }

    get_transaction(transaction_id, user_id, connection)
}

/// Delete a transaction.
///
/// # Errors
///
/// Returns [Error::TransactionNotFound] if there is no such transaction, or
/// it belongs to another user.
pub fn delete_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (transaction_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::TransactionNotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category_id: row.get(2)?,
        amount: row.get(3)?,
        date: row.get(4)?,
        description: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        category: map_category_row_with_offset(row, TRANSACTION_COLUMN_COUNT)?,
    })
}

#[cfg(test)]
mod transaction_query_tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        Error,
        category::{Category, CategoryType, NewCategory, create_category, delete_category},
        db::initialize,
        transaction::{
            Transaction, TransactionQuery,
            validate::{NewTransaction, TransactionPatch},
        },
        user::{PasswordHash, UserID, create_user},
    };

    use super::{
        create_transaction, delete_transaction, get_transaction, get_transactions,
        update_transaction,
    };

    struct Fixture {
        connection: Connection,
        user_id: UserID,
        food: Category,
        salary: Category,
    }

    fn get_fixture() -> Fixture {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        let user_id = create_user(
            "Test",
            &"alice@example.com".parse().unwrap(),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap()
        .id;
        let [food, salary] = [
            ("Food", CategoryType::Expense),
            ("Salary", CategoryType::Income),
        ]
        .map(|(name, category_type)| {
            create_category(
                user_id,
                &NewCategory {
                    name: name.to_owned(),
                    category_type,
                    color: "red".to_owned(),
                },
                &connection,
            )
            .unwrap()
        });

        Fixture {
            connection,
            user_id,
            food,
            salary,
        }
    }

    impl Fixture {
        fn create(&self, category: &Category, date: Date) -> Transaction {
            let new_transaction = NewTransaction {
                category_id: category.id,
                amount: 1200,
                date,
                description: String::new(),
            };

            create_transaction(self.user_id, &new_transaction, &self.connection).unwrap()
        }
    }

    #[test]
    fn create_transaction_round_trips() {
        let fixture = get_fixture();

        let transaction = fixture.create(&fixture.food, date!(2024 - 01 - 15));

        assert_eq!(transaction.category, fixture.food);
        assert_eq!(transaction.date, date!(2024 - 01 - 15));
        assert_eq!(transaction.description, "");
        assert_eq!(
            get_transaction(transaction.id, fixture.user_id, &fixture.connection),
            Ok(transaction)
        );
    }

    #[test]
    fn dates_are_stored_as_iso_strings() {
        let fixture = get_fixture();
        let transaction = fixture.create(&fixture.food, date!(2024 - 03 - 05));

        let stored: String = fixture
            .connection
            .query_row(
                "SELECT date FROM \"transaction\" WHERE id = ?1",
                [transaction.id],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(stored, "2024-03-05");
    }

    #[test]
    fn get_transactions_orders_by_date_then_newest() {
        let fixture = get_fixture();
        let first = fixture.create(&fixture.food, date!(2024 - 01 - 10));
        let second = fixture.create(&fixture.food, date!(2024 - 01 - 10));
        let later = fixture.create(&fixture.salary, date!(2024 - 01 - 25));

        let transactions = get_transactions(
            fixture.user_id,
            &TransactionQuery::default(),
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(transactions, vec![later, second, first]);
    }

    #[test]
    fn get_transactions_applies_every_filter() {
        let fixture = get_fixture();
        let december = fixture.create(&fixture.food, date!(2023 - 12 - 31));
        let start = fixture.create(&fixture.food, date!(2024 - 01 - 01));
        let payday = fixture.create(&fixture.salary, date!(2024 - 01 - 15));
        let end = fixture.create(&fixture.food, date!(2024 - 01 - 31));
        let february = fixture.create(&fixture.food, date!(2024 - 02 - 01));
        let query = |query: TransactionQuery| {
            get_transactions(fixture.user_id, &query, &fixture.connection).unwrap()
        };

        let january = query(TransactionQuery {
            start_date: Some(date!(2024 - 01 - 01)),
            end_date: Some(date!(2024 - 01 - 31)),
            ..Default::default()
        });
        assert_eq!(january, vec![end.clone(), payday.clone(), start.clone()]);

        let expenses = query(TransactionQuery {
            category_type: Some(CategoryType::Expense),
            ..Default::default()
        });
        assert_eq!(
            expenses,
            vec![february, end.clone(), start.clone(), december.clone()]
        );

        let before_payday = query(TransactionQuery {
            end_date: Some(date!(2024 - 01 - 14)),
            category_id: Some(fixture.food.id),
            ..Default::default()
        });
        assert_eq!(before_payday, vec![start, december]);

        let income = query(TransactionQuery {
            category_type: Some(CategoryType::Income),
            ..Default::default()
        });
        assert_eq!(income, vec![payday]);
    }

    #[test]
    fn update_transaction_changes_only_given_fields() {
        let fixture = get_fixture();
        let transaction = fixture.create(&fixture.food, date!(2024 - 01 - 10));
        let patch = TransactionPatch {
            category_id: None,
            amount: Some(99),
            date: None,
            description: Some("snacks".to_owned()),
        };

        let updated =
            update_transaction(transaction.id, fixture.user_id, &patch, &fixture.connection)
                .unwrap();

        assert_eq!(updated.amount, 99);
        assert_eq!(updated.description, "snacks");
        assert_eq!(updated.date, transaction.date);
        assert_eq!(updated.category, fixture.food);
    }

    #[test]
    fn delete_transaction_succeeds_once() {
        let fixture = get_fixture();
        let transaction = fixture.create(&fixture.food, date!(2024 - 01 - 10));

        assert_eq!(
            delete_transaction(transaction.id, fixture.user_id, &fixture.connection),
            Ok(())
        );
        assert_eq!(
            delete_transaction(transaction.id, fixture.user_id, &fixture.connection),
            Err(Error::TransactionNotFound)
        );
    }

    #[test]
    fn missing_category_is_rejected_by_the_database() {
        let fixture = get_fixture();
        let transaction = fixture.create(&fixture.food, date!(2024 - 01 - 10));
        let new_transaction = NewTransaction {
            category_id: 999,
            amount: 1,
            date: date!(2024 - 01 - 10),
            description: String::new(),
        };
        let patch = TransactionPatch {
            category_id: Some(999),
            amount: None,
            date: None,
            description: None,
        };

        assert_eq!(
            create_transaction(fixture.user_id, &new_transaction, &fixture.connection),
            Err(Error::InvalidCategory(Some(999)))
        );
        assert_eq!(
            update_transaction(transaction.id, fixture.user_id, &patch, &fixture.connection),
            Err(Error::InvalidCategory(Some(999)))
        );
    }

    #[test]
    fn category_with_transactions_is_in_use() {
        let fixture = get_fixture();
        fixture.create(&fixture.salary, date!(2024 - 01 - 25));

        assert_eq!(
            delete_category(fixture.salary.id, fixture.user_id, &fixture.connection),
            Err(Error::CategoryInUse)
        );
        assert_eq!(
            delete_category(fixture.food.id, fixture.user_id, &fixture.connection),
            Ok(())
        );
    }
}
