//! Database operations for users.

use email_address::EmailAddress;
use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    user::{PasswordHash, User, UserID},
};

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a [Error::EmailAlreadyExists] if another user has `email`, or
/// [Error::SqlError] if an SQL related error occurred.
pub fn create_user(
    name: &str,
    email: &EmailAddress,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO user (name, email, password, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        (name, email.as_str(), password_hash.as_ref(), now),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        name: name.to_owned(),
        email: email.clone(),
        password_hash,
        created_at: now,
        updated_at: now,
    })
}

/// Get the user with an ID equal to `user_id`, or `None` if there is no such user.
///
/// # Errors
///
/// Returns [Error::SqlError] if an SQL related error occurred.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<Option<User>, Error> {
    connection
        .prepare(
            "SELECT id, name, email, password, created_at, updated_at FROM user WHERE id = :id",
        )?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Get the user that signs in with `email`, or `None` if there is no such user.
///
/// # Errors
///
/// Returns [Error::SqlError] if an SQL related error occurred.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<Option<User>, Error> {
    connection
        .prepare(
            "SELECT id, name, email, password, created_at, updated_at FROM user
             WHERE email = :email",
        )?
        .query_row(&[(":email", email)], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Whether a user has already signed up with `email`.
///
/// # Errors
///
/// Returns [Error::SqlError] if an SQL related error occurred.
pub fn email_exists(email: &EmailAddress, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM user WHERE email = ?1)",
            [email.as_str()],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let name = row.get(1)?;
    let raw_email: String = row.get(2)?;
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(raw_id),
        name,
        email: EmailAddress::new_unchecked(raw_email),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

#[cfg(test)]
mod user_query_tests {
    use std::str::FromStr;

    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{
        Error,
        user::{PasswordHash, UserID},
    };

    use super::{create_user, create_user_table, email_exists, get_user_by_email, get_user_by_id};

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::from_str(raw).unwrap()
    }

    #[test]
    fn insert_user_succeeds() {
        let connection = get_db_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user = create_user(
            "Alice",
            &email("alice@example.com"),
            password_hash.clone(),
            &connection,
        )
        .unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.name, "Alice");
        assert_eq!(inserted_user.email, email("alice@example.com"));
        assert_eq!(inserted_user.password_hash, password_hash);
    }

    #[test]
    fn insert_user_fails_on_duplicate_email() {
        let connection = get_db_connection();
        let address = email("alice@example.com");
        create_user(
            "Alice",
            &address,
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        let duplicate = create_user(
            "Alice Again",
            &address,
            PasswordHash::new_unchecked("hunter3"),
            &connection,
        );

        assert_eq!(duplicate, Err(Error::EmailAlreadyExists));
    }

    #[test]
    fn get_user_by_id_round_trips() {
        let connection = get_db_connection();
        let inserted_user = create_user(
            "Bob",
            &email("bob@example.com"),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        let selected_user = get_user_by_id(inserted_user.id, &connection);

        assert_eq!(selected_user, Ok(Some(inserted_user)));
    }

    #[test]
    fn get_user_by_id_returns_none_for_missing_user() {
        let connection = get_db_connection();

        assert_eq!(get_user_by_id(UserID::new(42), &connection), Ok(None));
    }

    #[test]
    fn get_user_by_email_finds_user() {
        let connection = get_db_connection();
        let inserted_user = create_user(
            "Carol",
            &email("carol@example.com"),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        let selected_user = get_user_by_email("carol@example.com", &connection);

        assert_eq!(selected_user, Ok(Some(inserted_user)));
        assert_eq!(
            get_user_by_email("dave@example.com", &connection),
            Ok(None)
        );
    }

    #[test]
    fn email_exists_reports_registered_addresses() {
        let connection = get_db_connection();
        create_user(
            "Erin",
            &email("erin@example.com"),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        assert_eq!(email_exists(&email("erin@example.com"), &connection), Ok(true));
        assert_eq!(email_exists(&email("frank@example.com"), &connection), Ok(false));
    }
}
