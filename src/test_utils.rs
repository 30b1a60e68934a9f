#![allow(missing_docs)]

use std::sync::Mutex;

use axum::{http::header::SET_COOKIE, response::IntoResponse};
use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
use axum_test::{TestResponse, TestServer};
use email_address::EmailAddress;
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, CookieSettings, ErrorEnvelope, Reason, Status, build_router,
    category::{Category, CategoryResponse},
    csrf::{CSRF_HEADER, CsrfTokenResponse},
    endpoints,
    user::{PasswordHash, User, create_user},
};

pub(crate) const TEST_PASSWORD: &str = "Abcdefg1";

/// An [AppState] over a fresh in-memory database with every table created.
pub(crate) fn get_test_app_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database.");

    AppState::new(connection, "42", CookieSettings::default())
        .expect("Could not create app state.")
}

/// Insert a user directly into the database, skipping the sign-up endpoint.
pub(crate) fn insert_test_user(db_connection: &Mutex<Connection>, email: &str, password: &str) -> User {
    let connection = db_connection.lock().unwrap();

    create_user(
        "Test",
        &EmailAddress::new_unchecked(email),
        PasswordHash::new(password, 4).unwrap(),
        &connection,
    )
    .expect("Could not create test user.")
}

/// The encrypted cookie as the client would receive it from `jar`.
pub(crate) fn response_cookie(jar: PrivateCookieJar) -> Cookie<'static> {
    let response = jar.into_response();
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("jar should set a cookie")
        .to_str()
        .unwrap()
        .to_owned();

    Cookie::parse(header).unwrap()
}

/// A server running the whole application that keeps the cookies it is sent.
pub(crate) fn get_test_server() -> TestServer {
    let app = build_router(get_test_app_state());

    TestServer::builder()
        .save_cookies()
        .build(app)
}

/// Fetch an anti-forgery token, leaving its cookie on `server`.
pub(crate) async fn get_csrf_token(server: &TestServer) -> String {
    server
        .get(endpoints::CSRF)
        .await
        .json::<CsrfTokenResponse>()
        .csrf_token
}

/// Sign up a user with `email` and return the anti-forgery token for later
/// requests. `server` holds the auth cookie afterwards.
pub(crate) async fn sign_up(server: &TestServer, email: &str) -> String {
    let csrf_token = get_csrf_token(server).await;

    server
        .post(endpoints::SIGN_UP)
        .add_header(CSRF_HEADER, csrf_token.as_str())
        .json(&json!({"name": "Test", "email": email, "password": TEST_PASSWORD}))
        .await
        .assert_status_ok();

    csrf_token
}

/// Create a category through the API for the user signed in on `server`.
pub(crate) async fn create_test_category(
    server: &TestServer,
    csrf_token: &str,
    name: &str,
    category_type: &str,
) -> Category {
    server
        .post(endpoints::CATEGORIES)
        .add_header(CSRF_HEADER, csrf_token)
        .json(&json!({"name": name, "type": category_type, "color": "#00ff00"}))
        .await
        .json::<CategoryResponse>()
        .category
}

/// Assert that `response` is an error envelope with `status` and `reason`,
/// returning the envelope for further checks.
#[track_caller]
pub(crate) fn assert_error(response: &TestResponse, status: Status, reason: Reason) -> ErrorEnvelope {
    let envelope: ErrorEnvelope = response.json();

    assert_eq!(envelope.error.code, response.status_code().as_u16());
    assert_eq!(envelope.error.status, status);
    assert_eq!(envelope.reason(), Some(reason));

    envelope
}

/// Assert that the validation failure in `envelope` is for exactly `fields`.
#[track_caller]
pub(crate) fn assert_invalid_fields(envelope: &ErrorEnvelope, fields: &[&str]) {
    let metadata = envelope
        .metadata()
        .expect("validation errors should have metadata");
    let got: Vec<&str> = metadata.keys().map(String::as_str).collect();
    let mut want = fields.to_vec();
    want.sort_unstable();

    assert_eq!(got, want);
}
