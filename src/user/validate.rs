//! Validation of sign-up and sign-in payloads.

use std::{str::FromStr, sync::LazyLock};

use email_address::EmailAddress;
use regex::Regex;
use serde::Deserialize;

use crate::validation::{Field, FieldErrors, RuleResult, length_between, matches, required};

const NAME_REQUIRED: &str = "Name is required.";
const NAME_LENGTH: &str = "Name must be between 1 and 20 characters.";
const EMAIL_REQUIRED: &str = "Email is required.";
const EMAIL_INVALID: &str = "Email must be a valid email address.";
const PASSWORD_REQUIRED: &str = "Password is required.";
const PASSWORD_LENGTH: &str = "Password must be between 8 and 24 characters.";
const PASSWORD_UPPERCASE: &str = "Password must contain at least one uppercase letter.";
const PASSWORD_LOWERCASE: &str = "Password must contain at least one lowercase letter.";
const PASSWORD_DIGIT: &str = "Password must contain at least one number.";

static UPPERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[A-Z]").unwrap());
static LOWERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[a-z]").unwrap());
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new("[0-9]").unwrap());

/// The raw sign-up request body.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SignUpInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A sign-up request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUp {
    pub name: String,
    pub email: EmailAddress,
    pub password: String,
}

/// The raw sign-in request body.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SignInInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A sign-in request that passed validation.
///
/// The email address is not checked for syntax, an address that cannot
/// belong to any user simply fails to sign in.
#[derive(Debug, Clone, PartialEq)]
pub struct SignIn {
    pub email: String,
    pub password: String,
}

pub fn validate_sign_up(input: SignUpInput) -> Result<SignUp, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = errors.record(
        Field::Name,
        required(input.name, NAME_REQUIRED)
            .and_then(|name| length_between(name, 1, 20, NAME_LENGTH)),
    );
    let email = errors.record(
        Field::Email,
        required(input.email, EMAIL_REQUIRED).and_then(parse_email),
    );
    let password = errors.record(
        Field::Password,
        required(input.password, PASSWORD_REQUIRED).and_then(check_password_strength),
    );

    match (name, email, password) {
        (Some(name), Some(email), Some(password)) if errors.is_empty() => Ok(SignUp {
            name,
            email,
            password,
        }),
        _ => Err(errors),
    }
}

pub fn validate_sign_in(input: SignInInput) -> Result<SignIn, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = errors.record(Field::Email, required(input.email, EMAIL_REQUIRED));
    let password = errors.record(Field::Password, required(input.password, PASSWORD_REQUIRED));

    match (email, password) {
        (Some(email), Some(password)) => Ok(SignIn { email, password }),
        _ => Err(errors),
    }
}

fn parse_email(raw_email: String) -> RuleResult<EmailAddress> {
    EmailAddress::from_str(&raw_email).map_err(|_| EMAIL_INVALID)
}

/// Reports only the first rule the password breaks.
fn check_password_strength(password: String) -> RuleResult<String> {
    length_between(password, 8, 24, PASSWORD_LENGTH)
        .and_then(|password| matches(password, &UPPERCASE, PASSWORD_UPPERCASE))
        .and_then(|password| matches(password, &LOWERCASE, PASSWORD_LOWERCASE))
        .and_then(|password| matches(password, &DIGIT, PASSWORD_DIGIT))
}
