//! Validation of transaction payloads.

use serde::Deserialize;
use time::{Date, macros::format_description};

use crate::{
    category::CategoryId,
    validation::{
        Field, FieldErrors, RuleResult, at_least_one_of, length_between, minimum,
        non_empty_if_present, required,
    },
};

const CATEGORY_ID_REQUIRED: &str = "Category ID is required.";
const CATEGORY_ID_MINIMUM: &str = "Category ID must be a positive integer.";
const AMOUNT_REQUIRED: &str = "Amount is required.";
const AMOUNT_MINIMUM: &str = "Amount must be at least 1.";
const DATE_REQUIRED: &str = "Date is required.";
const DATE_FORMAT: &str = "Date must be a valid date in the format YYYY-MM-DD.";
const DESCRIPTION_EMPTY: &str = "Description must not be blank.";
const DESCRIPTION_LENGTH: &str = "Description must be at most 255 characters.";
const NO_FIELDS: &str =
    "At least one of categoryId, amount, date or description must be provided.";

/// The raw body of a create or update transaction request.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub category_id: Option<i64>,
    pub amount: Option<i64>,
    pub date: Option<String>,
    pub description: Option<String>,
}

/// A transaction creation request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub category_id: CategoryId,
    pub amount: i64,
    pub date: Date,
    /// Empty when the request did not include a description.
    pub description: String,
}

/// A transaction update that passed validation. Fields that are `None` are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPatch {
    pub category_id: Option<CategoryId>,
    pub amount: Option<i64>,
    pub date: Option<Date>,
    pub description: Option<String>,
}

pub fn validate_new_transaction(input: TransactionInput) -> Result<NewTransaction, FieldErrors> {
    let mut errors = FieldErrors::new();

    let category_id = errors.record(
        Field::CategoryId,
        required(input.category_id, CATEGORY_ID_REQUIRED).and_then(check_category_id),
    );
    let amount = errors.record(
        Field::Amount,
        required(input.amount, AMOUNT_REQUIRED).and_then(check_amount),
    );
    let date = errors.record(
        Field::Date,
        required(input.date, DATE_REQUIRED).and_then(parse_date),
    );
    let description = errors.record(Field::Description, check_description(input.description));

    match (category_id, amount, date, description) {
        (Some(category_id), Some(amount), Some(date), Some(description)) => Ok(NewTransaction {
            category_id,
            amount,
            date,
            description: description.unwrap_or_default(),
        }),
        _ => Err(errors),
    }
}

pub fn validate_transaction_patch(
    input: TransactionInput,
) -> Result<TransactionPatch, FieldErrors> {
    if let Err(message) = at_least_one_of(
        &[
            input.category_id.is_some(),
            input.amount.is_some(),
            input.date.is_some(),
            input.description.is_some(),
        ],
        NO_FIELDS,
    ) {
        return Err(FieldErrors::single(Field::NoFields, message));
    }

    let mut errors = FieldErrors::new();

    let category_id = input
        .category_id
        .and_then(|category_id| errors.record(Field::CategoryId, check_category_id(category_id)));
    let amount = input
        .amount
        .and_then(|amount| errors.record(Field::Amount, check_amount(amount)));
    let date = input
        .date
        .and_then(|date| errors.record(Field::Date, parse_date(date)));
    let description = errors
        .record(Field::Description, check_description(input.description))
        .flatten();

    if errors.is_empty() {
        Ok(TransactionPatch {
            category_id,
            amount,
            date,
            description,
        })
    } else {
        Err(errors)
    }
}

fn check_category_id(category_id: i64) -> RuleResult<CategoryId> {
    minimum(category_id, 1, CATEGORY_ID_MINIMUM)
}

fn check_amount(amount: i64) -> RuleResult<i64> {
    minimum(amount, 1, AMOUNT_MINIMUM)
}

fn parse_date(date: String) -> RuleResult<Date> {
    Date::parse(&date, format_description!("[year]-[month]-[day]")).map_err(|_| DATE_FORMAT)
}

fn check_description(description: Option<String>) -> RuleResult<Option<String>> {
    match non_empty_if_present(description, DESCRIPTION_EMPTY)? {
        Some(description) => length_between(description, 1, 255, DESCRIPTION_LENGTH).map(Some),
        None => Ok(None),
    }
}
