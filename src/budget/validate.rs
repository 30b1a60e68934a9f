//! Validation of budget payloads.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::{
    category::CategoryId,
    validation::{Field, FieldErrors, RuleResult, at_least_one_of, matches, minimum, required},
};

const CATEGORY_ID_REQUIRED: &str = "Category ID is required.";
const CATEGORY_ID_MINIMUM: &str = "Category ID must be a positive integer.";
const AMOUNT_REQUIRED: &str = "Amount is required.";
const AMOUNT_MINIMUM: &str = "Amount must be at least 1.";
const MONTH_REQUIRED: &str = "Month is required.";
const MONTH_FORMAT: &str = "Month must be in the format YYYY-MM.";
const NO_FIELDS: &str = "At least one of categoryId, amount or month must be provided.";

static MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").unwrap());

/// The raw body of a create or update budget request.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInput {
    pub category_id: Option<i64>,
    pub amount: Option<i64>,
    pub month: Option<String>,
}

/// A budget creation request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBudget {
    pub category_id: CategoryId,
    pub amount: i64,
    pub month: String,
}

/// A budget update that passed validation. Fields that are `None` are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetPatch {
    pub category_id: Option<CategoryId>,
    pub amount: Option<i64>,
    pub month: Option<String>,
}

pub fn validate_new_budget(input: BudgetInput) -> Result<NewBudget, FieldErrors> {
    let mut errors = FieldErrors::new();

    let category_id = errors.record(
        Field::CategoryId,
        required(input.category_id, CATEGORY_ID_REQUIRED).and_then(check_category_id),
    );
    let amount = errors.record(
        Field::Amount,
        required(input.amount, AMOUNT_REQUIRED).and_then(check_amount),
    );
    let month = errors.record(
        Field::Month,
        required(input.month, MONTH_REQUIRED).and_then(check_month),
    );

    match (category_id, amount, month) {
        (Some(category_id), Some(amount), Some(month)) => Ok(NewBudget {
            category_id,
            amount,
            month,
        }),
        _ => Err(errors),
    }
}

pub fn validate_budget_patch(input: BudgetInput) -> Result<BudgetPatch, FieldErrors> {
    if let Err(message) = at_least_one_of(
        &[
            input.category_id.is_some(),
            input.amount.is_some(),
            input.month.is_some(),
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
    let month = input
        .month
        .and_then(|month| errors.record(Field::Month, check_month(month)));

    if errors.is_empty() {
        Ok(BudgetPatch {
            category_id,
            amount,
            month,
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

fn check_month(month: String) -> RuleResult<String> {
    matches(month, &MONTH, MONTH_FORMAT)
}
