//! Validation of category payloads.

use serde::Deserialize;

use crate::{
    category::CategoryType,
    validation::{
        Field, FieldErrors, RuleResult, at_least_one_of, length_between, one_of, required,
    },
};

const NAME_REQUIRED: &str = "Name is required.";
const NAME_LENGTH: &str = "Name must be between 1 and 100 characters.";
const TYPE_REQUIRED: &str = "Type is required.";
const TYPE_INVALID: &str = "Type must be either income or expense.";
const COLOR_REQUIRED: &str = "Color is required.";
const COLOR_LENGTH: &str = "Color must be between 1 and 20 characters.";
const NO_FIELDS: &str = "At least one of name, type or color must be provided.";

/// The raw body of a create or update category request.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category_type: Option<String>,
    pub color: Option<String>,
}

/// A category creation request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub category_type: CategoryType,
    pub color: String,
}

/// A category update that passed validation. Fields that are `None` are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub category_type: Option<CategoryType>,
    pub color: Option<String>,
}

pub fn validate_new_category(input: CategoryInput) -> Result<NewCategory, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = errors.record(
        Field::Name,
        required(input.name, NAME_REQUIRED).and_then(check_name),
    );
    let category_type = errors.record(
        Field::Type,
        required(input.category_type, TYPE_REQUIRED).and_then(check_type),
    );
    let color = errors.record(
        Field::Color,
        required(input.color, COLOR_REQUIRED).and_then(check_color),
    );

    match (name, category_type, color) {
        (Some(name), Some(category_type), Some(color)) => Ok(NewCategory {
            name,
            category_type,
            color,
        }),
        _ => Err(errors),
    }
}

pub fn validate_category_patch(input: CategoryInput) -> Result<CategoryPatch, FieldErrors> {
    if let Err(message) = at_least_one_of(
        &[
            input.name.is_some(),
            input.category_type.is_some(),
            input.color.is_some(),
        ],
        NO_FIELDS,
    ) {
        return Err(FieldErrors::single(Field::NoFields, message));
    }

    let mut errors = FieldErrors::new();

    let name = input
        .name
        .and_then(|name| errors.record(Field::Name, check_name(name)));
    let category_type = input
        .category_type
        .and_then(|category_type| errors.record(Field::Type, check_type(category_type)));
    let color = input
        .color
        .and_then(|color| errors.record(Field::Color, check_color(color)));

    if errors.is_empty() {
        Ok(CategoryPatch {
            name,
            category_type,
            color,
        })
    } else {
        Err(errors)
    }
}

fn check_name(name: String) -> RuleResult<String> {
    length_between(name, 1, 100, NAME_LENGTH)
}

fn check_type(category_type: String) -> RuleResult<CategoryType> {
    one_of(category_type, &CategoryType::ALL, TYPE_INVALID)
        .and_then(|category_type| category_type.parse().map_err(|_| TYPE_INVALID))
}

fn check_color(color: String) -> RuleResult<String> {
    length_between(color, 1, 20, COLOR_LENGTH)
}

#[cfg(test)]
mod new_category_validation_tests {
    use crate::{category::CategoryType, validation::Field};

    use super::{
        COLOR_LENGTH, COLOR_REQUIRED, CategoryInput, NAME_LENGTH, NAME_REQUIRED, NewCategory,
        TYPE_INVALID, TYPE_REQUIRED, validate_new_category,
    };

    fn input(name: &str, category_type: &str, color: &str) -> CategoryInput {
        CategoryInput {
            name: Some(name.to_owned()),
            category_type: Some(category_type.to_owned()),
            color: Some(color.to_owned()),
        }
    }

    #[test]
    fn valid_input_passes() {
        let got = validate_new_category(input("Food", "expense", "#ff0000"));

        assert_eq!(
            got,
            Ok(NewCategory {
                name: "Food".to_owned(),
                category_type: CategoryType::Expense,
                color: "#ff0000".to_owned(),
            })
        );
    }

    #[test]
    fn reports_every_failing_field() {
        let got = validate_new_category(CategoryInput {
            name: Some(String::new()),
            category_type: Some("invalid".to_owned()),
            color: None,
        })
        .unwrap_err();

        assert_eq!(got.len(), 3);
        assert_eq!(got.get(Field::Name), Some(NAME_REQUIRED));
        assert_eq!(got.get(Field::Type), Some(TYPE_INVALID));
        assert_eq!(got.get(Field::Color), Some(COLOR_REQUIRED));
    }

    #[test]
    fn missing_type_is_required_error() {
        let got = validate_new_category(CategoryInput {
            category_type: None,
            ..input("Food", "", "red")
        })
        .unwrap_err();

        assert_eq!(got.len(), 1);
        assert_eq!(got.get(Field::Type), Some(TYPE_REQUIRED));
    }

    #[test]
    fn name_length_is_counted_in_characters() {
        assert!(validate_new_category(input(&"食".repeat(100), "income", "red")).is_ok());

        let got = validate_new_category(input(&"食".repeat(101), "income", "red")).unwrap_err();

        assert_eq!(got.get(Field::Name), Some(NAME_LENGTH));
    }

    #[test]
    fn color_longer_than_twenty_characters_fails() {
        let got = validate_new_category(input("Food", "income", &"a".repeat(21))).unwrap_err();

        assert_eq!(got.len(), 1);
        assert_eq!(got.get(Field::Color), Some(COLOR_LENGTH));
    }
}
