//! Identifiers for the fields of request payloads and the map of validation
//! failures keyed by them.

use std::{collections::BTreeMap, fmt::Display};

use serde::Serialize;

use crate::validation::RuleResult;

/// A field of a request payload that can fail validation.
///
/// Serializes to the JSON key the client used for the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    Password,
    Type,
    Color,
    CategoryId,
    Amount,
    Month,
    Date,
    Description,
    /// Not a real field. Used when a partial update contains no fields at all.
    #[serde(rename = "no_fields")]
    NoFields,
}

impl Field {
    /// The JSON key for the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Password => "password",
            Field::Type => "type",
            Field::Color => "color",
            Field::CategoryId => "categoryId",
            Field::Amount => "amount",
            Field::Month => "month",
            Field::Date => "date",
            Field::Description => "description",
            Field::NoFields => "no_fields",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The validation failures for a payload, at most one message per field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    /// Create an empty set of errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set with a single error.
    pub fn single(field: Field, message: &'static str) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Record `message` against `field` unless the field already has an error.
    ///
    /// The first failure for a field is the one reported.
    pub fn insert(&mut self, field: Field, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    /// Record the outcome of the rules for `field`, returning the value if
    /// every rule passed.
    pub fn record<T>(&mut self, field: Field, result: RuleResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.insert(field, message);
                None
            }
        }
    }

    /// Whether no field has failed validation.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of fields that failed validation.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The error message for `field`, if it failed validation.
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    /// The fields that failed validation, in a stable order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    /// Convert into a map of JSON keys to messages.
    pub fn to_metadata(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(field, message)| (field.as_str().to_owned(), (*message).to_owned()))
            .collect()
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, (field, message)) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }

            write!(f, "{field}: {message}")?;
        }

        Ok(())
    }
}
