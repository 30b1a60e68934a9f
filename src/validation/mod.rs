//! Field-level validation for request payloads.
//!
//! Rules in [rules] check one value at a time and return a static message on
//! failure. Entity validators apply them field by field and collect every
//! failure into [FieldErrors] keyed by [Field], so a client sees all the
//! problems with a payload at once.

mod field;
mod rules;

pub use field::{Field, FieldErrors};
pub use rules::{
    RuleResult, at_least_one_of, length_between, matches, minimum, non_empty_if_present,
    one_of, required,
};
