//! Reusable rules that each check a single value.
//!
//! A rule hands the value back on success so that the rules for one field can
//! be chained with [Result::and_then], e.g.
//!
//! ```ignore
//! required(input.amount, AMOUNT_REQUIRED).and_then(|amount| minimum(amount, 1, AMOUNT_MINIMUM))
//! ```

use regex::Regex;

/// The checked value, or the message describing why it was rejected.
pub type RuleResult<T> = Result<T, &'static str>;

/// A value that can be present and still count as missing.
pub trait IsEmpty {
    /// Whether the value should be treated as if it was not provided.
    fn is_empty_value(&self) -> bool;
}

impl IsEmpty for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl IsEmpty for &str {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl IsEmpty for i64 {
    fn is_empty_value(&self) -> bool {
        false
    }
}

/// Fails when `value` is absent or empty.
pub fn required<T: IsEmpty>(value: Option<T>, message: &'static str) -> RuleResult<T> {
    match value {
        Some(value) if !value.is_empty_value() => Ok(value),
        _ => Err(message),
    }
}

/// Fails when `value` is less than `min`.
pub fn minimum(value: i64, min: i64, message: &'static str) -> RuleResult<i64> {
    if value < min { Err(message) } else { Ok(value) }
}

/// Fails when the number of characters in `value` is outside `min..=max`.
///
/// Length is counted in Unicode scalar values, not bytes, so "予算" has a
/// length of two.
pub fn length_between<T: AsRef<str>>(
    value: T,
    min: usize,
    max: usize,
    message: &'static str,
) -> RuleResult<T> {
    let length = value.as_ref().chars().count();

    if (min..=max).contains(&length) {
        Ok(value)
    } else {
        Err(message)
    }
}

/// Fails when `pattern` does not match anywhere in `value`.
///
/// Anchor the pattern with `^` and `$` to match the whole string.
pub fn matches<T: AsRef<str>>(value: T, pattern: &Regex, message: &'static str) -> RuleResult<T> {
    if pattern.is_match(value.as_ref()) {
        Ok(value)
    } else {
        Err(message)
    }
}

/// Fails when `value` is not one of `allowed`.
pub fn one_of<T: AsRef<str>>(
    value: T,
    allowed: &[&str],
    message: &'static str,
) -> RuleResult<T> {
    if allowed.iter().any(|candidate| *candidate == value.as_ref()) {
        Ok(value)
    } else {
        Err(message)
    }
}

/// Does nothing when `value` is absent, fails when it is present but blank.
///
/// Unlike [required], a string of only whitespace counts as blank.
pub fn non_empty_if_present<T: AsRef<str>>(
    value: Option<T>,
    message: &'static str,
) -> RuleResult<Option<T>> {
    match value {
        Some(value) if value.as_ref().trim().is_empty() => Err(message),
        value => Ok(value),
    }
}

/// Fails when none of the fields of a partial update are present.
///
/// `present` should hold one entry per optional field of the whole input,
/// e.g. `&[input.name.is_some(), input.color.is_some()]`.
pub fn at_least_one_of(present: &[bool], message: &'static str) -> RuleResult<()> {
    if present.iter().any(|is_present| *is_present) {
        Ok(())
    } else {
        Err(message)
    }
}
