//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the uppercase initials of a name, at most two letters.
///
/// The signed-in tenant has no stored avatar, so the sidenav renders these
/// instead.
///
/// Usage in templates: `{{ user_name|initials }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn initials(name: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let name = name.to_string();
    let mut letters = name.split_whitespace().filter_map(|word| word.chars().next());
    let first = letters.next();
    let last = letters.last();

    Ok(first
        .into_iter()
        .chain(last)
        .flat_map(char::to_uppercase)
        .collect())
}
