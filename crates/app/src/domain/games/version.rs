//! Optimistic concurrency version tokens.
//!
//! A version token is the stored version counter wrapped in double quotes,
//! e.g. `"3"`, as carried by the `ETag` and `If-Match` headers.

use crate::domain::games::errors::GamesServiceError;

const MAX_VERSION_DIGITS: usize = 3;

/// Parse a quoted version token into its numeric version.
///
/// # Errors
///
/// Returns [`GamesServiceError::VersionInvalid`] when the token is missing or
/// is not one to three digits enclosed in double quotes.
pub fn parse_token(token: Option<&str>) -> Result<i32, GamesServiceError> {
    let Some(token) = token else {
        return Err(GamesServiceError::VersionInvalid(String::new()));
    };

    let invalid = || GamesServiceError::VersionInvalid(token.to_owned());

    let digits = token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(invalid)?;

    if digits.is_empty()
        || digits.len() > MAX_VERSION_DIGITS
        || !digits.bytes().all(|byte| byte.is_ascii_digit())
    {
        return Err(invalid());
    }

    digits.parse().map_err(|_parse| invalid())
}

/// Format a version as a quoted token.
#[must_use]
pub fn format_token(version: i32) -> String {
    format!("\"{version}\"")
}

/// Reject a supplied version older than the stored one.
///
/// # Errors
///
/// Returns [`GamesServiceError::VersionOutdated`] when `supplied < stored`.
pub fn ensure_current(supplied: i32, stored: i32) -> Result<(), GamesServiceError> {
    if supplied < stored {
        return Err(GamesServiceError::VersionOutdated(supplied));
    }

    Ok(())
}
