//! Games service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
    postgres::PgDatabaseError,
};
use thiserror::Error;

/// SQLSTATE raised when a value does not fit its numeric column.
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// Failures surfaced by [`GamesService`](crate::domain::games::GamesService).
#[derive(Debug, Error)]
pub enum GamesServiceError {
    #[error("game not found")]
    NotFound,

    #[error("a game with EAN {0} already exists")]
    EanExists(String),

    #[error("invalid version token {0:?}")]
    VersionInvalid(String),

    #[error("version {0} is outdated")]
    VersionOutdated(i32),

    #[error("invalid game data: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for GamesServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        let Some(database_error) = error.as_database_error() else {
            return Self::Sql(error);
        };

        match database_error.kind() {
            ErrorKind::UniqueViolation if database_error.constraint() == Some("game_ean_key") => {
                Self::EanExists(duplicate_key(database_error))
            }
            ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                Self::Invalid(vec![database_error.message().to_owned()])
            }
            ErrorKind::Other
                if database_error.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE) =>
            {
                Self::Invalid(vec![database_error.message().to_owned()])
            }
            _ => Self::Sql(error),
        }
    }
}

/// The offending key of a unique violation, falling back to the raw message.
fn duplicate_key(error: &dyn DatabaseError) -> String {
    error
        .try_downcast_ref::<PgDatabaseError>()
        .and_then(PgDatabaseError::detail)
        .and_then(key_from_detail)
        .unwrap_or_else(|| error.message().to_owned())
}

/// Extract `value` from a detail like `Key (ean)=(value) already exists.`
fn key_from_detail(detail: &str) -> Option<String> {
    let (_, rest) = detail.split_once(")=(")?;
    let (key, _) = rest.rsplit_once(')')?;

    Some(key.to_owned())
}
