//! GraphQL error codes.

use async_graphql::{Error, ErrorExtensions as _};
use tracing::error;

use spiel_app::{domain::games::GamesServiceError, identity::IdentityError};

const BAD_USER_INPUT: &str = "BAD_USER_INPUT";
const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
const FORBIDDEN: &str = "FORBIDDEN";
const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

fn coded(message: impl std::fmt::Display, code: &'static str) -> Error {
    Error::new(message.to_string()).extend_with(|_, extensions| extensions.set("code", code))
}

pub(crate) fn into_graphql_error(error: GamesServiceError) -> Error {
    match error {
        GamesServiceError::Sql(source) => {
            error!("games storage failure: {source}");

            internal()
        }
        other => bad_user_input(other),
    }
}

pub(crate) fn from_identity_error(error: IdentityError) -> Error {
    match error {
        IdentityError::Unauthorized => coded("Invalid credentials", UNAUTHENTICATED),
        other => {
            error!("identity provider failure: {other}");

            internal()
        }
    }
}

pub(crate) fn bad_user_input(message: impl std::fmt::Display) -> Error {
    coded(message, BAD_USER_INPUT)
}

pub(crate) fn unauthenticated() -> Error {
    coded("Authentication required", UNAUTHENTICATED)
}

pub(crate) fn forbidden() -> Error {
    coded("Missing required role", FORBIDDEN)
}

pub(crate) fn internal() -> Error {
    coded("Internal server error", INTERNAL_SERVER_ERROR)
}
