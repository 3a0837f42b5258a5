//! Token endpoints backed by the identity provider.

use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use tracing::error;

use spiel_app::identity::{IdentityError, TokenSet};

pub(crate) mod refresh;
pub(crate) mod token;

/// Tokens issued by the identity provider
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TokenResponse {
    /// Bearer token for authenticated requests
    pub access_token: String,

    /// Seconds until the access token expires
    pub expires_in: u64,

    /// Token used to obtain a fresh access token
    pub refresh_token: String,

    /// Seconds until the refresh token expires
    pub refresh_expires_in: u64,
}

impl From<TokenSet> for TokenResponse {
    fn from(tokens: TokenSet) -> Self {
        Self {
            access_token: tokens.access_token,
            expires_in: tokens.expires_in,
            refresh_token: tokens.refresh_token,
            refresh_expires_in: tokens.refresh_expires_in,
        }
    }
}

fn into_status_error(error: IdentityError) -> StatusError {
    match error {
        IdentityError::Unauthorized => StatusError::unauthorized().brief("Invalid credentials"),
        IdentityError::Http(source) => {
            error!("identity provider request failed: {source}");

            StatusError::internal_server_error()
        }
        IdentityError::UnexpectedResponse(detail) => {
            error!("identity provider returned an unexpected response: {detail}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
fn make_tokens() -> TokenSet {
    TokenSet {
        access_token: "access".to_string(),
        expires_in: 300,
        refresh_token: "refresh".to_string(),
        refresh_expires_in: 1_800,
    }
}
