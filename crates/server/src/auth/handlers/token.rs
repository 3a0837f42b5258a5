//! Password Grant Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::Deserialize;

use spiel_app::identity::Credentials;

use crate::{
    auth::handlers::{TokenResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Login Request
#[derive(Deserialize, ToSchema)]
pub(crate) struct TokenRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Token Handler
///
/// Exchanges a username and password for tokens.
#[endpoint(
    tags("auth"),
    summary = "Obtain Tokens",
    responses(
        (status_code = StatusCode::OK, description = "Tokens issued"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid credentials"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<TokenRequest>,
    depot: &mut Depot,
) -> Result<Json<TokenResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let tokens = state
        .app
        .identity
        .token(Credentials::new(request.username, request.password))
        .await
        .map_err(into_status_error)?;

    Ok(Json(tokens.into()))
}
