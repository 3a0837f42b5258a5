//! Update Game Handler

use std::sync::Arc;

use salvo::{
    http::header::{ETAG, IF_MATCH},
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use tracing::info;

use spiel_app::{
    domain::games::{data::GameUpdate, version::format_token},
    identity::Role,
};

use crate::{
    extensions::*,
    games::{errors::into_status_error, models::GameUpdateRequest},
    state::State,
};

/// Update Game Handler
///
/// Requires the current version in `If-Match` and answers with the next one.
#[endpoint(
    tags("games"),
    summary = "Update Game",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Game updated"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
        (status_code = StatusCode::FORBIDDEN, description = "Missing role"),
        (status_code = StatusCode::NOT_FOUND, description = "Game not found"),
        (status_code = StatusCode::PRECONDITION_FAILED, description = "Invalid or outdated version"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid game"),
        (status_code = StatusCode::PRECONDITION_REQUIRED, description = "Missing If-Match header"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "games.update",
    skip(id, json, req, depot, res),
    fields(game_id = tracing::field::Empty, version = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    json: JsonBody<GameUpdateRequest>,
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.require_role(&[Role::Admin, Role::User])?;

    let id = id.into_inner();

    tracing::Span::current().record("game_id", id);

    let Some(token) = req
        .headers()
        .get(IF_MATCH)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
    else {
        return Err(StatusError::precondition_required().brief("Missing If-Match header"));
    };

    let update = match GameUpdate::try_from(json.into_inner()) {
        Ok(update) => update,
        Err(invalid) => {
            state
                .app
                .games
                .check_version(id.into(), Some(token))
                .await
                .map_err(into_status_error)?;

            return Err(into_status_error(invalid));
        }
    };

    let version = state
        .app
        .games
        .update(id.into(), update, Some(token))
        .await
        .map_err(into_status_error)?;

    tracing::Span::current().record("version", version);

    info!(game_id = id, version, "updated game");

    res.add_header(ETAG, format_token(version), true)
        .or_500("failed to set etag header")?
        .status_code(StatusCode::NO_CONTENT);

    Ok(())
}
