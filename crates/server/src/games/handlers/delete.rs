//! Delete Game Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::{debug, info};

use spiel_app::identity::Role;

use crate::{extensions::*, games::errors::into_status_error, state::State};

/// Delete Game Handler
///
/// Deleting a game that does not exist still succeeds.
#[endpoint(
    tags("games"),
    summary = "Delete Game",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Game deleted"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.require_role(&[Role::Admin])?;

    let id = id.into_inner();

    let deleted = state
        .app
        .games
        .delete(id.into())
        .await
        .map_err(into_status_error)?;

    if deleted {
        info!(game_id = id, "deleted game");
    } else {
        debug!(game_id = id, "nothing to delete");
    }

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}
