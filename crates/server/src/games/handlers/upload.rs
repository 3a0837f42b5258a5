//! Upload Game File Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::PathParam, prelude::*};
use tracing::info;

use spiel_app::{domain::games::data::NewGameFile, identity::Role};

use crate::{extensions::*, games::errors::into_status_error, state::State};

const FILE_FIELD: &str = "file";

/// Upload Game File Handler
///
/// Accepts a multipart form with a `file` field and replaces any previous file.
#[endpoint(
    tags("games"),
    summary = "Upload Game File",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "File stored"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing file field"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
        (status_code = StatusCode::FORBIDDEN, description = "Missing role"),
        (status_code = StatusCode::NOT_FOUND, description = "Game not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.require_role(&[Role::Admin, Role::User])?;

    let id = id.into_inner();

    let Some(part) = req.file(FILE_FIELD).await else {
        return Err(StatusError::bad_request().brief("Missing multipart field \"file\""));
    };

    let data = tokio::fs::read(part.path())
        .await
        .or_500("failed to read uploaded file")?;

    let file = NewGameFile {
        filename: part.name().unwrap_or(FILE_FIELD).to_owned(),
        mimetype: part
            .content_type()
            .map(|mime| mime.essence_str().to_owned()),
        data,
    };

    let size = file.data.len();

    state
        .app
        .games
        .add_file(id.into(), file)
        .await
        .map_err(into_status_error)?;

    info!(game_id = id, size, "stored game file");

    res.add_header(LOCATION, format!("/rest/file/{id}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::OK);

    Ok(())
}
