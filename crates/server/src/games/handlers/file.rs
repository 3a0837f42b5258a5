//! Download Game File Handler

use std::sync::Arc;

use salvo::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    oapi::extract::PathParam,
    prelude::*,
};

use crate::{extensions::*, games::errors::into_status_error, state::State};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Download Game File Handler
///
/// Streams the stored attachment back with its original name and type.
#[endpoint(
    tags("games"),
    summary = "Download Game File",
    responses(
        (status_code = StatusCode::OK, description = "File contents"),
        (status_code = StatusCode::NOT_FOUND, description = "No file for this game"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let file = state
        .app
        .games
        .find_file(id.into_inner().into())
        .await
        .map_err(into_status_error)?;

    let content_type = file.mimetype.as_deref().unwrap_or(FALLBACK_CONTENT_TYPE);

    res.add_header(CONTENT_TYPE, content_type, true)
        .or_500("failed to set content type header")?
        .add_header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", quote_safe(&file.filename)),
            true,
        )
        .or_500("failed to set content disposition header")?;

    res.write_body(file.data)
        .or_500("failed to write file body")?;

    Ok(())
}

/// Drop characters that would break out of a quoted header parameter.
fn quote_safe(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| *c != '"' && *c != '\\' && !c.is_control())
        .collect()
}
