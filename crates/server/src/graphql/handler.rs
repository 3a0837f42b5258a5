//! GraphQL HTTP handlers.

use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use salvo::prelude::*;

use crate::{
    auth::extract_bearer_token, extensions::*, graphql::caller::Caller,
    observability::observe_graphql, state::State,
};

const GRAPHQL_PATH: &str = "/graphql";

/// Serve the GraphiQL playground.
#[handler]
pub(crate) async fn graphiql(res: &mut Response) {
    res.render(Text::Html(
        GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish(),
    ));
}

/// Execute a GraphQL request on behalf of the bearer token's owner, if any.
#[handler]
pub(crate) async fn execute(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = req
        .parse_json::<async_graphql::Request>()
        .await
        .or_400("invalid GraphQL request")?;

    let caller = Caller::resolve(state.app.identity.as_ref(), extract_bearer_token(req)).await;

    let response = state.schema.execute(request.data(caller)).await;

    observe_graphql(response.is_err());

    res.render(Json(response));

    Ok(())
}
