//! App Router

use salvo::Router;

use crate::{auth, games, graphql, healthcheck};

/// REST resource for games. Reads are public, writes need a bearer token.
pub(crate) fn games_router() -> Router {
    Router::with_path("rest")
        .get(games::index::handler)
        .push(Router::with_path("file/{id}").get(games::file::handler))
        .push(Router::with_path("{id}").get(games::get::handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .post(games::create::handler)
                .push(
                    Router::with_path("{id}")
                        .post(games::upload::handler)
                        .put(games::update::handler)
                        .delete(games::delete::handler),
                ),
        )
}

pub(crate) fn auth_router() -> Router {
    Router::with_path("auth")
        .push(Router::with_path("token").post(auth::handlers::token::handler))
        .push(Router::with_path("refresh").post(auth::handlers::refresh::handler))
}

pub(crate) fn health_router() -> Router {
    Router::with_path("health")
        .push(Router::with_path("liveness").get(healthcheck::liveness))
        .push(Router::with_path("readiness").get(healthcheck::readiness))
}

pub(crate) fn graphql_router() -> Router {
    Router::with_path("graphql")
        .get(graphql::handler::graphiql)
        .post(graphql::handler::execute)
}

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(health_router())
        .push(auth_router())
        .push(games_router())
        .push(graphql_router())
}
