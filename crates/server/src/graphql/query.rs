//! GraphQL queries

use std::sync::Arc;

use async_graphql::{Context, ID, Object, Result};

use spiel_app::domain::games::{
    GamesService,
    criteria::{Pageable, SearchCriteria},
    records::GameId,
};

use crate::graphql::{
    errors::{bad_user_input, into_graphql_error},
    types::{Spiel, SuchkriterienInput},
};

pub(crate) fn parse_id(id: &ID) -> Result<GameId> {
    id.parse::<GameId>()
        .map_err(|_parse| bad_user_input(format!("invalid id {:?}", id.as_str())))
}

#[derive(Debug, Default)]
pub(crate) struct QueryRoot;

#[Object]
impl QueryRoot {
    /// A single game with its images.
    async fn spiel(&self, ctx: &Context<'_>, id: ID) -> Result<Spiel> {
        let games = ctx.data::<Arc<dyn GamesService>>()?;

        games
            .find_by_id(parse_id(&id)?, true)
            .await
            .map(Spiel)
            .map_err(into_graphql_error)
    }

    /// Games matching the criteria. `page` is one-based.
    async fn spiele(
        &self,
        ctx: &Context<'_>,
        suchkriterien: Option<SuchkriterienInput>,
        page: Option<i32>,
        size: Option<i32>,
    ) -> Result<Vec<Spiel>> {
        let games = ctx.data::<Arc<dyn GamesService>>()?;

        let criteria = suchkriterien.map(SearchCriteria::from).unwrap_or_default();
        let pageable = Pageable::from_query(
            page.map(|page| page.to_string()).as_deref(),
            size.map(|size| size.to_string()).as_deref(),
        );

        let page = games
            .find(criteria, pageable)
            .await
            .map_err(into_graphql_error)?;

        Ok(page.content.into_iter().map(Spiel).collect())
    }
}
