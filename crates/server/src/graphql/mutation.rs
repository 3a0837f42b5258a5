//! GraphQL mutations

use std::sync::Arc;

use async_graphql::{Context, ID, Object, Result};
use tracing::info;

use spiel_app::{
    domain::games::{
        GamesService,
        data::{GameUpdate, NewGame},
        version::format_token,
    },
    identity::{Credentials, IdentityService, Role},
};

use crate::graphql::{
    caller::require_role,
    errors::{from_identity_error, into_graphql_error},
    query::parse_id,
    types::{CreatePayload, SpielInput, SpielUpdateInput, TokenPayload, UpdatePayload},
};

#[derive(Debug, Default)]
pub(crate) struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create(&self, ctx: &Context<'_>, input: SpielInput) -> Result<CreatePayload> {
        let principal = require_role(ctx, &[Role::Admin, Role::User])?;
        let games = ctx.data::<Arc<dyn GamesService>>()?;

        let game = NewGame::try_from(input).map_err(into_graphql_error)?;

        let id = games.create(game).await.map_err(into_graphql_error)?;

        info!(game_id = %id, username = %principal.username, "created game");

        Ok(CreatePayload {
            id: ID(id.to_string()),
        })
    }

    /// Update a game; `input.version` must not be older than the stored one.
    async fn update(&self, ctx: &Context<'_>, input: SpielUpdateInput) -> Result<UpdatePayload> {
        require_role(ctx, &[Role::Admin, Role::User])?;
        let games = ctx.data::<Arc<dyn GamesService>>()?;

        let id = parse_id(&input.id)?;
        let token = format_token(input.version);

        let update = match GameUpdate::try_from(input) {
            Ok(update) => update,
            Err(invalid) => {
                games
                    .check_version(id, Some(token))
                    .await
                    .map_err(into_graphql_error)?;

                return Err(into_graphql_error(invalid));
            }
        };

        let version = games
            .update(id, update, Some(token))
            .await
            .map_err(into_graphql_error)?;

        Ok(UpdatePayload { version })
    }

    async fn delete(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        require_role(ctx, &[Role::Admin])?;
        let games = ctx.data::<Arc<dyn GamesService>>()?;

        games
            .delete(parse_id(&id)?)
            .await
            .map_err(into_graphql_error)
    }

    async fn token(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<TokenPayload> {
        let identity = ctx.data::<Arc<dyn IdentityService>>()?;

        identity
            .token(Credentials::new(username, password))
            .await
            .map(Into::into)
            .map_err(from_identity_error)
    }

    async fn refresh(&self, ctx: &Context<'_>, refresh_token: String) -> Result<TokenPayload> {
        let identity = ctx.data::<Arc<dyn IdentityService>>()?;

        identity
            .refresh(refresh_token)
            .await
            .map(Into::into)
            .map_err(from_identity_error)
    }
}
