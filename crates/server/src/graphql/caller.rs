//! Who is calling a GraphQL operation.

use async_graphql::{Context, Result};
use tracing::error;

use spiel_app::identity::{IdentityError, IdentityService, Principal, Role};

use crate::graphql::errors;

/// Outcome of resolving the request's bearer token.
#[derive(Debug, Clone)]
pub(crate) enum Caller {
    Anonymous,
    Authenticated(Principal),
    Rejected,
    Unavailable,
}

impl Caller {
    pub(crate) async fn resolve(identity: &dyn IdentityService, bearer: Option<&str>) -> Self {
        let Some(token) = bearer else {
            return Self::Anonymous;
        };

        match identity.authenticate(token).await {
            Ok(principal) => Self::Authenticated(principal),
            Err(IdentityError::Unauthorized) => Self::Rejected,
            Err(source) => {
                error!("failed to authenticate bearer token: {source}");

                Self::Unavailable
            }
        }
    }
}

/// The caller, provided they hold one of `roles`.
pub(crate) fn require_role<'ctx>(ctx: &Context<'ctx>, roles: &[Role]) -> Result<&'ctx Principal> {
    match ctx.data_opt::<Caller>() {
        Some(Caller::Authenticated(principal)) if principal.has_any_role(roles) => Ok(principal),
        Some(Caller::Authenticated(_)) => Err(errors::forbidden()),
        Some(Caller::Unavailable) => Err(errors::internal()),
        Some(Caller::Anonymous | Caller::Rejected) | None => Err(errors::unauthenticated()),
    }
}
