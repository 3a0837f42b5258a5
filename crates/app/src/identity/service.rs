//! Identity service.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::identity::{
    IdentityError,
    client::OidcClient,
    models::{Credentials, Principal, TokenSet},
};

#[derive(Debug, Clone)]
pub struct OidcIdentityService {
    client: OidcClient,
}

impl OidcIdentityService {
    #[must_use]
    pub fn new(client: OidcClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityService for OidcIdentityService {
    #[tracing::instrument(
        name = "identity.service.token",
        skip(self, credentials),
        fields(username = %credentials.username),
        err
    )]
    async fn token(&self, credentials: Credentials) -> Result<TokenSet, IdentityError> {
        self.client.password_grant(&credentials).await
    }

    #[tracing::instrument(name = "identity.service.refresh", skip_all, err)]
    async fn refresh(&self, refresh_token: String) -> Result<TokenSet, IdentityError> {
        self.client.refresh_grant(&refresh_token).await
    }

    #[tracing::instrument(
        name = "identity.service.authenticate",
        skip_all,
        fields(username = tracing::field::Empty),
        err
    )]
    async fn authenticate(&self, bearer_token: &str) -> Result<Principal, IdentityError> {
        let principal = self
            .client
            .introspect(bearer_token)
            .await?
            .into_principal(self.client.client_id())
            .ok_or(IdentityError::Unauthorized)?;

        tracing::Span::current().record("username", principal.username.as_str());

        debug!(roles = ?principal.roles, "authenticated caller");

        Ok(principal)
    }
}

#[automock]
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Obtain tokens with the password grant.
    async fn token(&self, credentials: Credentials) -> Result<TokenSet, IdentityError>;

    /// Obtain fresh tokens with a refresh token.
    async fn refresh(&self, refresh_token: String) -> Result<TokenSet, IdentityError>;

    /// Resolve a bearer token into the caller behind it.
    async fn authenticate(&self, bearer_token: &str) -> Result<Principal, IdentityError>;
}
