//! OpenID Connect client for token and introspection endpoints.

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use zeroize::Zeroizing;

use crate::identity::{
    IdentityError,
    models::{Credentials, Introspection, TokenSet},
};

/// Configuration for connecting to an OpenID Connect provider.
#[derive(Clone)]
pub struct OidcConfig {
    /// Realm issuer, e.g. `"http://localhost:8880/realms/spiel"`.
    pub issuer_url: String,

    /// Confidential client registered for this service.
    pub client_id: String,

    /// Secret of `client_id`.
    pub client_secret: Zeroizing<String>,
}

impl std::fmt::Debug for OidcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcConfig")
            .field("issuer_url", &self.issuer_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl OidcConfig {
    fn token_url(&self) -> String {
        format!(
            "{}/protocol/openid-connect/token",
            self.issuer_url.trim_end_matches('/')
        )
    }

    fn introspection_url(&self) -> String {
        format!("{}/introspect", self.token_url())
    }
}

/// HTTP client for the provider's token endpoints.
#[derive(Debug, Clone)]
pub struct OidcClient {
    config: OidcConfig,
    http: Client,
}

impl OidcClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: OidcConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.config.client_id
    }

    /// Exchange a username and password for tokens.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Unauthorized`] when the provider rejects the
    /// credentials, or another variant on transport failure.
    pub async fn password_grant(&self, credentials: &Credentials) -> Result<TokenSet, IdentityError> {
        let response = self
            .http
            .post(self.config.token_url())
            .form(&[
                ("grant_type", "password"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;

        parse(response, "password grant").await
    }

    /// Exchange a refresh token for fresh tokens.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Unauthorized`] when the refresh token is
    /// rejected, or another variant on transport failure.
    pub async fn refresh_grant(&self, refresh_token: &str) -> Result<TokenSet, IdentityError> {
        let response = self
            .http
            .post(self.config.token_url())
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        parse(response, "refresh grant").await
    }

    /// Ask the provider whether `token` is active.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an unexpected response body.
    pub(crate) async fn introspect(&self, token: &str) -> Result<Introspection, IdentityError> {
        let response = self
            .http
            .post(self.config.introspection_url())
            .basic_auth(
                &self.config.client_id,
                Some(self.config.client_secret.as_str()),
            )
            .form(&[("token", token)])
            .send()
            .await?;

        parse(response, "introspection").await
    }
}

async fn parse<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T, IdentityError> {
    let status = response.status();

    if matches!(status, StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) {
        return Err(IdentityError::Unauthorized);
    }

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();

        return Err(IdentityError::UnexpectedResponse(format!(
            "{operation} failed with status {status}: {text}"
        )));
    }

    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(issuer_url: &str) -> OidcConfig {
        OidcConfig {
            issuer_url: issuer_url.to_string(),
            client_id: "spiel-client".to_string(),
            client_secret: Zeroizing::new("s3cret".to_string()),
        }
    }

    #[test]
    fn endpoint_urls_follow_the_issuer() {
        let config = config("http://localhost:8880/realms/spiel/");

        assert_eq!(
            config.token_url(),
            "http://localhost:8880/realms/spiel/protocol/openid-connect/token"
        );
        assert_eq!(
            config.introspection_url(),
            "http://localhost:8880/realms/spiel/protocol/openid-connect/token/introspect"
        );
    }

    #[test]
    fn config_debug_hides_secret() {
        let debug = format!("{:?}", config("http://localhost"));

        assert!(!debug.contains("s3cret"), "secret leaked: {debug}");
    }
}
