//! Identity Config

use clap::Args;
use spiel_app::identity::OidcConfig;
use zeroize::Zeroizing;

/// OpenID Connect provider settings.
#[derive(Debug, Args)]
pub struct IdentityConfig {
    /// Realm issuer URL, e.g. `http://localhost:8880/realms/spiel`
    #[arg(long, env = "IDENTITY_ISSUER_URL")]
    pub issuer_url: String,

    /// Client id registered for this service
    #[arg(long, env = "IDENTITY_CLIENT_ID", default_value = "spiel-client")]
    pub client_id: String,

    /// Client secret
    #[arg(long, env = "IDENTITY_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,
}

impl IdentityConfig {
    /// Provider settings consumed by the identity client.
    #[must_use]
    pub fn oidc(&self) -> OidcConfig {
        OidcConfig {
            issuer_url: self.issuer_url.clone(),
            client_id: self.client_id.clone(),
            client_secret: Zeroizing::new(self.client_secret.clone()),
        }
    }
}
