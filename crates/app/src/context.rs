//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, DatabaseProbe, Db},
    domain::games::{GamesService, PgGamesService},
    identity::{IdentityService, OidcClient, OidcIdentityService},
    mail::Mailer,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub games: Arc<dyn GamesService>,
    pub identity: Arc<dyn IdentityService>,
    pub database: Arc<dyn DatabaseProbe>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        identity: OidcClient,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        Ok(Self {
            games: Arc::new(PgGamesService::new(db.clone(), mailer)),
            identity: Arc::new(OidcIdentityService::new(identity)),
            database: Arc::new(db),
        })
    }
}
