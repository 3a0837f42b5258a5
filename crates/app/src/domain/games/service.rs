//! Games service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::games::{
        criteria::{Pageable, Predicate, SearchCriteria},
        data::{GameUpdate, NewGame, NewGameFile},
        errors::GamesServiceError,
        records::{GameFileId, GameFileRecord, GameId, GameRecord, Page},
        repository::PgGamesRepository,
        validation::{validate_new_game, validate_update},
        version::{ensure_current, parse_token},
    },
    mail::{Mail, Mailer},
};

#[derive(Clone)]
pub struct PgGamesService {
    db: Db,
    repository: PgGamesRepository,
    mailer: Arc<dyn Mailer>,
}

impl PgGamesService {
    #[must_use]
    pub fn new(db: Db, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            db,
            repository: PgGamesRepository::new(),
            mailer,
        }
    }

    /// Stored version of `game` after checking the supplied token against it.
    ///
    /// Returns `(stored, supplied)`.
    async fn current_version(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: GameId,
        version: Option<&str>,
    ) -> Result<(i32, i32), GamesServiceError> {
        let stored = self
            .repository
            .find_version(tx, game)
            .await?
            .ok_or(GamesServiceError::NotFound)?;

        let supplied = parse_token(version)?;

        ensure_current(supplied, stored)?;

        Ok((stored, supplied))
    }

    /// Write `update` if the row is still at `stored`.
    ///
    /// A concurrent writer that bumped the version in between makes the
    /// update match nothing, which is reported as outdated.
    async fn store_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: GameId,
        stored: i32,
        supplied: i32,
        update: &GameUpdate,
    ) -> Result<i32, GamesServiceError> {
        self.repository
            .update_game(tx, game, stored, update)
            .await
            .map_err(|error| with_ean(error.into(), &update.ean))?
            .ok_or(GamesServiceError::VersionOutdated(supplied))
    }

    async fn notify_created(&self, game: GameId, title: &str) {
        if let Err(error) = self.mailer.send(Mail::game_created(game, title)).await {
            warn!(game_id = %game, error = %error, "failed to send creation mail");
        }
    }
}

impl fmt::Debug for PgGamesService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgGamesService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GamesService for PgGamesService {
    async fn find_by_id(
        &self,
        game: GameId,
        with_images: bool,
    ) -> Result<GameRecord, GamesServiceError> {
        let mut tx = self.db.begin().await?;

        let mut record = self.repository.find_game(&mut tx, game).await?;

        if with_images {
            record.images = self.repository.find_images(&mut tx, game).await?;
        }

        tx.commit().await?;

        Ok(record)
    }

    async fn find(
        &self,
        criteria: SearchCriteria,
        pageable: Pageable,
    ) -> Result<Page<GameRecord>, GamesServiceError> {
        let predicates = Predicate::parse_all(&criteria)?;

        let mut tx = self.db.begin().await?;

        let content = self
            .repository
            .search(&mut tx, &predicates, pageable)
            .await?;

        if content.is_empty() {
            return Err(GamesServiceError::NotFound);
        }

        let total_elements = self.repository.count(&mut tx, &predicates).await?;

        tx.commit().await?;

        Ok(Page {
            content,
            number: pageable.number,
            size: pageable.size,
            total_elements,
            total_pages: pageable.total_pages(total_elements),
        })
    }

    async fn find_file(&self, game: GameId) -> Result<GameFileRecord, GamesServiceError> {
        let mut tx = self.db.begin().await?;

        let file = self.repository.find_file(&mut tx, game).await?;

        tx.commit().await?;

        Ok(file)
    }

    async fn create(&self, game: NewGame) -> Result<GameId, GamesServiceError> {
        validate_new_game(&game)?;

        let mut tx = self.db.begin().await?;

        if self.repository.ean_exists(&mut tx, &game.ean).await? {
            return Err(GamesServiceError::EanExists(game.ean));
        }

        let id = self
            .repository
            .insert_game(&mut tx, &game)
            .await
            .map_err(|error| with_ean(error.into(), &game.ean))?;

        self.repository
            .insert_title(&mut tx, id, &game.title)
            .await?;

        for image in &game.images {
            self.repository.insert_image(&mut tx, id, image).await?;
        }

        tx.commit().await?;

        info!(game_id = %id, ean = %game.ean, "created game");

        self.notify_created(id, &game.title.title).await;

        Ok(id)
    }

    async fn add_file(
        &self,
        game: GameId,
        file: NewGameFile,
    ) -> Result<GameFileId, GamesServiceError> {
        let mut tx = self.db.begin().await?;

        if !self.repository.game_exists(&mut tx, game).await? {
            return Err(GamesServiceError::NotFound);
        }

        let id = self.repository.replace_file(&mut tx, game, &file).await?;

        tx.commit().await?;

        Ok(id)
    }

    async fn update(
        &self,
        game: GameId,
        update: GameUpdate,
        version: Option<String>,
    ) -> Result<i32, GamesServiceError> {
        let mut tx = self.db.begin().await?;

        let (stored, supplied) = self
            .current_version(&mut tx, game, version.as_deref())
            .await?;

        validate_update(&update)?;

        let updated = self
            .store_update(&mut tx, game, stored, supplied, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn check_version(
        &self,
        game: GameId,
        version: Option<String>,
    ) -> Result<i32, GamesServiceError> {
        let mut tx = self.db.begin().await?;

        let (stored, _) = self
            .current_version(&mut tx, game, version.as_deref())
            .await?;

        tx.commit().await?;

        Ok(stored)
    }

    async fn delete(&self, game: GameId) -> Result<bool, GamesServiceError> {
        let mut tx = self.db.begin().await?;

        let deleted = self.repository.delete_game(&mut tx, game).await?;

        tx.commit().await?;

        Ok(deleted)
    }
}

/// Fill in the offending EAN on a unique violation.
fn with_ean(error: GamesServiceError, ean: &str) -> GamesServiceError {
    match error {
        GamesServiceError::EanExists(_) => GamesServiceError::EanExists(ean.to_owned()),
        other => other,
    }
}

#[automock]
#[async_trait]
pub trait GamesService: Send + Sync {
    /// Retrieve a single game, optionally with its images.
    async fn find_by_id(
        &self,
        game: GameId,
        with_images: bool,
    ) -> Result<GameRecord, GamesServiceError>;

    /// Search games. An empty result is reported as [`GamesServiceError::NotFound`].
    async fn find(
        &self,
        criteria: SearchCriteria,
        pageable: Pageable,
    ) -> Result<Page<GameRecord>, GamesServiceError>;

    /// Retrieve the file attached to a game.
    async fn find_file(&self, game: GameId) -> Result<GameFileRecord, GamesServiceError>;

    /// Creates a game with its title and images, then sends a notification.
    async fn create(&self, game: NewGame) -> Result<GameId, GamesServiceError>;

    /// Attaches a file to a game, replacing any previous one.
    async fn add_file(
        &self,
        game: GameId,
        file: NewGameFile,
    ) -> Result<GameFileId, GamesServiceError>;

    /// Updates a game guarded by its version token, returning the new version.
    async fn update(
        &self,
        game: GameId,
        update: GameUpdate,
        version: Option<String>,
    ) -> Result<i32, GamesServiceError>;

    /// Runs the existence and version checks of [`update`](Self::update)
    /// without writing, returning the stored version.
    async fn check_version(
        &self,
        game: GameId,
        version: Option<String>,
    ) -> Result<i32, GamesServiceError>;

    /// Deletes a game, returning whether anything was removed.
    async fn delete(&self, game: GameId) -> Result<bool, GamesServiceError>;
}
