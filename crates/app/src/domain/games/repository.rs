//! Games Repository

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use tracing::debug;

use crate::domain::games::{
    criteria::{Pageable, Predicate},
    data::{GameUpdate, NewGame, NewGameFile, NewImage, NewTitle},
    keywords,
    query::{count_games, select_games},
    records::{GameFileId, GameFileRecord, GameId, GameRecord, ImageId, ImageRecord, TitleRecord},
};

const FIND_GAME_SQL: &str = include_str!("sql/find_game.sql");
const FIND_IMAGES_SQL: &str = include_str!("sql/find_images.sql");
const EAN_EXISTS_SQL: &str = include_str!("sql/ean_exists.sql");
const GAME_EXISTS_SQL: &str = include_str!("sql/game_exists.sql");
const INSERT_GAME_SQL: &str = include_str!("sql/insert_game.sql");
const INSERT_TITLE_SQL: &str = include_str!("sql/insert_title.sql");
const INSERT_IMAGE_SQL: &str = include_str!("sql/insert_image.sql");
const FIND_VERSION_SQL: &str = include_str!("sql/find_version.sql");
const UPDATE_GAME_SQL: &str = include_str!("sql/update_game.sql");
const DELETE_FILE_SQL: &str = include_str!("sql/delete_file.sql");
const DELETE_IMAGES_SQL: &str = include_str!("sql/delete_images.sql");
const DELETE_TITLE_SQL: &str = include_str!("sql/delete_title.sql");
const DELETE_GAME_SQL: &str = include_str!("sql/delete_game.sql");
const INSERT_FILE_SQL: &str = include_str!("sql/insert_file.sql");
const FIND_FILE_SQL: &str = include_str!("sql/find_file.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgGamesRepository;

impl PgGamesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    #[tracing::instrument(
        name = "games.repository.find_game",
        skip(self, tx, game),
        fields(game_id = %game),
        err
    )]
    pub(crate) async fn find_game(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: GameId,
    ) -> Result<GameRecord, sqlx::Error> {
        query_as::<Postgres, GameRecord>(FIND_GAME_SQL)
            .bind(game.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "games.repository.find_images",
        skip(self, tx, game),
        fields(game_id = %game, image_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn find_images(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: GameId,
    ) -> Result<Vec<ImageRecord>, sqlx::Error> {
        let images = query_as::<Postgres, ImageRecord>(FIND_IMAGES_SQL)
            .bind(game.into_i64())
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("image_count", images.len());

        Ok(images)
    }

    #[tracing::instrument(
        name = "games.repository.search",
        skip(self, tx, predicates, pageable),
        fields(
            predicate_count = predicates.len(),
            page = pageable.number,
            size = pageable.size,
            result_count = tracing::field::Empty
        ),
        err
    )]
    pub(crate) async fn search(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        predicates: &[Predicate],
        pageable: Pageable,
    ) -> Result<Vec<GameRecord>, sqlx::Error> {
        let mut builder = select_games(predicates, pageable);

        let games = builder
            .build_query_as::<GameRecord>()
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("result_count", games.len());

        Ok(games)
    }

    #[tracing::instrument(
        name = "games.repository.count",
        skip(self, tx, predicates),
        fields(predicate_count = predicates.len()),
        err
    )]
    pub(crate) async fn count(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        predicates: &[Predicate],
    ) -> Result<u64, sqlx::Error> {
        let mut builder = count_games(predicates);

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(total).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    pub(crate) async fn ean_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ean: &str,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(EAN_EXISTS_SQL)
            .bind(ean)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn game_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: GameId,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(GAME_EXISTS_SQL)
            .bind(game.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "games.repository.insert_game",
        skip(self, tx, game),
        fields(ean = %game.ean, game_id = tracing::field::Empty),
        err
    )]
    pub(crate) async fn insert_game(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: &NewGame,
    ) -> Result<GameId, sqlx::Error> {
        let id: i64 = query_scalar(INSERT_GAME_SQL)
            .bind(&game.ean)
            .bind(game.rating)
            .bind(game.category)
            .bind(game.price)
            .bind(game.discount)
            .bind(game.available)
            .bind(game.release_date.map(SqlxDate::from))
            .bind(game.homepage.as_deref())
            .bind(keywords::encode(&game.keywords))
            .fetch_one(&mut **tx)
            .await?;

        tracing::Span::current().record("game_id", id);

        Ok(GameId::from_i64(id))
    }

    pub(crate) async fn insert_title(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: GameId,
        title: &NewTitle,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_TITLE_SQL)
            .bind(title.title.trim())
            .bind(title.subtitle.as_deref())
            .bind(game.into_i64())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn insert_image(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: GameId,
        image: &NewImage,
    ) -> Result<ImageId, sqlx::Error> {
        let id: i64 = query_scalar(INSERT_IMAGE_SQL)
            .bind(&image.caption)
            .bind(&image.content_type)
            .bind(game.into_i64())
            .fetch_one(&mut **tx)
            .await?;

        Ok(ImageId::from_i64(id))
    }

    /// Stored version of `game`, or `None` when it does not exist.
    pub(crate) async fn find_version(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: GameId,
    ) -> Result<Option<i32>, sqlx::Error> {
        query_scalar(FIND_VERSION_SQL)
            .bind(game.into_i64())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Overwrite the scalar fields of `game` if it is still at `stored_version`.
    ///
    /// Returns the incremented version, or `None` when another writer got
    /// there first.
    #[tracing::instrument(
        name = "games.repository.update_game",
        skip(self, tx, game, update),
        fields(game_id = %game, new_version = tracing::field::Empty),
        err
    )]
    pub(crate) async fn update_game(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: GameId,
        stored_version: i32,
        update: &GameUpdate,
    ) -> Result<Option<i32>, sqlx::Error> {
        let version: Option<i32> = query_scalar(UPDATE_GAME_SQL)
            .bind(game.into_i64())
            .bind(stored_version)
            .bind(&update.ean)
            .bind(update.rating)
            .bind(update.category)
            .bind(update.price)
            .bind(update.discount)
            .bind(update.available)
            .bind(update.release_date.map(SqlxDate::from))
            .bind(update.homepage.as_deref())
            .bind(keywords::encode(&update.keywords))
            .fetch_optional(&mut **tx)
            .await?;

        if let Some(version) = version {
            tracing::Span::current().record("new_version", version);
        }

        Ok(version)
    }

    /// Remove `game` and everything hanging off it, returning whether it existed.
    #[tracing::instrument(
        name = "games.repository.delete_game",
        skip(self, tx, game),
        fields(game_id = %game, deleted = tracing::field::Empty),
        err
    )]
    pub(crate) async fn delete_game(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: GameId,
    ) -> Result<bool, sqlx::Error> {
        let id = game.into_i64();

        for statement in [DELETE_FILE_SQL, DELETE_IMAGES_SQL, DELETE_TITLE_SQL] {
            query(statement).bind(id).execute(&mut **tx).await?;
        }

        let deleted = query(DELETE_GAME_SQL)
            .bind(id)
            .execute(&mut **tx)
            .await?
            .rows_affected()
            > 0;

        tracing::Span::current().record("deleted", deleted);

        Ok(deleted)
    }

    #[tracing::instrument(
        name = "games.repository.replace_file",
        skip(self, tx, game, file),
        fields(game_id = %game, size = file.data.len()),
        err
    )]
    pub(crate) async fn replace_file(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: GameId,
        file: &NewGameFile,
    ) -> Result<GameFileId, sqlx::Error> {
        let removed = query(DELETE_FILE_SQL)
            .bind(game.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        if removed > 0 {
            debug!("replacing existing file");
        }

        let id: i64 = query_scalar(INSERT_FILE_SQL)
            .bind(&file.data)
            .bind(&file.filename)
            .bind(file.mimetype.as_deref())
            .bind(game.into_i64())
            .fetch_one(&mut **tx)
            .await?;

        Ok(GameFileId::from_i64(id))
    }

    pub(crate) async fn find_file(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        game: GameId,
    ) -> Result<GameFileRecord, sqlx::Error> {
        query_as::<Postgres, GameFileRecord>(FIND_FILE_SQL)
            .bind(game.into_i64())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for GameRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: GameId::from_i64(row.try_get("id")?),
            version: row.try_get("version")?,
            ean: row.try_get("ean")?,
            rating: row.try_get("rating")?,
            category: row.try_get("category")?,
            price: row.try_get("price")?,
            discount: row.try_get("discount")?,
            available: row.try_get("available")?,
            release_date: row
                .try_get::<Option<SqlxDate>, _>("release_date")?
                .map(SqlxDate::to_jiff),
            homepage: row.try_get("homepage")?,
            keywords: keywords::decode(row.try_get("keywords")?),
            title: TitleRecord {
                title: row.try_get("title")?,
                subtitle: row.try_get("subtitle")?,
            },
            images: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ImageRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: ImageId::from_i64(row.try_get("id")?),
            caption: row.try_get("caption")?,
            content_type: row.try_get("content_type")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for GameFileRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: GameFileId::from_i64(row.try_get("id")?),
            game_id: GameId::from_i64(row.try_get("game_id")?),
            filename: row.try_get("filename")?,
            mimetype: row.try_get("mimetype")?,
            data: row.try_get("data")?,
        })
    }
}
