//! Get Game Handler

use std::sync::Arc;

use salvo::{
    http::header::{ETAG, IF_NONE_MATCH},
    oapi::extract::PathParam,
    prelude::*,
};

use crate::{
    extensions::*,
    games::{errors::into_status_error, models::GameResponse},
    state::State,
};

/// Get Game Handler
///
/// Returns a game with its title and images, tagged with its version.
#[endpoint(
    tags("games"),
    summary = "Get Game",
    responses(
        (status_code = StatusCode::OK, description = "Game found", body = GameResponse),
        (status_code = StatusCode::NOT_MODIFIED, description = "Version matches If-None-Match"),
        (status_code = StatusCode::NOT_FOUND, description = "Game not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<i64>,
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let game = state
        .app
        .games
        .find_by_id(id.into_inner().into(), true)
        .await
        .map_err(into_status_error)?;

    let etag = game.etag();

    let not_modified = req
        .headers()
        .get(IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == etag);

    res.add_header(ETAG, etag, true)
        .or_500("failed to set etag header")?;

    if not_modified {
        res.status_code(StatusCode::NOT_MODIFIED);

        return Ok(());
    }

    res.render(Json(GameResponse::from(game)));

    Ok(())
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use spiel_app::domain::games::{
        GamesServiceError, MockGamesService,
        records::{GameId, ImageId, ImageRecord},
    };

    use crate::test_helpers::{games_service, make_game};

    use super::*;

    fn make_service(games: MockGamesService) -> Service {
        games_service(games, Router::with_path("rest/{id}").get(handler))
    }

    #[tokio::test]
    async fn test_get_game_success() -> TestResult {
        let mut game = make_game(1);

        game.version = 3;
        game.images = vec![ImageRecord {
            id: ImageId::from_i64(9),
            caption: "Box".to_string(),
            content_type: "image/png".to_string(),
        }];

        let mut games = MockGamesService::new();

        games
            .expect_find_by_id()
            .once()
            .withf(|id, with_images| *id == GameId::from_i64(1) && *with_images)
            .return_once(move |_, _| Ok(game));

        games.expect_find().never();
        games.expect_update().never();
        games.expect_delete().never();

        let mut res = TestClient::get("http://example.com/rest/1")
            .send(&make_service(games))
            .await;

        let body: GameResponse = res.take_json().await?;
        let etag = res.headers().get(ETAG).and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(etag, Some("\"3\""));
        assert_eq!(body.title.title, "Catan");
        assert_eq!(body.price, "34.99");
        assert_eq!(body.category, "BOARD");
        assert_eq!(body.images.len(), 1, "expected the image to be returned");

        Ok(())
    }

    #[tokio::test]
    async fn test_matching_if_none_match_returns_304() -> TestResult {
        let mut games = MockGamesService::new();

        games
            .expect_find_by_id()
            .once()
            .return_once(|_, _| Ok(make_game(1)));

        let res = TestClient::get("http://example.com/rest/1")
            .add_header(IF_NONE_MATCH, "\"0\"", true)
            .send(&make_service(games))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_MODIFIED));

        Ok(())
    }

    #[tokio::test]
    async fn test_stale_if_none_match_returns_game() -> TestResult {
        let mut games = MockGamesService::new();

        games
            .expect_find_by_id()
            .once()
            .return_once(|_, _| Ok(make_game(1)));

        let res = TestClient::get("http://example.com/rest/1")
            .add_header(IF_NONE_MATCH, "\"7\"", true)
            .send(&make_service(games))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_game_returns_404() -> TestResult {
        let mut games = MockGamesService::new();

        games
            .expect_find_by_id()
            .once()
            .return_once(|_, _| Err(GamesServiceError::NotFound));

        let res = TestClient::get("http://example.com/rest/404")
            .send(&make_service(games))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_non_numeric_id_returns_400() -> TestResult {
        let mut games = MockGamesService::new();

        games.expect_find_by_id().never();

        let res = TestClient::get("http://example.com/rest/catan")
            .send(&make_service(games))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
