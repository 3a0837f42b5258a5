//! Create Game Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};
use tracing::info;

use spiel_app::{domain::games::data::NewGame, identity::Role};

use crate::{
    extensions::*,
    games::{
        errors::into_status_error,
        models::{GameCreatedResponse, GameRequest},
    },
    state::State,
};

/// Create Game Handler
#[endpoint(
    tags("games"),
    summary = "Create Game",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Game created"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
        (status_code = StatusCode::FORBIDDEN, description = "Missing role"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid game or duplicate EAN"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<GameRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<GameCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.require_role(&[Role::Admin, Role::User])?;

    let game = NewGame::try_from(json.into_inner()).map_err(into_status_error)?;

    let id = state
        .app
        .games
        .create(game)
        .await
        .map_err(into_status_error)?;

    info!(game_id = %id, username = %principal.username, "created game");

    res.add_header(LOCATION, format!("/rest/{id}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(GameCreatedResponse { id: id.into_i64() }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use spiel_app::domain::games::{GamesServiceError, MockGamesService, records::GameId};

    use crate::test_helpers::{games_service, inject_user};

    use super::*;

    fn body() -> Value {
        json!({
            "ean": "4006381333931",
            "rating": 4,
            "category": "BOARD",
            "price": "34.99",
            "discount": "0.100",
            "available": true,
            "keywords": ["strategy"],
            "title": { "title": "Catan" },
            "images": [{ "caption": "Box", "content_type": "image/png" }],
        })
    }

    fn make_service(games: MockGamesService) -> Service {
        games_service(
            games,
            Router::with_path("rest").hoop(inject_user).post(handler),
        )
    }

    #[tokio::test]
    async fn test_create_game_success() -> TestResult {
        let mut games = MockGamesService::new();

        games
            .expect_create()
            .once()
            .withf(|game| {
                game.ean == "4006381333931"
                    && game.title.title == "Catan"
                    && game.images.len() == 1
            })
            .return_once(|_| Ok(GameId::from_i64(7)));

        games.expect_find_by_id().never();
        games.expect_update().never();
        games.expect_delete().never();

        let mut res = TestClient::post("http://example.com/rest")
            .json(&body())
            .send(&make_service(games))
            .await;

        let body: GameCreatedResponse = res.take_json().await?;
        let location = res.headers().get(LOCATION).and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some("/rest/7"));
        assert_eq!(body.id, 7);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_ean_returns_422() -> TestResult {
        let mut games = MockGamesService::new();

        games
            .expect_create()
            .once()
            .return_once(|game| Err(GamesServiceError::EanExists(game.ean)));

        let res = TestClient::post("http://example.com/rest")
            .json(&body())
            .send(&make_service(games))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_category_returns_422() -> TestResult {
        let mut games = MockGamesService::new();

        games.expect_create().never();

        let mut body = body();
        body["category"] = json!("DICE");

        let res = TestClient::post("http://example.com/rest")
            .json(&body)
            .send(&make_service(games))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_anonymous_caller_returns_401() -> TestResult {
        let mut games = MockGamesService::new();

        games.expect_create().never();

        let res = TestClient::post("http://example.com/rest")
            .json(&body())
            .send(&games_service(games, Router::with_path("rest").post(handler)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
