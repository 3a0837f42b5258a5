//! Search Games Handler

use std::sync::Arc;

use salvo::prelude::*;

use spiel_app::domain::games::criteria::SearchCriteria;

use crate::{
    extensions::*,
    games::{
        errors::into_search_status_error,
        models::{PageResponse, pageable_from_query},
    },
    state::State,
};

/// Search Games Handler
///
/// Every query parameter except `page` and `size` is a search criterion.
#[endpoint(
    tags("games"),
    summary = "Search Games",
    responses(
        (status_code = StatusCode::OK, description = "Matching games"),
        (status_code = StatusCode::NOT_FOUND, description = "No match or unknown criterion"),
        (status_code = StatusCode::BAD_REQUEST, description = "Malformed criterion value"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<PageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let (pageable, criteria) = pageable_from_query(
        req.queries()
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str())),
    );

    let criteria: SearchCriteria = criteria.into_iter().collect();

    let page = state
        .app
        .games
        .find(criteria, pageable)
        .await
        .map_err(into_search_status_error)?;

    Ok(Json(page.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use spiel_app::domain::games::{
        GamesServiceError, MockGamesService,
        criteria::Pageable,
        records::Page,
    };

    use crate::test_helpers::{games_service, make_game};

    use super::*;

    fn make_service(games: MockGamesService) -> Service {
        games_service(games, Router::with_path("rest").get(handler))
    }

    #[tokio::test]
    async fn test_search_returns_page() -> TestResult {
        let mut games = MockGamesService::new();

        games
            .expect_find()
            .once()
            .withf(|criteria, pageable| {
                *criteria == SearchCriteria::new().with("title", "cat")
                    && *pageable == Pageable { number: 1, size: 1 }
            })
            .return_once(|_, _| {
                Ok(Page {
                    content: vec![make_game(2)],
                    number: 1,
                    size: 1,
                    total_elements: 2,
                    total_pages: 2,
                })
            });

        games.expect_find_by_id().never();
        games.expect_create().never();
        games.expect_update().never();
        games.expect_delete().never();

        let mut res = TestClient::get("http://example.com/rest?title=cat&page=2&size=1")
            .send(&make_service(games))
            .await;

        let body: PageResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.content.len(), 1, "expected one game");
        assert_eq!(body.content.first().map(|game| game.id), Some(2));
        assert_eq!(body.page.total_elements, 2);
        assert_eq!(body.page.total_pages, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_search_without_matches_returns_404() -> TestResult {
        let mut games = MockGamesService::new();

        games
            .expect_find()
            .once()
            .return_once(|_, _| Err(GamesServiceError::NotFound));

        let res = TestClient::get("http://example.com/rest?publisher=Kosmos")
            .send(&make_service(games))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_search_with_bad_value_returns_400() -> TestResult {
        let mut games = MockGamesService::new();

        games
            .expect_find()
            .once()
            .withf(|criteria, _| *criteria == SearchCriteria::new().with("rating", "high"))
            .return_once(|_, _| Err(GamesServiceError::Invalid(vec!["rating".to_string()])));

        let res = TestClient::get("http://example.com/rest?rating=high")
            .send(&make_service(games))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
