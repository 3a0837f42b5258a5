//! GraphQL schema

use std::sync::Arc;

use async_graphql::{EmptySubscription, Schema};

use spiel_app::{domain::games::GamesService, identity::IdentityService};

use crate::graphql::{mutation::MutationRoot, query::QueryRoot};

pub(crate) type SpielSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub(crate) fn schema(
    games: Arc<dyn GamesService>,
    identity: Arc<dyn IdentityService>,
) -> SpielSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(games)
        .data(identity)
        .finish()
}

#[cfg(test)]
mod tests {
    use async_graphql::{Request, Response, Value};
    use serde_json::json;
    use smallvec::smallvec;
    use testresult::TestResult;

    use spiel_app::{
        domain::games::{
            GamesServiceError, MockGamesService,
            criteria::{Pageable, SearchCriteria},
            records::{GameId, Page},
        },
        identity::{IdentityError, MockIdentityService, Principal, Role, TokenSet},
    };

    use crate::{graphql::caller::Caller, test_helpers::make_game};

    use super::*;

    fn build(games: MockGamesService, identity: MockIdentityService) -> SpielSchema {
        schema(Arc::new(games), Arc::new(identity))
    }

    fn user() -> Caller {
        Caller::Authenticated(Principal {
            username: "user".to_string(),
            roles: smallvec![Role::User],
        })
    }

    fn error_code(response: &Response) -> Option<Value> {
        response
            .errors
            .first()
            .and_then(|error| error.extensions.as_ref())
            .and_then(|extensions| extensions.get("code"))
            .cloned()
    }

    const CREATE: &str = r#"
        mutation {
            create(input: {
                ean: "4006381333931",
                rating: 4,
                category: BOARD,
                price: "34.99",
                discount: "0.1",
                available: true,
                keywords: ["strategy"],
                title: { title: "Catan" }
            }) { id }
        }
    "#;

    #[tokio::test]
    async fn spiel_resolves_game_fields() -> TestResult {
        let mut games = MockGamesService::new();

        games
            .expect_find_by_id()
            .once()
            .withf(|id, _| *id == GameId::from_i64(1))
            .return_once(|_, _| Ok(make_game(1)));

        let response = build(games, MockIdentityService::new())
            .execute("{ spiel(id: \"1\") { id version category price keywords } }")
            .await;

        assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
        assert_eq!(
            response.data.into_json()?,
            json!({
                "spiel": {
                    "id": "1",
                    "version": 0,
                    "category": "BOARD",
                    "price": "34.99",
                    "keywords": ["STRATEGY"]
                }
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn missing_spiel_is_bad_user_input() {
        let mut games = MockGamesService::new();

        games
            .expect_find_by_id()
            .once()
            .return_once(|_, _| Err(GamesServiceError::NotFound));

        let response = build(games, MockIdentityService::new())
            .execute("{ spiel(id: \"9\") { id } }")
            .await;

        assert_eq!(error_code(&response), Some(Value::from("BAD_USER_INPUT")));
    }

    #[tokio::test]
    async fn spiele_passes_criteria_and_page() -> TestResult {
        let mut games = MockGamesService::new();

        games
            .expect_find()
            .once()
            .withf(|criteria, pageable| {
                *criteria == SearchCriteria::new().with("title", "a").with("action", "true")
                    && *pageable == Pageable { number: 0, size: 2 }
            })
            .return_once(|_, _| {
                Ok(Page {
                    content: vec![make_game(1), make_game(2)],
                    number: 0,
                    size: 2,
                    total_elements: 2,
                    total_pages: 1,
                })
            });

        let response = build(games, MockIdentityService::new())
            .execute(
                "{ spiele(suchkriterien: { title: \"a\", action: true }, page: 1, size: 2) { id } }",
            )
            .await;

        assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
        assert_eq!(
            response.data.into_json()?,
            json!({ "spiele": [{ "id": "1" }, { "id": "2" }] })
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_requires_authentication() {
        let mut games = MockGamesService::new();

        games.expect_create().never();

        let response = build(games, MockIdentityService::new())
            .execute(CREATE)
            .await;

        assert_eq!(error_code(&response), Some(Value::from("UNAUTHENTICATED")));
    }

    #[tokio::test]
    async fn create_returns_new_id() -> TestResult {
        let mut games = MockGamesService::new();

        games
            .expect_create()
            .once()
            .withf(|game| game.title.title == "Catan" && game.keywords.len() == 1)
            .return_once(|_| Ok(GameId::from_i64(11)));

        let response = build(games, MockIdentityService::new())
            .execute(Request::new(CREATE).data(user()))
            .await;

        assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
        assert_eq!(
            response.data.into_json()?,
            json!({ "create": { "id": "11" } })
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_sends_quoted_version() -> TestResult {
        let mut games = MockGamesService::new();

        games
            .expect_update()
            .once()
            .withf(|id, _, version| {
                *id == GameId::from_i64(1) && version.as_deref() == Some("\"2\"")
            })
            .return_once(|_, _, _| Ok(3));

        let response = build(games, MockIdentityService::new())
            .execute(
                Request::new(
                    r#"mutation {
                        update(input: {
                            id: "1", version: 2, ean: "4006381333931", rating: 5,
                            category: CARD, price: "10", discount: "0", available: false
                        }) { version }
                    }"#,
                )
                .data(user()),
            )
            .await;

        assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
        assert_eq!(
            response.data.into_json()?,
            json!({ "update": { "version": 3 } })
        );

        Ok(())
    }

    #[tokio::test]
    async fn outdated_update_is_bad_user_input() {
        let mut games = MockGamesService::new();

        games
            .expect_update()
            .once()
            .return_once(|_, _, _| Err(GamesServiceError::VersionOutdated(0)));

        let response = build(games, MockIdentityService::new())
            .execute(
                Request::new(
                    r#"mutation {
                        update(input: {
                            id: "1", version: 0, ean: "4006381333931", rating: 5,
                            category: CARD, price: "10", discount: "0", available: false
                        }) { version }
                    }"#,
                )
                .data(user()),
            )
            .await;

        assert_eq!(error_code(&response), Some(Value::from("BAD_USER_INPUT")));
    }

    #[tokio::test]
    async fn unparsable_update_of_missing_game_reports_not_found() {
        let mut games = MockGamesService::new();

        games
            .expect_check_version()
            .once()
            .withf(|id, version| {
                *id == GameId::from_i64(9) && version.as_deref() == Some("\"0\"")
            })
            .return_once(|_, _| Err(GamesServiceError::NotFound));
        games.expect_update().never();

        let response = build(games, MockIdentityService::new())
            .execute(
                Request::new(
                    r#"mutation {
                        update(input: {
                            id: "9", version: 0, ean: "4006381333931", rating: 5,
                            category: CARD, price: "10", discount: "0", available: false,
                            releaseDate: "not-a-date"
                        }) { version }
                    }"#,
                )
                .data(user()),
            )
            .await;

        assert_eq!(error_code(&response), Some(Value::from("BAD_USER_INPUT")));
        assert_eq!(
            response.errors.first().map(|error| error.message.as_str()),
            Some("game not found")
        );
    }

    #[tokio::test]
    async fn delete_requires_admin() {
        let mut games = MockGamesService::new();

        games.expect_delete().never();

        let response = build(games, MockIdentityService::new())
            .execute(Request::new("mutation { delete(id: \"1\") }").data(user()))
            .await;

        assert_eq!(error_code(&response), Some(Value::from("FORBIDDEN")));
    }

    #[tokio::test]
    async fn rejected_token_is_unauthenticated() {
        let mut games = MockGamesService::new();

        games.expect_delete().never();

        let response = build(games, MockIdentityService::new())
            .execute(Request::new("mutation { delete(id: \"1\") }").data(Caller::Rejected))
            .await;

        assert_eq!(error_code(&response), Some(Value::from("UNAUTHENTICATED")));
    }

    #[tokio::test]
    async fn token_returns_tokens() -> TestResult {
        let mut identity = MockIdentityService::new();

        identity
            .expect_token()
            .once()
            .withf(|credentials| credentials.username == "admin")
            .return_once(|_| {
                Ok(TokenSet {
                    access_token: "access".to_string(),
                    expires_in: 300,
                    refresh_token: "refresh".to_string(),
                    refresh_expires_in: 1_800,
                })
            });

        let response = build(MockGamesService::new(), identity)
            .execute(
                "mutation { token(username: \"admin\", password: \"p\") { accessToken expiresIn } }",
            )
            .await;

        assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
        assert_eq!(
            response.data.into_json()?,
            json!({ "token": { "accessToken": "access", "expiresIn": 300 } })
        );

        Ok(())
    }

    #[tokio::test]
    async fn rejected_refresh_is_unauthenticated() {
        let mut identity = MockIdentityService::new();

        identity
            .expect_refresh()
            .once()
            .withf(|token| token == "stale")
            .return_once(|_| Err(IdentityError::Unauthorized));

        let response = build(MockGamesService::new(), identity)
            .execute("mutation { refresh(refreshToken: \"stale\") { accessToken } }")
            .await;

        assert_eq!(error_code(&response), Some(Value::from("UNAUTHENTICATED")));
    }
}
