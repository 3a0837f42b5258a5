//! Test Helpers

use rust_decimal::Decimal;
use smallvec::smallvec;

use crate::{
    domain::games::{
        GamesService, GamesServiceError,
        data::{GameUpdate, NewGame, NewTitle},
        records::{Category, GameId},
    },
    test::TestContext,
};

/// A valid board game with the given EAN and title.
pub(crate) fn new_game(ean: &str, title: &str) -> NewGame {
    NewGame {
        ean: ean.to_string(),
        rating: 4,
        category: Category::Board,
        price: Decimal::new(3_499, 2),
        discount: Decimal::new(100, 3),
        available: true,
        release_date: None,
        homepage: Some("https://example.com/games".to_string()),
        keywords: smallvec!["strategy".to_string(), "family".to_string()],
        title: NewTitle {
            title: title.to_string(),
            subtitle: None,
        },
        images: Vec::new(),
    }
}

/// A valid update carrying the given EAN.
pub(crate) fn game_update(ean: &str) -> GameUpdate {
    GameUpdate {
        ean: ean.to_string(),
        rating: 5,
        category: Category::Board,
        price: Decimal::new(2_999, 2),
        discount: Decimal::ZERO,
        available: false,
        release_date: None,
        homepage: None,
        keywords: smallvec!["strategy".to_string()],
    }
}

pub(crate) async fn create_game(
    ctx: &TestContext,
    ean: &str,
    title: &str,
) -> Result<GameId, GamesServiceError> {
    ctx.games.create(new_game(ean, title)).await
}
