//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use smallvec::smallvec;

use spiel_app::{
    context::AppContext,
    database::MockDatabaseProbe,
    domain::games::{
        MockGamesService,
        records::{Category, GameId, GameRecord, TitleRecord},
    },
    identity::{MockIdentityService, Principal, Role},
};

use crate::{extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal {
        username: "user".to_string(),
        roles: smallvec![Role::User],
    });
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal {
        username: "admin".to_string(),
        roles: smallvec![Role::Admin],
    });
    ctrl.call_next(req, depot, res).await;
}

fn strict_games_mock() -> MockGamesService {
    let mut games = MockGamesService::new();

    games.expect_find_by_id().never();
    games.expect_find().never();
    games.expect_find_file().never();
    games.expect_create().never();
    games.expect_add_file().never();
    games.expect_update().never();
    games.expect_check_version().never();
    games.expect_delete().never();

    games
}

fn strict_identity_mock() -> MockIdentityService {
    let mut identity = MockIdentityService::new();

    identity.expect_token().never();
    identity.expect_refresh().never();
    identity.expect_authenticate().never();

    identity
}

fn strict_database_mock() -> MockDatabaseProbe {
    let mut database = MockDatabaseProbe::new();

    database.expect_ping().never();

    database
}

pub(crate) fn make_state(
    games: MockGamesService,
    identity: MockIdentityService,
    database: MockDatabaseProbe,
) -> Arc<State> {
    State::from_app_context(AppContext {
        games: Arc::new(games),
        identity: Arc::new(identity),
        database: Arc::new(database),
    })
}

pub(crate) fn state_with_games(games: MockGamesService) -> Arc<State> {
    make_state(games, strict_identity_mock(), strict_database_mock())
}

pub(crate) fn state_with_identity(identity: MockIdentityService) -> Arc<State> {
    make_state(strict_games_mock(), identity, strict_database_mock())
}

pub(crate) fn state_with_database(database: MockDatabaseProbe) -> Arc<State> {
    make_state(strict_games_mock(), strict_identity_mock(), database)
}

pub(crate) fn games_service(games: MockGamesService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_games(games)))
            .push(route),
    )
}

pub(crate) fn make_game(id: i64) -> GameRecord {
    GameRecord {
        id: GameId::from_i64(id),
        version: 0,
        ean: "4006381333931".to_string(),
        rating: 4,
        category: Category::Board,
        price: Decimal::new(3499, 2),
        discount: Decimal::new(100, 3),
        available: true,
        release_date: None,
        homepage: Some("https://www.catan.com".to_string()),
        keywords: smallvec!["STRATEGY".to_string()],
        title: TitleRecord {
            title: "Catan".to_string(),
            subtitle: None,
        },
        images: vec![],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
