//! Test context for service-level integration tests.

use std::sync::Arc;

use crate::{database::Db, domain::games::PgGamesService};

use super::{RecordingMailer, db::TestDb};

pub(crate) struct TestContext {
    pub db: TestDb,
    pub games: PgGamesService,
    pub mailer: Arc<RecordingMailer>,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let test_db = TestDb::new().await;
        let mailer = Arc::new(RecordingMailer::default());

        Self {
            games: PgGamesService::new(Db::new(test_db.pool().clone()), mailer.clone()),
            mailer,
            db: test_db,
        }
    }
}
