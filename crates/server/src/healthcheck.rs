//! Liveness and readiness probes.

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{extensions::*, state::State};

/// Probe response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
}

impl HealthResponse {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Liveness probe
///
/// Succeeds whenever the process is serving requests.
#[endpoint(tags("health"), summary = "Liveness probe")]
pub(crate) async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Readiness probe
///
/// Succeeds when the database answers a round-trip query.
#[endpoint(
    tags("health"),
    summary = "Readiness probe",
    responses(
        (status_code = StatusCode::OK, description = "Ready"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Database unreachable"),
    ),
)]
pub(crate) async fn readiness(depot: &mut Depot) -> Result<Json<HealthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state.app.database.ping().await.map_err(|source| {
        error!("readiness check failed: {source}");

        StatusError::service_unavailable()
    })?;

    Ok(Json(HealthResponse::ok()))
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use spiel_app::database::MockDatabaseProbe;
    use testresult::TestResult;

    use crate::test_helpers::state_with_database;

    use super::*;

    fn make_service(database: MockDatabaseProbe) -> Service {
        Service::new(
            Router::new().hoop(inject(state_with_database(database))).push(
                Router::with_path("health")
                    .push(Router::with_path("liveness").get(liveness))
                    .push(Router::with_path("readiness").get(readiness)),
            ),
        )
    }

    #[tokio::test]
    async fn test_liveness() -> TestResult {
        let mut database = MockDatabaseProbe::new();

        database.expect_ping().never();

        let response: HealthResponse = TestClient::get("http://example.com/health/liveness")
            .send(&make_service(database))
            .await
            .take_json()
            .await?;

        assert_eq!(response.status, "ok");

        Ok(())
    }

    #[tokio::test]
    async fn test_readiness_pings_database() -> TestResult {
        let mut database = MockDatabaseProbe::new();

        database.expect_ping().once().return_once(|| Ok(()));

        let res = TestClient::get("http://example.com/health/readiness")
            .send(&make_service(database))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_readiness_without_database_returns_503() -> TestResult {
        let mut database = MockDatabaseProbe::new();

        database
            .expect_ping()
            .once()
            .return_once(|| Err(sqlx::Error::PoolTimedOut));

        let res = TestClient::get("http://example.com/health/readiness")
            .send(&make_service(database))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));

        Ok(())
    }
}
