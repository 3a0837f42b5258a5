//! Refresh Grant Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::Deserialize;

use crate::{
    auth::handlers::{TokenResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Refresh Request
#[derive(Deserialize, ToSchema)]
pub(crate) struct RefreshRequest {
    pub refresh_token: String,
}

impl std::fmt::Debug for RefreshRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshRequest").finish_non_exhaustive()
    }
}

/// Refresh Handler
///
/// Exchanges a refresh token for fresh tokens.
#[endpoint(
    tags("auth"),
    summary = "Refresh Tokens",
    responses(
        (status_code = StatusCode::OK, description = "Tokens issued"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Refresh token rejected"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RefreshRequest>,
    depot: &mut Depot,
) -> Result<Json<TokenResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let tokens = state
        .app
        .identity
        .refresh(json.into_inner().refresh_token)
        .await
        .map_err(into_status_error)?;

    Ok(Json(tokens.into()))
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use serde_json::json;
    use spiel_app::identity::{IdentityError, MockIdentityService};
    use testresult::TestResult;

    use crate::{auth::handlers::make_tokens, test_helpers::state_with_identity};

    use super::*;

    fn make_service(identity: MockIdentityService) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(state_with_identity(identity)))
                .push(Router::with_path("auth/refresh").post(handler)),
        )
    }

    #[tokio::test]
    async fn test_refresh_success() -> TestResult {
        let mut identity = MockIdentityService::new();

        identity
            .expect_refresh()
            .once()
            .withf(|token| token == "refresh")
            .return_once(|_| Ok(make_tokens()));

        identity.expect_token().never();
        identity.expect_authenticate().never();

        let mut res = TestClient::post("http://example.com/auth/refresh")
            .json(&json!({ "refresh_token": "refresh" }))
            .send(&make_service(identity))
            .await;

        let body: TokenResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.refresh_token, "refresh");

        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_refresh_returns_401() -> TestResult {
        let mut identity = MockIdentityService::new();

        identity
            .expect_refresh()
            .once()
            .return_once(|_| Err(IdentityError::Unauthorized));

        identity.expect_token().never();
        identity.expect_authenticate().never();

        let res = TestClient::post("http://example.com/auth/refresh")
            .json(&json!({ "refresh_token": "stale" }))
            .send(&make_service(identity))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
