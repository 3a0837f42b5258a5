//! Bearer authentication middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;

use spiel_app::identity::IdentityError;

use crate::{extensions::*, state::State};

/// Resolve the bearer token into a principal, or reject with 401.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => state,
        Err(_error) => {
            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    };

    let principal = match state.app.identity.authenticate(token).await {
        Ok(principal) => principal,
        Err(IdentityError::Unauthorized) => {
            res.render(StatusError::unauthorized().brief("Invalid bearer token"));
            ctrl.skip_rest();

            return;
        }
        Err(source) => {
            error!("failed to authenticate bearer token: {source}");

            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    };

    depot.insert_principal(principal);

    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use smallvec::smallvec;
    use spiel_app::identity::{MockIdentityService, Principal, Role};
    use testresult::TestResult;

    use crate::test_helpers::state_with_identity;

    use super::*;

    #[salvo::handler]
    async fn echo_principal(depot: &mut Depot, res: &mut Response) {
        let username = depot
            .principal_or_401()
            .ok()
            .map_or_else(|| "missing".to_string(), |p| p.username.clone());

        res.render(username);
    }

    fn make_service(identity: MockIdentityService) -> Service {
        let router = Router::new()
            .hoop(inject(state_with_identity(identity)))
            .hoop(handler)
            .push(Router::new().get(echo_principal));

        Service::new(router)
    }

    #[tokio::test]
    async fn test_missing_authorization_header_returns_401() -> TestResult {
        let mut identity = MockIdentityService::new();

        identity.expect_authenticate().never();

        let res = TestClient::get("http://example.com")
            .send(&make_service(identity))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_basic_authorization_header_returns_401() -> TestResult {
        let mut identity = MockIdentityService::new();

        identity.expect_authenticate().never();

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Basic YWRtaW46cA==", true)
            .send(&make_service(identity))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_token_returns_401() -> TestResult {
        let mut identity = MockIdentityService::new();

        identity
            .expect_authenticate()
            .once()
            .withf(|token| token == "expired")
            .return_once(|_| Err(IdentityError::Unauthorized));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer expired", true)
            .send(&make_service(identity))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_provider_failure_returns_500() -> TestResult {
        let mut identity = MockIdentityService::new();

        identity
            .expect_authenticate()
            .once()
            .return_once(|_| Err(IdentityError::UnexpectedResponse("502".to_string())));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(identity))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }

    #[tokio::test]
    async fn test_valid_token_injects_principal() -> TestResult {
        let mut identity = MockIdentityService::new();

        identity
            .expect_authenticate()
            .once()
            .withf(|token| token == "abc123")
            .return_once(|_| {
                Ok(Principal {
                    username: "admin".to_string(),
                    roles: smallvec![Role::Admin],
                })
            });

        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(identity))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "admin");

        Ok(())
    }
}
