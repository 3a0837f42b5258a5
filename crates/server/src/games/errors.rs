//! Game Errors

use salvo::http::StatusError;
use tracing::error;

use spiel_app::domain::games::GamesServiceError;

pub(crate) fn into_status_error(error: GamesServiceError) -> StatusError {
    match error {
        GamesServiceError::NotFound => StatusError::not_found().brief("Game not found"),
        GamesServiceError::EanExists(ean) => {
            StatusError::unprocessable_entity().brief(format!("EAN {ean} already exists"))
        }
        GamesServiceError::VersionInvalid(token) => {
            StatusError::precondition_failed().brief(format!("Invalid version token {token:?}"))
        }
        GamesServiceError::VersionOutdated(version) => {
            StatusError::precondition_failed().brief(format!("Version {version} is outdated"))
        }
        GamesServiceError::Invalid(violations) => {
            StatusError::unprocessable_entity().brief(violations.join("; "))
        }
        GamesServiceError::Sql(source) => {
            error!("games storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// Search reports malformed criteria as a bad request rather than a bad entity.
pub(crate) fn into_search_status_error(error: GamesServiceError) -> StatusError {
    match error {
        GamesServiceError::Invalid(violations) => {
            StatusError::bad_request().brief(violations.join("; "))
        }
        other => into_status_error(other),
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn version_failures_are_precondition_failed() {
        let invalid = into_status_error(GamesServiceError::VersionInvalid("1".to_string()));
        let outdated = into_status_error(GamesServiceError::VersionOutdated(0));

        assert_eq!(invalid.code, StatusCode::PRECONDITION_FAILED);
        assert_eq!(outdated.code, StatusCode::PRECONDITION_FAILED);
    }

    #[test]
    fn invalid_payloads_are_unprocessable() {
        let error = into_status_error(GamesServiceError::Invalid(vec!["rating".to_string()]));

        assert_eq!(error.code, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn invalid_criteria_are_bad_requests() {
        let invalid = into_search_status_error(GamesServiceError::Invalid(vec![]));
        let missing = into_search_status_error(GamesServiceError::NotFound);

        assert_eq!(invalid.code, StatusCode::BAD_REQUEST);
        assert_eq!(missing.code, StatusCode::NOT_FOUND);
    }
}
