//! Authenticated caller stored in the depot.

use salvo::prelude::{Depot, StatusError};
use spiel_app::identity::{Principal, Role};

const PRINCIPAL_DEPOT_KEY: &str = "principal";

pub(crate) trait PrincipalExt {
    fn insert_principal(&mut self, principal: Principal);

    fn principal_or_401(&self) -> Result<&Principal, StatusError>;

    /// The caller, provided they hold one of `roles`.
    fn require_role(&self, roles: &[Role]) -> Result<&Principal, StatusError>;
}

impl PrincipalExt for Depot {
    fn insert_principal(&mut self, principal: Principal) {
        self.insert(PRINCIPAL_DEPOT_KEY, principal);
    }

    fn principal_or_401(&self) -> Result<&Principal, StatusError> {
        self.get::<Principal>(PRINCIPAL_DEPOT_KEY)
            .map_err(|_missing| StatusError::unauthorized())
    }

    fn require_role(&self, roles: &[Role]) -> Result<&Principal, StatusError> {
        let principal = self.principal_or_401()?;

        if principal.has_any_role(roles) {
            Ok(principal)
        } else {
            Err(StatusError::forbidden().brief("Missing required role"))
        }
    }
}
