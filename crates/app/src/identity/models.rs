//! Identity Models

use std::fmt;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use smallvec::SmallVec;
use zeroize::Zeroizing;

/// Application role granted by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Map a provider role name, ignoring roles the catalog does not use.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("admin") {
            Some(Self::Admin)
        } else if name.eq_ignore_ascii_case("user") {
            Some(Self::User)
        } else {
            None
        }
    }
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub roles: SmallVec<[Role; 2]>,
}

impl Principal {
    /// Whether the caller holds at least one of `roles`.
    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.roles.iter().any(|role| roles.contains(role))
    }
}

/// Username and password for the password grant.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Zeroizing<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Tokens issued by the provider.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub expires_in: u64,
    pub refresh_token: String,
    pub refresh_expires_in: u64,
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("expires_in", &self.expires_in)
            .field("refresh_expires_in", &self.refresh_expires_in)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RoleList {
    #[serde(default)]
    roles: Vec<String>,
}

/// Token introspection response.
#[derive(Debug, Deserialize)]
pub(crate) struct Introspection {
    active: bool,

    #[serde(default)]
    preferred_username: Option<String>,

    #[serde(default)]
    username: Option<String>,

    #[serde(default)]
    realm_access: RoleList,

    #[serde(default)]
    resource_access: FxHashMap<String, RoleList>,
}

impl Introspection {
    /// The principal behind an active token, combining realm and client roles.
    pub(crate) fn into_principal(self, client_id: &str) -> Option<Principal> {
        if !self.active {
            return None;
        }

        let username = self.preferred_username.or(self.username)?;

        let client_roles = self
            .resource_access
            .get(client_id)
            .map(|access| access.roles.as_slice())
            .unwrap_or_default();

        let mut roles = SmallVec::<[Role; 2]>::new();

        for role in self
            .realm_access
            .roles
            .iter()
            .chain(client_roles)
            .filter_map(|name| Role::from_name(name))
        {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }

        Some(Principal { username, roles })
    }
}
