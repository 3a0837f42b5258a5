//! Authentication

pub(crate) mod handlers;
pub(crate) mod middleware;

pub(crate) use middleware::extract_bearer_token;
