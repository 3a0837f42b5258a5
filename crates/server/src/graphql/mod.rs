//! GraphQL endpoint

mod caller;
mod errors;
pub(crate) mod handler;
mod mutation;
mod query;
mod schema;
mod types;

pub(crate) use schema::{SpielSchema, schema};
