//! Spiel catalog domain, persistence, identity and mail modules.

pub mod context;
pub mod database;
pub mod domain;
pub mod identity;
pub mod mail;

#[cfg(test)]
mod test;

mod ids;

pub use ids::TypedId;
