//! Games

pub mod criteria;
pub mod data;
pub mod errors;
mod keywords;
mod query;
pub mod records;
mod repository;
pub mod service;
pub mod validation;
pub mod version;

pub use errors::GamesServiceError;
pub use service::*;
