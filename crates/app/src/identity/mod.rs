//! Identity provider integration

mod client;
mod errors;
mod models;
mod service;

pub use client::*;
pub use errors::IdentityError;
pub use models::*;
pub use service::*;
