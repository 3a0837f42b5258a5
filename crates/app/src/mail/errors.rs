//! Mail errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mail address")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build mail message")]
    Message(#[from] lettre::error::Error),

    #[error("failed to deliver mail")]
    Transport(#[from] lettre::transport::smtp::Error),
}
