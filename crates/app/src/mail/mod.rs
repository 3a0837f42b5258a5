//! Outgoing mail

mod errors;
mod mailer;

pub use errors::MailError;
pub use mailer::*;
