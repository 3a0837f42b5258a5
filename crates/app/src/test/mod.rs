//! Shared test infrastructure.

mod context;
pub(crate) mod helpers;
mod mailer;

pub(crate) use context::TestContext;
pub(crate) use mailer::RecordingMailer;
