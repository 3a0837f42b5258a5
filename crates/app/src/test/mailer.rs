//! Mailer that keeps every message in memory.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::mail::{Mail, MailError, Mailer};

#[derive(Debug, Default)]
pub(crate) struct RecordingMailer {
    sent: Mutex<Vec<Mail>>,
}

impl RecordingMailer {
    pub(crate) fn sent(&self) -> Vec<Mail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(mail);
        }

        Ok(())
    }
}
