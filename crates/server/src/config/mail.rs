//! Mail Config

use clap::Args;

/// Notification mail settings.
#[derive(Debug, Args)]
pub struct MailConfig {
    /// Send a notification for every created game
    #[arg(
        long = "mail-enabled",
        env = "MAIL_ENABLED",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub enabled: bool,

    /// SMTP relay host
    #[arg(id = "mail_host", long = "mail-host", env = "MAIL_HOST", default_value = "localhost")]
    pub host: String,

    /// SMTP relay port
    #[arg(id = "mail_port", long = "mail-port", env = "MAIL_PORT", default_value_t = 25)]
    pub port: u16,

    /// Sender address
    #[arg(long = "mail-from", env = "MAIL_FROM", default_value = "Spiel <spiel@acme.com>")]
    pub from: String,

    /// Recipient address
    #[arg(long = "mail-to", env = "MAIL_TO", default_value = "Admin <admin@acme.com>")]
    pub to: String,
}
