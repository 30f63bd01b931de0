use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::MailProvider;

pub struct SmtpMailer {
    host: String,
    port: u16,
    username: String,
    password: String,
    from_name: String,
}

impl SmtpMailer {
    pub fn new(
        host: String,
        port: u16,
        username: String,
        password: String,
        from_name: String,
    ) -> Self {
        Self {
            host,
            port,
            username,
            password,
            from_name,
        }
    }
}

#[async_trait]
impl MailProvider for SmtpMailer {
    async fn send_mail(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.username.is_empty() && !self.password.is_empty(),
            "email is not configured"
        );

        let from: Mailbox = format!("{} <{}>", self.from_name, self.username)
            .parse()
            .context("invalid from address")?;
        let to: Mailbox = to.parse().context("invalid recipient address")?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("failed to build email")?;

        let creds = Credentials::new(self.username.clone(), self.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .context("failed to configure SMTP relay")?
            .port(self.port)
            .credentials(creds)
            .build();

        mailer.send(email).await.context("SMTP send failed")?;

        Ok(())
    }
}
