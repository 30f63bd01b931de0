pub mod smtp;

use async_trait::async_trait;

/// Notification collaborator: attempted exactly once per confirmed
/// booking. Delivery failure never rolls the booking back.
#[async_trait]
pub trait MailProvider: Send + Sync {
    async fn send_mail(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}
