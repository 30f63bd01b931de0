pub mod gemini;

use async_trait::async_trait;

/// Answer-generation collaborator: given the user's question and retrieved
/// document context, produce a grounded reply. Failures degrade at the
/// call site; they never reach the end user as errors.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    async fn generate(&self, prompt: &str, context: &str) -> anyhow::Result<String>;
}
