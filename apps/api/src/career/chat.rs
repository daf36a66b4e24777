use tracing::warn;

use crate::career::prompts::{CHAT_PROMPT, CHAT_SYSTEM};
use crate::career::CareerAdvisor;
use crate::llm_client::prompts::fill;
use crate::llm_client::GenerationOptions;

pub const CHAT_FALLBACK: &str = "Sorry, I'm having trouble thinking right now. Please try again.";

impl CareerAdvisor {
    /// Short counselling reply. Never fails: upstream errors yield a fixed apology.
    pub async fn chat(&self, message: &str) -> String {
        let prompt = fill(CHAT_PROMPT, &[("message", message)]);
        match self
            .llm
            .generate(Some(CHAT_SYSTEM), &prompt, GenerationOptions::text())
            .await
        {
            Ok(reply) => reply.trim().to_string(),
            Err(e) => {
                warn!("Chat reply failed: {e}");
                CHAT_FALLBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_chat_returns_reply() {
        let generator =
            Arc::new(ScriptedGenerator::new().reply("Try a data engineering bootcamp.\n"));
        let advisor = CareerAdvisor::new(generator.clone());

        let reply = advisor.chat("What next after SQL?").await;

        assert_eq!(reply, "Try a data engineering bootcamp.");
        let calls = generator.calls();
        assert_eq!(calls[0].system.as_deref(), Some(CHAT_SYSTEM));
        assert!(calls[0].prompt.contains("User: What next after SQL?"));
    }

    #[tokio::test]
    async fn test_chat_falls_back_on_failure() {
        let advisor = CareerAdvisor::new(Arc::new(ScriptedGenerator::new().fail()));
        assert_eq!(advisor.chat("hello").await, CHAT_FALLBACK);
    }
}
