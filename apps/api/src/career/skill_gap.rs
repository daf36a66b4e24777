use tracing::{info, warn};

use crate::career::prompts::SKILL_GAP_PROMPT;
use crate::career::CareerAdvisor;
use crate::llm_client::prompts::fill;
use crate::llm_client::GenerationOptions;

/// Splits a comma-separated model answer into trimmed, non-empty skills.
pub fn parse_skill_list(text: &str) -> Vec<String> {
    text.trim()
        .split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(String::from)
        .collect()
}

impl CareerAdvisor {
    /// Skills the model thinks are missing. Upstream failure yields an empty list.
    pub async fn skill_gap(&self, current_skills: &[String]) -> Vec<String> {
        let skills = current_skills.join(", ");
        let prompt = fill(SKILL_GAP_PROMPT, &[("skills", skills.as_str())]);
        match self
            .llm
            .generate(None, &prompt, GenerationOptions::text())
            .await
        {
            Ok(text) => {
                let missing = parse_skill_list(&text);
                info!("Skill gap produced {} suggestions", missing.len());
                missing
            }
            Err(e) => {
                warn!("Skill gap generation failed: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use std::sync::Arc;

    #[test]
    fn test_trailing_comma_and_spacing() {
        assert_eq!(
            parse_skill_list("Docker, Kubernetes,  AWS,"),
            vec!["Docker", "Kubernetes", "AWS"]
        );
    }

    #[test]
    fn test_empty_answer_gives_no_skills() {
        assert!(parse_skill_list("  \n").is_empty());
        assert!(parse_skill_list(",,").is_empty());
    }

    #[tokio::test]
    async fn test_skill_gap_sends_current_skills() {
        let generator = Arc::new(ScriptedGenerator::new().reply("Docker, Kubernetes"));
        let advisor = CareerAdvisor::new(generator.clone());

        let missing = advisor
            .skill_gap(&["python".to_string(), "sql".to_string()])
            .await;

        assert_eq!(missing, vec!["Docker", "Kubernetes"]);
        assert!(generator.calls()[0].prompt.contains("Current Skills: python, sql"));
    }

    #[tokio::test]
    async fn test_skill_gap_is_empty_on_failure() {
        let advisor = CareerAdvisor::new(Arc::new(ScriptedGenerator::new().fail()));
        assert!(advisor.skill_gap(&["rust".to_string()]).await.is_empty());
    }
}
