use serde::Serialize;
use tracing::warn;

use crate::career::prompts::RECOMMENDATION_PROMPT;
use crate::career::CareerAdvisor;
use crate::formatting::format_recommendation_text;
use crate::llm_client::prompts::fill;
use crate::llm_client::GenerationOptions;
use crate::models::profile::ProfileDocument;

pub const NO_RECOMMENDATION: &str = "No recommendation generated.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub username: String,
    /// HTML list markup produced from the model's bullet points.
    pub next_steps: String,
}

impl CareerAdvisor {
    /// Career paths and next steps for a profile, formatted as an HTML list.
    pub async fn recommend(&self, username: &str, profile: &ProfileDocument) -> Recommendation {
        let profile_json = serde_json::to_string_pretty(profile).unwrap_or_default();
        let skills = format!("{:?}", profile.skills);
        let prompt = fill(
            RECOMMENDATION_PROMPT,
            &[
                ("username", username),
                ("profile", profile_json.as_str()),
                ("skills", skills.as_str()),
            ],
        );

        let next_steps = match self
            .llm
            .generate(None, &prompt, GenerationOptions::text().with_temperature(0.9))
            .await
        {
            Ok(text) if !text.trim().is_empty() => format_recommendation_text(&text),
            Ok(_) => NO_RECOMMENDATION.to_string(),
            Err(e) => {
                warn!("Recommendation generation failed for {username}: {e}");
                NO_RECOMMENDATION.to_string()
            }
        };

        Recommendation {
            username: username.to_string(),
            next_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use std::sync::Arc;

    fn profile() -> ProfileDocument {
        ProfileDocument {
            name: "Ada".to_string(),
            skills: vec!["python".to_string(), "aws".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_recommendation_is_formatted_as_list() {
        let generator = Arc::new(
            ScriptedGenerator::new().reply("* **Cloud Engineer**\n* Learn Terraform"),
        );
        let advisor = CareerAdvisor::new(generator.clone());

        let rec = advisor.recommend("ada", &profile()).await;

        assert_eq!(rec.username, "ada");
        assert_eq!(
            rec.next_steps,
            "<ul><li><b>Cloud Engineer</b></li>\n<li>Learn Terraform</li></ul>"
        );
        let calls = generator.calls();
        assert_eq!(calls[0].options.temperature, Some(0.9));
        assert!(calls[0].prompt.contains("named ada"));
        assert!(calls[0].prompt.contains("\"aws\""));
    }

    #[tokio::test]
    async fn test_failure_yields_placeholder() {
        let advisor = CareerAdvisor::new(Arc::new(ScriptedGenerator::new().fail()));
        let rec = advisor.recommend("ada", &profile()).await;
        assert_eq!(rec.next_steps, NO_RECOMMENDATION);
    }
}
