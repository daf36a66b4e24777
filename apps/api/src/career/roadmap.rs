//! Roadmap + challenges: two sequential model calls.
//!
//! Stages: Start → RoadmapRequested → RoadmapReceived → ChallengesRequested → Done.
//! A roadmap failure ends the run (`RoadmapFailed`). A challenge failure passes
//! through `ChallengesFailed` and still reaches `Done`, with the roadmap intact
//! and an error marker in place of the challenges.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::career::prompts::{CHALLENGES_PROMPT, ROADMAP_PROMPT};
use crate::career::CareerAdvisor;
use crate::formatting::markdown_to_html;
use crate::llm_client::prompts::{fill, JSON_ONLY_SYSTEM};
use crate::llm_client::{GenerationOptions, LlmError};
use crate::models::profile::{Challenge, ChallengeSet, CHALLENGE_MONTHS};

pub const DEFAULT_CAREER_GOAL: &str = "a more senior role in their field";
pub const CHALLENGES_FAILED: &str = "Could not generate challenges";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadmapStage {
    Start,
    RoadmapRequested,
    RoadmapReceived,
    ChallengesRequested,
    Done,
    RoadmapFailed,
    ChallengesFailed,
}

#[derive(Debug, Error)]
pub enum RoadmapError {
    #[error("Cannot generate a roadmap without skills. Please analyze a resume first.")]
    NoSkills,

    #[error("Could not generate roadmap: {0}")]
    Generation(#[source] LlmError),
}

#[derive(Debug, Error)]
enum ChallengeError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("challenge JSON is missing \"{0}\"")]
    MissingMonth(&'static str),
}

#[derive(Debug, Clone, Serialize)]
pub struct RoadmapBundle {
    pub roadmap_html: String,
    pub challenges: ChallengeSet,
    /// Stages visited, in order, including `Start`.
    #[serde(skip)]
    pub trail: Vec<RoadmapStage>,
}

/// Tracks one run through the stages for logging.
struct RoadmapRun<'a> {
    username: &'a str,
    trail: Vec<RoadmapStage>,
}

impl<'a> RoadmapRun<'a> {
    fn start(username: &'a str) -> Self {
        Self {
            username,
            trail: vec![RoadmapStage::Start],
        }
    }

    fn advance(&mut self, next: RoadmapStage) {
        debug!(
            "Roadmap for {}: {:?} -> {:?}",
            self.username,
            self.trail.last().copied().unwrap_or(RoadmapStage::Start),
            next
        );
        self.trail.push(next);
    }
}

impl CareerAdvisor {
    pub async fn roadmap_with_challenges(
        &self,
        username: &str,
        skills: &[String],
        career_goal: Option<&str>,
    ) -> Result<RoadmapBundle, RoadmapError> {
        if skills.is_empty() {
            return Err(RoadmapError::NoSkills);
        }

        let goal = career_goal
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(DEFAULT_CAREER_GOAL);
        let skill_list = skills.join(", ");
        let prompt = fill(
            ROADMAP_PROMPT,
            &[
                ("username", username),
                ("skills", skill_list.as_str()),
                ("career_goal", goal),
            ],
        );

        let mut run = RoadmapRun::start(username);
        run.advance(RoadmapStage::RoadmapRequested);
        let roadmap_md = match self
            .llm
            .generate(None, &prompt, GenerationOptions::text())
            .await
        {
            Ok(markdown) => markdown,
            Err(e) => {
                run.advance(RoadmapStage::RoadmapFailed);
                warn!("Roadmap generation failed for {username}: {e}");
                return Err(RoadmapError::Generation(e));
            }
        };
        run.advance(RoadmapStage::RoadmapReceived);
        let roadmap_html = markdown_to_html(&roadmap_md);

        run.advance(RoadmapStage::ChallengesRequested);
        let challenges = match self.generate_challenges(username, &roadmap_md).await {
            Ok(months) => ChallengeSet::Ready(months),
            Err(e) => {
                run.advance(RoadmapStage::ChallengesFailed);
                warn!("Challenge generation failed for {username}: {e}");
                ChallengeSet::failed(CHALLENGES_FAILED)
            }
        };
        run.advance(RoadmapStage::Done);
        info!("Roadmap generated for {username}");

        Ok(RoadmapBundle {
            roadmap_html,
            challenges,
            trail: run.trail,
        })
    }

    async fn generate_challenges(
        &self,
        username: &str,
        roadmap_md: &str,
    ) -> Result<BTreeMap<String, Vec<Challenge>>, ChallengeError> {
        let prompt = fill(
            CHALLENGES_PROMPT,
            &[("username", username), ("roadmap", roadmap_md)],
        );
        let mut parsed: BTreeMap<String, Vec<Challenge>> = self
            .llm
            .generate_json(Some(JSON_ONLY_SYSTEM), &prompt, GenerationOptions::json())
            .await?;

        let mut months = BTreeMap::new();
        for month in CHALLENGE_MONTHS {
            let weeks = parsed
                .remove(month)
                .ok_or(ChallengeError::MissingMonth(month))?;
            months.insert(month.to_string(), weeks);
        }
        Ok(months)
    }
}
