//! Resume parse: raw resume text to structured fields via the model's JSON mode.

use serde::{Deserialize, Serialize};

use crate::career::prompts::RESUME_PARSE_PROMPT;
use crate::career::CareerAdvisor;
use crate::llm_client::prompts::{fill, JSON_ONLY_SYSTEM};
use crate::llm_client::{GenerationOptions, LlmError};
use crate::models::profile::{
    lenient_option, lenient_text, string_list, Experience, ProfileDocument,
};

/// The only skill tokens the parser may report.
pub const MASTER_SKILLS: [&str; 65] = [
    "python", "java", "c++", "c", "c#", "javascript", "typescript", "go", "rust", "kotlin",
    "swift", "php", "ruby", "scala", "django", "flask", "fastapi", "node.js", "express.js",
    "ruby on rails", "spring boot", "react", "angular", "vue.js", "next.js", "svelte", "sql",
    "mysql", "postgresql", "sqlite", "mongodb", "redis", "cassandra", "elasticsearch", "aws",
    "azure", "google cloud", "gcp", "docker", "kubernetes", "terraform", "ansible", "jenkins",
    "git", "ci/cd", "pandas", "numpy", "scipy", "scikit-learn", "tensorflow", "pytorch", "keras",
    "matplotlib", "seaborn", "apache spark", "html", "css", "sass", "graphql", "rest api",
    "linux", "bash", "powershell", "agile", "scrum",
];

/// Structured output of the resume parse call. Field types are loose: the
/// model sometimes answers a list with a bare string or a date with a number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub emails: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub phones: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub experience: Option<Experience>,
}

impl From<ParsedResume> for ProfileDocument {
    fn from(parsed: ParsedResume) -> Self {
        ProfileDocument {
            name: parsed.name.unwrap_or_default().trim().to_string(),
            emails: parsed.emails,
            phones: parsed.phones,
            skills: restrict_to_master_skills(&parsed.skills),
            experience: parsed.experience.unwrap_or_default(),
            ..Default::default()
        }
    }
}

/// Keeps only allow-listed skills, in canonical spelling, first occurrence wins.
pub fn restrict_to_master_skills(skills: &[String]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    for skill in skills {
        let wanted = skill.trim().to_lowercase();
        if let Some(canonical) = MASTER_SKILLS.iter().find(|m| **m == wanted) {
            if !kept.iter().any(|k| k == canonical) {
                kept.push(canonical.to_string());
            }
        }
    }
    kept
}

fn parse_options() -> GenerationOptions {
    GenerationOptions {
        temperature: Some(0.1),
        top_p: Some(1.0),
        top_k: Some(1),
        max_output_tokens: Some(2048),
        json: true,
    }
}

impl CareerAdvisor {
    /// Parses resume text into a profile document. Any API failure or
    /// malformed JSON is returned as an error; there is no retry.
    pub async fn parse_resume(&self, resume_text: &str) -> Result<ProfileDocument, LlmError> {
        let today = chrono::Local::now().date_naive().to_string();
        let prompt = fill(
            RESUME_PARSE_PROMPT,
            &[
                ("today", today.as_str()),
                ("skills", MASTER_SKILLS.join(", ").as_str()),
                ("resume_text", resume_text),
            ],
        );

        let parsed: ParsedResume = self
            .llm
            .generate_json(Some(JSON_ONLY_SYSTEM), &prompt, parse_options())
            .await?;

        Ok(parsed.into())
    }
}
