use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Slug used when a resume yields no recognised skills.
pub const NO_SKILL_SLUG: &str = "no_skill_found";

/// Month keys the challenge generator must produce, in order.
pub const CHALLENGE_MONTHS: [&str; 3] = ["Month 1", "Month 2", "Month 3"];

/// Bookkeeping written by the store. `revision` increases with every new
/// analysis run for a user, so the current document is the highest revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMeta {
    pub owner: String,
    pub slug: String,
    pub revision: u64,
    pub created_at: DateTime<Utc>,
}

/// One resume analysis for a user, persisted as
/// `parsed_resumes/{username}_{slug}.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ProfileMeta>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "string_list")]
    pub emails: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub phones: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: Experience,
    #[serde(default, deserialize_with = "null_as_default")]
    pub missing_skills: Vec<String>,
    /// Older documents may hold an error object here; it reads as `None`.
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub roadmap_html: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub challenges: Option<ChallengeSet>,
    #[serde(
        rename = "careerPreferences",
        default,
        deserialize_with = "lenient_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub career_preferences: Option<String>,
    /// Any further fields merged into the document are carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_years: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience_ranges: Vec<ExperienceRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRange {
    #[serde(default, deserialize_with = "lenient_text")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub duration_years: Option<f64>,
}

/// A weekly practice task derived from the roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub week: u32,
    pub title: String,
    pub description: String,
    pub related_skill: String,
}

/// Challenges keyed by "Month 1".."Month 3", or the marker left when the
/// challenge generator failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChallengeSet {
    Failed { error: String },
    Ready(BTreeMap<String, Vec<Challenge>>),
}

impl ChallengeSet {
    pub fn failed(message: impl Into<String>) -> Self {
        ChallengeSet::Failed {
            error: message.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ChallengeSet::Failed { .. })
    }
}

impl ProfileDocument {
    /// File-name slug derived from the first skill.
    pub fn primary_skill_slug(&self) -> String {
        self.skills
            .first()
            .map(|skill| skill_slug(skill))
            .filter(|slug| !slug.is_empty())
            .unwrap_or_else(|| NO_SKILL_SLUG.to_string())
    }

    pub fn revision(&self) -> u64 {
        self.meta.as_ref().map(|m| m.revision).unwrap_or(0)
    }
}

/// Sanitises a skill token for use in a file name.
pub fn skill_slug(skill: &str) -> String {
    let lowered = skill
        .trim()
        .to_lowercase()
        .replace("c++", "cpp")
        .replace("c#", "csharp");

    lowered
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keeps the value only when it has the expected shape; anything else is `None`.
pub(crate) fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Strings as-is, numbers and booleans in their JSON spelling.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(scalar_text))
}

/// A list of strings, also accepting a single bare value as a one-item list.
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        Some(single) => vec![single],
        None => Vec::new(),
    };
    Ok(items
        .into_iter()
        .filter_map(scalar_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Accepts `3`, `3.5`, `"3.5"` or `"3.5 years"`; anything else becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s
            .split_whitespace()
            .next()
            .and_then(|token| token.trim_end_matches('+').parse::<f64>().ok()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slug_rewrites_c_family() {
        assert_eq!(skill_slug("C++"), "cpp");
        assert_eq!(skill_slug("c#"), "csharp");
    }

    #[test]
    fn test_slug_replaces_path_characters() {
        assert_eq!(skill_slug("ci/cd"), "ci-cd");
        assert_eq!(skill_slug("node.js"), "node-js");
        assert_eq!(skill_slug("ruby on rails"), "ruby-on-rails");
    }

    #[test]
    fn test_primary_skill_slug_defaults_without_skills() {
        let doc = ProfileDocument::default();
        assert_eq!(doc.primary_skill_slug(), NO_SKILL_SLUG);
    }

    #[test]
    fn test_document_tolerates_nulls_and_string_numbers() {
        let doc: ProfileDocument = serde_json::from_value(json!({
            "name": null,
            "emails": ["a@b.c"],
            "phones": null,
            "skills": ["python"],
            "experience": {
                "total_years": "4.5 years",
                "experience_ranges": [
                    {"start_date": "2020-01", "end_date": "Present", "duration_years": 4.5}
                ]
            }
        }))
        .unwrap();

        assert_eq!(doc.name, "");
        assert!(doc.phones.is_empty());
        assert_eq!(doc.experience.total_years, Some(4.5));
        assert_eq!(doc.experience.experience_ranges[0].duration_years, Some(4.5));
    }

    #[test]
    fn test_unknown_fields_survive_a_round_trip() {
        let doc: ProfileDocument = serde_json::from_value(json!({
            "name": "Ada",
            "careerPreferences": "Platform engineering",
            "linkedin": "ada-l"
        }))
        .unwrap();

        assert_eq!(doc.career_preferences.as_deref(), Some("Platform engineering"));
        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["linkedin"], "ada-l");
        assert_eq!(back["careerPreferences"], "Platform engineering");
    }

    #[test]
    fn test_non_string_roadmap_and_preferences_read_as_none() {
        let doc: ProfileDocument = serde_json::from_value(json!({
            "name": "Ada",
            "skills": [],
            "roadmap_html": {"error": "Cannot generate a roadmap without skills."},
            "careerPreferences": {"role": "SRE"},
            "challenges": "none yet"
        }))
        .unwrap();

        assert_eq!(doc.name, "Ada");
        assert!(doc.roadmap_html.is_none());
        assert!(doc.career_preferences.is_none());
        assert!(doc.challenges.is_none());
    }

    #[test]
    fn test_contact_lists_accept_single_values_and_numbers() {
        let doc: ProfileDocument = serde_json::from_value(json!({
            "emails": "ada@example.com",
            "phones": [4420000000u64, "  ", "+44 20 0000"],
            "experience": {
                "experience_ranges": [{"start_date": 2019, "end_date": "Present"}]
            }
        }))
        .unwrap();

        assert_eq!(doc.emails, vec!["ada@example.com"]);
        assert_eq!(doc.phones, vec!["4420000000", "+44 20 0000"]);
        assert_eq!(
            doc.experience.experience_ranges[0].start_date.as_deref(),
            Some("2019")
        );
    }

    #[test]
    fn test_challenge_set_failed_marker_shape() {
        let failed = ChallengeSet::failed("Could not generate challenges");
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"error": "Could not generate challenges"})
        );
        assert!(failed.is_failed());
    }

    #[test]
    fn test_challenge_set_ready_deserializes_month_map() {
        let set: ChallengeSet = serde_json::from_value(json!({
            "Month 1": [{"week": 1, "title": "T", "description": "D", "related_skill": "rust"}]
        }))
        .unwrap();
        match set {
            ChallengeSet::Ready(months) => assert_eq!(months["Month 1"][0].week, 1),
            ChallengeSet::Failed { .. } => panic!("expected ready challenges"),
        }
    }
}
