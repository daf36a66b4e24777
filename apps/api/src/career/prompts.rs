// All LLM prompt templates for the career advisor.
// Placeholders are filled with `llm_client::prompts::fill`.

/// Resume parsing prompt. Replace: {today}, {skills}, {resume_text}
pub const RESUME_PARSE_PROMPT: &str = r#"You are an expert resume parsing system. Analyze the resume text and extract information in a structured JSON format.
Today's date is {today}. Use this for roles listed as "Present" or "Current".

Extract:
1.  **name**: The full name of the candidate.
2.  **emails**: A list of all email addresses.
3.  **phones**: A list of all phone numbers.
4.  **skills**: A list of skills found ONLY from this master list: {skills}
5.  **experience**: An object with:
    - "total_years": Total years of professional experience.
    - "experience_ranges": A list of all job experiences, each with "start_date", "end_date", and "duration_years".

Return a JSON object with this EXACT shape:
{
  "name": "string",
  "emails": ["string"],
  "phones": ["string"],
  "skills": ["string"],
  "experience": {
    "total_years": 0,
    "experience_ranges": [
      {"start_date": "string", "end_date": "string", "duration_years": 0}
    ]
  }
}

Resume Text:
---
{resume_text}
---"#;

/// System instruction for the free-form career chat.
pub const CHAT_SYSTEM: &str = "You are a helpful career guidance counselor. \
    Your goal is to guide the user's career choices. \
    Keep your responses concise and brief, limited to 3-4 lines.";

/// Chat prompt. Replace: {message}
pub const CHAT_PROMPT: &str = "User: {message}\nResponse:";

/// Skill-gap prompt. Replace: {skills}
pub const SKILL_GAP_PROMPT: &str = r#"Based on the following information, identify 2 to 4 crucial missing skills.

Current Skills: {skills}

Instructions:
- Analyze the gap between the current skills and the skills required for the desired job role.
- Provide a list of the most important skills the user needs to learn.
- **Return ONLY a comma-separated list of the skill names.** Do not include any explanation, titles, or numbering.

Example output: TensorFlow, PyTorch, AWS Sagemaker, Kubernetes, Docker, MLOps"#;

/// Roadmap prompt. Replace: {username}, {skills}, {career_goal}
pub const ROADMAP_PROMPT: &str = r####"You are an expert career coach named "Ignite." Your task is to create a detailed, personalized 3-month career roadmap for a user named {username}.

USER'S PROFILE:
Current Skills: {skills}
Stated Career Goal: {career_goal}

INSTRUCTIONS:
- Create a step-by-step roadmap for the next 3 months.
- For each month, provide:
    1. A primary focus (e.g., "Mastering Core Concepts").
    2. A bulleted list of specific technical skills or topics to learn.
    3. A suggestion for a small project to apply those skills.
- **Format your entire response using simple Markdown.** Use headings for each month (e.g., "### Month 1: Foundation") and bullet points for lists."####;

/// Challenge generation prompt. Replace: {username}, {roadmap}
pub const CHALLENGES_PROMPT: &str = r#"You are a challenge generator.
Below is the 3-month roadmap for {username}:

{roadmap}

Summarize this roadmap into JSON challenges.
Rules:
- Strictly output valid JSON (no explanations, no extra text).
- Structure:
{
  "Month 1": [
    {
      "week": 1,
      "title": "Skill or Project Name",
      "description": "A short practical challenge description",
      "related_skill": "Skill Name"
    }
  ],
  "Month 2": [...],
  "Month 3": [...]
}"#;

/// Career recommendation prompt. Replace: {username}, {profile}, {skills}
pub const RECOMMENDATION_PROMPT: &str = r#"Reply in 10 lines.

The following is the profile of a user named {username}.

Profile Data:
{profile}

Skills:
{skills}

Based on this, suggest the BEST possible future career path(s),
next skills to learn, and potential industries or job roles.

Please respond in short, clear bullet points."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roadmap_prompt_keeps_heading_example_and_placeholders() {
        assert!(ROADMAP_PROMPT.contains(r####"(e.g., "### Month 1: Foundation")"####));
        assert!(ROADMAP_PROMPT.ends_with("bullet points for lists."));
        for placeholder in ["{username}", "{skills}", "{career_goal}"] {
            assert!(ROADMAP_PROMPT.contains(placeholder), "{placeholder}");
        }
    }

    #[test]
    fn test_challenges_prompt_names_every_month() {
        for month in ["\"Month 1\"", "\"Month 2\"", "\"Month 3\""] {
            assert!(CHALLENGES_PROMPT.contains(month));
        }
    }
}
