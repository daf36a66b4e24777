use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    /// Root directory holding `users.json` and `parsed_resumes/`.
    pub data_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
    pub session_ttl_hours: i64,
    pub llm_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub secure_cookies: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_api_base: std::env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string()),
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            port: parse_env("PORT", 5000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            session_ttl_hours: parse_env("SESSION_TTL_HOURS", 24)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            secure_cookies: parse_env("SECURE_COOKIES", false)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for router tests: no real credential, data under `data_dir`.
    pub fn for_tests(data_dir: PathBuf) -> Self {
        Config {
            gemini_api_key: "test-key".to_string(),
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            data_dir,
            port: 0,
            rust_log: "debug".to_string(),
            session_ttl_hours: 24,
            llm_timeout_secs: 5,
            max_upload_bytes: 1024 * 1024,
            secure_cookies: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default_when_unset() {
        let port: u16 = parse_env("IGNITE_TEST_UNSET_PORT_VARIABLE", 5000).unwrap();
        assert_eq!(port, 5000);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("IGNITE_TEST_BAD_TTL", "forever");
        let result: Result<i64> = parse_env("IGNITE_TEST_BAD_TTL", 24);
        assert!(result.is_err());
        std::env::remove_var("IGNITE_TEST_BAD_TTL");
    }

    #[test]
    fn test_parse_env_reads_bool() {
        std::env::set_var("IGNITE_TEST_SECURE_COOKIES", "true");
        let secure: bool = parse_env("IGNITE_TEST_SECURE_COOKIES", false).unwrap();
        assert!(secure);
        std::env::remove_var("IGNITE_TEST_SECURE_COOKIES");
    }
}
