use anyhow::{Context, Result};

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Application configuration loaded from environment variables.
/// Start-up fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub openrouter_api_key: String,
    pub openrouter_base_url: String,
    pub ai_model: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub demo_email: String,
    pub demo_password: String,
    pub cors_origins: Vec<String>,
    /// When false, candidate ranking uses the deterministic score ranker instead of the LLM.
    pub enable_llm_ranking: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            openrouter_base_url: optional_env(
                "OPENROUTER_BASE_URL",
                crate::llm_client::DEFAULT_BASE_URL,
            ),
            ai_model: optional_env("AI_MODEL", crate::llm_client::DEFAULT_MODEL),
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            demo_email: optional_env("DEMO_EMAIL", "admin@airecruiter.com"),
            demo_password: optional_env("DEMO_PASSWORD", "Admin123!"),
            cors_origins: parse_origins(&optional_env("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)),
            enable_llm_ranking: parse_flag(&optional_env("ENABLE_LLM_RANKING", "true"))
                .context("ENABLE_LLM_RANKING must be true or false")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised flag value '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_skips_empty() {
        let origins = parse_origins(" http://a.test , ,http://b.test");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_default_origins() {
        assert_eq!(parse_origins(DEFAULT_CORS_ORIGINS).len(), 2);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(parse_flag("on").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
