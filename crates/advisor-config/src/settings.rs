use crate::error::ConfigError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// Hosted chat-completion provider
///
/// Both providers speak the OpenAI chat-completions protocol; the choice only
/// changes defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AiProvider {
    #[default]
    OpenAi,
    DeepSeek,
}

impl AiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "openai",
            AiProvider::DeepSeek => "deepseek",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "https://api.openai.com/v1",
            AiProvider::DeepSeek => "https://api.deepseek.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "gpt-4-1106-preview",
            AiProvider::DeepSeek => "deepseek-chat",
        }
    }

    /// Provider-specific key variable consulted when `AI_API_KEY` is unset
    pub fn fallback_key_var(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "OPENAI_API_KEY",
            AiProvider::DeepSeek => "DEEPSEEK_API_KEY",
        }
    }
}

impl FromStr for AiProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(AiProvider::OpenAi),
            "deepseek" => Ok(AiProvider::DeepSeek),
            other => Err(ConfigError::invalid(
                "AI_PROVIDER",
                format!("unknown provider '{}' (expected openai or deepseek)", other),
            )),
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model service settings
#[derive(Clone, PartialEq, Eq)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("provider", &self.provider)
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Email delivery settings
#[derive(Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub enabled: bool,
    pub recipients: Vec<String>,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub email_from: String,
}

impl EmailConfig {
    /// Whether a report should be mailed at all
    pub fn should_send(&self) -> bool {
        self.enabled && !self.recipients.is_empty()
    }
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("enabled", &self.enabled)
            .field("recipients", &self.recipients)
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_password", &redact(&self.smtp_password))
            .field("email_from", &self.email_from)
            .finish()
    }
}

/// Scan target and report output settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub project_path: PathBuf,
    pub output_dir: PathBuf,
    pub npm_path: String,
}

/// All settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub ai: AiConfig,
    pub email: EmailConfig,
    pub report: ReportConfig,
}

const DEFAULT_MAX_TOKENS: u32 = 2000;
const DEFAULT_AI_TIMEOUT_SECS: u64 = 120;
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_OUTPUT_DIR: &str = "reports";
const DEFAULT_NPM: &str = "npm";

impl Settings {
    /// Read settings from the process environment
    ///
    /// Only malformed values fail here; presence of required values is
    /// checked by [`Settings::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let provider = get("AI_PROVIDER")
            .map(|v| v.parse::<AiProvider>())
            .transpose()?
            .unwrap_or_default();

        let api_key = get("AI_API_KEY")
            .or_else(|| get(provider.fallback_key_var()))
            .unwrap_or_default();

        let base_url = get("AI_API_BASE_URL")
            .unwrap_or_else(|| provider.default_base_url().to_string());
        Url::parse(&base_url)
            .map_err(|e| ConfigError::invalid("AI_API_BASE_URL", e.to_string()))?;

        let ai = AiConfig {
            provider,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: get("AI_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            max_tokens: parse_or("AI_MAX_TOKENS", get("AI_MAX_TOKENS"), DEFAULT_MAX_TOKENS)?,
            timeout_secs: parse_or(
                "AI_TIMEOUT_SECS",
                get("AI_TIMEOUT_SECS"),
                DEFAULT_AI_TIMEOUT_SECS,
            )?,
        };

        let email = EmailConfig {
            enabled: parse_flag("EMAIL_ENABLED", get("EMAIL_ENABLED"))?,
            recipients: get("EMAIL_RECIPIENTS")
                .map(|v| split_recipients(&v))
                .unwrap_or_default(),
            smtp_server: get("SMTP_SERVER").unwrap_or_default(),
            smtp_port: parse_or("SMTP_PORT", get("SMTP_PORT"), DEFAULT_SMTP_PORT)?,
            smtp_user: get("SMTP_USER").unwrap_or_default(),
            smtp_password: get("SMTP_PASSWORD").unwrap_or_default(),
            email_from: get("EMAIL_FROM").unwrap_or_default(),
        };

        let project_path = match get("SCAN_PROJECT_PATH") {
            Some(path) => PathBuf::from(path),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };

        let report = ReportConfig {
            project_path,
            output_dir: PathBuf::from(
                get("REPORT_OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            ),
            npm_path: get("NPM_PATH").unwrap_or_else(|| DEFAULT_NPM.to_string()),
        };

        Ok(Self { ai, email, report })
    }

    /// Check that every value required by the enabled features is present
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();

        if self.ai.api_key.is_empty() {
            missing.push("AI_API_KEY".to_string());
        }

        if self.email.enabled {
            let smtp = [
                ("SMTP_SERVER", &self.email.smtp_server),
                ("SMTP_USER", &self.email.smtp_user),
                ("SMTP_PASSWORD", &self.email.smtp_password),
                ("EMAIL_FROM", &self.email.email_from),
            ];
            missing.extend(
                smtp.iter()
                    .filter(|(_, value)| value.is_empty())
                    .map(|(var, _)| var.to_string()),
            );

            if self.email.recipients.is_empty() {
                tracing::warn!("EMAIL_ENABLED is set but EMAIL_RECIPIENTS is empty; no email will be sent");
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(missing))
        }
    }
}

fn parse_or<T: FromStr>(var: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    match value {
        Some(v) => v
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(var, format!("'{}': {}", v, e))),
        None => Ok(default),
    }
}

fn parse_flag(var: &str, value: Option<String>) -> Result<bool, ConfigError> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("false") => Ok(false),
        Some("true") => Ok(true),
        Some(other) => Err(ConfigError::invalid(
            var,
            format!("'{}' (expected true or false)", other),
        )),
    }
}

fn split_recipients(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from)
        .collect()
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}
