use crate::error::Result;
use crate::mail::SenderIdentity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub ses: SesConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SesConfig {
    /// Explicit access key; absent means ambient AWS_* environment credentials
    pub access_key_id: Option<String>,
    /// Explicit secret key; absent means ambient AWS_* environment credentials
    pub secret_access_key: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    /// Endpoint override, mainly for tests and local SES-compatible stacks
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MailConfig {
    /// Default sender, either `addr@x.com` or `Name <addr@x.com>`
    pub sender: Option<SenderIdentity>,
    /// Default reply-to; falls back to the sender's address when absent
    pub reply_to: Option<SenderIdentity>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TemplateConfig {
    /// Directory containing template files, one template per file
    pub dir: Option<PathBuf>,
    /// Substitution values merged under caller-supplied ones
    #[serde(default)]
    pub default_context: HashMap<String, serde_json::Value>,
}

fn default_region() -> String {
    "us-west-2".to_string()
}

impl Default for SesConfig {
    fn default() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            region: default_region(),
            endpoint: None,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::MailerError::Config(e.to_string()))?;

        toml::from_str(&content).map_err(|e| crate::error::MailerError::Config(e.to_string()))
    }

    /// Build a configuration from `SES_MAILER_*` environment variables
    ///
    /// Recognized variables: `SES_MAILER_ACCESS_KEY_ID`,
    /// `SES_MAILER_SECRET_ACCESS_KEY`, `SES_MAILER_REGION`,
    /// `SES_MAILER_ENDPOINT`, `SES_MAILER_SENDER`, `SES_MAILER_REPLY_TO`,
    /// `SES_MAILER_TEMPLATE_DIR`.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        Self {
            ses: SesConfig {
                access_key_id: var("SES_MAILER_ACCESS_KEY_ID"),
                secret_access_key: var("SES_MAILER_SECRET_ACCESS_KEY"),
                region: var("SES_MAILER_REGION").unwrap_or_else(default_region),
                endpoint: var("SES_MAILER_ENDPOINT"),
            },
            mail: MailConfig {
                sender: var("SES_MAILER_SENDER").map(|v| SenderIdentity::parse(&v)),
                reply_to: var("SES_MAILER_REPLY_TO").map(|v| SenderIdentity::parse(&v)),
            },
            templates: TemplateConfig {
                dir: var("SES_MAILER_TEMPLATE_DIR").map(PathBuf::from),
                default_context: HashMap::new(),
            },
        }
    }
}
