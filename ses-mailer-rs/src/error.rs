use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Block '{block}' not found in template '{template}'")]
    BlockNotFound { block: String, template: String },

    #[error("Template error: block '{block}' is missing from '{template}'")]
    TemplateValidation { block: String, template: String },

    #[error("Provider rejected the message ({code}): {message}")]
    Provider { code: String, message: String },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MailerError>;
