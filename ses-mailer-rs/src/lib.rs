//! ses-mailer-rs: send email through AWS SES, with block-based templates
//!
//! A thin library layer over the SES HTTP API and a template engine: compose
//! an email directly (subject, body, recipients) or by rendering the named
//! blocks of a template, then submit it and get back the provider-assigned
//! message id.
//!
//! # Features
//!
//! - **Direct sends**: explicit subject/body/recipients with optional
//!   cc/bcc, reply-to, text/html variants and return path
//! - **Template sends**: one template file encodes subject, body and
//!   optional variants as named blocks, rendered per send against
//!   substitution values
//! - **Configured defaults**: sender, reply-to and default substitution
//!   context resolved at send time
//! - **No hidden recovery**: every provider rejection propagates to the
//!   caller; nothing is retried or swallowed
//!
//! # Example
//!
//! ```no_run
//! use ses_mailer_rs::{Config, Mailer, SendOptions};
//! use std::collections::HashMap;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mailer = Mailer::new(Config::from_file("config.toml")?)?;
//!
//!     // Direct send
//!     mailer
//!         .send("you@example.com", "Hello", "How are you?", SendOptions::default())
//!         .await?;
//!
//!     // Template send: the template defines {% block subject %} and
//!     // {% block body %}
//!     let mut context = HashMap::new();
//!     context.insert("name".to_string(), serde_json::json!("Jones"));
//!     let message_id = mailer
//!         .send_template("welcome", "you@example.com", SendOptions::default(), &context)
//!         .await?;
//!     println!("sent: {}", message_id);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`mail`]: Message composition and the [`Mailer`]
//! - [`ses`]: SES provider client and request signing
//! - [`templates`]: Block-based template rendering
//! - [`utils`]: Utility functions (validation, etc.)

pub mod config;
pub mod error;
pub mod mail;
pub mod ses;
pub mod templates;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{MailerError, Result};
pub use mail::{AddressList, Mailer, MessageFormat, SendOptions, SenderIdentity};
pub use ses::{EmailApi, SesClient};
pub use templates::{TemplateRenderer, TemplateSource};
