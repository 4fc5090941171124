//! Direct and template-based email sending

use crate::config::Config;
use crate::error::{MailerError, Result};
use crate::mail::message::{AddressList, MessageFormat, SendOptions, SenderIdentity};
use crate::ses::{
    Destination, EmailApi, EmailContent, SendEmailRequest, SesClient,
};
use crate::templates::{TemplateRenderer, TemplateSource};
use crate::utils::validate_email;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Composes messages and submits them to the mail provider
///
/// Holds the configured defaults (sender, reply-to, substitution context),
/// the provider handle and, when configured, a template renderer for
/// template-based sends.
///
/// # Examples
/// ```no_run
/// use ses_mailer_rs::{Config, Mailer, SendOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mailer = Mailer::new(Config::from_file("config.toml")?)?;
///
/// let message_id = mailer
///     .send("you@example.com", "Hello", "How are you?", SendOptions::default())
///     .await?;
/// println!("sent: {}", message_id);
/// # Ok(())
/// # }
/// ```
pub struct Mailer {
    api: Arc<dyn EmailApi>,
    sender: Option<SenderIdentity>,
    reply_to: Option<SenderIdentity>,
    templates: Option<TemplateRenderer>,
    default_context: HashMap<String, serde_json::Value>,
}

impl Mailer {
    /// Create a mailer backed by a real SES client
    pub fn new(config: Config) -> Result<Self> {
        let api = SesClient::new(&config.ses)?;
        let templates = config
            .templates
            .dir
            .map(|dir| TemplateRenderer::new(TemplateSource::directory(dir)));

        Ok(Self {
            api: Arc::new(api),
            sender: config.mail.sender,
            reply_to: config.mail.reply_to,
            templates,
            default_context: config.templates.default_context,
        })
    }

    /// Create a mailer from `SES_MAILER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env())
    }

    /// Create a mailer over an alternate provider implementation
    pub fn with_api(api: Arc<dyn EmailApi>) -> Self {
        Self {
            api,
            sender: None,
            reply_to: None,
            templates: None,
            default_context: HashMap::new(),
        }
    }

    /// Set the default sender
    pub fn sender(mut self, sender: SenderIdentity) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Set the default reply-to
    pub fn reply_to(mut self, reply_to: SenderIdentity) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    /// Attach a template source for template-based sends
    pub fn templates(mut self, source: TemplateSource) -> Self {
        self.templates = Some(TemplateRenderer::new(source));
        self
    }

    /// Set substitution values merged under caller-supplied ones
    pub fn default_context(mut self, context: HashMap<String, serde_json::Value>) -> Self {
        self.default_context = context;
        self
    }

    /// The attached template renderer, if any
    pub fn template_renderer(&self) -> Option<&TemplateRenderer> {
        self.templates.as_ref()
    }

    /// Send an email with explicit fields
    ///
    /// `to` accepts a single address or a list. Sender resolution:
    /// `options.sender`, then the configured default, otherwise the call
    /// fails before the provider is contacted. Reply-to resolution:
    /// `options.reply_to`, then the configured default, otherwise the
    /// resolved sender's address.
    ///
    /// Returns the provider-assigned message id.
    pub async fn send(
        &self,
        to: impl Into<AddressList>,
        subject: &str,
        body: &str,
        options: SendOptions,
    ) -> Result<String> {
        let to = to.into();
        let SendOptions {
            sender,
            reply_to,
            cc,
            bcc,
            text_body,
            html_body,
            return_path,
            format,
        } = options;

        let sender = sender
            .as_ref()
            .or(self.sender.as_ref())
            .ok_or_else(|| MailerError::Config("sender email is not provided".to_string()))?;
        let reply_to = reply_to
            .as_ref()
            .or(self.reply_to.as_ref())
            .map(|identity| identity.address().to_string())
            .unwrap_or_else(|| sender.address().to_string());

        if to.is_empty() {
            return Err(MailerError::Config("recipient list is empty".to_string()));
        }
        for address in to
            .as_slice()
            .iter()
            .chain(cc.as_slice())
            .chain(bcc.as_slice())
        {
            validate_email(address)?;
        }
        validate_email(sender.address())?;
        validate_email(&reply_to)?;
        if let Some(return_path) = &return_path {
            validate_email(return_path)?;
        }

        // The main body fills the part selected by `format`; explicit
        // text/html variants always win for their part.
        let format = format.unwrap_or(MessageFormat::Text);
        let text_body = text_body.or_else(|| {
            (format == MessageFormat::Text).then(|| body.to_string())
        });
        let html_body = html_body.or_else(|| {
            (format == MessageFormat::Html).then(|| body.to_string())
        });

        let request = SendEmailRequest {
            source: sender.signature(),
            destination: Destination {
                to: to.into_vec(),
                cc: cc.into_vec(),
                bcc: bcc.into_vec(),
            },
            reply_to_addresses: vec![reply_to],
            return_path,
            content: EmailContent {
                subject: subject.to_string(),
                text_body,
                html_body,
            },
        };

        info!(
            "Sending email from {} to {} recipient(s)",
            sender.address(),
            request.destination.to.len()
        );

        let response = self.api.send_email(request).await?;
        Ok(response.message_id)
    }

    /// Render a template's blocks and send the assembled message
    ///
    /// The rendered block map must contain `subject` and `body`; the
    /// optional blocks `text_body`, `html_body` and `return_path` pass
    /// through as the corresponding send options, and a `format` block
    /// selects the body part when it parses as `text` or `html` (anything
    /// else is ignored). Configured default substitution values are merged
    /// under `context`, with caller values winning.
    pub async fn send_template(
        &self,
        template_name: &str,
        to: impl Into<AddressList>,
        mut options: SendOptions,
        context: &HashMap<String, serde_json::Value>,
    ) -> Result<String> {
        let renderer = self.templates.as_ref().ok_or_else(|| {
            MailerError::Config("no template source configured".to_string())
        })?;

        let mut merged = self.default_context.clone();
        merged.extend(context.iter().map(|(k, v)| (k.clone(), v.clone())));

        let blocks = renderer.render_blocks(template_name, &merged)?;
        debug!(
            "Template '{}' rendered {} block(s)",
            template_name,
            blocks.len()
        );

        let subject = require_block(&blocks, "subject", template_name)?;
        let body = require_block(&blocks, "body", template_name)?;

        if let Some(text_body) = blocks.get("text_body") {
            options.text_body = Some(text_body.clone());
        }
        if let Some(html_body) = blocks.get("html_body") {
            options.html_body = Some(html_body.clone());
        }
        if let Some(return_path) = blocks.get("return_path") {
            options.return_path = Some(return_path.clone());
        }
        if let Some(format) = blocks.get("format") {
            // unparseable format values are dropped, not fatal
            if let Some(parsed) = MessageFormat::parse(format) {
                options.format = Some(parsed);
            }
        }

        self.send(to, subject.trim(), body, options).await
    }
}

fn require_block<'a>(
    blocks: &'a HashMap<String, String>,
    block: &str,
    template: &str,
) -> Result<&'a str> {
    blocks
        .get(block)
        .map(String::as_str)
        .ok_or_else(|| MailerError::TemplateValidation {
            block: block.to_string(),
            template: template.to_string(),
        })
}
