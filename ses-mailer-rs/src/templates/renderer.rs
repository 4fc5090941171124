//! Block discovery and rendering

use crate::error::{MailerError, Result};
use crate::templates::TemplateSource;
use minijinja::value::Value;
use minijinja::{Environment, ErrorKind};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Renders the named blocks of a template against a substitution context
///
/// Templates are parsed lazily the first time they are requested and the
/// parsed form is cached for the lifetime of the renderer; cache entries
/// are never evicted. Each renderer owns its caches, so independently
/// configured renderers do not interfere.
pub struct TemplateRenderer {
    env: Environment<'static>,
    source: TemplateSource,
    block_names: Mutex<HashMap<String, Vec<String>>>,
}

impl TemplateRenderer {
    pub fn new(source: TemplateSource) -> Self {
        let mut env = Environment::new();
        let loader_source = source.clone();
        env.set_loader(move |name| match loader_source.read(name) {
            Ok(text) => Ok(Some(text)),
            Err(MailerError::TemplateNotFound(_)) => Ok(None),
            Err(e) => Err(minijinja::Error::new(
                ErrorKind::InvalidOperation,
                format!("failed to load template '{}': {}", name, e),
            )),
        });

        Self {
            env,
            source,
            block_names: Mutex::new(HashMap::new()),
        }
    }

    /// Render every named block the template defines
    ///
    /// The block set is whatever the template declares, not a fixed list.
    /// Returns a mapping from block name to rendered content.
    pub fn render_blocks(
        &self,
        template_name: &str,
        context: &HashMap<String, serde_json::Value>,
    ) -> Result<HashMap<String, String>> {
        let names = self.block_names(template_name)?;
        debug!(
            "Rendering {} block(s) of template '{}'",
            names.len(),
            template_name
        );

        let template = self
            .env
            .get_template(template_name)
            .map_err(|e| engine_error(template_name, e))?;
        let mut state = template
            .eval_to_state(Value::from_serialize(context))
            .map_err(|e| engine_error(template_name, e))?;

        let mut blocks = HashMap::new();
        for name in names {
            let rendered = state
                .render_block(&name)
                .map_err(|e| engine_error(template_name, e))?;
            blocks.insert(name, rendered);
        }
        Ok(blocks)
    }

    /// Render a single named block of a template
    pub fn render(
        &self,
        template_name: &str,
        block: &str,
        context: &HashMap<String, serde_json::Value>,
    ) -> Result<String> {
        let names = self.block_names(template_name)?;
        if !names.iter().any(|n| n == block) {
            return Err(MailerError::BlockNotFound {
                block: block.to_string(),
                template: template_name.to_string(),
            });
        }

        let template = self
            .env
            .get_template(template_name)
            .map_err(|e| engine_error(template_name, e))?;
        let mut state = template
            .eval_to_state(Value::from_serialize(context))
            .map_err(|e| engine_error(template_name, e))?;
        state
            .render_block(block)
            .map_err(|e| engine_error(template_name, e))
    }

    /// Names of the blocks a template defines, cached per template
    fn block_names(&self, template_name: &str) -> Result<Vec<String>> {
        let mut cache = match self.block_names.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(names) = cache.get(template_name) {
            return Ok(names.clone());
        }

        let source_text = self.source.read(template_name)?;
        let names = scan_blocks(&source_text);
        cache.insert(template_name.to_string(), names.clone());
        Ok(names)
    }
}

fn engine_error(template_name: &str, err: minijinja::Error) -> MailerError {
    if matches!(err.kind(), ErrorKind::TemplateNotFound) {
        MailerError::TemplateNotFound(template_name.to_string())
    } else {
        MailerError::Render(err.to_string())
    }
}

/// Extract the block names declared in a template source
///
/// Scans for `{% block name %}` tags (with optional whitespace-control
/// dashes), in declaration order, without duplicates.
fn scan_blocks(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = source;

    while let Some(idx) = rest.find("{%") {
        let tag = &rest[idx + 2..];
        let tag = tag.strip_prefix(['-', '+']).unwrap_or(tag);
        let tag = tag.trim_start();
        if let Some(after_keyword) = tag.strip_prefix("block") {
            let trimmed = after_keyword.trim_start();
            // "block" must be a full word, not a prefix of another tag name
            if trimmed.len() < after_keyword.len() {
                let name: String = trimmed
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                    .collect();
                if !name.is_empty() && !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        rest = &rest[idx + 2..];
    }

    names
}
