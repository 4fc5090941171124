//! Template source locations

use crate::error::{MailerError, Result};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Where template source text comes from
///
/// Immutable once supplied; sources are assumed static for the process
/// lifetime, which is what makes the renderer's parse cache safe.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// Each file in the directory is a template, named by filename
    Directory(PathBuf),
    /// Explicit mapping from template name to source text
    Memory(HashMap<String, String>),
}

impl TemplateSource {
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        TemplateSource::Directory(dir.into())
    }

    pub fn memory(map: HashMap<String, String>) -> Self {
        TemplateSource::Memory(map)
    }

    /// Load the raw source text of a named template
    pub fn read(&self, name: &str) -> Result<String> {
        match self {
            TemplateSource::Memory(map) => map
                .get(name)
                .cloned()
                .ok_or_else(|| MailerError::TemplateNotFound(name.to_string())),
            TemplateSource::Directory(dir) => {
                // Template names must stay inside the configured directory
                let relative = Path::new(name);
                let escapes = relative.components().any(|c| {
                    !matches!(c, Component::Normal(_) | Component::CurDir)
                });
                if escapes {
                    return Err(MailerError::TemplateNotFound(name.to_string()));
                }

                match std::fs::read_to_string(dir.join(relative)) {
                    Ok(text) => Ok(text),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        Err(MailerError::TemplateNotFound(name.to_string()))
                    }
                    Err(e) => Err(MailerError::Io(e)),
                }
            }
        }
    }
}

impl From<HashMap<String, String>> for TemplateSource {
    fn from(map: HashMap<String, String>) -> Self {
        TemplateSource::Memory(map)
    }
}

impl From<PathBuf> for TemplateSource {
    fn from(dir: PathBuf) -> Self {
        TemplateSource::Directory(dir)
    }
}
