//! Block-based email template rendering
//!
//! A single template file encodes multiple logical email fields (subject,
//! plain-text body, HTML body) as named `{% block %}` sections, rendered
//! independently against the same substitution context:
//!
//! - [`types`]: template source locations (directory or in-memory map)
//! - [`renderer`]: block discovery and rendering

pub mod renderer;
pub mod types;

pub use renderer::TemplateRenderer;
pub use types::TemplateSource;
