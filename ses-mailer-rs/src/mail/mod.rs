//! Email composition and sending
//!
//! - [`mailer`]: the [`Mailer`] — direct and template-based sends
//! - [`message`]: sender identities, recipient lists, send options

pub mod mailer;
pub mod message;

pub use mailer::Mailer;
pub use message::{AddressList, MessageFormat, SendOptions, SenderIdentity};
