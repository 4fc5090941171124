//! Message field types: sender identities, recipient lists, send options

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// Identity used as a sender or reply-to value
///
/// Either a bare address or a display name paired with an address. Every
/// place that needs a sender-shaped value works from the three derived
/// forms: [`signature`](Self::signature), [`display_name`](Self::display_name)
/// and [`address`](Self::address).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenderIdentity {
    /// A bare email address
    Bare(String),
    /// A display name and an email address
    Named { name: String, address: String },
}

impl SenderIdentity {
    /// Create a bare-address identity
    pub fn bare(address: impl Into<String>) -> Self {
        SenderIdentity::Bare(address.into())
    }

    /// Create a named identity
    pub fn named(name: impl Into<String>, address: impl Into<String>) -> Self {
        SenderIdentity::Named {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Parse `"Name <address>"` into a named identity, anything else into a
    /// bare address
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if let (Some(start), true) = (value.find('<'), value.ends_with('>')) {
            let name = value[..start].trim();
            let address = value[start + 1..value.len() - 1].trim();
            if !name.is_empty() && !address.is_empty() {
                return SenderIdentity::named(name, address);
            }
            if !address.is_empty() {
                return SenderIdentity::bare(address);
            }
        }
        SenderIdentity::bare(value)
    }

    /// Full signature: `"Name <address>"`, or the bare address when there
    /// is no display name
    pub fn signature(&self) -> String {
        match self {
            SenderIdentity::Bare(address) => address.clone(),
            SenderIdentity::Named { name, address } => format!("{} <{}>", name, address),
        }
    }

    /// Display name alone; the address when there is no display name
    pub fn display_name(&self) -> &str {
        match self {
            SenderIdentity::Bare(address) => address,
            SenderIdentity::Named { name, .. } => name,
        }
    }

    /// Bare email address alone
    pub fn address(&self) -> &str {
        match self {
            SenderIdentity::Bare(address) => address,
            SenderIdentity::Named { address, .. } => address,
        }
    }
}

impl Serialize for SenderIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.signature())
    }
}

impl<'de> Deserialize<'de> for SenderIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(SenderIdentity::parse(&value))
    }
}

/// Recipient list accepting either a single address or many
///
/// A single address is normalized into a one-element list before
/// submission, so `"a@x.com"` and `vec!["a@x.com"]` produce equivalent
/// provider calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressList(Vec<String>);

impl AddressList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for AddressList {
    fn from(address: &str) -> Self {
        AddressList(vec![address.to_string()])
    }
}

impl From<String> for AddressList {
    fn from(address: String) -> Self {
        AddressList(vec![address])
    }
}

impl From<Vec<String>> for AddressList {
    fn from(addresses: Vec<String>) -> Self {
        AddressList(addresses)
    }
}

impl From<Vec<&str>> for AddressList {
    fn from(addresses: Vec<&str>) -> Self {
        AddressList(addresses.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for AddressList {
    fn from(addresses: &[&str]) -> Self {
        AddressList(addresses.iter().map(|a| a.to_string()).collect())
    }
}

/// Format of the main message body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    Text,
    Html,
}

impl MessageFormat {
    /// Parse a format value, case-insensitively
    ///
    /// Returns `None` for anything that is not `text` or `html`; callers
    /// ignore unparseable values rather than failing the send.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(MessageFormat::Text),
            "html" => Some(MessageFormat::Html),
            _ => None,
        }
    }
}

/// Optional fields for a single send
///
/// Every field has an explicit slot; `None`/empty means "not supplied" and
/// the configured default (or nothing) applies.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Overrides the configured default sender
    pub sender: Option<SenderIdentity>,
    /// Overrides the configured default reply-to
    pub reply_to: Option<SenderIdentity>,
    /// CC recipients
    pub cc: AddressList,
    /// BCC recipients
    pub bcc: AddressList,
    /// Explicit plain-text body variant
    pub text_body: Option<String>,
    /// Explicit HTML body variant
    pub html_body: Option<String>,
    /// Address bounce notifications are forwarded to
    pub return_path: Option<String>,
    /// Which part of the message the main body fills
    pub format: Option<MessageFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_sender_derived_forms() {
        let sender = SenderIdentity::named("Name", "addr@x.com");
        assert_eq!(sender.signature(), "Name <addr@x.com>");
        assert_eq!(sender.display_name(), "Name");
        assert_eq!(sender.address(), "addr@x.com");
    }

    #[test]
    fn test_bare_sender_derived_forms() {
        let sender = SenderIdentity::bare("addr@x.com");
        assert_eq!(sender.signature(), "addr@x.com");
        assert_eq!(sender.display_name(), "addr@x.com");
        assert_eq!(sender.address(), "addr@x.com");
    }

    #[test]
    fn test_parse_signature() {
        assert_eq!(
            SenderIdentity::parse("Jane Doe <jane@example.com>"),
            SenderIdentity::named("Jane Doe", "jane@example.com")
        );
        assert_eq!(
            SenderIdentity::parse("jane@example.com"),
            SenderIdentity::bare("jane@example.com")
        );
        assert_eq!(
            SenderIdentity::parse("<jane@example.com>"),
            SenderIdentity::bare("jane@example.com")
        );
    }

    #[test]
    fn test_address_list_from_scalar() {
        let list: AddressList = "a@x.com".into();
        assert_eq!(list.as_slice(), ["a@x.com".to_string()]);
    }

    #[test]
    fn test_address_list_scalar_equals_single_element_list() {
        let scalar: AddressList = "a@x.com".into();
        let list: AddressList = vec!["a@x.com"].into();
        assert_eq!(scalar, list);
    }

    #[test]
    fn test_message_format_parse() {
        assert_eq!(MessageFormat::parse("text"), Some(MessageFormat::Text));
        assert_eq!(MessageFormat::parse("HTML"), Some(MessageFormat::Html));
        assert_eq!(MessageFormat::parse(" html \n"), Some(MessageFormat::Html));
        assert_eq!(MessageFormat::parse("markdown"), None);
        assert_eq!(MessageFormat::parse(""), None);
    }
}
