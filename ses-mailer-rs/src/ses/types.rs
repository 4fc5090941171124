//! Provider request/response types and their wire representations

use serde::{Deserialize, Serialize};

/// Recipient fields of a message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destination {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
}

/// Renderable content of a message
///
/// At least one of `text_body`/`html_body` is present by the time a
/// request reaches the provider; the Mailer guarantees this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub text_body: Option<String>,
    pub html_body: Option<String>,
}

/// One composed message, ready for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendEmailRequest {
    /// Sender signature, `"Name <addr>"` or a bare address
    pub source: String,
    pub destination: Destination,
    pub reply_to_addresses: Vec<String>,
    /// Address bounce notifications are forwarded to
    pub return_path: Option<String>,
    pub content: EmailContent,
}

/// Successful submission result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendEmailResponse {
    /// Provider-assigned message identifier
    pub message_id: String,
}

const CHARSET_UTF8: &str = "UTF-8";

// Wire shapes for the SES v2 SendEmail JSON body.

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireSendEmail {
    pub from_email_address: String,
    pub destination: WireDestination,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reply_to_addresses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_forwarding_email_address: Option<String>,
    pub content: WireContent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireDestination {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to_addresses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc_addresses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc_addresses: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireContent {
    pub simple: WireMessage,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireMessage {
    pub subject: WireText,
    pub body: WireBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<WireText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<WireText>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireText {
    pub data: String,
    pub charset: String,
}

impl WireText {
    fn new(data: String) -> Self {
        Self {
            data,
            charset: CHARSET_UTF8.to_string(),
        }
    }
}

impl From<&SendEmailRequest> for WireSendEmail {
    fn from(request: &SendEmailRequest) -> Self {
        Self {
            from_email_address: request.source.clone(),
            destination: WireDestination {
                to_addresses: request.destination.to.clone(),
                cc_addresses: request.destination.cc.clone(),
                bcc_addresses: request.destination.bcc.clone(),
            },
            reply_to_addresses: request.reply_to_addresses.clone(),
            feedback_forwarding_email_address: request.return_path.clone(),
            content: WireContent {
                simple: WireMessage {
                    subject: WireText::new(request.content.subject.clone()),
                    body: WireBody {
                        text: request.content.text_body.clone().map(WireText::new),
                        html: request.content.html_body.clone().map(WireText::new),
                    },
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireSendEmailResult {
    #[serde(default)]
    pub message_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireErrorBody {
    #[serde(alias = "Message")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SendEmailRequest {
        SendEmailRequest {
            source: "Ops <ops@example.com>".to_string(),
            destination: Destination {
                to: vec!["a@x.com".to_string()],
                cc: vec![],
                bcc: vec![],
            },
            reply_to_addresses: vec!["ops@example.com".to_string()],
            return_path: None,
            content: EmailContent {
                subject: "Hi".to_string(),
                text_body: Some("Hello".to_string()),
                html_body: None,
            },
        }
    }

    #[test]
    fn test_wire_shape() {
        let wire = WireSendEmail::from(&request());
        let value = serde_json::to_value(&wire).unwrap();

        assert_eq!(value["FromEmailAddress"], "Ops <ops@example.com>");
        assert_eq!(value["Destination"]["ToAddresses"][0], "a@x.com");
        assert_eq!(value["Content"]["Simple"]["Subject"]["Data"], "Hi");
        assert_eq!(value["Content"]["Simple"]["Body"]["Text"]["Data"], "Hello");
        assert_eq!(value["Content"]["Simple"]["Body"]["Text"]["Charset"], "UTF-8");
    }

    #[test]
    fn test_wire_shape_skips_absent_fields() {
        let wire = WireSendEmail::from(&request());
        let value = serde_json::to_value(&wire).unwrap();

        assert!(value["Destination"].get("CcAddresses").is_none());
        assert!(value["Content"]["Simple"]["Body"].get("Html").is_none());
        assert!(value.get("FeedbackForwardingEmailAddress").is_none());
    }

    #[test]
    fn test_result_parsing() {
        let result: WireSendEmailResult =
            serde_json::from_str(r#"{"MessageId": "0100-abc"}"#).unwrap();
        assert_eq!(result.message_id, "0100-abc");
    }

    #[test]
    fn test_error_body_parsing() {
        let body: WireErrorBody =
            serde_json::from_str(r#"{"message": "Email address is not verified."}"#).unwrap();
        assert_eq!(
            body.message.as_deref(),
            Some("Email address is not verified.")
        );
    }
}
