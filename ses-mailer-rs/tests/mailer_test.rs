//! Integration tests for direct sends

use async_trait::async_trait;
use ses_mailer_rs::ses::{SendEmailRequest, SendEmailResponse};
use ses_mailer_rs::{EmailApi, Mailer, MailerError, SendOptions, SenderIdentity};
use std::sync::{Arc, Mutex};

/// Provider fake that records every submission
struct RecordingApi {
    calls: Mutex<Vec<SendEmailRequest>>,
    rejection: Option<(String, String)>,
}

impl RecordingApi {
    fn accepting() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            rejection: None,
        })
    }

    fn rejecting(code: &str, message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            rejection: Some((code.to_string(), message.to_string())),
        })
    }

    fn calls(&self) -> Vec<SendEmailRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailApi for RecordingApi {
    async fn send_email(
        &self,
        request: SendEmailRequest,
    ) -> ses_mailer_rs::Result<SendEmailResponse> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(request);
        match &self.rejection {
            Some((code, message)) => Err(MailerError::Provider {
                code: code.clone(),
                message: message.clone(),
            }),
            None => Ok(SendEmailResponse {
                message_id: format!("msg-{}", calls.len()),
            }),
        }
    }
}

#[tokio::test]
async fn test_send_returns_message_id() {
    let api = RecordingApi::accepting();
    let mailer = Mailer::with_api(api.clone()).sender(SenderIdentity::bare("ops@example.com"));

    let id = mailer
        .send("a@x.com", "Test", "TEST BODY", SendOptions::default())
        .await
        .unwrap();

    assert_eq!(id, "msg-1");
    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].source, "ops@example.com");
    assert_eq!(calls[0].destination.to, ["a@x.com"]);
    assert_eq!(calls[0].content.subject, "Test");
    assert_eq!(calls[0].content.text_body.as_deref(), Some("TEST BODY"));
    assert!(calls[0].content.html_body.is_none());
}

#[tokio::test]
async fn test_send_without_any_sender_fails_without_provider_call() {
    let api = RecordingApi::accepting();
    let mailer = Mailer::with_api(api.clone());

    let err = mailer
        .send("a@x.com", "S", "B", SendOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, MailerError::Config(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_scalar_recipient_equals_single_element_list() {
    let api = RecordingApi::accepting();
    let mailer = Mailer::with_api(api.clone()).sender(SenderIdentity::bare("ops@example.com"));

    mailer
        .send("a@x.com", "S", "B", SendOptions::default())
        .await
        .unwrap();
    mailer
        .send(vec!["a@x.com"], "S", "B", SendOptions::default())
        .await
        .unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
}

#[tokio::test]
async fn test_reply_to_falls_back_to_sender_address() {
    let api = RecordingApi::accepting();
    let mailer =
        Mailer::with_api(api.clone()).sender(SenderIdentity::named("Ops", "ops@example.com"));

    mailer
        .send("a@x.com", "S", "B", SendOptions::default())
        .await
        .unwrap();

    assert_eq!(api.calls()[0].reply_to_addresses, ["ops@example.com"]);
}

#[tokio::test]
async fn test_reply_to_override_wins_over_default() {
    let api = RecordingApi::accepting();
    let mailer = Mailer::with_api(api.clone())
        .sender(SenderIdentity::bare("ops@example.com"))
        .reply_to(SenderIdentity::bare("support@example.com"));

    let options = SendOptions {
        reply_to: Some(SenderIdentity::bare("nola@nola.com")),
        ..SendOptions::default()
    };
    mailer.send("a@x.com", "S", "B", options).await.unwrap();

    assert_eq!(api.calls()[0].reply_to_addresses, ["nola@nola.com"]);
}

#[tokio::test]
async fn test_cc_and_bcc_accept_scalars() {
    let api = RecordingApi::accepting();
    let mailer = Mailer::with_api(api.clone()).sender(SenderIdentity::bare("ops@example.com"));

    let options = SendOptions {
        cc: "cc@x.com".into(),
        bcc: vec!["b1@x.com", "b2@x.com"].into(),
        ..SendOptions::default()
    };
    mailer.send("a@x.com", "S", "B", options).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls[0].destination.cc, ["cc@x.com"]);
    assert_eq!(calls[0].destination.bcc, ["b1@x.com", "b2@x.com"]);
}

#[tokio::test]
async fn test_provider_rejection_propagates_detail() {
    let api = RecordingApi::rejecting("MessageRejected", "Email address is not verified.");
    let mailer = Mailer::with_api(api.clone()).sender(SenderIdentity::bare("ops@example.com"));

    let err = mailer
        .send("a@x.com", "S", "B", SendOptions::default())
        .await
        .unwrap_err();

    match err {
        MailerError::Provider { code, message } => {
            assert_eq!(code, "MessageRejected");
            assert_eq!(message, "Email address is not verified.");
        }
        other => panic!("expected Provider error, got {:?}", other),
    }
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_html_format_routes_body_to_html_part() {
    let api = RecordingApi::accepting();
    let mailer = Mailer::with_api(api.clone()).sender(SenderIdentity::bare("ops@example.com"));

    let options = SendOptions {
        format: Some(ses_mailer_rs::MessageFormat::Html),
        ..SendOptions::default()
    };
    mailer
        .send("a@x.com", "S", "<p>B</p>", options)
        .await
        .unwrap();

    let calls = api.calls();
    assert!(calls[0].content.text_body.is_none());
    assert_eq!(calls[0].content.html_body.as_deref(), Some("<p>B</p>"));
}

#[tokio::test]
async fn test_explicit_body_variants_win() {
    let api = RecordingApi::accepting();
    let mailer = Mailer::with_api(api.clone()).sender(SenderIdentity::bare("ops@example.com"));

    let options = SendOptions {
        text_body: Some("plain".to_string()),
        html_body: Some("<p>rich</p>".to_string()),
        ..SendOptions::default()
    };
    mailer.send("a@x.com", "S", "B", options).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls[0].content.text_body.as_deref(), Some("plain"));
    assert_eq!(calls[0].content.html_body.as_deref(), Some("<p>rich</p>"));
}

#[tokio::test]
async fn test_return_path_passes_through() {
    let api = RecordingApi::accepting();
    let mailer = Mailer::with_api(api.clone()).sender(SenderIdentity::bare("ops@example.com"));

    let options = SendOptions {
        return_path: Some("bounces@example.com".to_string()),
        ..SendOptions::default()
    };
    mailer.send("a@x.com", "S", "B", options).await.unwrap();

    assert_eq!(
        api.calls()[0].return_path.as_deref(),
        Some("bounces@example.com")
    );
}
