//! HTTP client for the SES v2 JSON API
//!
//! One send call performs one signed `POST /v2/email/outbound-emails` and
//! returns the provider's message id or its rejection. Timeouts and
//! connection pooling are reqwest's concern; no retry logic lives here.

use crate::config::SesConfig;
use crate::error::{MailerError, Result};
use crate::ses::sign::RequestSigner;
use crate::ses::types::{
    SendEmailRequest, SendEmailResponse, WireErrorBody, WireSendEmail, WireSendEmailResult,
};
use crate::ses::EmailApi;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, info};

const SEND_EMAIL_PATH: &str = "/v2/email/outbound-emails";
const CONTENT_TYPE_JSON: &str = "application/json";

/// SES v2 API client
///
/// Constructible from explicit credentials + region, or from ambient
/// `AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY`/`AWS_SESSION_TOKEN`
/// environment credentials.
pub struct SesClient {
    http: reqwest::Client,
    signer: RequestSigner,
    session_token: Option<String>,
    endpoint: String,
    host: String,
}

impl SesClient {
    pub fn new(config: &SesConfig) -> Result<Self> {
        let (access_key_id, secret_access_key, session_token) =
            match (&config.access_key_id, &config.secret_access_key) {
                (Some(id), Some(secret)) => (id.clone(), secret.clone(), None),
                _ => ambient_credentials()?,
            };

        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://email.{}.amazonaws.com", config.region));
        let host = endpoint_host(&endpoint)?;

        Ok(Self {
            http: reqwest::Client::new(),
            signer: RequestSigner {
                access_key_id,
                secret_access_key,
                region: config.region.clone(),
                service: "ses".to_string(),
            },
            session_token,
            endpoint,
            host,
        })
    }

    /// Create a client from ambient environment credentials
    ///
    /// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`,
    /// `AWS_SESSION_TOKEN` and `AWS_REGION`.
    pub fn from_env() -> Result<Self> {
        let region = std::env::var("AWS_REGION")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "us-west-2".to_string());

        Self::new(&SesConfig {
            access_key_id: None,
            secret_access_key: None,
            region,
            endpoint: None,
        })
    }
}

#[async_trait]
impl EmailApi for SesClient {
    async fn send_email(&self, request: SendEmailRequest) -> Result<SendEmailResponse> {
        let body = serde_json::to_vec(&WireSendEmail::from(&request))?;
        let url = format!("{}{}", self.endpoint, SEND_EMAIL_PATH);
        let now = Utc::now();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        let mut signed_headers = vec![
            ("content-type".to_string(), CONTENT_TYPE_JSON.to_string()),
            ("host".to_string(), self.host.clone()),
            ("x-amz-date".to_string(), amz_date.clone()),
        ];
        if let Some(token) = &self.session_token {
            signed_headers.push(("x-amz-security-token".to_string(), token.clone()));
        }

        let authorization = self.signer.authorization_header(
            "POST",
            SEND_EMAIL_PATH,
            "",
            &signed_headers,
            &body,
            now,
        );

        debug!(
            "POST {} ({} recipient(s))",
            url,
            request.destination.to.len()
        );

        let mut http_request = self
            .http
            .post(&url)
            .header("Content-Type", CONTENT_TYPE_JSON)
            .header("X-Amz-Date", &amz_date)
            .header("Authorization", authorization);
        if let Some(token) = &self.session_token {
            http_request = http_request.header("X-Amz-Security-Token", token);
        }

        let response = http_request.body(body).send().await?;
        let status = response.status();

        if status.is_success() {
            let result: WireSendEmailResult = response.json().await?;
            info!("Message accepted by SES: {}", result.message_id);
            return Ok(SendEmailResponse {
                message_id: result.message_id,
            });
        }

        let code = response
            .headers()
            .get("x-amzn-errortype")
            .and_then(|value| value.to_str().ok())
            // the header value may carry a trailing ":<namespace>" suffix
            .map(|value| value.split(':').next().unwrap_or(value).to_string())
            .unwrap_or_else(|| status.to_string());
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<WireErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(text);

        error!("SES rejected the message ({}): {}", code, message);
        Err(MailerError::Provider { code, message })
    }
}

fn ambient_credentials() -> Result<(String, String, Option<String>)> {
    let access_key_id = std::env::var("AWS_ACCESS_KEY_ID").map_err(|_| {
        MailerError::Config(
            "no explicit credentials and AWS_ACCESS_KEY_ID is not set".to_string(),
        )
    })?;
    let secret_access_key = std::env::var("AWS_SECRET_ACCESS_KEY").map_err(|_| {
        MailerError::Config(
            "no explicit credentials and AWS_SECRET_ACCESS_KEY is not set".to_string(),
        )
    })?;
    let session_token = std::env::var("AWS_SESSION_TOKEN").ok().filter(|v| !v.is_empty());

    Ok((access_key_id, secret_access_key, session_token))
}

fn endpoint_host(endpoint: &str) -> Result<String> {
    let url = reqwest::Url::parse(endpoint)
        .map_err(|e| MailerError::Config(format!("invalid endpoint '{}': {}", endpoint, e)))?;
    let host = url
        .host_str()
        .ok_or_else(|| MailerError::Config(format!("endpoint '{}' has no host", endpoint)))?;

    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
