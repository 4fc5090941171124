//! SES provider client
//!
//! This module talks to the external mail-sending service:
//! - [`EmailApi`]: the capability the [`Mailer`](crate::mail::Mailer)
//!   depends on; mockable for tests and replaceable for alternate
//!   transports
//! - [`client`]: HTTP client for the SES v2 JSON API
//! - [`sign`]: AWS Signature Version 4 request signing
//! - [`types`]: request/response types and their wire representations

pub mod client;
pub mod sign;
pub mod types;

pub use client::SesClient;
pub use sign::RequestSigner;
pub use types::{Destination, EmailContent, SendEmailRequest, SendEmailResponse};

use crate::error::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Mail-sending capability
///
/// One call submits one composed message and returns the provider-assigned
/// message identifier, or the provider's rejection. No retries happen at
/// this layer; a failed call surfaces to the caller to retry or abandon.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EmailApi: Send + Sync {
    async fn send_email(&self, request: SendEmailRequest) -> Result<SendEmailResponse>;
}
