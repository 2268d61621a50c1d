// src/services/gateway.rs - Interface to the external messaging gateway plus
// the shared retry policy: a fixed number of attempts with a linearly
// increasing delay between them.

use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::constants::{MAX_SEND_ATTEMPTS, SEND_RETRY_BASE_DELAY_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    Sms,
    WhatsApp,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::WhatsApp => "whatsapp",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendOutcome {
    pub success: bool,
    pub message_id: Option<String>,
    pub status: String,
    pub error: Option<String>,
}

/// External message dispatch collaborator.
pub trait MessagingGateway {
    fn send(
        &self,
        phone: &str,
        body: &str,
        channel: Channel,
    ) -> impl std::future::Future<Output = Result<SendOutcome>> + Send;
}

/// Retries a gateway send up to `MAX_SEND_ATTEMPTS` times. The delay before
/// attempt n is n * `SEND_RETRY_BASE_DELAY_MS`. Only transport errors are
/// retried; a delivered-but-failed outcome is returned as-is.
pub async fn send_with_retry<G: MessagingGateway>(
    gateway: &G,
    phone: &str,
    body: &str,
    channel: Channel,
) -> Result<SendOutcome> {
    let mut last_error = None;
    for attempt in 1..=MAX_SEND_ATTEMPTS {
        match gateway.send(phone, body, channel).await {
            Ok(outcome) => return Ok(outcome),
            Err(error) => {
                warn!(
                    "{} send attempt {}/{} to {} failed: {}",
                    channel.as_str(),
                    attempt,
                    MAX_SEND_ATTEMPTS,
                    phone,
                    error
                );
                last_error = Some(error);
                if attempt < MAX_SEND_ATTEMPTS {
                    let delay = Duration::from_millis(SEND_RETRY_BASE_DELAY_MS * attempt as u64);
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
    Err(last_error.expect("at least one attempt was made"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakyGateway {
        failures_before_success: u32,
        calls: AtomicU32,
    }

    impl MessagingGateway for FlakyGateway {
        async fn send(&self, _phone: &str, _body: &str, _channel: Channel) -> Result<SendOutcome> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures_before_success {
                Err(anyhow!("transport error"))
            } else {
                Ok(SendOutcome {
                    success: true,
                    message_id: Some("SM123".into()),
                    status: "queued".into(),
                    error: None,
                })
            }
        }
    }

    #[tokio::test]
    async fn retries_transport_errors_then_succeeds() {
        let gateway = FlakyGateway {
            failures_before_success: 2,
            calls: AtomicU32::new(0),
        };
        let outcome = send_with_retry(&gateway, "12065044242", "hello", Channel::WhatsApp)
            .await
            .expect("third attempt succeeds");
        assert!(outcome.success);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_the_maximum_attempts() {
        let gateway = FlakyGateway {
            failures_before_success: 10,
            calls: AtomicU32::new(0),
        };
        let result = send_with_retry(&gateway, "12065044242", "hello", Channel::Sms).await;
        assert!(result.is_err());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), MAX_SEND_ATTEMPTS);
    }
}
