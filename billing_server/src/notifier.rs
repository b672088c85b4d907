//! Order-confirmation webhook.
//!
//! When an order is confirmed, the engine publishes an [`OrderConfirmedEvent`]. The handler built here waits for the
//! configured preparation delay, then POSTs a [`ConfirmationPayload`] to the notification url. Delivery is best effort:
//! failures are logged and never retried, and they never affect the order, which was committed before the event was
//! published.
use std::{sync::Arc, time::Duration};

use billing_common::{Money, Secret};
use billing_engine::events::{EventHandlers, EventHooks, OrderConfirmedEvent};
use chrono::{DateTime, Utc};
use log::*;
use reqwest::{header::CONTENT_TYPE, Client};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{config::NotifierConfig, helpers::calculate_hmac};

/// The header that carries the base64-encoded HMAC-SHA256 signature of the request body.
pub const SIGNATURE_HEADER: &str = "X-Billing-Hmac-SHA256";
const EVENT_BUFFER_SIZE: usize = 25;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Could not create the webhook client. {0}")]
    ClientError(String),
    #[error("Could not deliver the notification. {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Could not serialize the notification. {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Could not sign the notification. {0}")]
    SigningError(#[from] hmac::digest::InvalidLength),
    #[error("The webhook replied with status {0}. {1}")]
    UnexpectedResponse(u16, String),
}

/// The body of the order-confirmation webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationPayload {
    pub id: i64,
    pub amount: Money,
    pub date: DateTime<Utc>,
}

impl From<&OrderConfirmedEvent> for ConfirmationPayload {
    fn from(event: &OrderConfirmedEvent) -> Self {
        Self {
            id: event.order.id,
            amount: event.total,
            date: event.order.confirmed_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
    secret: Secret<String>,
}

impl WebhookNotifier {
    pub fn new(url: &str, secret: Secret<String>, timeout: Duration) -> Result<Self, NotifierError> {
        let client =
            Client::builder().timeout(timeout).build().map_err(|e| NotifierError::ClientError(e.to_string()))?;
        Ok(Self { client, url: url.to_string(), secret })
    }

    pub async fn notify(&self, payload: &ConfirmationPayload) -> Result<(), NotifierError> {
        let body = serde_json::to_vec(payload)?;
        let mut request = self.client.post(&self.url).header(CONTENT_TYPE, "application/json");
        if !self.secret.is_empty() {
            request = request.header(SIGNATURE_HEADER, calculate_hmac(self.secret.reveal(), &body)?);
        }
        let response = request.body(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(NotifierError::UnexpectedResponse(status.as_u16(), text));
        }
        Ok(())
    }
}

/// Builds the event handlers for the server. If no notification url is configured, the handler set is empty and
/// confirmations go unannounced.
pub fn create_notification_handlers(config: &NotifierConfig) -> Result<EventHandlers, NotifierError> {
    let mut hooks = EventHooks::default();
    if let Some(url) = &config.url {
        let notifier = Arc::new(WebhookNotifier::new(url, config.secret.clone(), config.timeout)?);
        let delay = config.preparation_delay;
        hooks.on_order_confirmed(move |event| {
            let notifier = Arc::clone(&notifier);
            Box::pin(async move {
                let payload = ConfirmationPayload::from(&event);
                debug!("📣️ Order #{} confirmed. Notifying the webhook in {}s", payload.id, delay.as_secs_f32());
                tokio::time::sleep(delay).await;
                match notifier.notify(&payload).await {
                    Ok(()) => info!("📣️ Confirmation of order #{} ({}) delivered", payload.id, payload.amount),
                    Err(e) => error!("📣️ Confirmation of order #{} could not be delivered. {e}", payload.id),
                }
            })
        });
    }
    Ok(EventHandlers::new(EVENT_BUFFER_SIZE, hooks))
}
