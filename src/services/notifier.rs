//! Low-score alerts sent to the player's family through an external mail relay.

use std::{sync::Arc, time::Duration, time::SystemTime};

use futures::future::BoxFuture;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{
    config::AlertConfig,
    dao::models::UserId,
    dto::format_system_time,
    state::tracker::Score,
};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Payload handed to the mail relay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowScoreAlert {
    /// Recipient key resolved by the relay (e.g. `familyEmail`).
    pub recipient: String,
    /// Subject line of the alert.
    pub subject: String,
    /// Plain-text body of the alert.
    pub body: String,
    /// Player whose round ended with a low score.
    pub user_id: UserId,
    /// Final percentage of the round.
    pub score_percentage: f64,
    /// RFC 3339 timestamp of the moment the round finished.
    pub sent_at: String,
}

impl LowScoreAlert {
    /// Build the alert for `player` from the configured template.
    pub fn new(config: &AlertConfig, player: UserId, score: &Score) -> Self {
        Self {
            recipient: config.recipient.clone(),
            subject: config.subject.clone(),
            body: config.body.clone(),
            user_id: player,
            score_percentage: score.percentage,
            sent_at: format_system_time(SystemTime::now()),
        }
    }
}

/// Failures while delivering an alert. They are logged, never shown to players.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build mail relay client")]
    ClientBuilder {
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent or timed out.
    #[error("failed to reach mail relay `{url}`")]
    Request {
        /// Mail relay endpoint.
        url: String,
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// The relay rejected the alert.
    #[error("mail relay `{url}` answered with status {status}")]
    Status {
        /// Mail relay endpoint.
        url: String,
        /// Non-success status returned by the relay.
        status: StatusCode,
    },
}

/// Sink for low-score alerts.
pub trait AlertNotifier: Send + Sync {
    /// Deliver `alert` to its recipient.
    fn send(&self, alert: LowScoreAlert) -> BoxFuture<'static, Result<(), NotifyError>>;
}

/// Posts alerts as JSON to a mail relay endpoint.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a notifier posting to `url`.
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(|source| NotifyError::ClientBuilder { source })?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn post(&self, alert: LowScoreAlert) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&alert)
            .send()
            .await
            .map_err(|source| NotifyError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                url: self.url.clone(),
                status,
            });
        }
        Ok(())
    }
}

impl AlertNotifier for WebhookNotifier {
    fn send(&self, alert: LowScoreAlert) -> BoxFuture<'static, Result<(), NotifyError>> {
        let notifier = self.clone();
        Box::pin(async move { notifier.post(alert).await })
    }
}

/// Fallback used when no mail relay is configured: the alert only reaches the logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl AlertNotifier for LogNotifier {
    fn send(&self, alert: LowScoreAlert) -> BoxFuture<'static, Result<(), NotifyError>> {
        Box::pin(async move {
            warn!(
                recipient = %alert.recipient,
                user = %alert.user_id,
                score = alert.score_percentage,
                subject = %alert.subject,
                "low score alert (no mail relay configured)"
            );
            Ok(())
        })
    }
}

/// Pick the notifier matching the alert configuration.
pub fn from_config(config: &AlertConfig) -> Result<Arc<dyn AlertNotifier>, NotifyError> {
    match config.webhook_url.as_deref() {
        Some(url) => {
            info!(url, "low score alerts go to the mail relay");
            Ok(Arc::new(WebhookNotifier::new(url)?))
        }
        None => {
            info!("no mail relay configured; low score alerts are only logged");
            Ok(Arc::new(LogNotifier))
        }
    }
}

/// Send `alert` on a detached task. Delivery failures are logged and swallowed.
pub fn dispatch(notifier: Arc<dyn AlertNotifier>, alert: LowScoreAlert) -> JoinHandle<()> {
    tokio::spawn(async move {
        let user = alert.user_id;
        match notifier.send(alert).await {
            Ok(()) => info!(user = %user, "low score alert delivered"),
            Err(err) => warn!(user = %user, error = %err, "failed to deliver low score alert"),
        }
    })
}
