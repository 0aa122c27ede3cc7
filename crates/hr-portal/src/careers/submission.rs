use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::application::{ApplicationFields, ApplicationPayload, ApplicationType, ValidationError};
use crate::forms::FormSlot;
use crate::http::{build_client, read_lenient};
use crate::notify::{Notification, Notifier};

pub const CONFIRMATION_TITLE: &str = "Анкета отправлена";
pub const REJECTED_FALLBACK: &str = "Не удалось отправить анкету. Попробуйте позже.";
pub const TRANSPORT_FALLBACK: &str = "Не удалось отправить анкету. Проверьте соединение.";

/// Optional fields the submission endpoint reports back on success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(default)]
    pub application_id: Option<i64>,
    #[serde(default)]
    pub email_sent: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub email: String,
    pub application_type: ApplicationType,
    pub receipt: SubmissionReceipt,
}

impl Confirmation {
    pub fn notification(&self) -> Notification {
        Notification::info(
            CONFIRMATION_TITLE,
            format!(
                "Письмо отправлено на {}. Проверьте почту для подтверждения.",
                self.email
            ),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a submission from this form is already in flight")]
    InFlight,
    #[error("submission rejected with status {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Rejected { status: u16, message: Option<String> },
    #[error("submission transport failed: {0}")]
    Transport(String),
}

impl SubmissionError {
    /// Notice shown for a failed remote call. Local failures produce none.
    pub fn notification(&self) -> Option<Notification> {
        match self {
            SubmissionError::Rejected { message, .. } => Some(Notification::error(
                message.clone().unwrap_or_else(|| REJECTED_FALLBACK.to_string()),
            )),
            SubmissionError::Transport(_) => Some(Notification::error(TRANSPORT_FALLBACK)),
            SubmissionError::Validation(_) | SubmissionError::InFlight => None,
        }
    }
}

impl From<reqwest::Error> for SubmissionError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

/// Outbound seam for the remote submission endpoint.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(&self, payload: &ApplicationPayload)
        -> Result<SubmissionReceipt, SubmissionError>;
}

/// JSON-over-HTTP gateway; one POST per call, never retried.
#[derive(Debug, Clone)]
pub struct HttpSubmissionGateway {
    client: Client,
    endpoint: Url,
}

impl HttpSubmissionGateway {
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_client(timeout)?, endpoint))
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl SubmissionGateway for HttpSubmissionGateway {
    async fn submit(
        &self,
        payload: &ApplicationPayload,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        debug!(endpoint = %self.endpoint, application_type = payload.application_type.label(), "posting application");
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await?;

        read_lenient::<SubmissionReceipt>(response)
            .await?
            .map_err(|rejection| SubmissionError::Rejected {
                status: rejection.status.as_u16(),
                message: rejection.message,
            })
    }
}

/// Careers intake: validates a form, sends it, and reports the outcome.
pub struct ApplicationDesk<G, N> {
    gateway: Arc<G>,
    notifier: Arc<N>,
}

impl<G, N> ApplicationDesk<G, N>
where
    G: SubmissionGateway + 'static,
    N: Notifier + 'static,
{
    pub fn new(gateway: Arc<G>, notifier: Arc<N>) -> Self {
        Self { gateway, notifier }
    }

    /// Submit the current draft of `form`.
    ///
    /// Fields are reset only on success. The form stays locked while the request is outstanding.
    pub async fn submit(
        &self,
        form: &FormSlot<ApplicationFields>,
        application_type: ApplicationType,
    ) -> Result<Confirmation, SubmissionError> {
        let Some(_submitting) = form.begin() else {
            return Err(SubmissionError::InFlight);
        };

        let payload = form.draft().validate(application_type)?;

        match self.gateway.submit(&payload).await {
            Ok(receipt) => {
                let confirmation = Confirmation {
                    email: payload.email,
                    application_type,
                    receipt,
                };
                info!(
                    application_type = application_type.label(),
                    application_id = ?confirmation.receipt.application_id,
                    "application submitted"
                );
                self.notifier.notify(confirmation.notification());
                form.reset();
                Ok(confirmation)
            }
            Err(err) => {
                warn!(application_type = application_type.label(), error = %err, "application submission failed");
                if let Some(notification) = err.notification() {
                    self.notifier.notify(notification);
                }
                Err(err)
            }
        }
    }
}
