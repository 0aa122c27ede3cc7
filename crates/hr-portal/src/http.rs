use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub(crate) fn build_client(timeout: Option<Duration>) -> Result<Client, reqwest::Error> {
    let builder = Client::builder();
    let builder = match timeout {
        Some(timeout) => builder.timeout(timeout),
        None => builder,
    };
    builder.build()
}

/// `{ "error": "..." }` envelope both endpoints use for failures.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Outcome of reading a response that was not a 2xx.
#[derive(Debug)]
pub(crate) struct Rejection {
    pub(crate) status: StatusCode,
    pub(crate) message: Option<String>,
}

/// Split a response into its JSON body on success or a [`Rejection`].
///
/// Empty or unparsable success bodies fall back to `T::default()`; success is decided by status.
pub(crate) async fn read_lenient<T>(response: Response) -> Result<Result<T, Rejection>, reqwest::Error>
where
    T: DeserializeOwned + Default,
{
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        return Ok(Ok(serde_json::from_slice(&bytes).unwrap_or_default()));
    }

    Ok(Err(Rejection::from_body(status, &bytes)))
}

impl Rejection {
    pub(crate) fn from_body(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.trim().is_empty());
        Self { status, message }
    }
}
