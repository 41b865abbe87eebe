use crate::api::{DetectRequest, DetectResponse, DisasterRecord};
use crate::prelude::{DisasterApi, TransportError, TransportResult};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode, Url};

const LIST_PATH: &str = "api/disasters";
const DETECT_PATH: &str = "detect";

/// `reqwest`-backed client for the dashboard's two backend endpoints.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> TransportResult<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| TransportError::Request(format!("invalid backend url {base_url}: {e}")))?;
        // join() drops the last path segment unless it ends with a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .user_agent(concat!("disaster-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(request_error)?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> TransportResult<Url> {
        self.base
            .join(path)
            .map_err(|e| TransportError::Request(format!("invalid endpoint {path}: {e}")))
    }
}

fn request_error(err: reqwest::Error) -> TransportError {
    TransportError::Request(err.to_string())
}

#[async_trait]
impl DisasterApi for HttpBackend {
    async fn list_disasters(&self) -> TransportResult<Vec<DisasterRecord>> {
        let url = self.endpoint(LIST_PATH)?;
        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        let body = response.bytes().await.map_err(request_error)?;
        debug!("listing endpoint returned {} bytes", body.len());
        serde_json::from_slice(&body).map_err(|e| TransportError::Malformed(e.to_string()))
    }

    async fn classify(&self, image_url: &str) -> TransportResult<DetectResponse> {
        let url = self.endpoint(DETECT_PATH)?;
        let response = self
            .client
            .post(url)
            .json(&DetectRequest::new(image_url))
            .send()
            .await
            .map_err(request_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(request_error)?;
        interpret_detect_reply(status, &body)
    }
}

/// The backend answers rejected submissions with a 4xx/5xx *and* an `error`
/// body; those are logical failures, not transport ones.
fn interpret_detect_reply(status: StatusCode, body: &[u8]) -> TransportResult<DetectResponse> {
    match serde_json::from_slice::<DetectResponse>(body) {
        Ok(parsed) if status.is_success() || has_error_message(&parsed) => Ok(parsed),
        Ok(_) => Err(TransportError::Status(status.as_u16())),
        Err(err) if status.is_success() => Err(TransportError::Malformed(err.to_string())),
        Err(_) => Err(TransportError::Status(status.as_u16())),
    }
}

fn has_error_message(reply: &DetectResponse) -> bool {
    reply
        .error
        .as_deref()
        .is_some_and(|message| !message.is_empty())
}
