use crate::api::DetectResponse;
use crate::feed::{format_confidence, FeedRenderer};
use crate::prelude::{DisasterApi, LogicalError, TransportError, TransportResult};
use crate::telemetry::{LogManager, MetricsRecorder};
use log::{error, warn};
use std::sync::Arc;

pub const EMPTY_INPUT_PROMPT: &str = "Please enter an image URL";
const NOT_AVAILABLE: &str = "N/A";

/// Display-ready classification result.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: String,
    pub confidence: String,
    pub image_url: String,
    pub inserted_id: Option<String>,
}

/// What the results panel shows after one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Blank input, nothing was sent.
    Rejected { prompt: String },
    Classified(Classification),
    /// The backend answered with an `error` field.
    Failed(LogicalError),
    RequestFailed(TransportError),
}

impl SubmissionOutcome {
    /// Only a successful classification can have persisted a new record.
    pub fn triggers_refresh(&self) -> bool {
        matches!(self, SubmissionOutcome::Classified(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            SubmissionOutcome::Failed(_) | SubmissionOutcome::RequestFailed(_)
        )
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            SubmissionOutcome::Rejected { prompt } => vec![prompt.clone()],
            SubmissionOutcome::Classified(result) => {
                let mut lines = vec![
                    format!("Type: {}", result.category),
                    format!("Confidence: {}", result.confidence),
                    format!("Image: {}", result.image_url),
                ];
                if let Some(id) = &result.inserted_id {
                    lines.push(format!("Record ID: {id}"));
                }
                lines
            }
            SubmissionOutcome::Failed(err) => vec![format!("Error: {err}")],
            SubmissionOutcome::RequestFailed(err) => vec![format!("Request failed: {err}")],
        }
    }
}

/// Sends one image URL for classification and shapes the reply for display.
pub struct SubmissionHelper {
    logger: LogManager,
    metrics: Arc<MetricsRecorder>,
}

impl SubmissionHelper {
    pub fn new(metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            logger: LogManager::new(),
            metrics,
        }
    }

    /// Trims the input; blank input never reaches the network.
    pub fn prepare(&self, input: &str) -> Result<String, SubmissionOutcome> {
        let image_url = input.trim();
        if image_url.is_empty() {
            self.metrics.record_rejected_input();
            return Err(SubmissionOutcome::Rejected {
                prompt: EMPTY_INPUT_PROMPT.to_string(),
            });
        }
        self.metrics.record_submission();
        Ok(image_url.to_string())
    }

    pub fn interpret(
        &self,
        image_url: String,
        reply: TransportResult<DetectResponse>,
    ) -> SubmissionOutcome {
        let response = match reply {
            Ok(response) => response,
            Err(err) => {
                error!("classification request failed: {}", err);
                return SubmissionOutcome::RequestFailed(err);
            }
        };

        if let Some(message) = response.error.filter(|message| !message.is_empty()) {
            warn!("backend rejected {}: {}", image_url, message);
            return SubmissionOutcome::Failed(LogicalError(message));
        }

        let prediction = response.prediction.unwrap_or_default();
        let classification = Classification {
            category: prediction
                .category
                .filter(|category| !category.is_empty())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            confidence: prediction
                .confidence
                .map(format_confidence)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            image_url,
            inserted_id: response.inserted_id.filter(|id| !id.is_empty()),
        };
        self.logger.record(&format!(
            "classified {} as {} ({})",
            classification.image_url, classification.category, classification.confidence
        ));
        SubmissionOutcome::Classified(classification)
    }

    /// Full submission: validate, send, and refresh the feed on success.
    pub async fn submit(
        &self,
        api: &dyn DisasterApi,
        feed: &mut FeedRenderer,
        input: &str,
    ) -> SubmissionOutcome {
        let image_url = match self.prepare(input) {
            Ok(image_url) => image_url,
            Err(rejected) => return rejected,
        };
        let reply = api.classify(&image_url).await;
        let outcome = self.interpret(image_url, reply);
        if outcome.triggers_refresh() {
            feed.refresh(api).await;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Prediction;
    use crate::feed::{DisplayZone, LayerKind, TimestampFormatter};
    use crate::testing::{record, StubApi};

    fn setup() -> (SubmissionHelper, FeedRenderer) {
        let metrics = Arc::new(MetricsRecorder::new());
        (
            SubmissionHelper::new(metrics.clone()),
            FeedRenderer::with_metrics(TimestampFormatter::new(DisplayZone::Utc), metrics),
        )
    }

    fn prediction(category: Option<&str>, confidence: Option<f64>) -> Option<Prediction> {
        Some(Prediction {
            category: category.map(str::to_string),
            confidence,
        })
    }

    #[tokio::test]
    async fn blank_input_never_hits_the_network() {
        let api = StubApi::new(Ok(Vec::new()));
        let (helper, mut feed) = setup();

        for input in ["", "   ", "\t\n"] {
            let outcome = helper.submit(&api, &mut feed, input).await;
            assert_eq!(
                outcome,
                SubmissionOutcome::Rejected {
                    prompt: EMPTY_INPUT_PROMPT.into()
                }
            );
        }
        assert_eq!(api.classify_calls(), 0);
        assert_eq!(api.list_calls(), 0);
        assert_eq!(feed.metrics().snapshot().rejected_inputs, 3);
    }

    #[tokio::test]
    async fn success_refreshes_the_feed() {
        let api = StubApi::new(Ok(vec![record("flood", 78.6569, 22.9734, 0.95)])).with_detect(
            Ok(DetectResponse {
                prediction: prediction(Some("flood"), Some(0.95)),
                inserted_id: Some("65a1f0c2e4b0".into()),
                error: None,
            }),
        );
        let (helper, mut feed) = setup();

        let outcome = helper
            .submit(&api, &mut feed, "  https://example.com/flood.jpg ")
            .await;

        assert_eq!(api.last_image_url().as_deref(), Some("https://example.com/flood.jpg"));
        assert_eq!(
            outcome.lines(),
            vec![
                "Type: flood",
                "Confidence: 95.0%",
                "Image: https://example.com/flood.jpg",
                "Record ID: 65a1f0c2e4b0",
            ]
        );
        assert_eq!(api.list_calls(), 1);
        assert_eq!(feed.layers().get(LayerKind::Flood).len(), 1);
    }

    #[tokio::test]
    async fn missing_id_and_confidence_are_handled() {
        let api = StubApi::new(Ok(Vec::new())).with_detect(Ok(DetectResponse {
            prediction: prediction(Some("fire"), None),
            inserted_id: None,
            error: None,
        }));
        let (helper, mut feed) = setup();

        let outcome = helper.submit(&api, &mut feed, "https://example.com/x.jpg").await;

        match &outcome {
            SubmissionOutcome::Classified(result) => {
                assert_eq!(result.category, "fire");
                assert_eq!(result.confidence, "N/A");
                assert!(result.inserted_id.is_none());
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(!outcome.lines().iter().any(|line| line.starts_with("Record ID")));
    }

    #[tokio::test]
    async fn logical_error_suppresses_prediction_and_refresh() {
        let api = StubApi::new(Ok(Vec::new())).with_detect(Ok(DetectResponse {
            prediction: prediction(Some("flood"), Some(0.9)),
            inserted_id: None,
            error: Some("model unavailable".into()),
        }));
        let (helper, mut feed) = setup();

        let outcome = helper.submit(&api, &mut feed, "https://example.com/x.jpg").await;

        assert_eq!(outcome.lines(), vec!["Error: model unavailable"]);
        assert!(outcome.is_error());
        assert_eq!(api.list_calls(), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let api = StubApi::new(Ok(Vec::new()))
            .with_detect(Err(TransportError::Request("connection refused".into())));
        let (helper, mut feed) = setup();

        let outcome = helper.submit(&api, &mut feed, "https://example.com/x.jpg").await;

        assert_eq!(
            outcome.lines(),
            vec!["Request failed: network error: connection refused"]
        );
        assert_eq!(api.list_calls(), 0);
    }

    #[tokio::test]
    async fn empty_error_field_is_not_an_error() {
        let api = StubApi::new(Ok(vec![record("fire", 78.0, 22.0, 0.8)])).with_detect(Ok(
            DetectResponse {
                prediction: prediction(Some("fire"), Some(0.8)),
                inserted_id: None,
                error: Some(String::new()),
            },
        ));
        let (helper, mut feed) = setup();

        let outcome = helper.submit(&api, &mut feed, "https://example.com/x.jpg").await;

        assert!(outcome.triggers_refresh());
        assert!(!outcome.is_error());
        assert_eq!(outcome.lines()[0], "Type: fire");
        assert_eq!(api.list_calls(), 1);
    }

    #[test]
    fn absent_prediction_renders_not_available() {
        let (helper, _) = setup();
        let outcome = helper.interpret("https://example.com/x.jpg".into(), Ok(DetectResponse::default()));
        assert_eq!(
            outcome.lines()[..2],
            ["Type: N/A".to_string(), "Confidence: N/A".to_string()]
        );
    }
}
