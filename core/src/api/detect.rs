use serde::{Deserialize, Serialize};

/// Body of `POST /detect`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectRequest {
    pub image_url: String,
}

impl DetectRequest {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
        }
    }
}

/// Classifier output; either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "type", default)]
    pub category: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Reply of `POST /detect`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectResponse {
    #[serde(default)]
    pub prediction: Option<Prediction>,
    #[serde(default)]
    pub inserted_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
