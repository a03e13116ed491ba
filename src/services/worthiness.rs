//! Client for the external check-worthiness prediction service (§4.5).

use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Debug, Clone, PartialEq)]
pub struct WorthinessPrediction {
    pub sentence: String,
    pub label: String,
    pub confidence: f64,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    sentences: &'a [String],
}

#[derive(Deserialize, Default)]
struct PredictResponse {
    #[serde(default)]
    predicted_labels: Vec<String>,
    #[serde(default)]
    prediction_confidences: Vec<f64>,
}

/// Predicts check-worthiness for a batch of sentences. Empty input or any
/// transport/HTTP failure yields `[]` — callers treat that as "unknown
/// worthiness", never as a hard error.
pub async fn predict_worthiness(
    client: &reqwest::Client,
    cfg: &Config,
    sentences: &[String],
) -> Vec<WorthinessPrediction> {
    if sentences.is_empty() {
        return Vec::new();
    }
    let url = format!("{}/predict_worthiness", cfg.worthiness_service_url);
    let resp = match client.post(&url).json(&PredictRequest { sentences }).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("failed to predict check-worthiness: {e}");
            return Vec::new();
        }
    };
    if !resp.status().is_success() {
        tracing::error!("failed to predict check-worthiness: status {}", resp.status());
        return Vec::new();
    }
    let body: PredictResponse = match resp.json().await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!("failed to parse check-worthiness response: {e}");
            return Vec::new();
        }
    };
    sentences
        .iter()
        .zip(body.predicted_labels)
        .zip(body.prediction_confidences)
        .map(|((sentence, label), confidence)| WorthinessPrediction {
            sentence: sentence.clone(),
            label,
            confidence,
        })
        .collect()
}

/// `CFS` ("check-worthy factual statement") maps to `worthy`, everything
/// else (including an absent/unrecognised label) maps to `unworthy`.
pub fn worth_val(label: &str) -> &'static str {
    if label == "CFS" { "worthy" } else { "unworthy" }
}
