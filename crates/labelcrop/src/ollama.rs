//! Ollama vision-model detector.
//!
//! Posts the page image to an Ollama `/api/chat` endpoint and asks for a JSON
//! answer. Only compiled with the `ollama` feature.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use labelcrop_core::PercentRect;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::detect::BoxDetector;
use crate::render::PageImage;

const BOX_PROMPT: &str = "This image is a page of a shipping document. Find the rectangle \
enclosing the main content worth keeping (the shipping label if there is one). Answer with \
JSON only: {\"x\": <left>, \"y\": <top>, \"width\": <width>, \"height\": <height>}, all in \
percent (0-100) of the image width and height, measured from the top-left corner.";

const SPLIT_PROMPT: &str = "This image is a page holding a shipping label above a tax \
invoice. Find the horizontal line separating them. Answer with JSON only: \
{\"anchor\": <percent>}, the line's distance from the top of the image in percent (0-100) of \
the image height.";

/// Connection settings for [`OllamaDetector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Server URL without a trailing slash.
    pub base_url: String,
    /// A vision-capable model.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llava".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Failure talking to the Ollama server.
#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("failed to reach Ollama at {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Ollama returned HTTP {status}: {message}")]
    Generation { status: u16, message: String },

    #[error("model '{model}' not found")]
    ModelNotFound { model: String },

    #[error("invalid response from Ollama: {source}")]
    InvalidResponse {
        #[source]
        source: serde_json::Error,
    },

    #[error("no JSON object in model answer: {0}")]
    NoJson(String),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    format: &'static str,
    options: ChatOptions,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct SplitAnswer {
    anchor: f64,
}

/// [`BoxDetector`] backed by an Ollama vision model.
pub struct OllamaDetector {
    client: reqwest::blocking::Client,
    config: OllamaConfig,
}

impl std::fmt::Debug for OllamaDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaDetector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OllamaDetector {
    /// Create a detector.
    ///
    /// # Errors
    ///
    /// Returns [`OllamaError::Connection`] if the HTTP client cannot be built.
    pub fn new(config: OllamaConfig) -> Result<Self, OllamaError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OllamaError::Connection {
                url: config.base_url.clone(),
                source: e,
            })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// Ask the model about `image` and return the raw answer text.
    fn ask(&self, prompt: &str, image: &PageImage) -> Result<String, OllamaError> {
        let url = format!("{}/api/chat", self.config.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
                images: Some(vec![STANDARD.encode(&image.bytes)]),
            }],
            stream: false,
            format: "json",
            options: ChatOptions { temperature: 0.0 },
        };

        debug!(model = %self.config.model, image_bytes = image.bytes.len(), "querying Ollama");
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| OllamaError::Connection {
                url: url.clone(),
                source: e,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().unwrap_or_default();
            if message.contains("model") && message.contains("not found") {
                return Err(OllamaError::ModelNotFound {
                    model: self.config.model.clone(),
                });
            }
            return Err(OllamaError::Generation { status, message });
        }

        let body = response.text().map_err(|e| OllamaError::Connection {
            url: url.clone(),
            source: e,
        })?;
        let chat: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| OllamaError::InvalidResponse { source: e })?;
        Ok(chat.message.content)
    }

    fn query_box(&self, image: &PageImage) -> Result<PercentRect, OllamaError> {
        let answer = self.ask(BOX_PROMPT, image)?;
        parse_answer(&answer)
    }

    fn query_split(&self, image: &PageImage) -> Result<f64, OllamaError> {
        let answer = self.ask(SPLIT_PROMPT, image)?;
        parse_answer::<SplitAnswer>(&answer).map(|a| a.anchor)
    }
}

/// Parse the first JSON object in a model answer, tolerating code fences
/// and surrounding prose.
fn parse_answer<T: serde::de::DeserializeOwned>(answer: &str) -> Result<T, OllamaError> {
    let start = answer.find('{');
    let end = answer.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &answer[s..=e],
        _ => return Err(OllamaError::NoJson(answer.chars().take(200).collect())),
    };
    serde_json::from_str(json).map_err(|e| OllamaError::InvalidResponse { source: e })
}

fn valid_percent_rect(r: &PercentRect) -> bool {
    let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);
    in_range(r.x) && in_range(r.y) && in_range(r.width) && in_range(r.height)
        && r.width > 0.0
        && r.height > 0.0
}

impl BoxDetector for OllamaDetector {
    fn detect_box(&self, image: &PageImage) -> Option<PercentRect> {
        match self.query_box(image) {
            Ok(rect) if valid_percent_rect(&rect) => Some(rect),
            Ok(rect) => {
                warn!(?rect, "Ollama proposed an out-of-range box");
                None
            }
            Err(e) => {
                warn!(error = %e, "Ollama box detection failed");
                None
            }
        }
    }

    fn detect_split(&self, image: &PageImage) -> Option<f64> {
        match self.query_split(image) {
            Ok(anchor) if anchor.is_finite() && anchor > 0.0 && anchor < 100.0 => Some(anchor),
            Ok(anchor) => {
                warn!(anchor, "Ollama proposed an out-of-range split");
                None
            }
            Err(e) => {
                warn!(error = %e, "Ollama split detection failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_json() {
        let r: PercentRect =
            parse_answer(r#"{"x": 5, "y": 10, "width": 90, "height": 45.5}"#).unwrap();
        assert_eq!(r, PercentRect::new(5.0, 10.0, 90.0, 45.5));
    }

    #[test]
    fn parse_fenced_json_with_prose() {
        let answer = "Sure! Here it is:\n```json\n{\"anchor\": 58.5}\n```";
        let a: SplitAnswer = parse_answer(answer).unwrap();
        assert_eq!(a.anchor, 58.5);
    }

    #[test]
    fn parse_without_json_fails() {
        let err = parse_answer::<SplitAnswer>("I cannot see a label.").unwrap_err();
        assert!(matches!(err, OllamaError::NoJson(_)));
    }

    #[test]
    fn parse_wrong_shape_fails() {
        let err = parse_answer::<SplitAnswer>(r#"{"line": 40}"#).unwrap_err();
        assert!(matches!(err, OllamaError::InvalidResponse { .. }));
    }

    #[test]
    fn percent_rect_validation() {
        assert!(valid_percent_rect(&PercentRect::new(0.0, 0.0, 100.0, 100.0)));
        assert!(!valid_percent_rect(&PercentRect::new(0.0, 0.0, 0.0, 50.0)));
        assert!(!valid_percent_rect(&PercentRect::new(-1.0, 0.0, 10.0, 50.0)));
        assert!(!valid_percent_rect(&PercentRect::new(0.0, 0.0, 10.0, f64::NAN)));
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg: OllamaConfig = serde_json::from_str(r#"{"model": "qwen2.5vl"}"#).unwrap();
        assert_eq!(cfg.model, "qwen2.5vl");
        assert_eq!(cfg.base_url, "http://localhost:11434");
        assert_eq!(cfg.timeout_secs, 120);
    }

    #[test]
    fn unreachable_server_yields_none() {
        let detector = OllamaDetector::new(OllamaConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..OllamaConfig::default()
        })
        .unwrap();
        let image = PageImage::png(vec![0x89, b'P', b'N', b'G']);
        assert_eq!(detector.detect_box(&image), None);
        assert_eq!(detector.detect_split(&image), None);
    }
}
