//! Gemini REST client implementing the classifier contract.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use campus_core::{Classification, Classify};

/// Model used for classification.
const MODEL: &str = "gemini-2.0-flash";

/// Default API base URL (overridable for tests).
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Bound on the classifier round-trip. The store-side timeouts are ~2 s;
/// the model call is allowed longer but must not hang a request forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Instruction pinning the model to the raw-JSON contract.
const SYSTEM_MESSAGE: &str = r#"Return ONLY raw JSON: {"category": "string", "priority": "string", "is_spam": boolean, "spam_reason": "string or null"}. No markdown, no talk. Categories: Electrical, Plumbing, Safety, Maintenance, Other. Priorities: Low, Medium, High, Critical. Set is_spam to true only for reports that are clearly not genuine maintenance issues, and give a short spam_reason in that case."#;

/// Errors internal to the Gemini call. These never leave [`classify`];
/// they are logged and collapsed into the default classification.
#[derive(Debug, thiserror::Error)]
enum GeminiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gemini returned a non-2xx status code.
    #[error("Gemini API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response JSON did not contain the expected candidate text.
    #[error("Gemini response missing candidate text")]
    MalformedResponse,
}

/// HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiClassifier {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiClassifier {
    /// Create a classifier. With no API key, [`Classify::classify`] returns
    /// the safe default immediately and never touches the network.
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        GeminiClassifier {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different base URL (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether an API key is configured.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the `parts` array for the request body.
    ///
    /// An image that is not valid base64 is dropped with a warning and
    /// classification proceeds on text alone.
    fn build_parts(description: &str, image_base64: Option<&str>) -> Vec<serde_json::Value> {
        let mut parts = vec![
            serde_json::json!({ "text": SYSTEM_MESSAGE }),
            serde_json::json!({
                "text": format!("Analyze this campus issue and categorize it. Description: {description}")
            }),
        ];

        if let Some(image) = image_base64 {
            match base64::engine::general_purpose::STANDARD.decode(image) {
                Ok(_) => parts.push(serde_json::json!({
                    "inline_data": { "mime_type": "image/jpeg", "data": image }
                })),
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid image payload, classifying text only");
                }
            }
        }

        parts
    }

    async fn request(&self, api_key: &str, parts: Vec<serde_json::Value>) -> Result<String, GeminiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, MODEL, api_key
        );
        let body = serde_json::json!({ "contents": [{ "parts": parts }] });

        let response = self.client.post(url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response.json().await?;
        json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or(GeminiError::MalformedResponse)
    }
}

#[async_trait]
impl Classify for GeminiClassifier {
    async fn classify(&self, description: &str, image_base64: Option<&str>) -> Classification {
        let Some(api_key) = self.api_key.clone() else {
            tracing::debug!("No classifier API key configured, using defaults");
            return Classification::default();
        };

        let parts = Self::build_parts(description, image_base64);
        match self.request(&api_key, parts).await {
            Ok(text) => Classification::parse_response(&text),
            Err(e) => {
                tracing::error!(error = %e, "Classification failed, using defaults");
                Classification::default()
            }
        }
    }
}
