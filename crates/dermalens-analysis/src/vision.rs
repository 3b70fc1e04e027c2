//! Vision-model collaborator.
//!
//! The analysis pipeline consumes "submit image + context, receive raw
//! text" from an external vision-capable model. [`VisionModel`] is the
//! seam; [`OpenAiVision`] is the production implementation, speaking the
//! OpenAI-compatible chat-completions protocol with the image attached as
//! a base64 data URI.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::json;

use crate::error::AnalysisError;

/// System prompt requesting the structured reply shape.
///
/// The model is asked for JSON but replies are not contractually
/// structured; the normalizer absorbs whatever comes back.
const SYSTEM_PROMPT: &str = "You are a dermatologist specialized in analyzing skin conditions. \
Analyze the skin image and provide a detailed assessment in a structured format. \
Your response must be a JSON object with the following structure: \
{\
  \"condition\": \"main condition identified\",\
  \"severity\": \"Mild/Moderate/Severe\",\
  \"description\": \"detailed description of the condition\",\
  \"recommendations\": [\"recommendation 1\", \"recommendation 2\", \"recommendation 3\"]\
}\
Be thorough but clear. Include specific treatment recommendations.";

/// An uploaded image encoded for the model request.
#[derive(Debug, Clone)]
pub struct ImageData {
    data_uri: String,
}

impl ImageData {
    /// Encodes raw image bytes as a base64 data URI.
    #[must_use]
    pub fn new(bytes: &[u8], content_type: &str) -> Self {
        Self {
            data_uri: format!("data:{};base64,{}", content_type, STANDARD.encode(bytes)),
        }
    }

    /// Encodes JPEG bytes, the upload format the service receives.
    #[must_use]
    pub fn from_jpeg(bytes: &[u8]) -> Self {
        Self::new(bytes, "image/jpeg")
    }

    /// Returns the full data URI.
    #[must_use]
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }
}

/// Optional patient context accompanying an upload.
#[derive(Debug, Clone, Default)]
pub struct PatientContext {
    /// Patient name.
    pub name: Option<String>,
    /// How long symptoms have been present.
    pub duration: Option<String>,
    /// Free-text symptom description.
    pub symptoms: Option<String>,
}

impl PatientContext {
    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.duration.is_none() && self.symptoms.is_none()
    }

    /// Renders the context block appended to the user prompt.
    fn render(&self) -> String {
        let field = |v: &Option<String>| {
            v.as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or("Not provided")
                .to_string()
        };
        format!(
            "\nPatient Information:\n- Name: {}\n- Symptoms Duration: {}\n- Symptoms Description: {}\n",
            field(&self.name),
            field(&self.duration),
            field(&self.symptoms),
        )
    }
}

/// External capability that turns an image + prompt into raw text.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Submits the image and optional context; returns the raw reply text.
    ///
    /// Single-shot request/response: no retry, no streaming, no
    /// cancellation.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Upstream` if the call cannot be made or the
    /// reply carries no usable text.
    async fn describe_image(
        &self,
        image: &ImageData,
        context: Option<&PatientContext>,
    ) -> Result<String, AnalysisError>;
}

/// Configuration for the OpenAI-compatible vision client.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Model name, e.g. `gpt-4o`.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl VisionConfig {
    /// Creates a config with the standard endpoint and model defaults.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            timeout_secs: 60,
        }
    }
}

/// OpenAI-compatible chat-completions vision client.
pub struct OpenAiVision {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiVision {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Configuration` if the HTTP client cannot be
    /// built.
    pub fn new(config: VisionConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalysisError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            model: config.model,
        })
    }
}

#[async_trait]
impl VisionModel for OpenAiVision {
    async fn describe_image(
        &self,
        image: &ImageData,
        context: Option<&PatientContext>,
    ) -> Result<String, AnalysisError> {
        let patient_block = context.map(PatientContext::render).unwrap_or_default();
        let user_text = format!(
            "Please analyze this skin image and provide a detailed assessment.{patient_block}"
        );

        let body = json!({
            "model": self.model,
            "max_tokens": 2000,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": user_text },
                        { "type": "image_url", "image_url": { "url": image.data_uri() } }
                    ]
                }
            ]
        });

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::upstream(format!("model request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "vision model returned an error");
            return Err(AnalysisError::upstream(format!(
                "model returned {status}: {detail}"
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| AnalysisError::upstream(format!("unreadable model reply: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| AnalysisError::upstream("model reply carried no text"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str) -> OpenAiVision {
        OpenAiVision::new(VisionConfig {
            api_key: "sk-test".to_string(),
            base_url: base_url.to_string(),
            model: "gpt-4o".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn completion_body(content: &str) -> serde_json::Value {
        json!({
            "choices": [ { "message": { "role": "assistant", "content": content } } ]
        })
    }

    #[test]
    fn test_image_data_uri_format() {
        let image = ImageData::from_jpeg(&[0xFF, 0xD8, 0xFF]);
        assert!(image.data_uri().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_patient_context_render_fills_missing_fields() {
        let context = PatientContext {
            name: Some("Jo".to_string()),
            duration: None,
            symptoms: Some("  ".to_string()),
        };

        let rendered = context.render();
        assert!(rendered.contains("- Name: Jo"));
        assert!(rendered.contains("- Symptoms Duration: Not provided"));
        assert!(rendered.contains("- Symptoms Description: Not provided"));
    }

    #[tokio::test]
    async fn test_describe_image_returns_reply_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({ "model": "gpt-4o" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("mild eczema")))
            .mount(&server)
            .await;

        let reply = client(&server.uri())
            .describe_image(&ImageData::from_jpeg(b"fakejpeg"), None)
            .await
            .unwrap();
        assert_eq!(reply, "mild eczema");
    }

    #[tokio::test]
    async fn test_patient_context_reaches_the_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let context = PatientContext {
            name: Some("Jo".to_string()),
            duration: Some("2 weeks".to_string()),
            symptoms: Some("itching".to_string()),
        };
        client(&server.uri())
            .describe_image(&ImageData::from_jpeg(b"fakejpeg"), Some(&context))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let text = body["messages"][1]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("2 weeks"));
        assert!(text.contains("itching"));
    }

    #[tokio::test]
    async fn test_http_error_surfaces_as_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .describe_image(&ImageData::from_jpeg(b"fakejpeg"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Upstream { .. }));
    }

    #[tokio::test]
    async fn test_empty_reply_surfaces_as_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("   ")))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .describe_image(&ImageData::from_jpeg(b"fakejpeg"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Upstream { .. }));
    }
}
