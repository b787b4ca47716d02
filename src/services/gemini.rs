use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::job::ImagePayload;
use crate::services::generator::{GenerationError, ImageGenerator};

/// Client for the Gemini `generateContent` endpoint with image output.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    InlineData { inline_data: InlineData },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseModalities")]
    response_modalities: Vec<&'static str>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(rename = "inlineData", alias = "inline_data")]
    inline_data: Option<ResponseInlineData>,
}

#[derive(Deserialize)]
struct ResponseInlineData {
    #[serde(rename = "mimeType", alias = "mime_type")]
    mime_type: String,
    data: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate(
        &self,
        source: &ImagePayload,
        prompt: &str,
    ) -> Result<ImagePayload, GenerationError> {
        let request = build_request(source, prompt);

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        extract_image(&body)
    }
}

fn build_request<'a>(source: &ImagePayload, prompt: &'a str) -> GenerateRequest<'a> {
    let data = base64::engine::general_purpose::STANDARD.encode(&source.data);
    GenerateRequest {
        contents: vec![Content {
            parts: vec![
                RequestPart::InlineData {
                    inline_data: InlineData {
                        mime_type: source.mime_type.clone(),
                        data,
                    },
                },
                RequestPart::Text { text: prompt },
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["IMAGE", "TEXT"],
        },
    }
}

/// Pull the first inline image out of the first candidate.
fn extract_image(body: &[u8]) -> Result<ImagePayload, GenerationError> {
    let response: GenerateResponse = serde_json::from_slice(body)?;
    let inline = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|content| content.parts.into_iter().find_map(|p| p.inline_data))
        .ok_or(GenerationError::NoImage)?;

    let bytes = base64::engine::general_purpose::STANDARD.decode(inline.data.as_bytes())?;
    Ok(ImagePayload::new(bytes, inline.mime_type))
}
