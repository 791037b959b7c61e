//! Gemini REST implementation of [`GenerativeClient`].

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    client::{AudioClip, GenerativeClient, VideoOperation, VideoRequest},
    error::{AcademyError, Result},
    provider::ProviderConfig,
    wav::decode_base64_audio,
};

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    config: ProviderConfig,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, config: ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            config,
        }
    }

    /// Builds a client from the environment, failing when no key is configured.
    pub fn from_env(config: ProviderConfig) -> Result<Self> {
        let api_key = config.validate_api_key()?;
        Ok(Self::new(api_key, config))
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{model}:{method}?key={}",
            self.config.api_url, self.api_key
        )
    }

    async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(self.model_url(model, "generateContent"))
            .json(body)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json::<GenerateContentResponse>().await?)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
    Err(AcademyError::Provider { status, message })
}

/// Appends the API key to a download URI that may already carry a query string.
pub fn with_api_key(uri: &str, api_key: &str) -> String {
    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{uri}{separator}key={api_key}")
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest::user(vec![Part::Text {
            text: prompt.to_string(),
        }]);
        let response = self
            .generate_content(&self.config.text_model, &request)
            .await?;
        extract_text(response)
    }

    async fn generate_text_with_audio(
        &self,
        instruction: &str,
        clip: &AudioClip,
    ) -> Result<String> {
        let request = GenerateContentRequest::user(vec![
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: clip.mime_type.clone(),
                    data: BASE64_STANDARD.encode(&clip.bytes),
                },
            },
            Part::Text {
                text: instruction.to_string(),
            },
        ]);
        let response = self
            .generate_content(&self.config.text_model, &request)
            .await?;
        extract_text(response)
    }

    async fn start_video(&self, prompt: &str, request: &VideoRequest) -> Result<VideoOperation> {
        let response = self
            .client
            .post(self.model_url(&self.config.video_model, "predictLongRunning"))
            .json(&serde_json::json!({
                "instances": [{ "prompt": prompt }],
                "parameters": {
                    "aspectRatio": request.aspect_ratio,
                    "resolution": request.resolution,
                },
            }))
            .send()
            .await?;
        let value = check_status(response)
            .await?
            .json::<serde_json::Value>()
            .await?;
        parse_operation(&value)
    }

    async fn poll_video(&self, operation: &VideoOperation) -> Result<VideoOperation> {
        let url = format!(
            "{}/{}?key={}",
            self.config.api_url, operation.name, self.api_key
        );
        let value = check_status(self.client.get(url).send().await?)
            .await?
            .json::<serde_json::Value>()
            .await?;
        let refreshed = parse_operation(&value)?;
        debug!(operation = %refreshed.name, done = refreshed.done, "polled video operation");
        Ok(refreshed)
    }

    async fn download_video(&self, uri: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(with_api_key(uri, &self.api_key))
            .send()
            .await?;
        let bytes = check_status(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn synthesize_speech(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        let mut request = GenerateContentRequest::user(vec![Part::Text {
            text: text.to_string(),
        }]);
        request.generation_config = Some(GenerationConfig {
            response_modalities: vec!["AUDIO".to_string()],
            speech_config: SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: voice.to_string(),
                    },
                },
            },
        });

        let response = self
            .generate_content(&self.config.tts_model, &request)
            .await?;
        let data = response
            .candidates
            .into_iter()
            .flat_map(|c| c.content.parts)
            .find_map(|p| p.inline_data.map(|d| d.data))
            .ok_or_else(|| AcademyError::InvalidResponse {
                reason: "speech response carried no audio".to_string(),
            })?;
        decode_base64_audio(&data)
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    Ok(text.trim().to_string())
}

/// Reads an operation document (`name`, `done`, `error`, `response`).
pub fn parse_operation(value: &serde_json::Value) -> Result<VideoOperation> {
    let name = value["name"]
        .as_str()
        .ok_or_else(|| AcademyError::InvalidResponse {
            reason: format!("operation without name: {value}"),
        })?
        .to_string();

    let video_uri = value["response"]["generateVideoResponse"]["generatedSamples"][0]["video"]
        ["uri"]
        .as_str()
        .map(str::to_string);

    Ok(VideoOperation {
        name,
        done: value["done"].as_bool().unwrap_or(false),
        video_uri,
        error: value["error"]["message"].as_str().map(str::to_string),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    fn user(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            generation_config: None,
        }
    }
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
    speech_config: SpeechConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}
