use crate::error::AcademyError;

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub api_url: String,
    pub text_model: String,
    pub video_model: String,
    pub tts_model: String,
    pub voice: String,
    pub env_var: &'static str,
    pub fallback_env_var: &'static str,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: GEMINI_API_URL.to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            video_model: "veo-3.1-fast-generate-preview".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            voice: "Kore".to_string(),
            env_var: "GEMINI_API_KEY",
            fallback_env_var: "API_KEY",
        }
    }
}

impl ProviderConfig {
    /// Validate that an API key is set for this provider
    pub fn validate_api_key(&self) -> Result<String, AcademyError> {
        std::env::var(self.env_var)
            .or_else(|_| std::env::var(self.fallback_env_var))
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AcademyError::MissingApiKey {
                env_var: self.env_var.to_string(),
                fallback_env_var: self.fallback_env_var.to_string(),
            })
    }
}
