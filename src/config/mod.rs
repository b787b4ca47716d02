use serde::Deserialize;

pub const DEFAULT_PROMPT: &str = "Concisely name the key object in this image. Then generate a clean isolated image of that object on a white background, product photography style shot.";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000")
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Gemini API key
    pub gemini_api_key: String,

    /// Gemini model used for every generation
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Gemini REST base URL (without the `/models/...` suffix)
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// Upper bound on generations in flight at once
    #[serde(default = "default_max_concurrent_generations")]
    pub max_concurrent_generations: usize,

    /// Request body limit in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Prompt used for the first generation of every new job
    #[serde(default = "default_prompt")]
    pub default_prompt: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash-image-preview".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_max_concurrent_generations() -> usize {
    crate::services::gate::MAX_CONCURRENT
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}
