use clap::Args;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-pro";
pub const DEFAULT_VISION_MODEL: &str = "gemini-pro-vision";

/// Settings read once at startup and handed to the client and handler.
///
/// A missing API key is not an error here; the service rejects the request
/// and that failure surfaces from the call itself.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct Config {
    /// Google AI Studio API key
    #[arg(
        long,
        env = "GOOGLE_API_KEY",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true,
        global = true
    )]
    pub api_key: String,

    /// Base URL of the Generative Language API
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Model used for plain-text prompts
    #[arg(long, env = "GEMINI_TEXT_MODEL", default_value = DEFAULT_TEXT_MODEL, global = true)]
    pub text_model: String,

    /// Model used for image + prompt requests
    #[arg(long, env = "GEMINI_VISION_MODEL", default_value = DEFAULT_VISION_MODEL, global = true)]
    pub vision_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
        }
    }
}
