use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::gemini::{Content, ContentGenerator, Part};
use crate::upload::UploadedImage;

/// Why a vision submission never reached the service.
///
/// Both variants render the same message: an image with an empty prompt is
/// reported as a missing image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Please upload an image")]
    MissingImage,
    #[error("Please upload an image")]
    EmptyPrompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Response(String),
    Rejected(Rejection),
}

/// Which model family a submission goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Text,
    Vision,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Text => f.write_str("Gemini Pro"),
            Mode::Vision => f.write_str("Gemini Pro Vision"),
        }
    }
}

/// Turns user input into service calls.
pub struct Explorer<G> {
    generator: G,
    text_model: String,
    vision_model: String,
}

impl<G: ContentGenerator> Explorer<G> {
    pub fn new(generator: G, config: &Config) -> Self {
        Self {
            generator,
            text_model: config.text_model.clone(),
            vision_model: config.vision_model.clone(),
        }
    }

    /// Sends `prompt` as-is, empty or not, and returns the model's text untouched.
    pub async fn submit_text(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.text_model, "text submission");
        self.generator
            .generate_content(&self.text_model, Content::text(prompt))
            .await
    }

    pub async fn submit_vision(
        &self,
        prompt: &str,
        image: Option<&UploadedImage>,
    ) -> Result<Outcome> {
        let Some(image) = image else {
            return Ok(Outcome::Rejected(Rejection::MissingImage));
        };
        if prompt.is_empty() {
            return Ok(Outcome::Rejected(Rejection::EmptyPrompt));
        }

        debug!(model = %self.vision_model, image = image.name(), "vision submission");
        let content = Content::user(vec![Part::text(prompt), Part::inline(image.to_blob()?)]);
        let text = self
            .generator
            .generate_content(&self.vision_model, content)
            .await?;
        Ok(Outcome::Response(text))
    }

    /// Dispatches on `mode`. Text mode ignores `image`.
    pub async fn submit(
        &self,
        mode: Mode,
        prompt: &str,
        image: Option<&UploadedImage>,
    ) -> Result<Outcome> {
        match mode {
            Mode::Text => self.submit_text(prompt).await.map(Outcome::Response),
            Mode::Vision => self.submit_vision(prompt, image).await,
        }
    }
}
