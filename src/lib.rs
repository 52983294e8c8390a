pub mod about;
pub mod config;
pub mod error;
pub mod gemini;
pub mod handler;
pub mod session;
pub mod upload;

pub use config::Config;
pub use error::{Error, Result, UploadError};
pub use gemini::{Blob, Content, ContentGenerator, GeminiClient, Part};
pub use handler::{Explorer, Mode, Outcome, Rejection};
pub use upload::UploadedImage;
