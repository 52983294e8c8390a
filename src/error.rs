use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request to Gemini failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Gemini HTTP {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// The service answered without any usable text.
    #[error("Gemini returned no text ({reason})")]
    EmptyResponse { reason: String },

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("line editor failed: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e.without_url())
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported file type {0:?}, expected one of png, jpg, jpeg, img, webp")]
    UnsupportedExtension(String),

    #[error("failed to read image {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not detect the image format of {0}")]
    UnknownFormat(String),

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image as {format:?}: {source}")]
    Encode {
        format: image::ImageFormat,
        #[source]
        source: image::ImageError,
    },
}
