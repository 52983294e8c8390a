use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::info;

use crate::error::UploadError;
use crate::gemini::Blob;

/// File extensions the uploader accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "img", "webp"];

/// Every inline image is tagged with this type, whatever its container.
pub const INLINE_MIME_TYPE: &str = "image/jpeg";

/// An image picked by the user, decoded once and kept in memory.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    name: String,
    format: ImageFormat,
    image: DynamicImage,
}

impl UploadedImage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        check_extension(&name)?;

        let bytes = std::fs::read(path).map_err(|source| UploadError::Read {
            name: name.clone(),
            source,
        })?;
        Self::from_bytes(name, &bytes)
    }

    /// Decodes an upload held in memory. The container format is detected
    /// from the content; `name` only gates the extension filter.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self, UploadError> {
        let name = name.into();
        check_extension(&name)?;

        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|source| UploadError::Read {
                name: name.clone(),
                source,
            })?;
        let format = reader
            .format()
            .ok_or_else(|| UploadError::UnknownFormat(name.clone()))?;
        let image = reader.decode().map_err(UploadError::Decode)?;

        info!(
            name = %name,
            format = ?format,
            width = image.width(),
            height = image.height(),
            "image loaded"
        );

        Ok(Self {
            name,
            format,
            image,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Re-encodes the image in the container format it was uploaded in.
    pub fn to_bytes(&self) -> Result<Vec<u8>, UploadError> {
        let mut buf = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, self.format)
            .map_err(|source| UploadError::Encode {
                format: self.format,
                source,
            })?;
        Ok(buf.into_inner())
    }

    pub fn to_blob(&self) -> Result<Blob, UploadError> {
        Ok(Blob {
            mime_type: INLINE_MIME_TYPE.to_string(),
            data: self.to_bytes()?,
        })
    }
}

fn check_extension(name: &str) -> Result<(), UploadError> {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(UploadError::UnsupportedExtension(ext))
    }
}
