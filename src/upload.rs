use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

use crate::error::{Error, Result};

/// An image selected by the user, kept in its original encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    bytes: Vec<u8>,
    format: ImageFormat,
    width: u32,
    height: u32,
    name: Option<String>,
}

impl UploadedImage {
    /// Validate raw bytes from the file picker.
    ///
    /// `declared_mime` is the media type reported alongside the file, if any.
    /// Anything that is not `image/*`, is empty, or does not decode as an
    /// image is rejected with [`Error::Input`]. There is no size limit.
    pub fn from_bytes(bytes: Vec<u8>, declared_mime: Option<&str>) -> Result<Self> {
        if let Some(mime) = declared_mime {
            if !mime.trim().to_ascii_lowercase().starts_with("image/") {
                return Err(Error::Input(format!(
                    "Please select an image file (got {})",
                    mime
                )));
            }
        }

        if bytes.is_empty() {
            return Err(Error::Input("Selected file is empty".to_string()));
        }

        let format = image::guess_format(&bytes)
            .map_err(|_| Error::Input("Please select an image file".to_string()))?;

        // Only the header is needed for the dimensions; the full decode happens at render time.
        let (width, height) = ImageReader::with_format(std::io::Cursor::new(&bytes), format)
            .into_dimensions()
            .map_err(|e| Error::Input(format!("Failed to read image: {}", e)))?;

        Ok(Self {
            bytes,
            format,
            width,
            height,
            name: None,
        })
    }

    /// Read and validate an image file from disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Reject by extension before touching the file, like the picker's `accept="image/*"`.
        let format = ImageFormat::from_path(path).map_err(|_| {
            Error::Input(format!("Please select an image file: {}", path.display()))
        })?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::Input(format!("Failed to read {}: {}", path.display(), e)))?;

        let mime = format.to_mime_type();
        let mut image = Self::from_bytes(bytes, Some(mime))?;
        image.name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string);
        Ok(image)
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Native pixel dimensions `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Decode the full image.
    pub fn decode(&self) -> Result<DynamicImage> {
        let img = image::load_from_memory_with_format(&self.bytes, self.format)?;
        debug_assert_eq!(img.dimensions(), (self.width, self.height));
        Ok(img)
    }
}
