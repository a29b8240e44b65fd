use std::fmt;

use crate::state::SelectedImage;

/// Client-side constraints for uploaded images, checked before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_bytes: u64,
    pub allowed_mime_types: Vec<String>,
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            allowed_mime_types: vec![
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            allowed_extensions: vec![
                ".jpg".to_string(),
                ".jpeg".to_string(),
                ".png".to_string(),
                ".webp".to_string(),
            ],
        }
    }
}

impl UploadLimits {
    pub fn validate(&self, image: &SelectedImage) -> Result<(), UploadError> {
        if !self.is_mime_allowed(&image.mime) {
            return Err(UploadError::UnsupportedType {
                mime: image.mime.clone(),
            });
        }
        let actual = image.bytes.len() as u64;
        if actual > self.max_bytes {
            return Err(UploadError::TooLarge {
                max_bytes: self.max_bytes,
                actual,
            });
        }
        Ok(())
    }

    fn is_mime_allowed(&self, mime: &str) -> bool {
        let mime = mime.split(';').next().unwrap_or(mime).trim();
        self.allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    UnsupportedType { mime: String },
    TooLarge { max_bytes: u64, actual: u64 },
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::UnsupportedType { mime } => {
                write!(
                    f,
                    "unsupported file format {mime}, please use a JPG, PNG or WebP image"
                )
            }
            UploadError::TooLarge { max_bytes, .. } => {
                write!(
                    f,
                    "file too large, please use an image under {}",
                    format_file_size(*max_bytes)
                )
            }
        }
    }
}

/// A catalog template offered by the service, keyed by its symbolic id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub image: &'static str,
}

/// The fixed template catalog; ids and display names match the service assets.
pub const TEMPLATE_CATALOG: [TemplateSpec; 6] = [
    TemplateSpec {
        id: "1",
        name: "模板 1",
        description: "專業商務風格",
        image: "assets/images/templates/step01.jpg",
    },
    TemplateSpec {
        id: "2",
        name: "模板 2",
        description: "時尚潮流風格",
        image: "assets/images/templates/step02.jpg",
    },
    TemplateSpec {
        id: "3",
        name: "模板 3",
        description: "輕鬆休閒風格",
        image: "assets/images/templates/step03.jpg",
    },
    TemplateSpec {
        id: "4",
        name: "模板 4",
        description: "優雅知性風格",
        image: "assets/images/templates/step04.jpg",
    },
    TemplateSpec {
        id: "5",
        name: "模板 5",
        description: "活力運動風格",
        image: "assets/images/templates/step05.jpg",
    },
    TemplateSpec {
        id: "6",
        name: "模板 6",
        description: "青春學院風格",
        image: "assets/images/templates/step06.jpg",
    },
];

/// Looks up the display name of a catalog template.
pub fn template_name(id: &str) -> Option<&'static str> {
    TEMPLATE_CATALOG
        .iter()
        .find(|template| template.id == id)
        .map(|template| template.name)
}

/// Guesses the MIME type from a file name extension.
pub fn guess_mime(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext)?;
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Formats a byte count for human display, e.g. `10 MB` or `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let value = format!("{value:.2}");
    let value = value.trim_end_matches('0').trim_end_matches('.');
    format!("{value} {}", UNITS[exponent])
}
