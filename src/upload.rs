// Upload requests: a paste name and format taken from a file name, plus the
// raw bytes to send. Content is never decoded, so any encoding uploads as-is.

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::config::Config;
use crate::error::{PastebinError, Result};
use crate::paste::Visibility;

/// Everything the create call needs, derived from a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// File name without its extension; also used to find older copies.
    pub name: String,
    /// Lowercased extension, sent as the syntax-highlighting format.
    pub format: String,
    pub content: Vec<u8>,
    pub visibility: Visibility,
    pub expiration: String,
}

impl UploadRequest {
    pub fn from_path(path: &Path, config: &Config) -> Result<Self> {
        let (name, format) = split_file_name(path)?;
        let content = fs::read(path)?;
        Ok(Self::with_defaults(name, format, content, config))
    }

    /// Read the content from `reader` (piped stdin), naming the paste after
    /// `file_name` as if it had been read from that file.
    pub fn from_reader<R: Read>(file_name: &str, mut reader: R, config: &Config) -> Result<Self> {
        let (name, format) = split_file_name(Path::new(file_name))?;
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        Ok(Self::with_defaults(name, format, content, config))
    }

    fn with_defaults(name: String, format: String, content: Vec<u8>, config: &Config) -> Self {
        UploadRequest {
            name,
            format,
            content,
            visibility: config.visibility,
            expiration: config.expiration.clone(),
        }
    }
}

/// Split the base file name on its last `.` into `(name, format)`.
pub fn split_file_name(path: &Path) -> Result<(String, String)> {
    let wrong = || PastebinError::Configuration(format!("wrong filename: {}", path.display()));

    let file_name = path.file_name().and_then(|s| s.to_str()).ok_or_else(wrong)?;
    match file_name.rsplit_once('.') {
        Some((name, ext)) if !name.is_empty() && !ext.is_empty() => {
            Ok((name.to_string(), ext.to_lowercase()))
        }
        _ => Err(wrong()),
    }
}
