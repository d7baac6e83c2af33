//! File picker validation

use super::IntakeError;
use crate::session::FileInfo;
use std::path::Path;

pub const ALLOWED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "application/pdf"];

/// 5 MiB
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Accept only the supported media types, up to `MAX_FILE_SIZE`
pub fn validate_file(file: FileInfo) -> Result<FileInfo, IntakeError> {
    if !ALLOWED_TYPES.contains(&file.media_type.as_str()) {
        return Err(IntakeError::UnsupportedType(file.media_type));
    }
    if file.size > MAX_FILE_SIZE {
        return Err(IntakeError::TooLarge(file.size));
    }
    Ok(file)
}

/// Build validated file metadata for a file on disk
pub fn file_from_path(path: &Path) -> Result<FileInfo, IntakeError> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(IntakeError::NotAFile(path.display().to_string()));
    }

    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let media_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    validate_file(FileInfo {
        name,
        size: metadata.len(),
        media_type,
    })
}

/// Human-readable size: `0 Bytes`, `500 Bytes`, `1.5 KB`, `2 MB`
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}
