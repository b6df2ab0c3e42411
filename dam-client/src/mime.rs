//! File extension to MIME type lookup.

/// MIME type for `extension`, or `None` when the extension is blank.
///
/// Unknown extensions map to `application/<ext>`.
pub fn from_extension(extension: Option<&str>) -> Option<String> {
    let ext = extension.map(str::trim).filter(|e| !e.is_empty())?;
    let lower = ext.to_ascii_lowercase();
    let known = match lower.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "zip" => "application/zip",
        _ => return Some(format!("application/{ext}")),
    };
    Some(known.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_ignore_case() {
        assert_eq!(from_extension(Some("JPG")).as_deref(), Some("image/jpeg"));
        assert_eq!(from_extension(Some("tif")).as_deref(), Some("image/tiff"));
        assert_eq!(from_extension(Some("pdf")).as_deref(), Some("application/pdf"));
    }

    #[test]
    fn unknown_extension_falls_back_to_application() {
        assert_eq!(from_extension(Some("psd")).as_deref(), Some("application/psd"));
    }

    #[test]
    fn blank_extension_has_no_type() {
        assert_eq!(from_extension(None), None);
        assert_eq!(from_extension(Some("")), None);
        assert_eq!(from_extension(Some("  ")), None);
    }
}
