//! アップロード画像の検証
//!
//! 送信前にMIMEタイプとサイズを確認する。ここで弾いたファイルは
//! プレビューも作らず、リクエストも送らない。

use thiserror::Error;

/// 受け付けるMIMEタイプ
pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/bmp",
    "image/tiff",
    "image/webp",
];

/// ファイル選択ダイアログの`accept`属性
pub const ACCEPT_ATTRIBUTE: &str = ".jpeg,.jpg,.png,.bmp,.tiff,.tif,.webp";

/// 最大ファイルサイズ（20MB）
pub const MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload a valid image file (JPEG, PNG, BMP, TIFF, WebP)")]
    UnsupportedType { mime: String },

    #[error("File size too large. Maximum size allowed is 20MB")]
    TooLarge { size: u64 },

    #[error("Please upload only one image file")]
    MultipleFiles { count: usize },
}

/// アップロード対象の画像ハンドル
///
/// ネイティブではファイル内容、ブラウザでは`File`とプレビューURLを持つ。
pub trait ImageSource {
    fn name(&self) -> &str;
    fn size(&self) -> u64;
    fn mime_type(&self) -> &str;
}

/// MIMEタイプとサイズを検証（タイプ → サイズの順）
pub fn validate_image(mime: &str, size: u64) -> Result<(), ValidationError> {
    let mime = mime.trim().to_ascii_lowercase();
    if !ACCEPTED_MIME_TYPES.contains(&mime.as_str()) {
        return Err(ValidationError::UnsupportedType { mime });
    }

    if size > MAX_FILE_SIZE {
        return Err(ValidationError::TooLarge { size });
    }

    Ok(())
}

/// `ImageSource`をそのまま検証
pub fn validate_source<S: ImageSource + ?Sized>(source: &S) -> Result<(), ValidationError> {
    validate_image(source.mime_type(), source.size())
}

/// ドロップされたファイル数を検証（1枚のみ）
pub fn validate_file_count(count: usize) -> Result<(), ValidationError> {
    if count > 1 {
        return Err(ValidationError::MultipleFiles { count });
    }
    Ok(())
}

/// 拡張子からMIMEタイプを推定
///
/// ディスクから読み込む場合に使う。不明な拡張子は`application/octet-stream`。
pub fn mime_from_extension(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_supported_types() {
        for mime in ACCEPTED_MIME_TYPES {
            assert!(validate_image(mime, 5 * 1024 * 1024).is_ok(), "{mime}");
        }
    }

    #[test]
    fn test_validate_rejects_gif() {
        let err = validate_image("image/gif", 1024).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedType { .. }));
        assert_eq!(
            err.to_string(),
            "Please upload a valid image file (JPEG, PNG, BMP, TIFF, WebP)"
        );
    }

    #[test]
    fn test_validate_rejects_non_image() {
        assert!(validate_image("application/pdf", 10).is_err());
        assert!(validate_image("", 10).is_err());
    }

    #[test]
    fn test_validate_mime_case_insensitive() {
        assert!(validate_image("IMAGE/PNG", 10).is_ok());
    }

    #[test]
    fn test_validate_size_boundary() {
        assert!(validate_image("image/png", MAX_FILE_SIZE).is_ok());
        let err = validate_image("image/png", MAX_FILE_SIZE + 1).unwrap_err();
        assert_eq!(err, ValidationError::TooLarge { size: MAX_FILE_SIZE + 1 });
    }

    #[test]
    fn test_oversized_rejected_for_every_type() {
        let size = 25 * 1024 * 1024;
        for mime in ["image/jpeg", "image/webp", "image/gif", "text/plain"] {
            assert!(validate_image(mime, size).is_err(), "{mime}");
        }
    }

    #[test]
    fn test_validate_file_count() {
        assert!(validate_file_count(0).is_ok());
        assert!(validate_file_count(1).is_ok());
        assert_eq!(
            validate_file_count(3),
            Err(ValidationError::MultipleFiles { count: 3 })
        );
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_from_extension("scan.JPG"), "image/jpeg");
        assert_eq!(mime_from_extension("page.tif"), "image/tiff");
        assert_eq!(mime_from_extension("anim.gif"), "image/gif");
        assert_eq!(mime_from_extension("README"), "application/octet-stream");
    }
}
