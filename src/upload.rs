//! ディスク上の画像ファイル

use std::path::Path;
use std::sync::Arc;

use image2text_common::validation::mime_from_extension;
use image2text_common::{Error, ImageSource, Result};

/// 送信する画像（内容は共有参照で持つ）
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    name: String,
    mime: String,
    bytes: Arc<[u8]>,
}

impl UploadFile {
    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// ファイルを読み込み、拡張子からMIMEタイプを決める
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::Io(format!("file not found: {}", path.display())));
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let bytes = std::fs::read(path)?;
        let mime = mime_from_extension(&name);
        Ok(Self::from_bytes(name, mime, bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl ImageSource for UploadFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn mime_type(&self) -> &str {
        &self.mime
    }
}
