//! APIの型定義
//!
//! バックエンドのJSONをそのまま受ける:
//! - ExtractionResult: `POST /api/extract-text`
//! - HistoryItem / HistoryPage: `GET /api/history`
//! - HealthStatus: `GET /api/health`

use serde::{Deserialize, Serialize};

/// OCR結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub extracted_text: String,

    #[serde(default)]
    pub confidence: Option<f64>,

    #[serde(default)]
    pub processing_time: Option<String>,   // "1.23s"

    #[serde(default)]
    pub language: String,

    #[serde(default)]
    pub filename: String,

    #[serde(default)]
    pub file_size: Option<u64>,

    #[serde(default)]
    pub created_at: Option<String>,
}

impl ExtractionResult {
    /// 抽出テキストが空白のみか
    pub fn is_blank(&self) -> bool {
        self.extracted_text.trim().is_empty()
    }
}

/// 履歴アイテム（サーバー側の状態をそのまま映す）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: i64,
    pub filename: String,
    pub language: String,

    /// 200文字で切り詰められたプレビュー
    #[serde(default)]
    pub extracted_text: String,

    #[serde(default)]
    pub full_text: String,

    pub created_at: String,

    #[serde(default)]
    pub file_size: Option<u64>,

    #[serde(default)]
    pub processing_time: Option<String>,
}

/// `GET /api/history` のレスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub history: Vec<HistoryItem>,

    #[serde(default)]
    pub total: Option<u64>,

    #[serde(default)]
    pub limit: Option<u32>,

    #[serde(default)]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    /// 2xxだがボディを解釈できなかった場合
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            service: None,
        }
    }
}

/// `GET /api/download/{id}` で受け取ったテキスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedText {
    /// Content-Dispositionのファイル名
    pub filename: Option<String>,
    pub content: String,
}

impl DownloadedText {
    /// 保存時のファイル名（ヘッダーがなければ `extracted_text_{id}.txt`）
    pub fn file_name_or(&self, id: i64) -> String {
        self.filename
            .clone()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| format!("extracted_text_{}.txt", id))
    }
}

/// Content-Dispositionヘッダーからファイル名を取り出す
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}
