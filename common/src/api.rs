//! OCRバックエンドAPIのゲートウェイ
//!
//! ネイティブ（reqwest）とブラウザ（fetch）で同じトレイトを実装し、
//! ワークフロー側には実装を注入する。テストではモックに差し替える。

use crate::error::Result;
use crate::language::{Language, SupportedLanguages};
use crate::types::{DownloadedText, ExtractionResult, HealthStatus, HistoryItem};
use crate::validation::ImageSource;

/// エンドポイント定義
pub mod endpoints {
    pub const EXTRACT_TEXT: &str = "/api/extract-text";
    pub const HISTORY: &str = "/api/history";
    pub const LANGUAGES: &str = "/api/languages";
    pub const HEALTH: &str = "/api/health";

    pub fn history_item(id: i64) -> String {
        format!("{}/{}", HISTORY, id)
    }

    pub fn download(id: i64) -> String {
        format!("/api/download/{}", id)
    }

    pub fn history_query(limit: u32, offset: u32) -> String {
        format!("{}?limit={}&offset={}", HISTORY, limit, offset)
    }

    /// 言語はクエリにも載せる（バックエンドはクエリから読む）
    pub fn extract_text_query(language: &str) -> String {
        format!("{}?language={}", EXTRACT_TEXT, encode_query_value(language))
    }

    fn encode_query_value(value: &str) -> String {
        value
            .bytes()
            .map(|b| match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    (b as char).to_string()
                }
                _ => format!("%{:02X}", b),
            })
            .collect()
    }
}

/// OCRバックエンドとの1リクエスト1レスポンスの操作
///
/// ブラウザのfutureは`Send`でないため、`Send`境界は付けない。
#[allow(async_fn_in_trait)]
pub trait OcrApi {
    /// 送信する画像ハンドル
    type Upload: ImageSource + Clone;

    /// 画像からテキストを抽出（抽出用タイムアウトで打ち切る）
    async fn extract_text(&self, upload: &Self::Upload, language: Language)
        -> Result<ExtractionResult>;

    /// 履歴一覧（サーバーの並び順のまま、新しい順）
    async fn list_history(&self, limit: u32, offset: u32) -> Result<Vec<HistoryItem>>;

    async fn delete_history_item(&self, id: i64) -> Result<()>;

    async fn download_text(&self, id: i64) -> Result<DownloadedText>;

    async fn supported_languages(&self) -> Result<SupportedLanguages>;

    /// 2xxなら正常
    async fn health_check(&self) -> Result<HealthStatus>;
}
