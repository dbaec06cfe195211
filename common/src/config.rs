//! クライアント設定
//!
//! APIのベースURLは環境変数 `IMAGE2TEXT_API_URL` で差し替える。
//! ブラウザ版はビルド時に同じ変数を埋め込む。

use std::time::Duration;

use crate::error::{Error, Result};

pub const API_URL_ENV: &str = "IMAGE2TEXT_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// OCR処理のタイムアウト（60秒）
pub const EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

/// 履歴の取得件数（UIでは1ページ目のみ表示）
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub extract_timeout: Duration,
    /// 抽出以外のリクエスト（Noneなら無制限）
    pub request_timeout: Option<Duration>,
    pub history_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            extract_timeout: EXTRACT_TIMEOUT,
            request_timeout: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ClientConfig {
    /// 実行時の環境変数から読み込む
    pub fn from_env() -> Result<Self> {
        Self::from_base_url(std::env::var(API_URL_ENV).ok().as_deref())
    }

    /// 値が未設定・空ならデフォルトURL
    pub fn from_base_url(url: Option<&str>) -> Result<Self> {
        match url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => Self::default().with_base_url(url),
            None => Ok(Self::default()),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        let url = url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "API URL must start with http:// or https://: {}",
                url
            )));
        }
        self.api_base_url = url.to_string();
        Ok(self)
    }

    pub fn with_extract_timeout(mut self, timeout: Duration) -> Self {
        self.extract_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// ベースURLとパスを連結
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.extract_timeout, Duration::from_secs(60));
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.history_limit, 50);
    }

    #[test]
    fn test_from_base_url_empty_uses_default() {
        let config = ClientConfig::from_base_url(Some("  ")).expect("設定失敗");
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        let config = ClientConfig::from_base_url(None).expect("設定失敗");
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let config = ClientConfig::default()
            .with_base_url("https://ocr.example.com/")
            .expect("設定失敗");
        assert_eq!(config.endpoint("/api/health"), "https://ocr.example.com/api/health");
    }

    #[test]
    fn test_with_base_url_rejects_scheme() {
        let err = ClientConfig::default().with_base_url("ftp://host").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
