//! エラー型定義
//!
//! ゲートウェイ境界で一度だけ分類し、以降は型で分岐する:
//! - Validation: 送信前にクライアント側で弾いたもの
//! - Server: バックエンドがエラーを返した（detailがあればそのまま表示）
//! - Network / Timeout: レスポンスが返ってこなかった
//! - Request: リクエスト自体を組み立てられなかった

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::validation::ValidationError;

/// ネットワーク到達不能時のメッセージ
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check if the backend server is running.";

/// タイムアウト時のメッセージ
pub const TIMEOUT_ERROR_MESSAGE: &str = "The request timed out. Please try again.";

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Server error ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// ユーザー向けメッセージ
    ///
    /// 優先順位: サーバーのdetail → ネットワーク → タイムアウト → `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Validation(e) => e.to_string(),
            Error::Server { detail: Some(detail), .. } if !detail.trim().is_empty() => {
                detail.clone()
            }
            Error::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Error::Timeout(_) => TIMEOUT_ERROR_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

/// FastAPIのエラーボディ `{"detail": ...}`
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Detail>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Entries(Vec<DetailEntry>),
    Other(serde_json::Value),
}

#[derive(Deserialize)]
struct DetailEntry {
    #[serde(default)]
    msg: Option<String>,
}

/// 非2xxレスポンスからServerエラーを組み立てる
///
/// detailが文字列ならそのまま、422のバリデーション配列なら`msg`を連結する。
/// JSONでないボディはdetailなし扱い。
pub fn parse_error_response(status: u16, body: &str) -> Error {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .and_then(|d| match d {
            Detail::Message(s) => Some(s),
            Detail::Entries(entries) => {
                let msgs: Vec<String> = entries.into_iter().filter_map(|e| e.msg).collect();
                if msgs.is_empty() {
                    None
                } else {
                    Some(msgs.join("; "))
                }
            }
            Detail::Other(v) if !v.is_null() => Some(v.to_string()),
            Detail::Other(_) => None,
        });

    Error::Server { status, detail }
}
