//! 起動時のヘルスチェックとページ上部のアラート
//!
//! バナーはセッション中ずっと残るが、抽出や操作のエラーは別枠で表示する。

use crate::api::OcrApi;

/// ヘルスチェックに失敗したときのバナー
pub const BACKEND_UNAVAILABLE_MESSAGE: &str =
    "Backend API is not available. Please ensure the server is running.";

/// バックエンドが応答するか（2xxなら本文に関係なく健全）
pub async fn backend_available<A: OcrApi>(api: &A) -> bool {
    match api.health_check().await {
        Ok(status) => {
            tracing::debug!(status = %status.status, "backend healthy");
            true
        }
        Err(err) => {
            tracing::warn!(error = %err, "API health check failed");
            false
        }
    }
}

/// 表示するアラートを上から順に返す
///
/// バナー、抽出エラー、操作エラー（抽出エラーがないときのみ）の順。
pub fn page_alerts(
    backend_down: bool,
    workflow_error: Option<&str>,
    notice: Option<&str>,
) -> Vec<String> {
    let mut alerts = Vec::new();
    if backend_down {
        alerts.push(BACKEND_UNAVAILABLE_MESSAGE.to_string());
    }
    if let Some(message) = workflow_error.or(notice) {
        alerts.push(message.to_string());
    }
    alerts
}
