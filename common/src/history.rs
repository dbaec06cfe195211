//! 抽出履歴
//!
//! サーバー側の状態を映すだけで、独自のデータは持たない。
//! 削除はサーバーが成功を返したときだけローカルの一覧から外す。

use crate::api::OcrApi;
use crate::error::Error;
use crate::types::{DownloadedText, HistoryItem};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load history";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete item";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Failed to download file";

/// 一覧に表示するプレビューの長さ
pub const PREVIEW_LENGTH: usize = 150;

/// 履歴一覧の表示状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryList {
    pub items: Vec<HistoryItem>,
    pub loading: bool,
    pub error: Option<String>,
    /// 全文モーダルで表示中のID
    pub selected: Option<i64>,
}

impl HistoryList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// 取得結果を反映（失敗時は一覧をそのまま残す）
    pub fn finish_load(&mut self, outcome: Result<Vec<HistoryItem>, Error>) {
        self.loading = false;
        match outcome {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "history fetch failed");
                self.error = Some(LOAD_FAILED_MESSAGE.to_string());
            }
        }
    }

    /// 削除結果を反映（成功時のみ一覧から外す）
    ///
    /// 一覧から外れたかどうかを返す。
    pub fn confirm_delete(&mut self, id: i64, outcome: Result<(), Error>) -> bool {
        match outcome {
            Ok(()) => {
                let before = self.items.len();
                self.items.retain(|item| item.id != id);
                if self.selected == Some(id) {
                    self.selected = None;
                }
                self.items.len() != before
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "history delete failed");
                self.error = Some(DELETE_FAILED_MESSAGE.to_string());
                false
            }
        }
    }

    pub fn download_failed(&mut self, err: &Error) {
        tracing::warn!(error = %err, "history download failed");
        self.error = Some(DOWNLOAD_FAILED_MESSAGE.to_string());
    }

    /// 全文モーダルを開く（存在しないIDは無視）
    pub fn open(&mut self, id: i64) {
        if self.items.iter().any(|item| item.id == id) {
            self.selected = Some(id);
        }
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn selected_item(&self) -> Option<&HistoryItem> {
        let id = self.selected?;
        self.items.iter().find(|item| item.id == id)
    }

    /// "1 item" / "N items"
    pub fn count_label(&self) -> String {
        let n = self.items.len();
        format!("{} item{}", n, if n == 1 { "" } else { "s" })
    }
}

/// ゲートウェイを注入した履歴ビューア
pub struct HistoryViewer<A: OcrApi> {
    api: A,
    list: HistoryList,
    limit: u32,
}

impl<A: OcrApi> HistoryViewer<A> {
    pub fn new(api: A, limit: u32) -> Self {
        Self {
            api,
            list: HistoryList::new(),
            limit,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn list(&self) -> &HistoryList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut HistoryList {
        &mut self.list
    }

    /// 1ページ目を取得
    pub async fn refresh(&mut self) {
        self.list.begin_load();
        let outcome = self.api.list_history(self.limit, 0).await;
        self.list.finish_load(outcome);
    }

    pub async fn delete(&mut self, id: i64) -> bool {
        let outcome = self.api.delete_history_item(id).await;
        self.list.confirm_delete(id, outcome)
    }

    pub async fn download(&mut self, id: i64) -> Option<DownloadedText> {
        match self.api.download_text(id).await {
            Ok(text) => Some(text),
            Err(err) => {
                self.list.download_failed(&err);
                None
            }
        }
    }
}
