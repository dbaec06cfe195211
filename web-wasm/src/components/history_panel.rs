//! 抽出履歴コンポーネント
//!
//! マウント時に1ページ目を取得する。削除はサーバーが成功を返してから一覧に反映。

use leptos::prelude::*;
use leptos::task::spawn_local;

use image2text_common::format::{format_date, format_file_size, truncate_text};
use image2text_common::history::PREVIEW_LENGTH;
use image2text_common::{HistoryItem, HistoryList, OcrApi};

use crate::api::FetchGateway;
use crate::browser::{js_error_message, log_error, log_warn, save_text_file};

/// 一覧・モーダルから呼ぶ操作
#[derive(Clone, Copy)]
struct HistoryActions {
    api: StoredValue<FetchGateway>,
    list: RwSignal<HistoryList>,
}

impl HistoryActions {
    fn load(self) {
        self.list.update(HistoryList::begin_load);
        let api = self.api.get_value();
        let list = self.list;
        spawn_local(async move {
            let outcome = api.list_history(api.config().history_limit, 0).await;
            if let Err(e) = &outcome {
                log_warn("history fetch error", e);
            }
            list.try_update(|l| l.finish_load(outcome));
        });
    }

    fn delete(self, id: i64) {
        let api = self.api.get_value();
        let list = self.list;
        spawn_local(async move {
            let outcome = api.delete_history_item(id).await;
            if let Err(e) = &outcome {
                log_warn("delete error", e);
            }
            list.try_update(|l| l.confirm_delete(id, outcome));
        });
    }

    fn download(self, id: i64) {
        let api = self.api.get_value();
        let list = self.list;
        spawn_local(async move {
            match api.download_text(id).await {
                Ok(text) => {
                    if let Err(e) = save_text_file(&text.content, &text.file_name_or(id)) {
                        log_error("download error", &js_error_message(&e));
                    }
                }
                Err(e) => {
                    log_warn("download error", &e);
                    list.try_update(|l| l.download_failed(&e));
                }
            }
        });
    }

    fn open(self, id: i64) {
        self.list.update(|l| l.open(id));
    }

    fn close(self) {
        self.list.update(HistoryList::close);
    }
}

#[component]
pub fn HistoryPanel(api: FetchGateway) -> impl IntoView {
    let actions = HistoryActions {
        api: StoredValue::new(api),
        list: RwSignal::new(HistoryList::new()),
    };
    let list = actions.list;

    actions.load();

    let initial_loading = move || list.with(|l| l.loading && l.is_empty());

    view! {
        <div class="card history-panel">
            <Show
                when=move || !initial_loading()
                fallback=|| view! {
                    <div class="loading">
                        <div class="spinner"></div>
                        <span>"Loading history..."</span>
                    </div>
                }
            >
                <div class="history-header">
                    <h2>"🕘 Extraction History"</h2>
                    <Show when=move || list.with(|l| !l.is_empty())>
                        <span class="text-muted">{move || list.with(HistoryList::count_label)}</span>
                    </Show>
                </div>

                {move || list.with(|l| l.error.clone()).map(|message| view! {
                    <div class="alert alert-error"><p>{message}</p></div>
                })}

                <Show
                    when=move || list.with(|l| !l.is_empty())
                    fallback=|| view! {
                        <div class="empty-history">
                            <p>"No extraction history yet"</p>
                            <p class="text-muted">"Upload an image to get started"</p>
                        </div>
                    }
                >
                    <div class="history-list">
                        <For
                            each=move || list.with(|l| l.items.clone())
                            key=|item| item.id
                            children=move |item| view! { <HistoryRow item=item actions=actions /> }
                        />
                    </div>
                </Show>
            </Show>

            {move || {
                list.with(|l| l.selected_item().cloned())
                    .map(|item| view! { <FullTextModal item=item actions=actions /> })
            }}
        </div>
    }
}

#[component]
fn HistoryRow(item: HistoryItem, actions: HistoryActions) -> impl IntoView {
    let id = item.id;
    let size = item.file_size.map(|s| view! { <span>{format_file_size(s)}</span> });
    let processed = item
        .processing_time
        .clone()
        .map(|t| view! { <span>"Processed in " {t}</span> });

    view! {
        <div class="history-item">
            <div class="history-body">
                <div class="history-title">
                    <h3>{item.filename.clone()}</h3>
                    <span class="badge">{item.language.to_uppercase()}</span>
                </div>
                <p class="history-preview">{truncate_text(&item.extracted_text, PREVIEW_LENGTH)}</p>
                <div class="history-meta">
                    <span>{format_date(&item.created_at)}</span>
                    {size}
                    {processed}
                </div>
            </div>
            <div class="history-actions">
                <button type="button" class="btn-icon" title="View full text" on:click=move |_| actions.open(id)>
                    "👁"
                </button>
                <button type="button" class="btn-icon" title="Download as .txt" on:click=move |_| actions.download(id)>
                    "⬇"
                </button>
                <button type="button" class="btn-icon danger" title="Delete" on:click=move |_| actions.delete(id)>
                    "🗑"
                </button>
            </div>
        </div>
    }
}

#[component]
fn FullTextModal(item: HistoryItem, actions: HistoryActions) -> impl IntoView {
    let id = item.id;
    let processing_time = item
        .processing_time
        .clone()
        .map(|t| view! { <span>"Processing Time: " {t}</span> });
    let size = item
        .file_size
        .map(|s| view! { <span>"File Size: " {format_file_size(s)}</span> });

    view! {
        <div class="modal-backdrop">
            <div class="modal">
                <div class="modal-header">
                    <h3>{item.filename.clone()}</h3>
                    <button type="button" class="btn-icon" on:click=move |_| actions.close()>"✕"</button>
                </div>
                <div class="modal-body">
                    <pre class="result-text">{item.full_text.clone()}</pre>
                    <div class="result-meta">
                        <div class="meta-items">
                            <span>"Language: " {item.language.to_uppercase()}</span>
                            <span>"Extracted: " {format_date(&item.created_at)}</span>
                            {processing_time}
                        </div>
                        {size}
                    </div>
                </div>
                <div class="modal-footer">
                    <button type="button" class="btn btn-secondary" on:click=move |_| actions.download(id)>
                        "Download"
                    </button>
                    <button type="button" class="btn btn-primary" on:click=move |_| actions.close()>
                        "Close"
                    </button>
                </div>
            </div>
        </div>
    }
}
