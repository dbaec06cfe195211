//! 抽出結果コンポーネント

use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::MouseEvent;

use image2text_common::format::{download_filename, format_confidence, format_kilobytes};
use image2text_common::{CopyAck, ExtractionResult, COPY_ACK_DURATION};

use crate::browser::{copy_to_clipboard, js_error_message, log_error, now_ms, save_text_file};

#[component]
pub fn TextResult(
    result: Signal<Option<ExtractionResult>>,
    loading: Signal<bool>,
) -> impl IntoView {
    let ack = RwSignal::new(CopyAck::new());
    // 差し替え・破棄でタイマーは解除される
    let revert_timer = StoredValue::new_local(Option::<Timeout>::None);

    let has_text = move || result.with(|r| r.as_ref().is_some_and(|r| !r.is_blank()));

    let on_copy = move |_: MouseEvent| {
        let Some(text) = result.with_untracked(|r| r.as_ref().map(|r| r.extracted_text.clone())) else {
            return;
        };
        spawn_local(async move {
            if !copy_to_clipboard(&text).await {
                return;
            }
            ack.update(|a| a.acknowledge(now_ms()));
            let millis = COPY_ACK_DURATION.as_millis() as u32;
            let timer = Timeout::new(millis, move || {
                ack.try_update(CopyAck::clear);
            });
            revert_timer.update_value(|t| *t = Some(timer));
        });
    };

    let on_download = move |_: MouseEvent| {
        let Some((text, filename)) = result.with_untracked(|r| {
            r.as_ref()
                .map(|r| (r.extracted_text.clone(), download_filename(&r.filename)))
        }) else {
            return;
        };
        if let Err(e) = save_text_file(&text, &filename) {
            log_error("download failed", &js_error_message(&e));
        }
    };

    move || {
        if loading.get() {
            return view! {
                <div class="card result-card">
                    <div class="loading">
                        <div class="spinner large"></div>
                        <h3>"Processing Image..."</h3>
                        <p class="text-muted">"Extracting text using OCR technology"</p>
                    </div>
                </div>
            }
            .into_any();
        }

        let Some(current) = result.get() else {
            return ().into_any();
        };

        view! {
            <div class="card result-card">
                <div class="result-header">
                    <h3>"Extracted Text"</h3>
                    <div class="result-actions">
                        <button
                            type="button"
                            class=move || if ack.get().is_active(now_ms()) { "btn btn-light copied" } else { "btn btn-light" }
                            disabled=move || !has_text()
                            on:click=on_copy
                        >
                            {move || ack.get().label(now_ms())}
                        </button>
                        <button
                            type="button"
                            class="btn btn-primary-light"
                            disabled=move || !has_text()
                            on:click=on_download
                        >
                            "Download"
                        </button>
                    </div>
                </div>
                {result_body(&current)}
            </div>
        }
        .into_any()
    }
}

fn result_body(result: &ExtractionResult) -> AnyView {
    if result.is_blank() {
        return view! {
            <div class="empty-result">
                <p>"No text could be extracted from this image."</p>
                <p class="text-muted">
                    "Try uploading an image with clearer text or different language settings."
                </p>
            </div>
        }
        .into_any();
    }

    let confidence = result
        .confidence
        .and_then(format_confidence)
        .map(|c| view! { <span>"Confidence: " {c}</span> });
    let processing_time = result
        .processing_time
        .clone()
        .map(|t| view! { <span>"Processing Time: " {t}</span> });
    let language = (!result.language.is_empty())
        .then(|| result.language.to_uppercase())
        .map(|l| view! { <span>"Language: " {l}</span> });
    let file_size = result
        .file_size
        .map(|s| view! { <span>"File Size: " {format_kilobytes(s)}</span> });

    view! {
        <div class="result-text">
            <pre>{result.extracted_text.clone()}</pre>
        </div>
        <div class="result-meta">
            <div class="meta-items">{confidence} {processing_time} {language}</div>
            {file_size}
        </div>
    }
    .into_any()
}
