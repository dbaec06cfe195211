//! アップロードエリアコンポーネント
//!
//! ドロップまたはクリックで1枚だけ受け付ける。
//! 検証で弾いた場合はエラーを表示し、上位には何も渡さない。

use leptos::html;
use leptos::prelude::*;
use web_sys::{DragEvent, FileList, HtmlInputElement, MouseEvent};

use image2text_common::format::format_file_size;
use image2text_common::validation::{validate_file_count, ACCEPT_ATTRIBUTE};

use crate::browser::{log_warn, BrowserImage};

/// プレビュー表示用の情報
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewInfo {
    pub name: String,
    pub size: u64,
    pub url: String,
}

#[component]
pub fn UploadArea<F, R>(
    preview: Signal<Option<PreviewInfo>>,
    processing: Signal<bool>,
    on_select: F,
    on_remove: R,
) -> impl IntoView
where
    F: Fn(BrowserImage) + Clone + Send + Sync + 'static,
    R: Fn(()) + Clone + Send + Sync + 'static,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);
    let input_ref: NodeRef<html::Input> = NodeRef::new();

    let handle_files = move |files: FileList| {
        set_error.set(None);
        let count = files.length() as usize;
        if count == 0 {
            return;
        }
        if let Err(e) = validate_file_count(count) {
            set_error.set(Some(e.to_string()));
            return;
        }
        let Some(file) = files.get(0) else {
            return;
        };
        match BrowserImage::accept(file) {
            Ok(image) => on_select(image),
            Err(e) => {
                log_warn("upload rejected", &e);
                set_error.set(Some(e.to_string()));
            }
        }
    };

    let on_drop = {
        let handle_files = handle_files.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);
            if processing.get_untracked() {
                return;
            }
            if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
                handle_files(files);
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        if !processing.get_untracked() {
            set_is_dragover.set(true);
        }
    };

    let on_change = move |ev: web_sys::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(files) = input.files() {
            handle_files(files);
        }
        // 同じファイルを選び直しても change が発火するように
        input.set_value("");
    };

    let open_dialog = move |_: MouseEvent| {
        if processing.get_untracked() {
            return;
        }
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let remove = move |_: ()| {
        set_error.set(None);
        on_remove(());
    };

    view! {
        <div class="upload-section">
            <Show
                when=move || preview.with(Option::is_none)
                fallback=move || {
                    let remove = remove.clone();
                    view! { <ImagePreview preview=preview processing=processing on_remove=remove /> }
                }
            >
                <div
                    class=move || {
                        let mut classes = vec!["upload-area"];
                        if is_dragover.get() {
                            classes.push("dragover");
                        }
                        if processing.get() {
                            classes.push("disabled");
                        }
                        classes.join(" ")
                    }
                    on:drop=on_drop.clone()
                    on:dragover=on_dragover
                    on:dragleave=move |_: DragEvent| set_is_dragover.set(false)
                    on:click=open_dialog
                >
                    <input
                        node_ref=input_ref
                        type="file"
                        accept=ACCEPT_ATTRIBUTE
                        class="hidden"
                        on:change=on_change.clone()
                    />
                    <div class="upload-icon">"📤"</div>
                    <p class="upload-title">
                        {move || if is_dragover.get() { "Drop your image here" } else { "Upload an image" }}
                    </p>
                    <p>"Drag and drop an image file here, or click to select"</p>
                    <p class="text-muted">"Supports: JPEG, PNG, BMP, TIFF, WebP (Max: 20MB)"</p>
                </div>
            </Show>

            <Show when=move || error.with(Option::is_some)>
                <div class="alert alert-error">
                    <p>{move || error.get().unwrap_or_default()}</p>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn ImagePreview<R>(
    preview: Signal<Option<PreviewInfo>>,
    processing: Signal<bool>,
    on_remove: R,
) -> impl IntoView
where
    R: Fn(()) + Clone + Send + Sync + 'static,
{
    let name = move || preview.with(|p| p.as_ref().map(|p| p.name.clone()).unwrap_or_default());
    let size = move || preview.with(|p| p.as_ref().map(|p| format_file_size(p.size)).unwrap_or_default());
    let url = move || preview.with(|p| p.as_ref().map(|p| p.url.clone()).unwrap_or_default());

    view! {
        <div class="preview-card">
            <div class="preview-header">
                <div class="preview-info">
                    <span class="preview-icon">"🖼"</span>
                    <div>
                        <p class="file-name">{name}</p>
                        <p class="text-muted">{size}</p>
                    </div>
                </div>
                <Show when=move || !processing.get()>
                    <button
                        type="button"
                        class="btn-icon"
                        title="Remove image"
                        on:click={
                            let on_remove = on_remove.clone();
                            move |_| on_remove(())
                        }
                    >
                        "✕"
                    </button>
                </Show>
            </div>
            <div class="preview-image">
                <img src=url alt="Preview" />
                <Show when=move || processing.get()>
                    <div class="processing-overlay">
                        <div class="spinner"></div>
                        <p>"Processing..."</p>
                    </div>
                </Show>
            </div>
        </div>
    }
}
