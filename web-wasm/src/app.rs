//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::MouseEvent;

use image2text_common::{backend_available, page_alerts, ImageSource, Language, OcrApi, Workflow};

use crate::api::FetchGateway;
use crate::browser::{log_info, log_warn, BrowserImage};
use crate::components::{
    footer::Footer,
    header::Header,
    history_panel::HistoryPanel,
    language_selector::LanguageSelector,
    text_result::TextResult,
    upload_area::{PreviewInfo, UploadArea},
};

const TIPS: [&str; 5] = [
    "Use high-resolution images with clear text",
    "Ensure good lighting and contrast",
    "Select the correct language for better accuracy",
    "Avoid blurry or rotated text when possible",
    "Supported formats: JPEG, PNG, BMP, TIFF, WebP",
];

const FEATURES: [&str; 6] = [
    "Drag & drop image upload",
    "Copy text to clipboard",
    "Download as .txt file",
    "Extraction history",
    "Multi-language support",
    "Mobile responsive design",
];

/// メインアプリケーションコンポーネント
#[component]
pub fn App(api: FetchGateway) -> impl IntoView {
    // BrowserImage はプレビューURLを Rc で持つのでローカル保持
    let workflow = RwSignal::new_local(Workflow::<BrowserImage>::new());
    let (backend_down, set_backend_down) = signal(false);
    let (notice, set_notice) = signal(Option::<String>::None);
    let (show_history, set_show_history) = signal(false);
    let api = StoredValue::new(api);

    // ヘルスチェック（起動時に1回）
    {
        let gateway = api.get_value();
        spawn_local(async move {
            if backend_available(&gateway).await {
                log_info("backend health: ok");
            } else {
                log_warn("API health check failed", &gateway.config().api_base_url);
                set_backend_down.set(true);
            }
        });
    }

    let processing = Signal::derive(move || workflow.with(Workflow::is_processing));
    let language = Signal::derive(move || workflow.with(Workflow::language));
    let result = Signal::derive(move || workflow.with(|w| w.result().cloned()));
    let preview = Signal::derive(move || {
        workflow.with(|w| {
            w.image().map(|image| PreviewInfo {
                name: image.name().to_string(),
                size: image.size(),
                url: image.preview_url(),
            })
        })
    });
    let can_submit = move || workflow.with(Workflow::can_submit);

    let alerts = move || {
        let notice = notice.get();
        workflow.with(|w| page_alerts(backend_down.get(), w.error(), notice.as_deref()))
    };

    let on_select = move |image: BrowserImage| {
        set_notice.set(None);
        if let Some(Err(e)) = workflow.try_update(|w| w.select_image(image)) {
            log_warn("image not accepted", &e);
            set_notice.set(Some(e.to_string()));
        }
    };

    let on_remove = move |_: ()| {
        set_notice.set(None);
        if let Some(Err(e)) = workflow.try_update(Workflow::remove_image) {
            log_warn("image not removed", &e);
        }
    };

    let on_language = move |lang: Language| {
        if let Some(Err(e)) = workflow.try_update(|w| w.set_language(lang)) {
            log_warn("language not changed", &e);
        }
    };

    let on_submit = move |_: MouseEvent| {
        let request = match workflow.try_update(Workflow::begin_submit) {
            Some(Ok(request)) => request,
            Some(Err(e)) => {
                set_notice.set(Some(e.to_string()));
                return;
            }
            None => return,
        };
        set_notice.set(None);

        let gateway = api.get_value();
        spawn_local(async move {
            let outcome = gateway.extract_text(&request.image, request.language).await;
            if let Err(e) = &outcome {
                log_warn("OCR processing error", e);
            }
            workflow.try_update(|w| w.finish(outcome));
        });
    };

    view! {
        <div class="app">
            <Header />

            <main class="container">
                <section class="hero">
                    <h1>"Extract Text from Images"</h1>
                    <p>
                        "Upload any image and extract text instantly using advanced OCR technology. "
                        "Support for multiple languages with high accuracy results."
                    </p>
                </section>

                {move || {
                    alerts()
                        .into_iter()
                        .map(|message| view! {
                            <div class="alert alert-error global-alert">
                                <h3>"Error"</h3>
                                <p>{message}</p>
                            </div>
                        })
                        .collect_view()
                }}

                <div class="main-grid">
                    <div class="main-column">
                        <div class="card">
                            <h2>"Upload Image"</h2>
                            <LanguageSelector
                                language=language
                                disabled=processing
                                on_change=on_language
                            />
                            <UploadArea
                                preview=preview
                                processing=processing
                                on_select=on_select
                                on_remove=on_remove
                            />
                            <div class="actions">
                                <button
                                    type="button"
                                    class="btn btn-primary"
                                    disabled=move || !can_submit()
                                    on:click=on_submit
                                >
                                    {move || if processing.get() { "Processing..." } else { "Extract Text" }}
                                </button>
                                <button
                                    type="button"
                                    class="btn btn-secondary"
                                    on:click=move |_| set_show_history.update(|v| *v = !*v)
                                >
                                    {move || if show_history.get() { "Hide History" } else { "View History" }}
                                </button>
                            </div>
                        </div>

                        <TextResult result=result loading=processing />
                    </div>

                    <aside class="side-column">
                        <Show
                            when=move || show_history.get()
                            fallback=|| view! { <TipsCard /> }
                        >
                            <HistoryPanel api=api.get_value() />
                        </Show>
                    </aside>
                </div>
            </main>

            <Footer />
        </div>
    }
}

#[component]
fn TipsCard() -> impl IntoView {
    view! {
        <div class="card tips">
            <h3>"💡 Tips for Better Results"</h3>
            <ul>
                {TIPS.into_iter().map(|tip| view! { <li>{tip}</li> }).collect_view()}
            </ul>
        </div>
        <div class="card features">
            <h3>"✨ Features"</h3>
            <ul>
                {FEATURES.into_iter().map(|f| view! { <li>{f}</li> }).collect_view()}
            </ul>
        </div>
    }
}
