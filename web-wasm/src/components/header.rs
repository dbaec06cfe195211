//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <div class="brand">
                <h1>"Image2Text Pro"</h1>
                <p class="text-muted">"OCR Text Extraction"</p>
            </div>
            <span class="status-pill">"AI-Powered OCR"</span>
        </header>
    }
}
