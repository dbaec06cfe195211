use leptos::prelude::*;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="footer">
            <p>"© 2025 Image2Text Pro. Built with Rust & FastAPI."</p>
            <p class="text-muted">"Powered by Tesseract OCR technology"</p>
            <div class="footer-grid">
                <div>
                    <h4>"Supported Formats"</h4>
                    <p>"JPEG, PNG, BMP, TIFF, WebP"</p>
                </div>
                <div>
                    <h4>"Languages"</h4>
                    <p>"English, Hindi, and more"</p>
                </div>
                <div>
                    <h4>"Features"</h4>
                    <p>"OCR, History, Download, Copy"</p>
                </div>
            </div>
        </footer>
    }
}
