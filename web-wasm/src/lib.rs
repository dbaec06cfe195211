//! Image2Text Web App (Leptos + WASM)

mod api;
mod app;
mod browser;
mod components;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use crate::api::FetchGateway;
use crate::app::App;
use crate::browser::log_info;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    let api = FetchGateway::from_build_env();
    log_info(&format!("API base URL: {}", api.config().api_base_url));

    leptos::mount::mount_to_body(move || view! { <App api=api.clone() /> });
}
