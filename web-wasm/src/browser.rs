//! ブラウザAPIのラッパー
//!
//! - BrowserImage: 選択された画像ファイルとプレビューURL
//! - クリップボードへのコピー（非対応ブラウザは execCommand にフォールバック）
//! - テキストファイルの保存
//! - コンソールログ

use std::fmt::Display;
use std::rc::Rc;

use gloo::file::{Blob, ObjectUrl};
use gloo::timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, File, HtmlAnchorElement, HtmlDocument, HtmlTextAreaElement};

use image2text_common::validation::validate_source;
use image2text_common::{ImageSource, ValidationError};

/// 選択済みの画像
///
/// プレビューURLは最後のクローンがdropされた時点で解放される。
#[derive(Clone)]
pub struct BrowserImage {
    file: File,
    name: String,
    mime: String,
    size: u64,
    preview: Rc<ObjectUrl>,
}

impl BrowserImage {
    /// 検証してから受け付ける（弾いた場合はプレビューURLを作らない）
    pub fn accept(file: File) -> Result<Self, ValidationError> {
        let name = file.name();
        // ブラウザが報告した型だけで判定する（空なら弾く）
        let mime = file.type_();
        let size = file.size() as u64;

        let probe = Probe { name: &name, mime: &mime, size };
        validate_source(&probe)?;

        let preview = Rc::new(ObjectUrl::from(gloo::file::File::from(file.clone())));
        Ok(Self { file, name, mime, size, preview })
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn preview_url(&self) -> String {
        String::from(&**self.preview)
    }
}

impl ImageSource for BrowserImage {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> &str {
        &self.mime
    }
}

struct Probe<'a> {
    name: &'a str,
    mime: &'a str,
    size: u64,
}

impl ImageSource for Probe<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> &str {
        self.mime
    }
}

/// 一時的にbodyへ追加した要素を確実に外す
struct DetachOnDrop(Element);

impl Drop for DetachOnDrop {
    fn drop(&mut self) {
        self.0.remove();
    }
}

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

/// クリップボードへコピー（成功したか）
pub async fn copy_to_clipboard(text: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let navigator = window.navigator();

    let has_clipboard = js_sys::Reflect::has(&navigator, &JsValue::from_str("clipboard"))
        .unwrap_or(false);
    if has_clipboard {
        match JsFuture::from(navigator.clipboard().write_text(text)).await {
            Ok(_) => return true,
            Err(e) => log_warn("clipboard API failed, trying fallback", &js_error_message(&e)),
        }
    }

    match copy_with_textarea(text) {
        Ok(copied) => copied,
        Err(e) => {
            log_error("copy failed", &js_error_message(&e));
            false
        }
    }
}

fn copy_with_textarea(text: &str) -> Result<bool, JsValue> {
    let document = document().ok_or_else(|| JsValue::from_str("document not available"))?;
    let body = document.body().ok_or_else(|| JsValue::from_str("body not available"))?;

    let textarea: HtmlTextAreaElement = document.create_element("textarea")?.dyn_into()?;
    textarea.set_value(text);
    textarea.set_attribute("readonly", "")?;
    textarea.set_attribute("style", "position:fixed;top:0;left:0;opacity:0;")?;
    body.append_child(&textarea)?;
    let _guard = DetachOnDrop(textarea.clone().into());

    textarea.select();
    let html: HtmlDocument = document.dyn_into()?;
    html.exec_command("copy")
}

/// テキストをファイルとして保存させる
pub fn save_text_file(text: &str, filename: &str) -> Result<(), JsValue> {
    let document = document().ok_or_else(|| JsValue::from_str("document not available"))?;
    let body = document.body().ok_or_else(|| JsValue::from_str("body not available"))?;

    let blob = Blob::new_with_options(text, Some("text/plain;charset=utf-8"));
    let url = ObjectUrl::from(blob);

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    body.append_child(&anchor)?;
    let _guard = DetachOnDrop(anchor.clone().into());
    anchor.click();

    // クリック直後に解放するとダウンロードが始まらないブラウザがある
    Timeout::new(1_000, move || drop(url)).forget();
    Ok(())
}

/// JSの例外からメッセージを取り出す
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

pub fn log_info(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

pub fn log_warn(context: &str, err: &dyn Display) {
    web_sys::console::warn_1(&JsValue::from_str(&format!("{}: {}", context, err)));
}

pub fn log_error(context: &str, err: &dyn Display) {
    web_sys::console::error_1(&JsValue::from_str(&format!("{}: {}", context, err)));
}

/// `Date.now()` のミリ秒
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}
