//! fetch APIによるOCRバックエンドゲートウェイ
//!
//! タイムアウトは`AbortController`で実装する。タイマーはRAIIで、
//! レスポンスを読み終えて`Deadline`がdropされた時点で解除される。

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use gloo::timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, FormData, Request, RequestInit, RequestMode, Response};

use image2text_common::types::filename_from_content_disposition;
use image2text_common::{
    endpoints, parse_error_response, ClientConfig, DownloadedText, Error, ExtractionResult,
    HealthStatus, HistoryItem, HistoryPage, ImageSource, Language, OcrApi, Result,
    SupportedLanguages,
};
use serde::de::DeserializeOwned;

use crate::browser::{js_error_message, log_warn, BrowserImage};

/// ブラウザ版ゲートウェイ
#[derive(Debug, Clone)]
pub struct FetchGateway {
    config: ClientConfig,
}

impl FetchGateway {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// ビルド時の `IMAGE2TEXT_API_URL` を使う（不正ならデフォルト）
    pub fn from_build_env() -> Self {
        let config = ClientConfig::from_base_url(option_env!("IMAGE2TEXT_API_URL"))
            .unwrap_or_else(|e| {
                log_warn("invalid IMAGE2TEXT_API_URL, using default", &e);
                ClientConfig::default()
            });
        Self::new(config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 送信して2xxのレスポンスだけを返す
    async fn fetch(
        &self,
        method: &str,
        path: &str,
        body: Option<&JsValue>,
        timeout: Option<Duration>,
    ) -> Result<Fetched> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = body {
            opts.set_body(body);
        }

        let deadline = match timeout {
            Some(after) => {
                let deadline = Deadline::start(after)?;
                opts.set_signal(Some(&deadline.controller.signal()));
                Some(deadline)
            }
            None => None,
        };

        let url = self.config.endpoint(path);
        let request = Request::new_with_str_and_init(&url, &opts)
            .map_err(|e| Error::Request(js_error_message(&e)))?;
        let window = web_sys::window().ok_or_else(|| Error::Request("window not available".into()))?;

        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| classify(&e, deadline.as_ref()))?;
        let response: Response = value
            .dyn_into()
            .map_err(|_| Error::Decode("fetch did not return a Response".into()))?;

        let fetched = Fetched { response, deadline };
        if fetched.response.ok() {
            return Ok(fetched);
        }

        let status = fetched.response.status();
        let body = fetched.text().await.unwrap_or_default();
        let err = parse_error_response(status, &body);
        log_warn(&format!("API error ({} {})", method, path), &err);
        Err(err)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let fetched = self.fetch("GET", path, None, self.config.request_timeout).await?;
        let body = fetched.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// レスポンスとタイムアウトの組（本文を読み終えるまでタイマーを保持）
struct Fetched {
    response: Response,
    deadline: Option<Deadline>,
}

impl Fetched {
    async fn text(&self) -> Result<String> {
        let promise = self
            .response
            .text()
            .map_err(|e| Error::Decode(js_error_message(&e)))?;
        let value = JsFuture::from(promise)
            .await
            .map_err(|e| classify(&e, self.deadline.as_ref()))?;
        value
            .as_string()
            .ok_or_else(|| Error::Decode("response body is not text".into()))
    }

    fn header(&self, name: &str) -> Option<String> {
        self.response.headers().get(name).ok().flatten()
    }
}

/// 一定時間後にリクエストを中断する
struct Deadline {
    controller: AbortController,
    fired: Rc<Cell<bool>>,
    after: Duration,
    _timer: Timeout,
}

impl Deadline {
    fn start(after: Duration) -> Result<Self> {
        let controller =
            AbortController::new().map_err(|e| Error::Request(js_error_message(&e)))?;
        let fired = Rc::new(Cell::new(false));
        let timer = {
            let controller = controller.clone();
            let fired = fired.clone();
            let millis = u32::try_from(after.as_millis()).unwrap_or(u32::MAX);
            Timeout::new(millis, move || {
                fired.set(true);
                controller.abort();
            })
        };
        Ok(Self {
            controller,
            fired,
            after,
            _timer: timer,
        })
    }
}

/// fetchの失敗を分類（中断していればタイムアウト）
fn classify(err: &JsValue, deadline: Option<&Deadline>) -> Error {
    match deadline {
        Some(d) if d.fired.get() => Error::Timeout(d.after),
        _ => Error::Network(js_error_message(err)),
    }
}

impl OcrApi for FetchGateway {
    type Upload = BrowserImage;

    async fn extract_text(&self, upload: &BrowserImage, language: Language) -> Result<ExtractionResult> {
        let form = FormData::new().map_err(|e| Error::Request(js_error_message(&e)))?;
        form.append_with_blob_and_filename("file", upload.file(), upload.name())
            .map_err(|e| Error::Request(js_error_message(&e)))?;
        form.append_with_str("language", language.code())
            .map_err(|e| Error::Request(js_error_message(&e)))?;

        let body: JsValue = form.into();
        let fetched = self
            .fetch(
                "POST",
                &endpoints::extract_text_query(language.code()),
                Some(&body),
                Some(self.config.extract_timeout),
            )
            .await?;
        let body = fetched.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn list_history(&self, limit: u32, offset: u32) -> Result<Vec<HistoryItem>> {
        let page: HistoryPage = self.get_json(&endpoints::history_query(limit, offset)).await?;
        Ok(page.history)
    }

    async fn delete_history_item(&self, id: i64) -> Result<()> {
        self.fetch("DELETE", &endpoints::history_item(id), None, self.config.request_timeout)
            .await?;
        Ok(())
    }

    async fn download_text(&self, id: i64) -> Result<DownloadedText> {
        let fetched = self
            .fetch("GET", &endpoints::download(id), None, self.config.request_timeout)
            .await?;
        // CORSで公開されていなければヘッダーは読めない
        let filename = fetched
            .header("content-disposition")
            .and_then(|h| filename_from_content_disposition(&h));
        let content = fetched.text().await?;
        Ok(DownloadedText { filename, content })
    }

    async fn supported_languages(&self) -> Result<SupportedLanguages> {
        self.get_json(endpoints::LANGUAGES).await
    }

    async fn health_check(&self) -> Result<HealthStatus> {
        let fetched = self
            .fetch("GET", endpoints::HEALTH, None, self.config.request_timeout)
            .await?;
        let body = fetched.text().await?;
        Ok(serde_json::from_str(&body).unwrap_or_else(|_| HealthStatus::ok()))
    }
}
