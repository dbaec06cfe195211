//! reqwestによるOCRバックエンドゲートウェイ
//!
//! エラーはここで一度だけ分類する:
//! - 非2xx → `Error::Server`（detailを保持）
//! - タイムアウト → `Error::Timeout`
//! - 接続できない・応答途中で切れた → `Error::Network`
//! - リクエストを組み立てられない → `Error::Request`

use std::time::Duration;

use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use image2text_common::types::filename_from_content_disposition;
use image2text_common::{
    endpoints, parse_error_response, ClientConfig, DownloadedText, Error, ExtractionResult,
    HealthStatus, HistoryItem, HistoryPage, ImageSource, Language, OcrApi, Result,
    SupportedLanguages,
};

use crate::upload::UploadFile;

/// ネイティブ版ゲートウェイ
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    config: ClientConfig,
}

impl HttpGateway {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Request(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// `IMAGE2TEXT_API_URL` から設定を読み込む
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// 送信して2xxのレスポンスだけを返す
    async fn send(&self, request: RequestBuilder, timeout: Option<Duration>) -> Result<Response> {
        let request = match timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            let err = classify(e, timeout);
            tracing::warn!(error = %err, "no response from backend");
            err
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = parse_error_response(status.as_u16(), &body);
        tracing::warn!(status = status.as_u16(), error = %err, "backend returned an error");
        Err(err)
    }

    async fn read_text(response: Response, timeout: Option<Duration>) -> Result<String> {
        response.text().await.map_err(|e| classify(e, timeout))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let timeout = self.config.request_timeout;
        let response = self.send(self.client.get(self.url(path)), timeout).await?;
        let body = Self::read_text(response, timeout).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// reqwestのエラーを分類
fn classify(err: reqwest::Error, timeout: Option<Duration>) -> Error {
    if err.is_timeout() {
        Error::Timeout(timeout.unwrap_or_default())
    } else if err.is_builder() {
        Error::Request(err.to_string())
    } else {
        Error::Network(err.to_string())
    }
}

impl OcrApi for HttpGateway {
    type Upload = UploadFile;

    async fn extract_text(&self, upload: &UploadFile, language: Language) -> Result<ExtractionResult> {
        let part = Part::bytes(upload.bytes().to_vec())
            .file_name(upload.name().to_string())
            .mime_str(upload.mime_type())
            .map_err(|e| Error::Request(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("language", language.code());

        tracing::debug!(file = upload.name(), language = %language, "POST extract-text");
        let timeout = Some(self.config.extract_timeout);
        let request = self
            .client
            .post(self.url(&endpoints::extract_text_query(language.code())))
            .multipart(form);
        let response = self.send(request, timeout).await?;
        let body = Self::read_text(response, timeout).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn list_history(&self, limit: u32, offset: u32) -> Result<Vec<HistoryItem>> {
        let page: HistoryPage = self.get_json(&endpoints::history_query(limit, offset)).await?;
        Ok(page.history)
    }

    async fn delete_history_item(&self, id: i64) -> Result<()> {
        let request = self.client.delete(self.url(&endpoints::history_item(id)));
        self.send(request, self.config.request_timeout).await?;
        Ok(())
    }

    async fn download_text(&self, id: i64) -> Result<DownloadedText> {
        let timeout = self.config.request_timeout;
        let response = self
            .send(self.client.get(self.url(&endpoints::download(id))), timeout)
            .await?;
        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_content_disposition);
        let content = Self::read_text(response, timeout).await?;
        Ok(DownloadedText { filename, content })
    }

    async fn supported_languages(&self) -> Result<SupportedLanguages> {
        self.get_json(endpoints::LANGUAGES).await
    }

    async fn health_check(&self) -> Result<HealthStatus> {
        let timeout = self.config.request_timeout;
        let response = self
            .send(self.client.get(self.url(endpoints::HEALTH)), timeout)
            .await?;
        let body = Self::read_text(response, timeout).await?;
        Ok(serde_json::from_str(&body).unwrap_or_else(|_| HealthStatus::ok()))
    }
}
