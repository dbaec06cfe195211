//! アップロード → 抽出 → 結果表示 のワークフロー
//!
//! 状態遷移:
//! Idle → Selecting（画像選択）→ Processing（リクエスト中）→ Succeeded / Failed
//! Succeeded / Failed から画像選択・言語変更で Selecting に戻る。
//! Processing 中は再送信・画像削除・言語変更をすべて拒否する（キューも取消もしない）。

use thiserror::Error;

use crate::api::OcrApi;
use crate::error::Error;
use crate::language::Language;
use crate::types::ExtractionResult;
use crate::validation::{validate_source, ImageSource, ValidationError};

/// 抽出失敗時の汎用メッセージ
pub const EXTRACTION_FAILED_MESSAGE: &str = "Failed to process image. Please try again.";

/// 状態の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Selecting,
    Processing,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Selecting => "selecting",
            Phase::Processing => "processing",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 状態（成功時は結果、失敗時はメッセージを持つ）
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Selecting,
    Processing,
    Succeeded(ExtractionResult),
    Failed(String),
}

impl WorkflowState {
    pub fn phase(&self) -> Phase {
        match self {
            WorkflowState::Idle => Phase::Idle,
            WorkflowState::Selecting => Phase::Selecting,
            WorkflowState::Processing => Phase::Processing,
            WorkflowState::Succeeded(_) => Phase::Succeeded,
            WorkflowState::Failed(_) => Phase::Failed,
        }
    }
}

/// 拒否された操作
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A request is already in progress")]
    Busy,

    #[error("Please select an image first")]
    NoImage,

    #[error("Cannot submit while {0}")]
    InvalidState(Phase),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// 1回分の抽出リクエスト
#[derive(Debug, Clone)]
pub struct ExtractionRequest<I> {
    pub image: I,
    pub language: Language,
}

/// ワークフローの状態機械
///
/// `I` は画像ハンドル。画像を差し替える・外すと古いハンドルはdropされ、
/// ブラウザ版ではそのタイミングでプレビューURLが解放される。
#[derive(Debug, Clone)]
pub struct Workflow<I> {
    image: Option<I>,
    language: Language,
    state: WorkflowState,
}

impl<I> Default for Workflow<I> {
    fn default() -> Self {
        Self {
            image: None,
            language: Language::default(),
            state: WorkflowState::Idle,
        }
    }
}

impl<I: ImageSource + Clone> Workflow<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn is_processing(&self) -> bool {
        self.phase() == Phase::Processing
    }

    pub fn image(&self) -> Option<&I> {
        self.image.as_ref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn result(&self) -> Option<&ExtractionResult> {
        match &self.state {
            WorkflowState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            WorkflowState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// 送信ボタンを有効にするか
    pub fn can_submit(&self) -> bool {
        self.image.is_some() && matches!(self.phase(), Phase::Selecting | Phase::Failed)
    }

    /// 画像を選択（検証NGなら状態は変えない）
    pub fn select_image(&mut self, image: I) -> Result<(), TransitionError> {
        if self.is_processing() {
            return Err(TransitionError::Busy);
        }
        validate_source(&image)?;

        tracing::debug!(file = image.name(), size = image.size(), "image selected");
        self.image = Some(image);
        self.state = WorkflowState::Selecting;
        Ok(())
    }

    /// 画像を外す
    pub fn remove_image(&mut self) -> Result<(), TransitionError> {
        if self.is_processing() {
            return Err(TransitionError::Busy);
        }
        self.image = None;
        self.state = WorkflowState::Idle;
        Ok(())
    }

    /// 言語を変更（結果・エラー表示中なら選択状態に戻す）
    pub fn set_language(&mut self, language: Language) -> Result<(), TransitionError> {
        if self.is_processing() {
            return Err(TransitionError::Busy);
        }
        self.language = language;
        if matches!(self.phase(), Phase::Succeeded | Phase::Failed) {
            self.state = if self.image.is_some() {
                WorkflowState::Selecting
            } else {
                WorkflowState::Idle
            };
        }
        Ok(())
    }

    /// 送信開始（Selecting / Failed からのみ）
    ///
    /// 結果とエラーをクリアして Processing に入る。
    pub fn begin_submit(&mut self) -> Result<ExtractionRequest<I>, TransitionError> {
        if self.is_processing() {
            return Err(TransitionError::Busy);
        }
        let Some(image) = self.image.clone() else {
            return Err(TransitionError::NoImage);
        };
        if !matches!(self.phase(), Phase::Selecting | Phase::Failed) {
            return Err(TransitionError::InvalidState(self.phase()));
        }

        tracing::debug!(file = image.name(), language = %self.language, "extraction started");
        self.state = WorkflowState::Processing;
        Ok(ExtractionRequest {
            image,
            language: self.language,
        })
    }

    /// レスポンスを反映（Processing 以外では無視）
    pub fn finish(&mut self, outcome: Result<ExtractionResult, Error>) -> Phase {
        if !self.is_processing() {
            tracing::debug!(phase = %self.phase(), "ignoring stale extraction outcome");
            return self.phase();
        }

        self.state = match outcome {
            Ok(result) => WorkflowState::Succeeded(result),
            Err(err) => {
                tracing::warn!(error = %err, "extraction failed");
                let message = err.user_message(EXTRACTION_FAILED_MESSAGE);
                if message.trim().is_empty() {
                    WorkflowState::Failed(EXTRACTION_FAILED_MESSAGE.to_string())
                } else {
                    WorkflowState::Failed(message)
                }
            }
        };
        self.phase()
    }

    /// 初期状態に戻す
    pub fn reset(&mut self) {
        self.image = None;
        self.state = WorkflowState::Idle;
    }
}

/// ゲートウェイを注入したワークフロー
///
/// `submit`は`&mut self`を取るので、同じコントローラで同時に2件は飛ばない。
pub struct WorkflowController<A: OcrApi> {
    api: A,
    workflow: Workflow<A::Upload>,
}

impl<A: OcrApi> WorkflowController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            workflow: Workflow::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn workflow(&self) -> &Workflow<A::Upload> {
        &self.workflow
    }

    pub fn workflow_mut(&mut self) -> &mut Workflow<A::Upload> {
        &mut self.workflow
    }

    /// 送信 → 1回だけ抽出API → 結果反映
    ///
    /// 拒否された場合はAPIを呼ばない。
    pub async fn submit(&mut self) -> Result<Phase, TransitionError> {
        let request = self.workflow.begin_submit()?;
        let outcome = self
            .api
            .extract_text(&request.image, request.language)
            .await;
        Ok(self.workflow.finish(outcome))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::{Cell, RefCell};

    use crate::api::OcrApi;
    use crate::error::{Error, Result};
    use crate::language::{Language, SupportedLanguages};
    use crate::types::{DownloadedText, ExtractionResult, HealthStatus, HistoryItem};
    use crate::validation::ImageSource;

    #[derive(Debug, Clone, PartialEq)]
    pub struct TestImage {
        pub name: String,
        pub size: u64,
        pub mime: String,
    }

    impl TestImage {
        pub fn new(name: &str, size: u64, mime: &str) -> Self {
            Self {
                name: name.to_string(),
                size,
                mime: mime.to_string(),
            }
        }

        pub fn jpeg(name: &str) -> Self {
            Self::new(name, 5 * 1024 * 1024, "image/jpeg")
        }
    }

    impl ImageSource for TestImage {
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

    pub fn history_item(id: i64) -> HistoryItem {
        HistoryItem {
            id,
            filename: format!("scan_{}.png", id),
            language: "eng".to_string(),
            extracted_text: format!("text {}", id),
            full_text: format!("full text {}", id),
            created_at: "2025-01-05T15:04:05".to_string(),
            file_size: Some(1024),
            processing_time: Some("0.42s".to_string()),
        }
    }

    /// 呼び出し回数を記録するモック
    #[derive(Default)]
    pub struct MockApi {
        pub extract_calls: RefCell<Vec<(String, Language)>>,
        pub extract_outcome: RefCell<Option<Result<ExtractionResult>>>,
        pub history: RefCell<Vec<HistoryItem>>,
        pub history_error: RefCell<Option<Error>>,
        pub delete_error: RefCell<Option<Error>>,
        pub download_error: RefCell<Option<Error>>,
        pub delete_calls: Cell<usize>,
        pub health_error: RefCell<Option<Error>>,
    }

    impl OcrApi for MockApi {
        type Upload = TestImage;

        async fn extract_text(
            &self,
            upload: &TestImage,
            language: Language,
        ) -> Result<ExtractionResult> {
            self.extract_calls
                .borrow_mut()
                .push((upload.name.clone(), language));
            self.extract_outcome
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Ok(ExtractionResult::default()))
        }

        async fn list_history(&self, limit: u32, offset: u32) -> Result<Vec<HistoryItem>> {
            if let Some(err) = self.history_error.borrow_mut().take() {
                return Err(err);
            }
            Ok(self
                .history
                .borrow()
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn delete_history_item(&self, id: i64) -> Result<()> {
            self.delete_calls.set(self.delete_calls.get() + 1);
            if let Some(err) = self.delete_error.borrow_mut().take() {
                return Err(err);
            }
            self.history.borrow_mut().retain(|item| item.id != id);
            Ok(())
        }

        async fn download_text(&self, id: i64) -> Result<DownloadedText> {
            if let Some(err) = self.download_error.borrow_mut().take() {
                return Err(err);
            }
            Ok(DownloadedText {
                filename: None,
                content: format!("full text {}", id),
            })
        }

        async fn supported_languages(&self) -> Result<SupportedLanguages> {
            Ok(SupportedLanguages::default())
        }

        async fn health_check(&self) -> Result<HealthStatus> {
            if let Some(err) = self.health_error.borrow_mut().take() {
                return Err(err);
            }
            Ok(HealthStatus::ok())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{MockApi, TestImage};
    use super::*;
    use crate::error::NETWORK_ERROR_MESSAGE;
    use futures::executor::block_on;

    fn hello_result() -> ExtractionResult {
        ExtractionResult {
            extracted_text: "Hello".to_string(),
            confidence: Some(95.0),
            language: "eng".to_string(),
            filename: "photo.jpg".to_string(),
            ..Default::default()
        }
    }

    // =============================================
    // 状態機械
    // =============================================

    #[test]
    fn test_initial_state() {
        let wf: Workflow<TestImage> = Workflow::new();
        assert_eq!(wf.phase(), Phase::Idle);
        assert_eq!(wf.language(), Language::English);
        assert!(!wf.can_submit());
    }

    #[test]
    fn test_select_image_moves_to_selecting() {
        let mut wf = Workflow::new();
        wf.select_image(TestImage::jpeg("photo.jpg")).expect("選択失敗");
        assert_eq!(wf.phase(), Phase::Selecting);
        assert!(wf.can_submit());
    }

    #[test]
    fn test_rejected_gif_leaves_state_unchanged() {
        let mut wf = Workflow::new();
        let err = wf
            .select_image(TestImage::new("anim.gif", 1024, "image/gif"))
            .unwrap_err();
        assert!(matches!(err, TransitionError::Invalid(ValidationError::UnsupportedType { .. })));
        assert_eq!(wf.phase(), Phase::Idle);
        assert!(wf.image().is_none());
    }

    #[test]
    fn test_rejected_file_keeps_previous_selection() {
        let mut wf = Workflow::new();
        wf.select_image(TestImage::jpeg("first.jpg")).expect("選択失敗");
        let huge = TestImage::new("huge.png", 21 * 1024 * 1024, "image/png");
        assert!(wf.select_image(huge).is_err());
        assert_eq!(wf.image().map(|i| i.name.as_str()), Some("first.jpg"));
        assert_eq!(wf.phase(), Phase::Selecting);
    }

    #[test]
    fn test_submit_without_image() {
        let mut wf: Workflow<TestImage> = Workflow::new();
        assert_eq!(wf.begin_submit().unwrap_err(), TransitionError::NoImage);
        assert_eq!(wf.phase(), Phase::Idle);
        assert_eq!(
            TransitionError::NoImage.to_string(),
            "Please select an image first"
        );
    }

    #[test]
    fn test_processing_blocks_everything() {
        let mut wf = Workflow::new();
        wf.select_image(TestImage::jpeg("photo.jpg")).expect("選択失敗");
        wf.begin_submit().expect("送信失敗");
        assert_eq!(wf.phase(), Phase::Processing);
        assert!(!wf.can_submit());

        assert_eq!(wf.begin_submit().unwrap_err(), TransitionError::Busy);
        assert_eq!(wf.remove_image().unwrap_err(), TransitionError::Busy);
        assert_eq!(wf.set_language(Language::Hindi).unwrap_err(), TransitionError::Busy);
        assert_eq!(
            wf.select_image(TestImage::jpeg("other.jpg")).unwrap_err(),
            TransitionError::Busy
        );
        assert_eq!(wf.phase(), Phase::Processing);
        assert_eq!(wf.language(), Language::English);
    }

    #[test]
    fn test_finish_success() {
        let mut wf = Workflow::new();
        wf.select_image(TestImage::jpeg("photo.jpg")).expect("選択失敗");
        wf.begin_submit().expect("送信失敗");
        assert_eq!(wf.finish(Ok(hello_result())), Phase::Succeeded);
        assert_eq!(wf.result().map(|r| r.extracted_text.as_str()), Some("Hello"));
        assert!(wf.error().is_none());
        // 同じ画像での再送信はできない
        assert_eq!(
            wf.begin_submit().unwrap_err(),
            TransitionError::InvalidState(Phase::Succeeded)
        );
    }

    #[test]
    fn test_finish_failure_messages() {
        let cases = [
            (
                Error::Server { status: 400, detail: Some("Invalid image file".into()) },
                "Invalid image file",
            ),
            (Error::Network("refused".into()), NETWORK_ERROR_MESSAGE),
            (Error::Decode("bad".into()), EXTRACTION_FAILED_MESSAGE),
            (Error::Server { status: 500, detail: None }, EXTRACTION_FAILED_MESSAGE),
        ];

        for (err, expected) in cases {
            let mut wf = Workflow::new();
            wf.select_image(TestImage::jpeg("photo.jpg")).expect("選択失敗");
            wf.begin_submit().expect("送信失敗");
            assert_eq!(wf.finish(Err(err)), Phase::Failed);
            assert_eq!(wf.error(), Some(expected));
            assert!(wf.result().is_none());
        }
    }

    #[test]
    fn test_finish_ignored_outside_processing() {
        let mut wf = Workflow::new();
        wf.select_image(TestImage::jpeg("photo.jpg")).expect("選択失敗");
        assert_eq!(wf.finish(Ok(hello_result())), Phase::Selecting);
        assert!(wf.result().is_none());
    }

    #[test]
    fn test_retry_from_failed() {
        let mut wf = Workflow::new();
        wf.select_image(TestImage::jpeg("photo.jpg")).expect("選択失敗");
        wf.begin_submit().expect("送信失敗");
        wf.finish(Err(Error::Network("down".into())));
        assert!(wf.can_submit());
        wf.begin_submit().expect("再送信失敗");
        assert_eq!(wf.phase(), Phase::Processing);
        assert!(wf.error().is_none());
    }

    #[test]
    fn test_new_upload_after_result_returns_to_selecting() {
        let mut wf = Workflow::new();
        wf.select_image(TestImage::jpeg("photo.jpg")).expect("選択失敗");
        wf.begin_submit().expect("送信失敗");
        wf.finish(Ok(hello_result()));
        wf.select_image(TestImage::jpeg("next.jpg")).expect("選択失敗");
        assert_eq!(wf.phase(), Phase::Selecting);
        assert!(wf.result().is_none());
    }

    #[test]
    fn test_language_change_after_result() {
        let mut wf = Workflow::new();
        wf.select_image(TestImage::jpeg("photo.jpg")).expect("選択失敗");
        wf.begin_submit().expect("送信失敗");
        wf.finish(Err(Error::Network("down".into())));
        wf.set_language(Language::EnglishHindi).expect("言語変更失敗");
        assert_eq!(wf.phase(), Phase::Selecting);
        assert!(wf.error().is_none());
        assert_eq!(wf.language(), Language::EnglishHindi);
    }

    #[test]
    fn test_language_change_while_idle_stays_idle() {
        let mut wf: Workflow<TestImage> = Workflow::new();
        wf.set_language(Language::Hindi).expect("言語変更失敗");
        assert_eq!(wf.phase(), Phase::Idle);
    }

    #[test]
    fn test_remove_and_reset() {
        let mut wf = Workflow::new();
        wf.select_image(TestImage::jpeg("photo.jpg")).expect("選択失敗");
        wf.remove_image().expect("削除失敗");
        assert_eq!(wf.phase(), Phase::Idle);
        assert!(wf.image().is_none());

        wf.select_image(TestImage::jpeg("photo.jpg")).expect("選択失敗");
        wf.reset();
        assert_eq!(wf.phase(), Phase::Idle);
        assert!(wf.image().is_none());
    }

    // =============================================
    // コントローラ
    // =============================================

    #[test]
    fn test_controller_submit_sends_one_request() {
        let api = MockApi::default();
        *api.extract_outcome.borrow_mut() = Some(Ok(hello_result()));
        let mut controller = WorkflowController::new(api);

        controller
            .workflow_mut()
            .select_image(TestImage::jpeg("photo.jpg"))
            .expect("選択失敗");
        let phase = block_on(controller.submit()).expect("送信失敗");

        assert_eq!(phase, Phase::Succeeded);
        let calls = controller.api().extract_calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], ("photo.jpg".to_string(), Language::English));
        assert_eq!(
            controller.workflow().result().and_then(|r| r.confidence),
            Some(95.0)
        );
    }

    #[test]
    fn test_controller_refused_submit_makes_no_call() {
        let mut controller = WorkflowController::new(MockApi::default());
        let err = block_on(controller.submit()).unwrap_err();
        assert_eq!(err, TransitionError::NoImage);
        assert!(controller.api().extract_calls.borrow().is_empty());
    }

    #[test]
    fn test_controller_uses_selected_language() {
        let mut controller = WorkflowController::new(MockApi::default());
        let wf = controller.workflow_mut();
        wf.select_image(TestImage::jpeg("hindi.png")).expect("選択失敗");
        wf.set_language(Language::Hindi).expect("言語変更失敗");
        block_on(controller.submit()).expect("送信失敗");
        assert_eq!(
            controller.api().extract_calls.borrow()[0].1,
            Language::Hindi
        );
    }

    #[test]
    fn test_controller_failure_surfaces_detail() {
        let api = MockApi::default();
        *api.extract_outcome.borrow_mut() = Some(Err(Error::Server {
            status: 500,
            detail: Some("OCR processing failed: tesseract missing".into()),
        }));
        let mut controller = WorkflowController::new(api);
        controller
            .workflow_mut()
            .select_image(TestImage::jpeg("photo.jpg"))
            .expect("選択失敗");
        assert_eq!(block_on(controller.submit()), Ok(Phase::Failed));
        assert_eq!(
            controller.workflow().error(),
            Some("OCR processing failed: tesseract missing")
        );
    }
}
