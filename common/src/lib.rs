//! Image2Text Common Library
//!
//! ネイティブとWeb(WASM)で共有される型・検証・ワークフロー

pub mod api;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod format;
pub mod health;
pub mod history;
pub mod language;
pub mod types;
pub mod validation;
pub mod workflow;

pub use api::{endpoints, OcrApi};
pub use clipboard::{CopyAck, COPY_ACK_DURATION};
pub use config::ClientConfig;
pub use error::{parse_error_response, Error, Result};
pub use health::{backend_available, page_alerts, BACKEND_UNAVAILABLE_MESSAGE};
pub use history::{HistoryList, HistoryViewer};
pub use language::{Language, SupportedLanguages};
pub use types::{DownloadedText, ExtractionResult, HealthStatus, HistoryItem, HistoryPage};
pub use validation::{validate_image, ImageSource, ValidationError};
pub use workflow::{ExtractionRequest, Phase, TransitionError, Workflow, WorkflowController, WorkflowState};
