//! Image2Text ネイティブクライアント
//!
//! OCRバックエンドのREST APIを`reqwest`で呼び出す`OcrApi`実装。
//! ワークフローと履歴のロジックは`image2text-common`を使う。

pub mod gateway;
pub mod upload;

pub use gateway::HttpGateway;
pub use image2text_common as common;
pub use upload::UploadFile;
