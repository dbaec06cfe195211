//! OCR言語

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// OCR言語（固定の3種類）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "eng")]
    English,
    #[serde(rename = "hin")]
    Hindi,
    #[serde(rename = "eng+hin")]
    EnglishHindi,
}

impl Language {
    /// 表示順
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::EnglishHindi];

    /// バックエンドに送る言語コード
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "eng",
            Language::Hindi => "hin",
            Language::EnglishHindi => "eng+hin",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::EnglishHindi => "English + Hindi",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Language::English => "🇺🇸",
            Language::Hindi => "🇮🇳",
            Language::EnglishHindi => "🌐",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|l| l.code() == code)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// `GET /api/languages` のレスポンス（コード → 表示名）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupportedLanguages(pub BTreeMap<String, String>);

impl SupportedLanguages {
    pub fn covers(&self, language: Language) -> bool {
        self.0.contains_key(language.code())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
