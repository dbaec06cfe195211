//! 表示用フォーマッタ

use chrono::{DateTime, NaiveDateTime};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// バイト数を読みやすい単位に（小数2桁まで、末尾の0は省く）
///
/// ```
/// use image2text_common::format::format_file_size;
///
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{} {}", trim_decimals(&format!("{:.2}", value)), SIZE_UNITS[unit])
}

/// 結果パネル用のKB表記（小数1桁）
pub fn format_kilobytes(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// 信頼度（0や非数は表示しない）
pub fn format_confidence(confidence: f64) -> Option<String> {
    if !confidence.is_finite() || confidence == 0.0 {
        return None;
    }
    Some(format!("{}%", trim_decimals(&format!("{:.2}", confidence))))
}

/// ISO 8601の日時を "Jan 5, 2025, 03:04 PM" 形式に
///
/// 解釈できない値はそのまま返す。
pub fn format_date(value: &str) -> String {
    let parsed = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"));

    match parsed {
        Ok(dt) => dt.format("%b %-d, %Y, %I:%M %p").to_string(),
        Err(_) => value.to_string(),
    }
}

/// 文字数で切り詰めて "..." を付ける
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// 元画像名の拡張子を ".txt" に置き換える
pub fn download_filename(original: &str) -> String {
    let stem = match original.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => original,
    };
    if stem.trim().is_empty() {
        "extracted_text.txt".to_string()
    } else {
        format!("{}.txt", stem)
    }
}

fn trim_decimals(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_format_file_size_caps_at_gb() {
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048 GB");
    }

    #[test]
    fn test_format_kilobytes() {
        assert_eq!(format_kilobytes(5000), "4.9 KB");
        assert_eq!(format_kilobytes(0), "0.0 KB");
    }

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(95.0).as_deref(), Some("95%"));
        assert_eq!(format_confidence(85.5).as_deref(), Some("85.5%"));
        assert_eq!(format_confidence(72.456).as_deref(), Some("72.46%"));
        assert_eq!(format_confidence(0.0), None);
        assert_eq!(format_confidence(f64::NAN), None);
    }

    #[test]
    fn test_format_date_python_isoformat() {
        assert_eq!(format_date("2025-01-05T15:04:05.123456"), "Jan 5, 2025, 03:04 PM");
        assert_eq!(format_date("2024-12-31T09:30:00"), "Dec 31, 2024, 09:30 AM");
    }

    #[test]
    fn test_format_date_rfc3339() {
        assert_eq!(format_date("2025-03-10T00:15:00+00:00"), "Mar 10, 2025, 12:15 AM");
    }

    #[test]
    fn test_format_date_invalid_passthrough() {
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("abc", 3), "abc");
        // マルチバイト文字
        assert_eq!(truncate_text("नमस्ते दुनिया", 2), "नम...");
    }

    #[test]
    fn test_download_filename() {
        assert_eq!(download_filename("receipt.jpg"), "receipt.txt");
        assert_eq!(download_filename("scan.v2.png"), "scan.v2.txt");
        assert_eq!(download_filename("noext"), "noext.txt");
        assert_eq!(download_filename(".png"), "extracted_text.txt");
        assert_eq!(download_filename(""), "extracted_text.txt");
    }
}
