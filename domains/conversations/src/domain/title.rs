//! Conversation title derivation from the first user message

/// Placeholder used when the first sentence is blank
pub const PLACEHOLDER_TITLE: &str = "新しい相談";

const MAX_TITLE_CHARS: usize = 30;

/// Derive a short title from the first sentence of `raw`.
///
/// Splits on `。` `．` `.` and line breaks (`\n` or `\r`), trims the first segment, and truncates
/// to 30 characters followed by `...`.
pub fn derive_title(raw: &str) -> String {
    let first = raw
        .split(['。', '．', '.', '\n', '\r'])
        .next()
        .map(str::trim)
        .unwrap_or_default();

    if first.is_empty() {
        return PLACEHOLDER_TITLE.to_string();
    }

    if first.chars().count() > MAX_TITLE_CHARS {
        let mut title: String = first.chars().take(MAX_TITLE_CHARS).collect();
        title.push_str("...");
        title
    } else {
        first.to_string()
    }
}
