//! Fence stripping for structured model output.
//!
//! Small models wrap JSON in markdown code blocks far more often than not.
//! Everything that feeds `serde_json` goes through [`strip_code_fences`] first.

/// Characters treated as stray fence marks once the real fences are gone.
pub const FENCE_CHARS: &[char] = &['`', '´'];

/// Remove markdown code fences surrounding `raw`.
///
/// Order matters: a leading ```` ```json ```` is consumed before a bare
/// ```` ``` ````, then a trailing ```` ``` ````, then any run of leftover
/// fence characters on either end. Inner content is never touched.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }

    text = text.trim_start_matches(FENCE_CHARS).trim_start();
    text = text.trim_end_matches(FENCE_CHARS).trim_end();

    text.trim()
}
