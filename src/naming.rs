//! Output file naming: `<timestamp>_<prefix>_<hash><suffix>.<ext>`.

use sha2::{Digest, Sha256};
use time::macros::format_description;
use time::OffsetDateTime;

const PREFIX_MAX_CHARS: usize = 24;
const DEFAULT_PREFIX: &str = "diagram";
const HASH_HEX_DIGITS: usize = 6;

/// Current local time as `YYYYmmdd_HHMMSS`. Falls back to UTC when the
/// local offset cannot be determined.
pub fn timestamp_now() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format_timestamp(now)
}

pub fn format_timestamp(t: OffsetDateTime) -> String {
    let format = format_description!("[year][month][day]_[hour][minute][second]");
    t.format(&format).unwrap_or_default()
}

/// Alphanumeric, `-` and `_` characters of the seed's first line, at most
/// 24 of them. Empty results become `diagram`.
pub fn sanitize_prefix(seed: &str) -> String {
    let first_line = seed.trim().lines().next().unwrap_or("");
    let prefix: String = first_line
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(PREFIX_MAX_CHARS)
        .collect();
    if prefix.is_empty() {
        DEFAULT_PREFIX.to_string()
    } else {
        prefix
    }
}

/// First six hex digits of the SHA-256 of the whole seed.
pub fn content_hash(seed: &str) -> String {
    let digest = Sha256::digest(seed.as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(HASH_HEX_DIGITS);
    hash
}

pub fn output_file_name(seed: &str, timestamp: &str, suffix: &str, extension: &str) -> String {
    format!(
        "{timestamp}_{}_{}{suffix}.{extension}",
        sanitize_prefix(seed),
        content_hash(seed)
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_sanitize_prefix() {
        assert_eq!(sanitize_prefix("my-project/\n├── src"), "my-project");
        assert_eq!(sanitize_prefix("\n\n  hello world  \nx"), "helloworld");
        assert_eq!(sanitize_prefix("项目 根"), "项目根");
        assert_eq!(sanitize_prefix("├──"), "diagram");
        assert_eq!(sanitize_prefix(""), "diagram");
        assert_eq!(sanitize_prefix(&"a".repeat(40)).len(), 24);
    }

    #[test]
    fn test_content_hash() {
        // SHA-256("abc") = ba7816bf...
        assert_eq!(content_hash("abc"), "ba7816");
        assert_eq!(content_hash("root\n  a"), content_hash("root\n  a"));
        assert_ne!(content_hash("root\n  a"), content_hash("root\n  b"));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(datetime!(2024-03-05 07:08:09 UTC)), "20240305_070809");
        assert_eq!(timestamp_now().len(), 15);
    }

    #[test]
    fn test_output_file_name() {
        let name = output_file_name("abc", "20240101_000000", "_opt2", "png");
        assert_eq!(name, "20240101_000000_abc_ba7816_opt2.png");
        // Same prefix, different content: names differ by hash.
        let a = output_file_name("root\n a", "t", "", "png");
        let b = output_file_name("root\n b", "t", "", "png");
        assert_ne!(a, b);
        assert!(a.starts_with("t_root_"));
    }
}
