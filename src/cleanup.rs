//! Path segment sanitization.
//!
//! [`cleanup`] turns an untrusted display name into something that is safe
//! as exactly one URL path segment and one file name on every common
//! filesystem:
//!
//! 1. Leading and trailing whitespace (any char `<= ' '`) is trimmed.
//! 2. Every run of characters from `; @ & = + $ , / \ < > : * | # ? " % -`
//!    or ASCII whitespace becomes a single `-`.
//! 3. If that leaves a single character, it is returned as is.
//! 4. Otherwise one leading and one trailing `-` are removed.
//! 5. The result is cut to 255 characters (chars, not bytes).
//! 6. All trailing `.` are removed.
//!
//! The hyphen is part of the replaced set, so `a - b` and `a-b` both become
//! `a-b`. Existing URLs depend on that collapsing.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::Locale;

/// Longest segment we emit, in characters.
pub const MAX_SEGMENT_CHARS: usize = 255;

static SPECIAL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[;@&=+$,/\\<>:*|#?"%\t\n\x0B\x0C\r \-]+"#).expect("special char pattern is valid")
});

/// Sanitize `name` for use as one path segment.
///
/// `locale` is the language the name was built for. No rule depends on it
/// yet.
pub fn cleanup(name: &str, _locale: &Locale) -> String {
    let trimmed = name.trim_matches(|c: char| c <= ' ');

    let mut cleaned = if SPECIAL_CHARS.is_match(trimmed) {
        let replaced = SPECIAL_CHARS.replace_all(trimmed, "-");
        if replaced.chars().count() == 1 {
            return replaced.into_owned();
        }
        let without_lead = replaced.strip_prefix('-').unwrap_or(&replaced);
        without_lead
            .strip_suffix('-')
            .unwrap_or(without_lead)
            .to_string()
    } else {
        trimmed.to_string()
    };

    if let Some((cut, _)) = cleaned.char_indices().nth(MAX_SEGMENT_CHARS) {
        cleaned.truncate(cut);
    }

    let kept = cleaned.trim_end_matches('.').len();
    cleaned.truncate(kept);
    cleaned
}
