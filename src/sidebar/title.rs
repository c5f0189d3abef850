//! Automatic session titles.

use crate::api::DEFAULT_SESSION_TITLE;

/// Maximum length of a derived title, in characters.
pub const MAX_TITLE_CHARS: usize = 40;

/// Whether a session with this title should receive a derived title.
///
/// Only untitled sessions qualify: absent, empty, or still carrying the
/// default title. A title the user chose is never overwritten.
pub fn needs_auto_title(title: Option<&str>) -> bool {
    match title {
        None => true,
        Some(title) => title.is_empty() || title == DEFAULT_SESSION_TITLE,
    }
}

/// Derives a session title from a user message.
///
/// Hard cut at [`MAX_TITLE_CHARS`] characters, with no attempt to break
/// on a word boundary.
pub fn derive_title(message: &str) -> String {
    message.chars().take(MAX_TITLE_CHARS).collect()
}
