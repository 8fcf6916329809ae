//! Input boundary helpers.

/// Truncate `text` to at most `max_chars` characters.
pub fn clamp_message(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
