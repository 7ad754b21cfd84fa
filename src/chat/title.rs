// ABOUTME: Conversation auto-titling from the first user message.
// ABOUTME: Short text is kept verbatim; long text is cut at the first period, then ellipsized.

const MAX_TITLE_CHARS: usize = 40;
const ELLIPSIS: &str = "...";

/// Derive a display title from a user message. Lengths count characters.
pub fn derive_title(user_text: &str) -> String {
    if user_text.chars().count() <= MAX_TITLE_CHARS {
        return user_text.to_string();
    }

    // Text opening with a period has no usable first sentence; use all of it.
    let first_sentence = user_text
        .split('.')
        .next()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(user_text);
    if first_sentence.chars().count() <= MAX_TITLE_CHARS {
        return first_sentence.to_string();
    }

    let keep = MAX_TITLE_CHARS - ELLIPSIS.len();
    let mut title: String = first_sentence.chars().take(keep).collect();
    title.push_str(ELLIPSIS);
    title
}
