/// Collapses runs of whitespace (including newlines) into single spaces and trims.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].trim_end(),
        None => text,
    }
}

/// Renders HTML to plain text (tags dropped, entities decoded) and collapses whitespace.
///
/// Input that fails to render is returned with whitespace collapsed only.
pub fn strip_html(html: &str) -> String {
    match html2text::from_read(html.as_bytes(), usize::MAX) {
        Ok(text) => collapse_whitespace(&text),
        Err(_) => collapse_whitespace(html),
    }
}

/// Lowercased word tokens. `+`, `#` and inner `.` are kept so `c++`, `c#`, `.net` and
/// `node.js` survive; trailing dots are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|token| token.trim_end_matches('.'))
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .map(str::to_lowercase)
        .collect()
}

/// Lowercases and strips punctuation except `+` and `#` (`Node.js` → `nodejs`).
pub fn normalize_term(term: &str) -> String {
    term.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '+' | '#'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns `true` if `phrase` occurs as a contiguous token run in `tokens`.
pub fn contains_phrase(tokens: &[String], phrase: &str) -> bool {
    let needle = tokenize(phrase);
    if needle.is_empty() || needle.len() > tokens.len() {
        return false;
    }
    tokens.windows(needle.len()).any(|window| window == needle.as_slice())
}
