/// Characters kept in a group title.
fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || c == '-'
}

/// Turns a stage marker such as `{ (Unit tests)` into a group title.
///
/// Distinct markers may sanitize to the same title; they are not deduplicated.
pub fn stage_title(marker: &str) -> String {
    marker
        .chars()
        .filter(|&c| is_allowed(c))
        .collect::<String>()
        .trim()
        .to_string()
}
