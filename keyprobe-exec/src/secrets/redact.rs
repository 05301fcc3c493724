use keyprobe_core::variables::masked_placeholder;
use keyprobe_core::VariableSet;

pub const BODY_PREVIEW_CHARS: usize = 500;

/// Replaces every occurrence of a provided value in `text` with `***NAME***`.
///
/// Used on text the engine did not produce itself (transport errors, response bodies)
/// before it is put on a display path. Longer values are replaced first so that a value
/// containing another one is masked whole.
pub fn scrub_secrets(text: &str, vars: &VariableSet) -> String {
    let mut pairs: Vec<(&str, &str)> = vars.exposed_pairs().collect();
    pairs.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let mut out = text.to_string();
    for (name, value) in pairs {
        if out.contains(value) {
            out = out.replace(value, &masked_placeholder(name));
        }
    }
    out
}

/// First `max_chars` characters, with a marker when something was cut.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}... (truncated)", &text[..idx]),
        None => text.to_string(),
    }
}
