//! Text cleanup helpers shared across the pipeline

use regex::Regex;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+").expect("valid URL pattern"));
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9._-]+").expect("valid mention pattern"));

/// Normalize whitespace for prompt embedding: trim every line, drop blanks
pub fn format_prompt(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Scrub a source document before sending it to the model: drop URLs,
/// anonymize @-mentions, unescape ampersands
pub fn format_text(text: &str) -> String {
    let text = URL_RE.replace_all(text, "");
    let text = MENTION_RE.replace_all(text.trim(), "@USER");
    let text = text.trim().replace("&amp;", "&");
    format_prompt(&text)
}

/// Strip the verbose " between ... , as" span the classifier tends to emit
/// in its reasoning lines, keeping the clause after the comma
pub fn format_reasoning(reasoning: &str) -> String {
    let between = reasoning.find(" between");
    let as_clause = reasoning.find(", as");
    match (between, as_clause) {
        (Some(b), Some(a)) => format!("{}{}", &reasoning[..b], &reasoning[a..])
            .trim()
            .to_string(),
        _ => reasoning.trim().to_string(),
    }
}

/// Reduce a reasoning line to the clause after ", as " and sentence-case it
pub fn clean_reasoning(reasoning: &str) -> String {
    let clause = match reasoning.find(", as ") {
        Some(idx) => &reasoning[idx + ", as ".len()..],
        None => reasoning,
    };
    capitalize(clause.trim())
}

// Sentence case: first char uppercased, the rest lowercased.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
