//! Frame extraction and deduplication

use framescope_domain::Frame;
use std::collections::HashMap;

/// An extracted `(text, reasoning)` pair before deduplication assigns ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDraft {
    /// The claim statement
    pub text: String,

    /// Reasoning from the most recent `a` line, empty if none preceded
    pub reasoning: String,
}

/// Parse one model response into extracted frames.
///
/// The response is expected as newline-delimited `"<index>.<tag>: <text>"`
/// lines where tag `a` carries reasoning and tag `b` carries a frame
/// statement paired with the most recent reasoning. A line whose prefix does
/// not split into `index.tag` aborts extraction for the whole response and
/// yields nothing: a malformed response contributes no frames rather than
/// partial garbage.
pub fn parse_frames(content: &str) -> Vec<FrameDraft> {
    let mut found = Vec::new();
    let mut reasoning: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let prefix = line.split(':').next().unwrap_or(line);
        let mut parts = prefix.split('.');
        let (Some(_index), Some(tag), None) = (parts.next(), parts.next(), parts.next()) else {
            return Vec::new();
        };

        let rest = line
            .get(prefix.len() + 1..)
            .map(str::trim)
            .unwrap_or_default();

        match tag {
            "a" => reasoning = Some(rest.to_string()),
            "b" => found.push(FrameDraft {
                text: rest.to_string(),
                reasoning: reasoning.clone().unwrap_or_default(),
            }),
            _ => {}
        }
    }

    found
}

/// Collapse exact-text duplicates into unique frames with occurrence counts.
///
/// Equality is byte-for-byte with no normalization. Output order is
/// first-seen order, which becomes the processing order of the clustering
/// engine, and ids are assigned by position. The first occurrence's
/// reasoning is kept.
pub fn dedup_frames(drafts: &[FrameDraft]) -> Vec<Frame> {
    let mut by_text: HashMap<&str, usize> = HashMap::new();
    let mut unique: Vec<Frame> = Vec::new();

    for draft in drafts {
        match by_text.get(draft.text.as_str()) {
            Some(&idx) => unique[idx].count += 1,
            None => {
                let id = unique.len();
                by_text.insert(draft.text.as_str(), id);
                unique.push(Frame::new(id, draft.text.clone(), draft.reasoning.clone()));
            }
        }
    }

    unique
}
