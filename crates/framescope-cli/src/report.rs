//! Presentation helpers: hierarchy rendering and annotation export.

use crate::error::Result;
use colored::Colorize;
use framescope_domain::{Frame, FrameId};
use framescope_graph::HierarchyEntry;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column width used when wrapping frame text for display and export
pub const WRAP_WIDTH: usize = 50;

/// Greedy word wrap; words longer than `width` get their own line.
/// Width is measured in characters, not bytes.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_chars = word_chars;
        } else if current_chars + 1 + word_chars <= width {
            current.push(' ');
            current.push_str(word);
            current_chars += 1 + word_chars;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_chars = word_chars;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Render the ordered hierarchy as an indented tree, one frame per line,
/// showing the propagated count next to each frame.
pub fn render_hierarchy(
    frames: &BTreeMap<FrameId, Frame>,
    totals: &BTreeMap<FrameId, u64>,
    entries: &[HierarchyEntry],
) -> String {
    let mut out = String::new();
    for entry in entries {
        let frame = &frames[&entry.id];
        let indent = "  ".repeat(entry.depth);
        let count = format!("[{}]", totals[&entry.id]);
        out.push_str(&format!(
            "{}{} {}\n",
            indent,
            count.cyan().bold(),
            frame.text
        ));
    }
    out
}

/// One row of the annotation export
#[derive(Debug)]
pub struct AnnotationRow {
    /// Frame id, prefixed form ("F12")
    pub f_id: String,

    /// The frame's own count
    pub count: u64,

    /// Count including everything that specializes it
    pub propagated: u64,

    /// Frame text
    pub text: String,

    /// Cleaned extraction reasoning
    pub reasoning: String,
}

// Quote a CSV field when it contains a separator, quote, or newline.
fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write the annotation spreadsheet.
///
/// Trailing `good`/`known`/`better` columns are left empty for human
/// annotators to fill in.
pub fn write_annotation_csv(rows: &[AnnotationRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "f_id,count,propagated,text,reasoning,good,known,better")?;
    for row in rows {
        let text = wrap_text(&row.text, WRAP_WIDTH).join("\n");
        writeln!(
            writer,
            "{},{},{},{},{},,,",
            escape_csv(&row.f_id),
            row.count,
            row.propagated,
            escape_csv(&text),
            escape_csv(&row.reasoning),
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// One row of the relation annotation export
#[derive(Debug)]
pub struct RelationRow {
    /// Relation id, "<word>-<x>-<y>"
    pub r_id: String,

    /// Text of the x endpoint
    pub fx_text: String,

    /// Lowercase relation word
    pub relation: String,

    /// Text of the y endpoint
    pub fy_text: String,
}

// "paraphrases" -> "Paraphrases" for the human-facing column.
fn title_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Write the relation annotation spreadsheet.
///
/// A trailing `correct` column is left empty for annotators to fill in.
pub fn write_relation_csv(rows: &[RelationRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "r_id,fx_text,relation,fy_text,correct")?;
    for row in rows {
        let fx = wrap_text(&row.fx_text, WRAP_WIDTH).join("\n");
        let fy = wrap_text(&row.fy_text, WRAP_WIDTH).join("\n");
        writeln!(
            writer,
            "{},{},{},{},",
            escape_csv(&row.r_id),
            escape_csv(&fx),
            escape_csv(&title_word(&row.relation)),
            escape_csv(&fy),
        )?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 15);
        assert!(lines.iter().all(|l| l.len() <= 15));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn test_wrap_long_word_gets_own_line() {
        let lines = wrap_text("a pneumonoultramicroscopic b", 10);
        assert_eq!(lines, vec!["a", "pneumonoultramicroscopic", "b"]);
    }

    #[test]
    fn test_wrap_empty_text() {
        assert!(wrap_text("", 50).is_empty());
    }

    #[test]
    fn test_wrap_counts_characters_not_bytes() {
        // Each "éé" is 2 characters but 4 bytes; two of them plus a space
        // fit in a 5-character line.
        let lines = wrap_text("éé éé éé", 5);
        assert_eq!(lines, vec!["éé éé", "éé"]);
    }

    #[test]
    fn test_escape_csv_quotes_separators() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_render_hierarchy_indents_by_depth() {
        colored::control::set_override(false);
        let frames = BTreeMap::from([
            (0, Frame::new(0, "general claim", "")),
            (1, Frame::new(1, "specific claim", "")),
        ]);
        let totals = BTreeMap::from([(0, 5u64), (1, 2u64)]);
        let entries = vec![
            HierarchyEntry { id: 0, depth: 0 },
            HierarchyEntry { id: 1, depth: 1 },
        ];

        let rendered = render_hierarchy(&frames, &totals, &entries);
        assert_eq!(rendered, "[5] general claim\n  [2] specific claim\n");
    }

    #[test]
    fn test_annotation_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.csv");
        let rows = vec![AnnotationRow {
            f_id: "F0".to_string(),
            count: 3,
            propagated: 7,
            text: "short claim".to_string(),
            reasoning: "claim with, a comma".to_string(),
        }];

        write_annotation_csv(&rows, &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "f_id,count,propagated,text,reasoning,good,known,better"
        );
        assert_eq!(
            lines.next().unwrap(),
            "F0,3,7,short claim,\"claim with, a comma\",,,"
        );
    }

    #[test]
    fn test_relation_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relations.csv");
        let rows = vec![RelationRow {
            r_id: "contradicts-2-0".to_string(),
            fx_text: "one claim".to_string(),
            relation: "contradicts".to_string(),
            fy_text: "an opposing claim".to_string(),
        }];

        write_relation_csv(&rows, &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), "r_id,fx_text,relation,fy_text,correct");
        assert_eq!(
            lines.next().unwrap(),
            "contradicts-2-0,one claim,Contradicts,an opposing claim,"
        );
    }
}
