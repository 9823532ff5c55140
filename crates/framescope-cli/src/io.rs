//! Line-delimited JSON artifact I/O.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// Read a JSONL file into typed records.
///
/// Blank lines are skipped; a line that fails to parse is logged and skipped
/// rather than aborting the whole file.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(record) => records.push(record),
            Err(e) => warn!("{}:{}: skipping bad line: {}", path.display(), number + 1, e),
        }
    }
    Ok(records)
}

/// Write records to a JSONL file, one object per line, creating parent
/// directories as needed.
pub fn write_jsonl<T: Serialize>(records: &[T], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use framescope_domain::Frame;

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.jsonl");
        let frames = vec![
            Frame::new(0, "Vaccines are safe", "safety claim"),
            Frame::new(1, "Mandates reduce uptake", "policy claim"),
        ];

        write_jsonl(&frames, &path).unwrap();
        let back: Vec<Frame> = read_jsonl(&path).unwrap();
        assert_eq!(frames, back);
    }

    #[test]
    fn test_bad_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.jsonl");
        fs::write(
            &path,
            "{\"text\":\"good\"}\nnot json at all\n\n{\"text\":\"also good\"}\n",
        )
        .unwrap();

        let frames: Vec<Frame> = read_jsonl(&path).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].text, "good");
        assert_eq!(frames[1].text, "also good");
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.jsonl");
        write_jsonl(&[Frame::new(0, "claim", "")], &path).unwrap();
        assert!(path.exists());
    }
}
