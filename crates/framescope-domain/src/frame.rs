//! Frame module - the fundamental unit of the pipeline

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier for a frame: its position in the unique-frame input order.
///
/// Ids are assigned once by the deduplicator and never reassigned. A frame
/// merged away during graph reduction keeps its id as a historical reference
/// inside relation edges, so an id may outlive the frame it names.
pub type FrameId = usize;

/// A frame - a short articulated claim extracted from a source document
///
/// `text` and `reasoning` are immutable after creation. `count` starts as the
/// number of duplicate raw extractions collapsed into this frame and is
/// mutated only while the relation graph is being reduced (paraphrase
/// representatives and specialization parents absorb the counts of merged
/// frames).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Position in unique-frame input order
    #[serde(default)]
    pub id: FrameId,

    /// The claim statement itself
    pub text: String,

    /// Model reasoning that accompanied the extraction
    #[serde(default, deserialize_with = "null_to_empty")]
    pub reasoning: String,

    /// Number of raw extractions collapsed into this frame
    #[serde(default = "one")]
    pub count: u64,
}

impl Frame {
    /// Create a new frame with a count of 1
    pub fn new(id: FrameId, text: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            reasoning: reasoning.into(),
            count: 1,
        }
    }
}

fn one() -> u64 {
    1
}

// Extraction records produced before any `a` line carry a null reasoning.
fn null_to_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
