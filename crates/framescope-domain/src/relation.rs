//! Relation module - typed edges between frames

use super::FrameId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Type of relation between two frames
///
/// The classifier emits a closed set of relation words, but its output is
/// free text; anything outside the known set is preserved verbatim as
/// `Other` so it can be logged and recorded without being acted on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelationType {
    /// Both frames express the same claim in different words
    Paraphrases,

    /// Frame x is a more specific instance of frame y
    Specializes,

    /// The two frames assert incompatible claims
    Contradicts,

    /// Unrecognized relation word from the classifier, kept as-is
    Other(String),
}

impl RelationType {
    /// Parse a (lowercased) relation word
    pub fn from_word(word: &str) -> Self {
        match word {
            "paraphrases" => RelationType::Paraphrases,
            "specializes" => RelationType::Specializes,
            "contradicts" => RelationType::Contradicts,
            other => RelationType::Other(other.to_string()),
        }
    }

    /// The relation word as serialized on the wire
    pub fn as_str(&self) -> &str {
        match self {
            RelationType::Paraphrases => "paraphrases",
            RelationType::Specializes => "specializes",
            RelationType::Contradicts => "contradicts",
            RelationType::Other(word) => word,
        }
    }

    /// Dispatch priority inside a single classifier response.
    ///
    /// The clustering engine acts on the first known type in this order and
    /// stops; unknown types sort last and never stop the walk.
    pub fn priority(&self) -> u8 {
        match self {
            RelationType::Paraphrases => 0,
            RelationType::Specializes => 1,
            RelationType::Contradicts => 2,
            RelationType::Other(_) => 3,
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for RelationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RelationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let word = String::deserialize(deserializer)?;
        Ok(RelationType::from_word(&word))
    }
}

/// A typed relation edge between two frames
///
/// Direction matters for `specializes` (x specializes y). For `paraphrases`
/// and `contradicts` the relation is semantically symmetric, but endpoints
/// are recorded as produced; reduction bookkeeping looks reasoning up under
/// either direction. Edges are never mutated after creation except for
/// reasoning text cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEdge {
    /// Relation type
    #[serde(rename = "type")]
    pub relation: RelationType,

    /// First endpoint (the more specific claim for `specializes`)
    pub x: FrameId,

    /// Second endpoint
    pub y: FrameId,

    /// Classifier reasoning that justified this edge
    pub reasoning: String,
}

impl RelationEdge {
    /// Create a new relation edge
    pub fn new(
        relation: RelationType,
        x: FrameId,
        y: FrameId,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            relation,
            x,
            y,
            reasoning: reasoning.into(),
        }
    }
}
