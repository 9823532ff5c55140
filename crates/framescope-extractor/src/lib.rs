//! Framescope Extraction Layer
//!
//! Everything between raw model output and typed domain objects:
//!
//! - frame extraction from `index.tag:` formatted responses
//! - exact-text deduplication into counted unique frames
//! - relation prompt construction and reply parsing (the classifier adapter)
//! - text cleanup helpers shared across the pipeline

#![warn(missing_docs)]

pub mod classifier;
pub mod error;
pub mod frames;
pub mod relations;
pub mod text;

pub use classifier::RelationClassifier;
pub use error::ExtractError;
pub use frames::{dedup_frames, parse_frames, FrameDraft};
pub use relations::{build_relation_prompt, parse_relations, RelationPrompt};
