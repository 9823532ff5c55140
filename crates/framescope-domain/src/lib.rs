//! Framescope Domain Layer
//!
//! Core domain model for the frame-relation pipeline: frames (short articulated
//! claims extracted from documents), typed relation edges between them, and the
//! trait interfaces to the two external collaborators (chat model, embedder).
//!
//! ## Key Concepts
//!
//! - **Frame**: a short claim with a stable integer id and an occurrence count
//! - **Relation edge**: `paraphrases` / `specializes` / `contradicts` between frames
//! - **Active set**: the frames currently eligible as relation candidates
//!
//! ## Architecture
//!
//! Infrastructure implementations (HTTP providers, parsers, the clustering
//! engine, graph reduction) live in other crates. This crate holds the shared
//! types and the collaborator traits only.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod frame;
pub mod relation;
pub mod traits;

// Re-exports for convenience
pub use frame::{Frame, FrameId};
pub use relation::{RelationEdge, RelationType};
pub use traits::{ChatMessage, ChatModel, Embedder};
