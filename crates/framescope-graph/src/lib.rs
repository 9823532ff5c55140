//! Framescope Relation Graph Reduction and Ordering
//!
//! Post-hoc batch algorithms over the accepted relation set:
//!
//! 1. paraphrase collapse - each connected paraphrase component is replaced
//!    by a single representative that absorbs the members' counts
//! 2. specialization folding - low-support frames are folded into their
//!    parents, rewiring contradiction edges and re-homing counts
//! 3. hierarchy ordering - a weight-first depth-first traversal of the final
//!    specialization forest for presentation
//!
//! All passes are pure functions over their inputs: safe to re-run, never
//! touching clustering state.

#![warn(missing_docs)]

pub mod error;
pub mod order;
pub mod reduce;

pub use error::GraphError;
pub use order::{order_hierarchy, propagated_counts, HierarchyEntry};
pub use reduce::{collapse_paraphrases, fold_specializations, ParaphraseCollapse, SpecializationFold, MIN_COUNT};
