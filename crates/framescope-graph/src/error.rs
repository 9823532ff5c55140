//! Error types for graph reduction and ordering

use framescope_domain::FrameId;
use thiserror::Error;

/// Errors that can occur during reduction or ordering
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// An edge endpoint does not name a known frame
    #[error("Edge endpoint {0} does not name a known frame")]
    UnknownFrame(FrameId),

    /// Reasoning bookkeeping was not exhaustive during folding.
    ///
    /// The maps are expected to cover every edge touching a processed node;
    /// a miss means corrupted provenance and must fail loudly rather than
    /// substitute a default.
    #[error("No recorded reasoning for edge ({x}, {y})")]
    MissingReasoning {
        /// First endpoint of the missing edge
        x: FrameId,
        /// Second endpoint of the missing edge
        y: FrameId,
    },

    /// The specializes graph contains a cycle
    #[error("Cycle detected in specializes graph at frame {0}")]
    CycleDetected(FrameId),
}
