//! Framescope Incremental Clustering Engine
//!
//! The central control loop of the pipeline: a single forward pass over the
//! unique frames, in input order, deciding per frame whether it joins the
//! active set, replaces an existing active frame, or is attached to one via a
//! relation edge. Candidate shortlists come from a precomputed embedding
//! distance matrix; relation decisions come from the classifier adapter.
//!
//! The pass is strictly single-threaded and order-sensitive by design:
//! reordering the input changes the result, so inputs are processed in a
//! fixed canonical order for reproducibility.

#![warn(missing_docs)]

pub mod distance;
pub mod engine;
pub mod error;

pub use distance::DistanceMatrix;
pub use engine::{ClusterEngine, ClusterOutcome, EngineConfig};
pub use error::EngineError;
