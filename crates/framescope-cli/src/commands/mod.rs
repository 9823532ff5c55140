//! Command implementations.

mod articulate;
mod order;
mod reduce;
mod relate;

pub use articulate::execute_articulate;
pub use order::execute_order;
pub use reduce::execute_reduce;
pub use relate::execute_relate;
