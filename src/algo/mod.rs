//! Graph kernels shared by the graph-level and node-level feature sets.

pub mod centrality;
pub mod clique;
pub mod clustering;
pub mod connectivity;
pub mod cores;
pub mod structure;
pub mod traversal;

pub use centrality::BrandesWorkspace;
pub use traversal::{bounded_diameter, BfsStats, BfsWorkspace, DiameterBounds};
