mod nearest_neighbor_loop;
mod loop_decomposition_trait;

pub use nearest_neighbor_loop::*;
pub use loop_decomposition_trait::*;
