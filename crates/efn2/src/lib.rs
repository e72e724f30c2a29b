//! # efn2
//!
//! Free energy evaluation of RNA secondary structures with the efn2
//! nearest neighbor model.
//!
//! This crate re-exports the main functionality from its submodules.

pub mod input_parsers;
pub mod energy_parsers;
pub mod evaluation;

pub mod structure {
    pub use ::ef_structure::*;
}

pub mod energy {
    pub use ::ef_energy::*;
}
