/// Base, NucleotideVec, PairTypeRNA, ....
mod nucleotides;

/// Lookup tables with sentinel rules for unknown bases and linkers.
mod base_grid;

/// Parameter file parsing.
pub mod parameter_parsing;

/// The nearest neighbor parameter tables.
mod parameter_table;

/// A sequence with its competing structures.
mod structure_model;

/// Everything for loop decomposition!
mod loop_decomposition;

/// The energy model trait.
mod energy_model;

/// Energies of hairpins, stacks, bulges and internal loops.
mod loop_energies;

/// Optimal coaxial stacking in multiloops and the exterior loop.
mod coaxial_stacking;

/// The efn2 model.
mod efn2;

#[cfg(test)]
mod fixtures;

pub use nucleotides::*;
pub use base_grid::*;
pub use parameter_parsing::{ParamError, ParamFile, PAIR_ORDER};
pub use parameter_table::*;
pub use structure_model::*;
pub use loop_decomposition::*;
pub use energy_model::*;
pub use loop_energies::*;
pub use coaxial_stacking::*;
pub use efn2::*;
