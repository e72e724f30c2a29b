use std::path::Path;

use log::{debug, info};
use colored::*;

use crate::Base;
use crate::EnergyModel;
use crate::LoopDecomposition;
use crate::ModelError;
use crate::NearestNeighborLoop;
use crate::PairTypeRNA;
use crate::ParamError;
use crate::ParameterTable;
use crate::StructureModel;

/// The efn2 nearest neighbor model: free energies of RNA secondary
/// structures, with coaxial stacking in multiloops and the exterior loop
/// and a logarithmic multiloop initiation term.
///
/// The parameter tables are read-only after construction, so one model
/// can evaluate many structures concurrently.
#[derive(Debug, Clone)]
pub struct Efn2 {
    params: ParameterTable,
}

impl Efn2 {
    pub fn new(params: ParameterTable) -> Self {
        Self { params }
    }

    pub fn from_directory<P: AsRef<Path>>(dir: P) -> Result<Self, ParamError> {
        Ok(Self::new(ParameterTable::from_directory(dir)?))
    }

    pub fn params(&self) -> &ParameterTable {
        &self.params
    }

    /// Free energies (dcal/mol) of the structures of `model`: the 1-based
    /// structure `structnum`, or all of them if `structnum` is 0.
    pub fn efn2(&self, model: &StructureModel, structnum: usize) -> Result<Vec<i32>, ModelError> {
        if structnum == 0 {
            return Ok(model.structures().iter()
                .map(|pt| self.energy_of_structure(model, pt))
                .collect());
        }
        let pt = model.structure(structnum)?;
        Ok(vec![self.energy_of_structure(model, pt)])
    }
}

impl EnergyModel for Efn2 {

    fn can_pair(&self, b1: Base, b2: Base) -> bool {
        PairTypeRNA::from((b1, b2)).can_pair()
    }

    fn min_hairpin_size(&self) -> usize { 3 }

    fn energy_of_structure<T: LoopDecomposition>(&self,
        model: &StructureModel,
        structure: &T
    ) -> i32 {
        let mut total: i32 = 0;
        structure.for_each_loop(|l| {
            let en = self.energy_of_loop(model, l);
            total = total.saturating_add(en);
            debug!("{} unpaired bases", l.unpaired_count(model.len()));
            info!("{:<41} {}", format!("{}:", l), format!("{:>6.2}", en as f64 / 100.).green());
        });
        total
    }

    fn energy_of_loop(&self, model: &StructureModel, nn_loop: &NearestNeighborLoop) -> i32 {
        match nn_loop {
            NearestNeighborLoop::Hairpin { closing: (i, j) } => {
                self.hairpin_energy(model, *i, *j)
            }
            NearestNeighborLoop::Interior { closing: (i, j), .. } if nn_loop.is_stack() => {
                self.stacked_pair_energy(model, *i, *j)
            }
            NearestNeighborLoop::Interior { closing: (i, j), inner: (p, q) } => {
                self.bulge_or_internal_energy(model, *i, *j, *p, *q)
            }
            NearestNeighborLoop::Multibranch { closing, branches } => {
                self.multibranch_energy(model, *closing, branches)
            }
            NearestNeighborLoop::Exterior { branches } => {
                self.exterior_energy(model, branches)
            }
        }
    }
}
