use rayon::prelude::*;
use serde::Serialize;

use ef_structure::DotBracketVec;
use ef_energy::Efn2;
use ef_energy::ModelError;
use ef_energy::StructureModel;

/// The free energy of one structure, as reported by `efn2-eval`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyRecord {
    /// 1-based index of the structure in the input.
    pub index: usize,
    pub structure: String,
    /// kcal/mol
    pub energy: f64,
}

/// Evaluates structure `structnum` (1-based), or all structures if it is 0.
/// Structures are evaluated in parallel and returned in input order.
pub fn evaluate(
    efn2: &Efn2,
    model: &StructureModel,
    structnum: usize,
) -> Result<Vec<EnergyRecord>, ModelError> {
    let indices: Vec<usize> = if structnum == 0 {
        (1..=model.num_structures()).collect()
    } else {
        model.structure(structnum)?;
        vec![structnum]
    };

    indices.into_par_iter()
        .map(|index| -> Result<EnergyRecord, ModelError> {
            let energies = efn2.efn2(model, index)?;
            let structure = DotBracketVec::from(model.structure(index)?);
            Ok(EnergyRecord {
                index,
                structure: structure.to_string(),
                energy: energies.iter().sum::<i32>() as f64 / 100.,
            })
        })
        .collect()
}
