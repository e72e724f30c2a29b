use crate::NearestNeighborLoop;
use crate::LoopDecomposition;
use crate::StructureModel;
use crate::Base;

/// Energy of a thermodynamically impossible configuration (dcal/mol).
pub const FORBIDDEN: i32 = 9_999_999;

pub trait EnergyModel {
    fn can_pair(&self, b1: Base, b2: Base) -> bool;

    fn min_hairpin_size(&self) -> usize;

    fn energy_of_structure<T: LoopDecomposition>(&self,
        model: &StructureModel,
        structure: &T
    ) -> i32;

    fn energy_of_loop(&self,
        model: &StructureModel,
        nn_loop: &NearestNeighborLoop
    ) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NucleotideVec;
    use Base::*;

    struct MockEnergyModel;

    impl EnergyModel for MockEnergyModel {
        fn can_pair(&self, b1: Base, b2: Base) -> bool {
            matches!((b1, b2), (A, U) | (U, A) | (C, G) | (G, C))
        }

        fn min_hairpin_size(&self) -> usize {
            3
        }

        fn energy_of_structure<T: LoopDecomposition>(
            &self,
            model: &StructureModel,
            structure: &T,
        ) -> i32 {
            let mut total = 0;
            structure.for_each_loop(|l| total += self.energy_of_loop(model, l));
            total
        }

        fn energy_of_loop(
            &self,
            _model: &StructureModel,
            nn_loop: &NearestNeighborLoop,
        ) -> i32 {
            match nn_loop {
                NearestNeighborLoop::Exterior { .. } => 0,
                _ => 5,
            }
        }
    }

    #[test]
    fn test_can_pair() {
        let model = MockEnergyModel;

        assert!(model.can_pair(A, U));
        assert!(model.can_pair(C, G));
        assert!(!model.can_pair(A, G));
        assert!(!model.can_pair(C, C));
    }

    #[test]
    fn test_min_hairpin_size() {
        let model = MockEnergyModel;
        assert_eq!(model.min_hairpin_size(), 3);
    }

    #[test]
    fn test_energy_of_structure() {
        let model = MockEnergyModel;

        struct DummyStructure;
        impl LoopDecomposition for DummyStructure {
            fn for_each_loop<F: FnMut(&NearestNeighborLoop)>(&self, mut f: F) {
                f(&NearestNeighborLoop::Exterior { branches: vec![(1, 5)] });
                f(&NearestNeighborLoop::Hairpin { closing: (1, 5) });
            }
            fn loop_enclosed_by(&self, closing: Option<(usize, usize)>) -> NearestNeighborLoop {
                NearestNeighborLoop::classify(closing, vec![])
            }
        }

        let sequence = NucleotideVec(vec![G, A, A, A, C]);
        let structure = StructureModel::new(sequence);

        let energy = model.energy_of_structure(&structure, &DummyStructure);
        assert_eq!(energy, 5);
    }

    #[test]
    fn test_forbidden_outweighs_sums() {
        let stacks = [-340, -330, -240, -210, -150];
        let total: i32 = stacks.iter().sum();
        assert!(FORBIDDEN + total > 0);
        assert_eq!(FORBIDDEN.saturating_add(FORBIDDEN), 2 * FORBIDDEN);
    }
}
