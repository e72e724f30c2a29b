use std::fmt;

use ef_structure::PairTable;

use crate::Base;
use crate::NucleotideVec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    LengthMismatch { sequence: usize, structure: usize },
    NoSuchStructure { index: usize, count: usize },
    ForcedOutOfRange { position: usize, length: usize },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::LengthMismatch { sequence, structure } => {
                write!(f, "Structure length {} does not match sequence length {}",
                    structure, sequence)
            }
            ModelError::NoSuchStructure { index, count } => {
                write!(f, "No structure {} (model holds {} structures)", index, count)
            }
            ModelError::ForcedOutOfRange { position, length } => {
                write!(f, "Forced position {} outside of sequence 1..={}", position, length)
            }
        }
    }
}

impl std::error::Error for ModelError {}

/// Classification of the unpaired region strictly inside a closing pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopFlag {
    Free,
    /// A base forced to be double-stranded lies inside the loop.
    ForcedPaired,
    /// The loop contains an intermolecular linker.
    Intermolecular,
}

/// A sequence together with one or more competing secondary structures.
///
/// All positions are 1-based, as in connectivity tables. Linkers are the
/// positions carrying [`Base::I`], they join separate strands into one
/// sequence for intermolecular folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureModel {
    sequence: NucleotideVec,
    structures: Vec<PairTable>,
    linkers: Vec<usize>,
    forced: Vec<usize>,
}

impl StructureModel {
    pub fn new(sequence: NucleotideVec) -> Self {
        let linkers = sequence.iter()
            .enumerate()
            .filter(|&(_, &b)| b == Base::I)
            .map(|(k, _)| k + 1)
            .collect();
        Self {
            sequence,
            structures: Vec::new(),
            linkers,
            forced: Vec::new(),
        }
    }

    pub fn with_structure(mut self, structure: PairTable) -> Result<Self, ModelError> {
        self.add_structure(structure)?;
        Ok(self)
    }

    pub fn add_structure(&mut self, structure: PairTable) -> Result<(), ModelError> {
        if structure.len() != self.len() {
            return Err(ModelError::LengthMismatch {
                sequence: self.len(),
                structure: structure.len(),
            });
        }
        self.structures.push(structure);
        Ok(())
    }

    /// Mark positions that must be double-stranded. Loops containing one of
    /// them are forbidden.
    pub fn with_forced_paired(mut self, positions: &[usize]) -> Result<Self, ModelError> {
        for &p in positions {
            if p == 0 || p > self.len() {
                return Err(ModelError::ForcedOutOfRange { position: p, length: self.len() });
            }
        }
        self.forced.extend_from_slice(positions);
        self.forced.sort_unstable();
        self.forced.dedup();
        Ok(self)
    }

    pub fn sequence(&self) -> &NucleotideVec {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn num_structures(&self) -> usize {
        self.structures.len()
    }

    pub fn structures(&self) -> &[PairTable] {
        &self.structures
    }

    /// The structure with 1-based index `index`.
    pub fn structure(&self, index: usize) -> Result<&PairTable, ModelError> {
        index.checked_sub(1)
            .and_then(|k| self.structures.get(k))
            .ok_or(ModelError::NoSuchStructure {
                index,
                count: self.structures.len(),
            })
    }

    /// The base at 1-based position `pos`, `N` outside of the sequence.
    pub fn base(&self, pos: usize) -> Base {
        if pos == 0 {
            return Base::N;
        }
        self.sequence.get(pos - 1).copied().unwrap_or(Base::N)
    }

    pub fn linkers(&self) -> &[usize] {
        &self.linkers
    }

    pub fn is_intermolecular(&self) -> bool {
        !self.linkers.is_empty()
    }

    /// True if a linker lies inside the inclusive range `first..=last`.
    pub fn spans_linker(&self, first: usize, last: usize) -> bool {
        self.linkers.iter().any(|&l| first <= l && l <= last)
    }

    fn spans_forced(&self, first: usize, last: usize) -> bool {
        self.forced.iter().any(|&p| first <= p && p <= last)
    }

    /// Classify the open interval `(i, j)`.
    pub fn loop_flag(&self, i: usize, j: usize) -> LoopFlag {
        if j <= i + 1 {
            return LoopFlag::Free;
        }
        if self.spans_forced(i + 1, j - 1) {
            LoopFlag::ForcedPaired
        } else if self.spans_linker(i + 1, j - 1) {
            LoopFlag::Intermolecular
        } else {
            LoopFlag::Free
        }
    }

    /// Like [`StructureModel::loop_flag`], but only the unpaired segments
    /// `(i, p)` and `(q, j)` of an interior loop are inspected.
    pub fn interior_flag(&self, i: usize, j: usize, p: usize, q: usize) -> LoopFlag {
        match (self.loop_flag(i, p), self.loop_flag(q, j)) {
            (LoopFlag::ForcedPaired, _) | (_, LoopFlag::ForcedPaired) => LoopFlag::ForcedPaired,
            (LoopFlag::Intermolecular, _) | (_, LoopFlag::Intermolecular) => LoopFlag::Intermolecular,
            _ => LoopFlag::Free,
        }
    }
}
