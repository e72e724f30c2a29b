use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::{debug, warn};
use colored::*;

use crate::Base;
use crate::BaseGrid;
use crate::SentinelRule;
use crate::ParamError;
use crate::ParamFile;
use crate::FORBIDDEN;

/// Loop sizes covered by the loop tables, larger loops are extrapolated.
pub const MAX_LOOP: usize = 30;
/// Capacity of the tetraloop and triloop bonus tables.
pub const MAX_SPECIAL_LOOPS: usize = 100;
/// Coefficient of the logarithmic unpaired term in efn2 multiloops.
pub const EFN2_LOG_COEFFICIENT: f64 = 110.0;

/// Scalar parameters from `miscloop.dat`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MiscLoop {
    /// Jacobson-Stockmayer coefficient, already multiplied by 100.
    pub prelog: f64,
    pub max_asymmetry: i32,
    pub asymmetry: [i32; 4],
    pub multi_offset: i32,
    pub multi_per_base: i32,
    pub multi_per_helix: i32,
    pub efn2_offset: i32,
    pub efn2_per_base: i32,
    pub efn2_per_helix: i32,
    pub terminal_au: i32,
    pub gu_closure: i32,
    pub poly_c_slope: i32,
    pub poly_c_intercept: i32,
    pub poly_c_triloop: i32,
    pub intermolecular_init: i32,
    pub gail: bool,
}

/// Bonus energies for special hairpin sequences, keyed by
/// [`SpecialLoops::key`]. Lookups scan the (short) list linearly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialLoops(Vec<(u32, i32)>);

impl SpecialLoops {
    /// Encode a short sequence using positional weights 1, 5, 25, ...
    /// starting at the 5' base.
    pub fn key(bases: &[Base]) -> u32 {
        bases.iter().rev().fold(0, |acc, b| acc * 5 + b.code() as u32)
    }

    pub fn insert(&mut self, key: u32, bonus: i32) {
        self.0.push((key, bonus));
    }

    /// The bonus of the first matching entry, 0 if there is none.
    pub fn bonus(&self, key: u32) -> i32 {
        self.0.iter()
            .find(|(k, _)| *k == key)
            .map_or(0, |(_, en)| *en)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// All nearest neighbor lookup tables. Energies are in dcal/mol.
///
/// A table is built once (usually by [`ParameterTable::from_directory`])
/// and is read-only afterwards, so it can be shared between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTable {
    /// `stack.dat`
    pub stack: BaseGrid<4>,
    /// `tstackh.dat`
    pub mismatch_hairpin: BaseGrid<4>,
    /// `tstacki.dat`
    pub mismatch_interior: BaseGrid<4>,
    /// `tstackm.dat`
    pub mismatch_multi: BaseGrid<4>,
    /// `tstack.dat`, see [`ParameterTable::terminal_stack`].
    pub mismatch_exterior: BaseGrid<4>,
    /// `tstackcoax.dat`
    pub mismatch_coaxial: BaseGrid<4>,
    /// `coaxstack.dat`
    pub coaxial_mismatch: BaseGrid<4>,
    /// `coaxial.dat`
    pub coaxial: BaseGrid<4>,
    pub dangle3: BaseGrid<3>,
    pub dangle5: BaseGrid<3>,
    pub int11: BaseGrid<6>,
    pub int21: BaseGrid<7>,
    pub int22: BaseGrid<8>,
    /// Loop initiation by size, index 0 is unused.
    pub interior: [i32; MAX_LOOP + 1],
    pub bulge: [i32; MAX_LOOP + 1],
    pub hairpin: [i32; MAX_LOOP + 1],
    pub tetraloops: SpecialLoops,
    pub triloops: SpecialLoops,
    pub misc: MiscLoop,
}

impl Default for ParameterTable {
    /// A neutral table: every entry is 0.
    fn default() -> Self {
        use SentinelRule::*;
        Self {
            stack: BaseGrid::new(Strict, 0),
            mismatch_hairpin: BaseGrid::new(PairStrict, 0),
            mismatch_interior: BaseGrid::new(PairStrict, 0),
            mismatch_multi: BaseGrid::new(Neutral, 0),
            mismatch_exterior: BaseGrid::new(PairStrict, 0),
            mismatch_coaxial: BaseGrid::new(Neutral, 0),
            coaxial_mismatch: BaseGrid::new(Neutral, 0),
            coaxial: BaseGrid::new(Strict, 0),
            dangle3: BaseGrid::new(PairStrict, 0),
            dangle5: BaseGrid::new(PairStrict, 0),
            int11: BaseGrid::new(Strict, 0),
            int21: BaseGrid::new(Strict, 0),
            int22: BaseGrid::new(Strict, 0),
            interior: [0; MAX_LOOP + 1],
            bulge: [0; MAX_LOOP + 1],
            hairpin: [0; MAX_LOOP + 1],
            tetraloops: SpecialLoops::default(),
            triloops: SpecialLoops::default(),
            misc: MiscLoop::default(),
        }
    }
}

impl ParameterTable {
    /// Load all parameter files from `dir`. Every file is required.
    pub fn from_directory<P: AsRef<Path>>(dir: P) -> Result<Self, ParamError> {
        let dir = dir.as_ref();
        let missing: Vec<_> = ParamFile::ALL.iter()
            .map(|pf| dir.join(pf.file_name()))
            .filter(|path| !path.is_file())
            .collect();
        for path in &missing {
            warn!("{} missing parameter file {}", "WARNING:".red(), path.display());
        }
        if let Some(path) = missing.into_iter().next() {
            return Err(ParamError::MissingParameterFile(path));
        }

        let mut table = ParameterTable::default();
        for pf in ParamFile::ALL {
            let path = dir.join(pf.file_name());
            debug!("Reading {}", path.display());
            let reader = BufReader::new(File::open(&path)?);
            pf.parse_into(reader, &mut table)?;
        }
        debug!("Loaded {} tetraloops and {} triloops",
            table.tetraloops.len(), table.triloops.len());
        Ok(table)
    }

    fn by_size(table: &[i32; MAX_LOOP + 1], size: usize) -> i32 {
        if (1..=MAX_LOOP).contains(&size) { table[size] } else { FORBIDDEN }
    }

    pub fn get_destabilizing_energy_internal_loop(&self, size: usize) -> i32 {
        Self::by_size(&self.interior, size)
    }

    pub fn get_destabilizing_energy_bulge_loop(&self, size: usize) -> i32 {
        Self::by_size(&self.bulge, size)
    }

    pub fn get_destabilizing_energy_hairpin_loop(&self, size: usize) -> i32 {
        Self::by_size(&self.hairpin, size)
    }

    pub fn tetraloop_bonus(&self, key: u32) -> i32 {
        self.tetraloops.bonus(key)
    }

    pub fn triloop_bonus(&self, key: u32) -> i32 {
        self.triloops.bonus(key)
    }

    /// Terminal AU/GU penalty for a helix end closed by `a`-`b`.
    pub fn terminal_penalty(&self, a: Base, b: Base) -> i32 {
        if a == Base::U || b == Base::U { self.misc.terminal_au } else { 0 }
    }

    /// Terminal mismatch of pair `i`-`j` with `k` 3' of `i` and `l` 5' of
    /// `j`. A linker as one of the mismatched bases turns the mismatch
    /// into a dangling end of the other base.
    pub fn terminal_stack(&self, i: Base, j: Base, k: Base, l: Base) -> i32 {
        let key = [i, j, k, l];
        if key.contains(&Base::N) || i == Base::I || j == Base::I {
            return self.mismatch_exterior.get(key);
        }
        match (k == Base::I, l == Base::I) {
            (true, true) => 0,
            (true, false) => self.dangle5.get([i, j, l]) + self.terminal_penalty(i, j),
            (false, true) => self.dangle3.get([i, j, k]) + self.terminal_penalty(i, j),
            (false, false) => self.mismatch_exterior.get(key),
        }
    }
}
