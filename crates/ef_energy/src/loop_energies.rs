//! Nearest neighbor energies of individual loops.
//!
//! All positions are 1-based, `(i, j)` is the closing pair of a loop and
//! `(ip, jp)` the inner pair of an interior loop.

use crate::Base;
use crate::Efn2;
use crate::LoopFlag;
use crate::LoopHelices;
use crate::SpecialLoops;
use crate::StructureModel;
use crate::EFN2_LOG_COEFFICIENT;
use crate::FORBIDDEN;
use crate::MAX_LOOP;

/// Which side of a helix end a single unpaired base stacks on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangleSide {
    /// The base following the exit base of the helix.
    Three,
    /// The base preceding the entry base of the helix.
    Five,
}

/// Number of unpaired bases charged linearly in a multiloop.
const MULTI_LINEAR_BASES: usize = 6;

impl Efn2 {
    /// Jacobson-Stockmayer extrapolation for loops larger than the tables.
    pub fn log_extrapolation(&self, size: usize) -> i32 {
        (self.params().misc.prelog * (size as f64 / MAX_LOOP as f64).ln()) as i32
    }

    /// Energy of pair `(i, j)` stacked on `(i + 1, j - 1)`.
    pub fn stacked_pair_energy(&self, model: &StructureModel, i: usize, j: usize) -> i32 {
        if i == 0 || i >= model.len() || j > model.len() || j <= i + 1 {
            return FORBIDDEN;
        }
        let b = |p| model.base(p);
        self.params().stack.get([b(i), b(j), b(i + 1), b(j - 1)])
    }

    pub fn hairpin_energy(&self, model: &StructureModel, i: usize, j: usize) -> i32 {
        if i == 0 || j < i + 4 || j > model.len() {
            return FORBIDDEN;
        }
        let p = self.params();
        let b = |pos| model.base(pos);
        let size = j - i - 1;

        match model.loop_flag(i, j) {
            LoopFlag::ForcedPaired => return FORBIDDEN,
            LoopFlag::Intermolecular => {
                return p.misc.intermolecular_init
                    + p.terminal_stack(b(i), b(j), b(i + 1), b(j - 1));
            }
            LoopFlag::Free => (),
        }

        let mismatch = p.mismatch_hairpin.get([b(i), b(j), b(i + 1), b(j - 1)]);
        let closing: &[Base] = &model.sequence()[i - 1..j];
        match size {
            3 => p.hairpin[3] + mismatch
                + p.triloop_bonus(SpecialLoops::key(closing))
                + p.terminal_penalty(b(i), b(j)),
            4 => p.hairpin[4] + mismatch
                + p.tetraloop_bonus(SpecialLoops::key(closing)),
            s if s <= MAX_LOOP => p.hairpin[s] + mismatch,
            s => p.hairpin[MAX_LOOP] + mismatch + self.log_extrapolation(s),
        }
    }

    /// Bulges, internal loops and (with no unpaired bases) stacked pairs.
    pub fn bulge_or_internal_energy(&self,
        model: &StructureModel,
        i: usize,
        j: usize,
        ip: usize,
        jp: usize,
    ) -> i32 {
        if !(i < ip && ip < jp && jp < j) || j > model.len() {
            return FORBIDDEN;
        }
        let p = self.params();
        let b = |pos| model.base(pos);
        let (s1, s2) = (ip - i - 1, j - jp - 1);

        if s1 == 0 && s2 == 0 {
            return self.stacked_pair_energy(model, i, j);
        }

        match model.interior_flag(i, j, ip, jp) {
            LoopFlag::ForcedPaired => return FORBIDDEN,
            LoopFlag::Intermolecular => {
                return p.misc.intermolecular_init
                    + p.terminal_stack(b(i), b(j), b(i + 1), b(j - 1))
                    + p.terminal_stack(b(jp), b(ip), b(jp + 1), b(ip - 1));
            }
            LoopFlag::Free => (),
        }

        if s1 == 0 || s2 == 0 {
            let size = s1 + s2;
            if size == 1 {
                return p.stack.get([b(i), b(j), b(ip), b(jp)]) + p.bulge[1];
            }
            let penalties = p.terminal_penalty(b(i), b(j)) + p.terminal_penalty(b(jp), b(ip));
            return penalties + if size <= MAX_LOOP {
                p.bulge[size]
            } else {
                p.bulge[MAX_LOOP] + self.log_extrapolation(size)
            };
        }

        match (s1, s2) {
            (1, 1) => p.int11.get([b(i), b(i + 1), b(ip), b(j), b(j - 1), b(jp)]),
            (1, 2) => p.int21.get([b(i), b(j), b(i + 1), b(j - 1), b(jp + 1), b(ip), b(jp)]),
            (2, 1) => p.int21.get([b(jp), b(ip), b(jp + 1), b(ip - 1), b(i + 1), b(j), b(i)]),
            (2, 2) => p.int22.get([b(i), b(ip), b(j), b(jp), b(i + 1), b(i + 2), b(j - 1), b(j - 2)]),
            _ => {
                let gail = p.misc.gail && ((s1 == 1 && s2 > 2) || (s2 == 1 && s1 > 2));
                let mismatches = if gail {
                    p.mismatch_interior.get([b(i), b(j), Base::A, Base::A])
                        + p.mismatch_interior.get([b(jp), b(ip), Base::A, Base::A])
                } else {
                    p.mismatch_interior.get([b(i), b(j), b(i + 1), b(j - 1)])
                        + p.mismatch_interior.get([b(jp), b(ip), b(jp + 1), b(ip - 1)])
                };
                let size = s1 + s2;
                let initiation = if size <= MAX_LOOP {
                    p.interior[size]
                } else {
                    p.interior[MAX_LOOP] + self.log_extrapolation(size)
                };
                let weight = p.misc.asymmetry[s1.min(s2).min(4) - 1];
                let asymmetry = p.misc.max_asymmetry
                    .min(s1.abs_diff(s2) as i32 * weight);
                mismatches + initiation + asymmetry
            }
        }
    }

    /// Energy of a single unpaired base stacking on the helix end
    /// `exit`-`entry`. Boundaries and linkers contribute nothing.
    pub fn dangling_end_energy(&self,
        model: &StructureModel,
        exit: usize,
        entry: usize,
        side: DangleSide,
    ) -> i32 {
        let b = |pos| model.base(pos);
        match side {
            DangleSide::Three => self.params().dangle3.get([b(exit), b(entry), b(exit + 1)]),
            DangleSide::Five => self.params().dangle5.get([b(exit), b(entry), b(entry.saturating_sub(1))]),
        }
    }

    /// Multiloop closed by `closing` with the given branches (5'->3').
    pub fn multibranch_energy(&self,
        model: &StructureModel,
        closing: (usize, usize),
        branches: &[(usize, usize)],
    ) -> i32 {
        let p = self.params();
        let helices = LoopHelices::multibranch(self, model, closing, branches);
        let initiation = if helices.spans_linker() {
            p.misc.intermolecular_init
        } else {
            let unpaired = helices.unpaired();
            p.misc.efn2_offset
                + helices.len() as i32 * p.misc.efn2_per_helix
                + self.multi_unpaired_energy(unpaired)
        };
        initiation + helices.terminal_penalties() + helices.optimal_stacking()
    }

    pub fn exterior_energy(&self, model: &StructureModel, branches: &[(usize, usize)]) -> i32 {
        let helices = LoopHelices::exterior(self, model, branches);
        helices.terminal_penalties() + helices.optimal_stacking()
    }

    fn multi_unpaired_energy(&self, unpaired: usize) -> i32 {
        let per_base = self.params().misc.efn2_per_base;
        if unpaired <= MULTI_LINEAR_BASES {
            unpaired as i32 * per_base
        } else {
            let ratio = unpaired as f64 / MULTI_LINEAR_BASES as f64;
            MULTI_LINEAR_BASES as i32 * per_base
                + (EFN2_LOG_COEFFICIENT * ratio.ln() + 0.5).floor() as i32
        }
    }
}
