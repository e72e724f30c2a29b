use std::fmt;

use crate::DangleSide;
use crate::Efn2;
use crate::StructureModel;
use crate::FORBIDDEN;

/// A helix end as seen from inside a multiloop or the exterior loop.
///
/// Walking along the loop 5'->3', the loop runs into the helix at `entry`
/// and continues after `exit`. For a branch `(p, q)` that is `(p, q)`, for
/// the closing pair `(i, j)` of a multiloop it is `(j, i)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopHelix {
    pub entry: usize,
    pub exit: usize,
}

impl LoopHelix {
    pub fn branch((p, q): (usize, usize)) -> Self {
        Self { entry: p, exit: q }
    }

    pub fn closing((i, j): (usize, usize)) -> Self {
        Self { entry: j, exit: i }
    }
}

/// Interval DP over consecutive helices of a loop: `best[a][b]` is the
/// optimal stacking energy of helices `a..=b`.
///
/// For multiloops the helices form a cycle. One extra slot `n` stands for
/// helix 0 again, so that helix 0 can stack with helix `n - 1`.
pub struct CoaxialStackingDP {
    n: usize,
    circular: bool,
    slots: usize,
    best: Vec<i32>,
}

impl fmt::Debug for CoaxialStackingDP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CoaxialStackingDP (n = {}, circular = {})", self.n, self.circular)?;
        for a in 0..self.slots {
            let vals: Vec<String> = (a..self.slots)
                .map(|b| {
                    let v = self.get(a, b);
                    if v >= FORBIDDEN { "∞".to_string() } else { v.to_string() }
                })
                .collect();
            writeln!(f, "[{}] -> {}", a, vals.join(", "))?;
        }
        Ok(())
    }
}

impl CoaxialStackingDP {
    pub fn new(n: usize, circular: bool) -> Self {
        let slots = if circular && n > 0 { n + 1 } else { n };
        Self {
            n,
            circular,
            slots,
            best: vec![FORBIDDEN; slots * slots],
        }
    }

    fn idx(&self, a: usize, b: usize) -> usize {
        a * self.slots + b
    }

    fn get(&self, a: usize, b: usize) -> i32 {
        self.best[self.idx(a, b)]
    }

    fn set(&mut self, a: usize, b: usize, val: i32) {
        let idx = self.idx(a, b);
        self.best[idx] = val;
    }

    /// Fill the table bottom-up by span length. `single(h)` is the best
    /// energy of helix `h` on its own, `pair(h, wrap_add1(h))` the best
    /// energy of two neighboring helices.
    pub fn fill<S, P>(&mut self, single: S, pair: P)
    where
        S: Fn(usize) -> i32,
        P: Fn(usize, usize) -> i32,
    {
        let n = self.n;
        for a in 0..self.slots {
            self.set(a, a, single(a % n));
        }
        for span in 1..n {
            for a in 0..self.slots - span {
                let b = a + span;
                let mut best = if span == 1 {
                    pair(a % n, b % n)
                } else {
                    FORBIDDEN
                };
                for s in a..b {
                    best = best.min(self.get(a, s).saturating_add(self.get(s + 1, b)));
                }
                self.set(a, b, best);
            }
        }
    }

    pub fn minimum(&self) -> i32 {
        match self.n {
            0 => 0,
            n if self.circular => self.get(0, n - 1).min(self.get(1, n)),
            n => self.get(0, n - 1),
        }
    }
}

fn wrap_sub1(i: usize, n: usize) -> usize {
    // Avoiding modulo, which may be slow.
    if i > 0 { i - 1 } else { n - 1 }
}

fn wrap_add1(i: usize, n: usize) -> usize {
    // Avoiding modulo, which may be slow.
    if i + 1 < n { i + 1 } else { 0 }
}

/// The helices bounding a multiloop (circular) or the exterior loop
/// (linear), together with everything needed to score their stacking.
pub struct LoopHelices<'a> {
    efn2: &'a Efn2,
    model: &'a StructureModel,
    helices: Vec<LoopHelix>,
    circular: bool,
}

impl<'a> LoopHelices<'a> {
    pub fn multibranch(
        efn2: &'a Efn2,
        model: &'a StructureModel,
        closing: (usize, usize),
        branches: &[(usize, usize)],
    ) -> Self {
        let mut helices = Vec::with_capacity(1 + branches.len());
        helices.push(LoopHelix::closing(closing));
        helices.extend(branches.iter().copied().map(LoopHelix::branch));
        Self { efn2, model, helices, circular: true }
    }

    pub fn exterior(
        efn2: &'a Efn2,
        model: &'a StructureModel,
        branches: &[(usize, usize)],
    ) -> Self {
        let helices = branches.iter().copied().map(LoopHelix::branch).collect();
        Self { efn2, model, helices, circular: false }
    }

    pub fn len(&self) -> usize {
        self.helices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helices.is_empty()
    }

    /// Unpaired bases between helix `h` and the next one along the loop
    /// (the 3' end of the sequence for the last exterior helix).
    fn gap_after(&self, h: usize) -> usize {
        let n = self.len();
        let a = self.helices[h];
        if !self.circular && h + 1 == n {
            return self.model.len() - a.exit;
        }
        self.helices[wrap_add1(h, n)].entry - a.exit - 1
    }

    fn gap_before(&self, h: usize) -> usize {
        if !self.circular && h == 0 {
            return self.helices[0].entry - 1;
        }
        self.gap_after(wrap_sub1(h, self.len()))
    }

    /// Inclusive ranges of unpaired positions of the loop.
    fn gaps(&self) -> Vec<(usize, usize)> {
        let mut gaps = Vec::with_capacity(self.len() + 1);
        if let (false, Some(first)) = (self.circular, self.helices.first()) {
            gaps.push((1, first.entry - 1));
        }
        for (h, helix) in self.helices.iter().enumerate() {
            let len = self.gap_after(h);
            gaps.push((helix.exit + 1, helix.exit + len));
        }
        gaps.retain(|(first, last)| first <= last);
        gaps
    }

    pub fn unpaired(&self) -> usize {
        self.gaps().iter().map(|(first, last)| last - first + 1).sum()
    }

    pub fn spans_linker(&self) -> bool {
        self.gaps().iter().any(|&(first, last)| self.model.spans_linker(first, last))
    }

    pub fn terminal_penalties(&self) -> i32 {
        let p = self.efn2.params();
        self.helices.iter()
            .map(|h| p.terminal_penalty(self.model.base(h.entry), self.model.base(h.exit)))
            .sum()
    }

    /// Best energy of helix `h` without a coaxial partner.
    fn single(&self, h: usize) -> i32 {
        let helix = self.helices[h];
        let (before, after) = (self.gap_before(h) > 0, self.gap_after(h) > 0);
        let dangle = |side| {
            self.efn2.dangling_end_energy(self.model, helix.exit, helix.entry, side).min(0)
        };

        if !self.circular {
            let d3 = if after { dangle(DangleSide::Three) } else { 0 };
            let d5 = if before { dangle(DangleSide::Five) } else { 0 };
            return d3 + d5;
        }
        match (before, after) {
            (true, true) => {
                let b = |pos| self.model.base(pos);
                self.efn2.params().mismatch_multi.get(
                    [b(helix.exit), b(helix.entry), b(helix.exit + 1), b(helix.entry - 1)])
            }
            (false, true) => dangle(DangleSide::Three),
            (true, false) => dangle(DangleSide::Five),
            (false, false) => 0,
        }
    }

    /// Best energy of helix `a` followed by helix `b` along the loop.
    fn pair(&self, a: usize, b: usize) -> i32 {
        let p = self.efn2.params();
        let base = |pos| self.model.base(pos);
        let (ha, hb) = (self.helices[a], self.helices[b]);
        let mut best = self.single(a) + self.single(b);

        match self.gap_after(a) {
            0 => {
                best = best.min(p.coaxial.get(
                    [base(ha.entry), base(ha.exit), base(hb.entry), base(hb.exit)]));
            }
            1 => {
                let mm = ha.exit + 1;
                if self.gap_before(a) > 0 {
                    let en = p.mismatch_coaxial.get(
                            [base(ha.exit), base(ha.entry), base(mm), base(ha.entry - 1)])
                        + p.coaxial_mismatch.get(
                            [base(mm), base(ha.entry - 1), base(hb.entry), base(hb.exit)]);
                    best = best.min(en);
                }
                if self.gap_after(b) > 0 {
                    let en = p.mismatch_coaxial.get(
                            [base(mm), base(hb.exit + 1), base(hb.entry), base(hb.exit)])
                        + p.coaxial_mismatch.get(
                            [base(ha.exit), base(ha.entry), base(mm), base(hb.exit + 1)]);
                    best = best.min(en);
                }
            }
            _ => (),
        }
        best
    }

    /// Minimum over all coaxial stacking and dangle arrangements.
    pub fn optimal_stacking(&self) -> i32 {
        let mut dp = CoaxialStackingDP::new(self.len(), self.circular);
        dp.fill(|h| self.single(h), |a, b| self.pair(a, b));
        dp.minimum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Base::*;
    use crate::NucleotideVec;
    use crate::ParameterTable;

    fn model(seq: &str) -> StructureModel {
        StructureModel::new(NucleotideVec::try_from(seq).unwrap())
    }

    #[test]
    fn test_wrapping() {
        assert_eq!(wrap_add1(2, 3), 0);
        assert_eq!(wrap_add1(0, 3), 1);
        assert_eq!(wrap_sub1(0, 3), 2);
        assert_eq!(wrap_sub1(2, 3), 1);
    }

    #[test]
    fn test_linear_dp() {
        let mut dp = CoaxialStackingDP::new(3, false);
        // helices 1 and 2 stack for -50, everything else is -10 per helix
        dp.fill(|_| -10, |a, b| if (a, b) == (1, 2) { -50 } else { -20 });
        assert_eq!(dp.minimum(), -60);

        let mut dp = CoaxialStackingDP::new(0, false);
        dp.fill(|_| -10, |_, _| -20);
        assert_eq!(dp.minimum(), 0);
    }

    #[test]
    fn test_circular_dp_wraps() {
        // only the last and the first helix can stack
        let mut dp = CoaxialStackingDP::new(3, true);
        dp.fill(|_| 0, |a, b| if (a, b) == (2, 0) { -100 } else { 0 });
        assert_eq!(dp.minimum(), -100);

        let mut dp = CoaxialStackingDP::new(3, false);
        dp.fill(|_| 0, |a, b| if (a, b) == (2, 0) { -100 } else { 0 });
        assert_eq!(dp.minimum(), 0);
    }

    #[test]
    fn test_circular_dp_no_double_use() {
        // a helix can stack on one neighbor only
        let mut dp = CoaxialStackingDP::new(3, true);
        dp.fill(|_| 0, |_, _| -100);
        assert_eq!(dp.minimum(), -100);

        let mut dp = CoaxialStackingDP::new(4, true);
        dp.fill(|_| 0, |_, _| -100);
        assert_eq!(dp.minimum(), -200);
    }

    #[test]
    fn test_loop_helix_orientation() {
        assert_eq!(LoopHelix::closing((2, 22)), LoopHelix { entry: 22, exit: 2 });
        assert_eq!(LoopHelix::branch((4, 11)), LoopHelix { entry: 4, exit: 11 });
    }

    #[test]
    fn test_gaps() {
        let efn2 = Efn2::new(ParameterTable::default());
        let m = model("GGAGGAAAACCAGGAAAACCACC");
        let ml = LoopHelices::multibranch(&efn2, &m, (2, 22), &[(4, 11), (13, 20)]);
        assert_eq!(ml.len(), 3);
        assert_eq!(ml.gaps(), vec![(3, 3), (12, 12), (21, 21)]);
        assert_eq!(ml.unpaired(), 3);
        assert!(!ml.spans_linker());

        let ext = LoopHelices::exterior(&efn2, &m, &[(4, 11), (13, 20)]);
        assert_eq!(ext.gaps(), vec![(1, 3), (12, 12), (21, 23)]);
        assert_eq!(ext.unpaired(), 7);

        let ext = LoopHelices::exterior(&efn2, &m, &[(1, 23)]);
        assert!(ext.gaps().is_empty());
    }

    #[test]
    fn test_linker_in_multiloop() {
        let efn2 = Efn2::new(ParameterTable::default());
        let m = model("GGAGGAAAACCIGGAAAACCACC");
        let ml = LoopHelices::multibranch(&efn2, &m, (2, 22), &[(4, 11), (13, 20)]);
        assert!(ml.spans_linker());
    }

    #[test]
    fn test_exterior_dangles() {
        let mut table = ParameterTable::default();
        table.dangle3.set([C, G, A], -80);
        table.dangle5.set([C, G, A], -30);
        table.dangle3.set([U, A, A], 20);
        let efn2 = Efn2::new(table);

        // unpaired on both sides of a single helix
        let m = model("AGAAAACA");
        let ext = LoopHelices::exterior(&efn2, &m, &[(2, 7)]);
        assert_eq!(ext.optimal_stacking(), -110);
        // at the sequence ends nothing dangles
        let m = model("GAAAAC");
        let ext = LoopHelices::exterior(&efn2, &m, &[(1, 6)]);
        assert_eq!(ext.optimal_stacking(), 0);
        // destabilizing dangles are ignored
        let m = model("AAAAUA");
        let ext = LoopHelices::exterior(&efn2, &m, &[(1, 5)]);
        assert_eq!(ext.optimal_stacking(), 0);
    }

    #[test]
    fn test_flush_coaxial_stack() {
        let mut table = ParameterTable::default();
        table.coaxial.set([G, C, G, C], -250);
        table.dangle3.set([C, G, A], -80);
        let efn2 = Efn2::new(table);

        // two exterior helices, flush with each other
        let m = model("GAAAACGAAAAC");
        let ext = LoopHelices::exterior(&efn2, &m, &[(1, 6), (7, 12)]);
        assert_eq!(ext.optimal_stacking(), -250);

        // a single unpaired base between them prefers the dangle
        let m = model("GAAAACAGAAAAC");
        let ext = LoopHelices::exterior(&efn2, &m, &[(1, 6), (8, 13)]);
        assert_eq!(ext.optimal_stacking(), -80);
    }

    #[test]
    fn test_mismatch_mediated_stack() {
        let mut table = ParameterTable::default();
        table.mismatch_coaxial.set([C, G, A, A], -60);
        table.coaxial_mismatch.set([A, A, G, C], -40);
        let efn2 = Efn2::new(table);

        // helix a has an unpaired base on each side, one base to helix b
        let m = model("AGAAAACAGAAAAC");
        let ext = LoopHelices::exterior(&efn2, &m, &[(2, 7), (9, 14)]);
        assert_eq!(ext.optimal_stacking(), -100);
    }

    #[test]
    fn test_mismatch_after_second_helix() {
        let mut table = ParameterTable::default();
        table.mismatch_coaxial.set([A, A, G, C], -60);
        table.coaxial_mismatch.set([C, G, A, A], -40);
        // the reversed first pair must not be read
        table.coaxial_mismatch.set([G, C, A, A], 90);
        let efn2 = Efn2::new(table);

        // one base between the helices, one more after helix b
        let m = model("GAAAACAGAAAACA");
        let ext = LoopHelices::exterior(&efn2, &m, &[(1, 6), (8, 13)]);
        assert_eq!(ext.optimal_stacking(), -100);
    }
}
