use ef_structure::PairTable;
use crate::NearestNeighborLoop;

pub trait LoopDecomposition {
    fn for_each_loop<F: FnMut(&NearestNeighborLoop)>(&self, f: F);

    fn loops(&self) -> Vec<NearestNeighborLoop> {
        let mut out = Vec::new();
        self.for_each_loop(|l| out.push(l.clone()));
        out
    }

    fn loop_enclosed_by(&self, closing: Option<(usize, usize)>) -> NearestNeighborLoop;
}

impl LoopDecomposition for PairTable {
    /// Visits every loop exactly once, using an explicit stack of closing
    /// pairs instead of recursion. Each helix is reported one stacked pair
    /// at a time, as an interior loop without unpaired bases.
    fn for_each_loop<F: FnMut(&NearestNeighborLoop)>(&self, mut f: F) {
        let mut stack: Vec<Option<(usize, usize)>> = vec![None];
        while let Some(closing) = stack.pop() {
            let nn_loop = self.loop_enclosed_by(closing);
            match &nn_loop {
                NearestNeighborLoop::Hairpin { .. } => (),
                NearestNeighborLoop::Interior { inner, .. } => stack.push(Some(*inner)),
                NearestNeighborLoop::Multibranch { branches, .. }
                | NearestNeighborLoop::Exterior { branches } => {
                    stack.extend(branches.iter().rev().map(|&b| Some(b)));
                }
            }
            f(&nn_loop);
        }
    }

    /// Positions are 1-based. Partners outside of the scanned interval are
    /// treated as unpaired.
    fn loop_enclosed_by(&self, closing: Option<(usize, usize)>
    ) -> NearestNeighborLoop {
        let mut branches = Vec::new();

        let (mut p, j) = if let Some((i, j)) = closing {
            (i + 1, j)
        } else {
            (1, self.len() + 1)
        };

        while p < j {
            let q = self.partner(p);
            if q > p && q < j {
                branches.push((p, q));
                p = q + 1;
            } else {
                p += 1;
            }
        }
        NearestNeighborLoop::classify(closing, branches)
    }
}
