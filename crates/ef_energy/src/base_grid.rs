use crate::Base;
use crate::FORBIDDEN;

/// How a lookup involving an unknown base (`N`) or a linker (`I`) is
/// answered. The parameter files only list real bases, so these values are
/// never read from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelRule {
    /// Unknown bases are neutral, a linker anywhere is forbidden.
    Strict,
    /// Unknown bases are neutral, a linker in the closing pair (the first
    /// two indices) is forbidden, a linker elsewhere is neutral.
    PairStrict,
    /// Every sentinel is neutral.
    Neutral,
}

impl SentinelRule {
    /// The energy for a key containing a sentinel, `None` if every base is
    /// real and the table has to be consulted.
    pub fn resolve(&self, key: &[Base]) -> Option<i32> {
        if key.contains(&Base::N) {
            return Some(0);
        }
        if !key.contains(&Base::I) {
            return None;
        }
        Some(match self {
            SentinelRule::Strict => FORBIDDEN,
            SentinelRule::Neutral => 0,
            SentinelRule::PairStrict => {
                if key[..2].contains(&Base::I) { FORBIDDEN } else { 0 }
            }
        })
    }
}

/// A dense `D`-dimensional energy table over the four real bases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseGrid<const D: usize> {
    cells: Vec<i32>,
    rule: SentinelRule,
}

impl<const D: usize> BaseGrid<D> {
    pub fn new(rule: SentinelRule, fill: i32) -> Self {
        Self {
            cells: vec![fill; 4usize.pow(D as u32)],
            rule,
        }
    }

    fn offset(key: &[Base; D]) -> Option<usize> {
        key.iter().try_fold(0, |acc, b| b.real_index().map(|r| acc * 4 + r))
    }

    pub fn get(&self, key: [Base; D]) -> i32 {
        match self.rule.resolve(&key) {
            Some(en) => en,
            None => Self::offset(&key).map_or(0, |o| self.cells[o]),
        }
    }

    /// Store a value for a key of real bases. Keys containing sentinels
    /// are answered by the rule and cannot be overwritten.
    pub fn set(&mut self, key: [Base; D], value: i32) {
        if let Some(o) = Self::offset(&key) {
            self.cells[o] = value;
        }
    }

    /// Iterate over all stored (non-sentinel) cells.
    pub fn values(&self) -> impl Iterator<Item = i32> + '_ {
        self.cells.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Base::*;

    #[test]
    fn test_grid_get_set() {
        let mut grid = BaseGrid::<4>::new(SentinelRule::Strict, 0);
        grid.set([C, G, G, C], -330);
        assert_eq!(grid.get([C, G, G, C]), -330);
        assert_eq!(grid.get([G, C, C, G]), 0);
        assert_eq!(grid.values().count(), 256);
    }

    #[test]
    fn test_strict_rule() {
        let mut grid = BaseGrid::<4>::new(SentinelRule::Strict, 0);
        grid.set([A, U, A, U], -90);
        assert_eq!(grid.get([A, U, N, U]), 0);
        assert_eq!(grid.get([A, U, I, U]), FORBIDDEN);
        assert_eq!(grid.get([I, U, N, U]), 0);
    }

    #[test]
    fn test_pair_strict_rule() {
        let grid = BaseGrid::<4>::new(SentinelRule::PairStrict, 7);
        assert_eq!(grid.get([A, U, G, G]), 7);
        assert_eq!(grid.get([A, I, G, G]), FORBIDDEN);
        assert_eq!(grid.get([A, U, I, G]), 0);
        assert_eq!(grid.get([A, U, G, I]), 0);
        assert_eq!(grid.get([N, I, G, G]), 0);
    }

    #[test]
    fn test_neutral_rule() {
        let grid = BaseGrid::<3>::new(SentinelRule::Neutral, FORBIDDEN);
        assert_eq!(grid.get([A, U, G]), FORBIDDEN);
        assert_eq!(grid.get([I, U, G]), 0);
        assert_eq!(grid.get([A, N, G]), 0);
    }

    #[test]
    fn test_sentinel_keys_are_not_stored() {
        let mut grid = BaseGrid::<2>::new(SentinelRule::Neutral, 1);
        grid.set([A, I], 50);
        assert!(grid.values().all(|v| v == 1));
    }
}
