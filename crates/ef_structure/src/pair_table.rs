use std::ops::Deref;
use std::convert::TryFrom;

use crate::StructureError;
use crate::{DotBracket, DotBracketVec};

/// A secondary structure as a 0-based table of pairing partners.
///
/// Energy evaluation uses connectivity table (CT) numbering, where
/// positions run from 1 to N and 0 means "unpaired". The helpers
/// [`PairTable::from_partners`], [`PairTable::partner`] and
/// [`PairTable::to_partners`] translate between the two conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairTable(pub Vec<Option<usize>>);

impl PairTable {
    /// Build a pair table from a CT-style partner list: `partners[k]` is
    /// the 1-based partner of base `k + 1`, or 0 if that base is unpaired.
    ///
    /// Symmetry is enforced, crossing pairs are not checked.
    pub fn from_partners(partners: &[usize]) -> Result<Self, StructureError> {
        let n = partners.len();
        let mut table = vec![None; n];
        for (k, &p) in partners.iter().enumerate() {
            let pos = k + 1;
            if p == 0 {
                continue;
            }
            if p > n {
                return Err(StructureError::PartnerOutOfRange(pos, p));
            }
            if p == pos || partners[p - 1] != pos {
                return Err(StructureError::InvalidPairTable(pos));
            }
            table[k] = Some(p - 1);
        }
        Ok(PairTable(table))
    }

    /// The 1-based partner of the 1-based position `pos`, 0 if `pos` is
    /// unpaired or outside of `1..=len`.
    pub fn partner(&self, pos: usize) -> usize {
        if pos == 0 || pos > self.len() {
            return 0;
        }
        self[pos - 1].map_or(0, |q| q + 1)
    }

    /// The CT-style partner list, inverse of [`PairTable::from_partners`].
    pub fn to_partners(&self) -> Vec<usize> {
        self.iter().map(|p| p.map_or(0, |q| q + 1)).collect()
    }

    pub fn num_pairs(&self) -> usize {
        self.iter().enumerate()
            .filter(|&(i, p)| matches!(p, Some(j) if *j > i))
            .count()
    }
}

impl Deref for PairTable {
    type Target = [Option<usize>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<&str> for PairTable {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        PairTable::try_from(&DotBracketVec::try_from(s)?)
    }
}

impl TryFrom<&DotBracketVec> for PairTable {
    type Error = StructureError;

    fn try_from(db: &DotBracketVec) -> Result<Self, Self::Error> {
        let mut stack: Vec<usize> = Vec::new();
        let mut table = vec![None; db.len()];

        for (i, dot) in db.iter().enumerate() {
            match dot {
                DotBracket::Open => stack.push(i),
                DotBracket::Close => {
                    let j = stack.pop().ok_or(StructureError::UnmatchedClose(i))?;
                    table[i] = Some(j);
                    table[j] = Some(i);
                }
                DotBracket::Unpaired => {}
            }
        }

        if let Some(i) = stack.pop() {
            return Err(StructureError::UnmatchedOpen(i));
        }

        Ok(PairTable(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pair_table() {
        let pt = PairTable::try_from("((..))").unwrap();
        assert_eq!(pt.len(), 6);
        assert_eq!(pt[0], Some(5));
        assert_eq!(pt[1], Some(4));
        assert_eq!(pt[2], None);
        assert_eq!(pt[3], None);
        assert_eq!(pt[4], Some(1));
        assert_eq!(pt[5], Some(0));
        assert_eq!(pt.num_pairs(), 2);
    }

    #[test]
    fn test_unmatched_open() {
        let err = PairTable::try_from("(()").unwrap_err();
        assert_eq!(format!("{}", err), "Unmatched '(' at position 0");
    }

    #[test]
    fn test_unmatched_close() {
        let err = PairTable::try_from("())").unwrap_err();
        assert_eq!(format!("{}", err), "Unmatched ')' at position 2");
    }

    #[test]
    fn test_invalid_token() {
        let err = PairTable::try_from("(x)").unwrap_err();
        assert_eq!(format!("{}", err), "Invalid character 'x' in dot-bracket at position 1");
    }

    #[test]
    fn test_one_based_partner() {
        let pt = PairTable::try_from(".((..))").unwrap();
        assert_eq!(pt.partner(0), 0);
        assert_eq!(pt.partner(1), 0);
        assert_eq!(pt.partner(2), 7);
        assert_eq!(pt.partner(7), 2);
        assert_eq!(pt.partner(3), 6);
        assert_eq!(pt.partner(4), 0);
        assert_eq!(pt.partner(8), 0);
    }

    #[test]
    fn test_from_partners() {
        let pt = PairTable::from_partners(&[0, 7, 6, 0, 0, 3, 2]).unwrap();
        assert_eq!(pt, PairTable::try_from(".((..))").unwrap());
        assert_eq!(pt.to_partners(), vec![0, 7, 6, 0, 0, 3, 2]);
    }

    #[test]
    fn test_from_partners_rejects_asymmetry() {
        let err = PairTable::from_partners(&[4, 0, 0, 2]).unwrap_err();
        assert_eq!(err, StructureError::InvalidPairTable(1));

        let err = PairTable::from_partners(&[2, 1, 3]).unwrap_err();
        assert_eq!(err, StructureError::InvalidPairTable(3));

        let err = PairTable::from_partners(&[5, 0, 0, 1]).unwrap_err();
        assert_eq!(err, StructureError::PartnerOutOfRange(1, 5));
    }
}
