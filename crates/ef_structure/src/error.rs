use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum StructureError {
    UnmatchedOpen(usize),                // '(' at this position was never closed
    UnmatchedClose(usize),               // ')' at this position has no matching '('
    InvalidToken(String, String, usize), // invalid token, source and position
    InvalidPairTable(usize),             // asymmetric or self-pairing entry
    PartnerOutOfRange(usize, usize),     // position and its out-of-range partner
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureError::UnmatchedOpen(i) => {
                write!(f, "Unmatched '(' at position {}", i)
            }
            StructureError::UnmatchedClose(i) => {
                write!(f, "Unmatched ')' at position {}", i)
            }
            StructureError::InvalidToken(tok, src, i) => {
                write!(f, "Invalid {} in {} at position {}", tok, src, i)
            }
            StructureError::InvalidPairTable(i) => {
                write!(f, "Invalid entry at pair table position {}", i)
            }
            StructureError::PartnerOutOfRange(i, j) => {
                write!(f, "Position {} is paired with {}, which is outside the structure", i, j)
            }
        }
    }
}

impl std::error::Error for StructureError {}
