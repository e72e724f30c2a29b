use std::fmt;
use std::ops::Range;
use colored::*;

/// A loop of a secondary structure, using 1-based sequence positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NearestNeighborLoop {
    Hairpin {
        closing: (usize, usize), // (i, j)
    },
    /// Bulges, internal loops and stacked pairs (no unpaired bases).
    Interior {
        closing: (usize, usize),
        inner: (usize, usize),
    },
    Multibranch {
        closing: (usize, usize),
        //NOTE: this list must ALWAYS be in 5'->3' order.
        branches: Vec<(usize, usize)>,
    },
    Exterior {
        //NOTE: this list must ALWAYS be in 5'->3' order.
        branches: Vec<(usize, usize)>,
    },
}

impl fmt::Display for NearestNeighborLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NearestNeighborLoop::Hairpin { closing: (i, j) } => {
                write!(f, "{:<8} ({:>3}, {:>3})",
                    "Hairpin".cyan(), i, j)
            }
            NearestNeighborLoop::Interior { closing: (i, j), inner: (p, q) } => {
                let label = if self.is_stack() { "Stack" } else { "Interior" };
                write!(f, "{:<8} ({:>3}, {:>3}), ({:>3}, {:>3})",
                    label.cyan(), i, j, p, q)
            }
            NearestNeighborLoop::Multibranch { closing: (i, j), branches } => {
                write!(f, "{:<8} ({:>3}, {:>3}), {}",
                    "Multibr.".cyan().bold(), i, j,
                    branches.iter()
                    .map(|(i, j)| format!("[{:>3}, {:>3}]", i, j))
                    .collect::<Vec<_>>()
                    .join(", "))
            }
            NearestNeighborLoop::Exterior { branches } => {
                write!(f, "{:<8}             {}",
                    "Exterior".cyan().bold(),
                    branches.iter()
                    .map(|(i, j)| format!("[{:>3}, {:>3}]", i, j))
                    .collect::<Vec<_>>()
                    .join(", "))
            }
        }
    }
}

impl NearestNeighborLoop {

    /// Return all base pairs (closing, inner, and/or branches) contained in this loop.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        match self {
            NearestNeighborLoop::Hairpin { closing } => {
                vec![*closing]
            }
            NearestNeighborLoop::Interior { closing, inner } => {
                vec![*closing, *inner]
            }
            NearestNeighborLoop::Multibranch { closing, branches } => {
                let mut pairs = Vec::with_capacity(1 + branches.len());
                pairs.push(*closing);
                pairs.extend(branches.iter().cloned());
                pairs
            }
            NearestNeighborLoop::Exterior { branches } => {
                branches.clone()
            }
        }
    }

    pub fn classify(
        closing: Option<(usize, usize)>,
        branches: Vec<(usize, usize)>,
    ) -> Self {
        match closing {
            None => Self::Exterior { branches },
            Some((i, j)) => match branches.len() {
                0 => Self::Hairpin { closing: (i, j) },
                1 => Self::Interior { closing: (i, j), inner: branches[0] },
                _ => Self::Multibranch { closing: (i, j), branches },
            },
        }
    }

    pub fn closing(&self) -> Option<(usize, usize)> {
        match self { Self::Hairpin { closing }
            | Self::Interior { closing, .. }
            | Self::Multibranch { closing, .. } => Some(*closing),
            Self::Exterior { .. } => None,
        }
    }

    /// An interior loop without unpaired bases.
    pub fn is_stack(&self) -> bool {
        matches!(self, Self::Interior { closing: (i, j), inner: (p, q) }
            if *p == i + 1 && *q + 1 == *j)
    }

    /// The runs of unpaired positions of this loop in 5'->3' order. The
    /// exterior loop of a sequence of length `len` runs from 1 to `len`.
    pub fn unpaired_ranges(&self, len: usize) -> Vec<Range<usize>> {
        match self {
            Self::Hairpin { closing: (i, j) } => {
                vec![(*i + 1..*j)]
            },
            Self::Interior { closing: (i, j),  inner: (p, q) } => {
                vec![(*i + 1)..(*p), (*q + 1)..(*j)]
            },
            Self::Multibranch { closing: (i, j), branches } => {
                let mut result = vec![];
                let mut start = *i;
                for &(p, q) in branches {
                    result.push((start+1)..p);
                    start = q;
                }
                result.push((start+1)..(*j));
                result
            }
            Self::Exterior { branches } => {
                let mut result = Vec::new();
                let mut start = 1;
                for &(p, q) in branches {
                    result.push(start..p);
                    start = q+1;
                }
                result.push(start..len+1);
                result
            }
        }
    }

    pub fn unpaired_count(&self, len: usize) -> usize {
        self.unpaired_ranges(len)
            .iter()
            .map(|r| r.len())
            .sum()
    }
}
