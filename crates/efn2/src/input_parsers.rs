use std::fs::File;
use std::io::{stdin, BufRead, BufReader, Cursor};
use std::path::Path;

use anyhow::{anyhow, Result};
use paste::paste;
use ef_structure::DotBracketVec;
use ef_structure::PairTable;
use ef_energy::NucleotideVec;
use ef_energy::StructureModel;

/// A sequence together with its competing structures.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureRecord {
    pub header: Option<String>,
    pub sequence: NucleotideVec,
    pub structures: Vec<DotBracketVec>,
}

impl StructureRecord {
    pub fn structure_model(&self) -> Result<StructureModel> {
        let mut model = StructureModel::new(self.sequence.clone());
        for structure in &self.structures {
            model.add_structure(PairTable::try_from(structure)?)?;
        }
        Ok(model)
    }
}

// ============================================================
//  FASTA-like parser: header, sequence, dot-bracket lines
// ============================================================

/// Reads an optional `>header`, one sequence line and at least one
/// dot-bracket line. Only the first token of each line is used. The
/// record ends at a blank line or at the next header.
pub fn read_structures<R: BufRead>(reader: R) -> Result<StructureRecord> {
    let mut header: Option<String> = None;
    let mut sequence: Option<NucleotideVec> = None;
    let mut structures: Vec<DotBracketVec> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            if structures.is_empty() {
                continue;
            } else {
                break;
            }
        }

        if line.starts_with('>') {
            if sequence.is_some() {
                break;
            }
            header = Some(line.to_string());
            continue;
        }

        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        match &sequence {
            None => sequence = Some(NucleotideVec::from_lossy(token)),
            Some(seq) => {
                let structure = DotBracketVec::try_from(token)?;
                if structure.len() != seq.len() {
                    return Err(anyhow!(
                        "Sequence length ({}) and length of structure {} ({}) do not match",
                        seq.len(),
                        structures.len() + 1,
                        structure.len()
                    ));
                }
                structures.push(structure);
            }
        }
    }

    let sequence = sequence.ok_or_else(|| anyhow!("Missing sequence line"))?;
    if structures.is_empty() {
        return Err(anyhow!("Missing structure line"));
    }

    Ok(StructureRecord { header, sequence, structures })
}

// ============================================================
//  Macro generating file/string/stdin/input helpers
// ============================================================

/// Generate input adapters for a base parser function `fn base<R: BufRead>(R) -> Result<T>`.
///
/// This expands into:
/// - `base_string(&str)`
/// - `base_file<P: AsRef<Path>>(P)`
/// - `base_stdin()`
/// - `base_input(&str)`  (dispatches "-" → stdin, otherwise → file)
///
/// Example:
/// ```ignore
/// define_input_variants!(read_structures, Result<StructureRecord>);
/// ```
macro_rules! define_input_variants {
    ($base:ident, $ret:ty) => {
        paste! {
            /// Read from a string buffer.
            pub fn [<$base _string>](s: &str) -> $ret {
                $base(Cursor::new(s))
            }

            /// Read from a file path.
            pub fn [<$base _file>]<P: AsRef<Path>>(path: P) -> $ret {
                let reader = BufReader::new(File::open(path)?);
                $base(reader)
            }

            /// Read from stdin.
            pub fn [<$base _stdin>]() -> $ret {
                let reader = BufReader::new(stdin());
                $base(reader)
            }

            /// Read either from stdin ("-") or a file path.
            pub fn [<$base _input>](s: &str) -> $ret {
                if s == "-" {
                    [<$base _stdin>]()
                } else {
                    [<$base _file>](s)
                }
            }
        }
    };
}

type StructuresResult = Result<StructureRecord>;

define_input_variants!(read_structures, StructuresResult);

/// A position ruler: a digit every ten bases and a comma in between.
pub fn ruler(len: usize) -> String {
    let mut s = String::new();
    let mut c = 0;
    for i in 0..=len {
        if i % 10 == 0 {
            let t = format!("{}", i / 10);
            c = t.len() - 1;
            s.push_str(&t);
            continue;
        } else if c > 0 {
            c -= 1;
            continue;
        }
        if i % 10 == 5 {
            s.push(',');
        } else {
            s.push('.');
        }
    }
    s
}
