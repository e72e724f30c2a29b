//! Readers for the sixteen nearest neighbor parameter files.
//!
//! Every file is read as a stream of whitespace separated tokens. Tokens
//! that look like numbers (or a lone `.`, which marks a forbidden entry)
//! are *cells*; everything else is header or label text. A grid file must
//! contain exactly the number of cells its schema expects, so a drifted
//! layout is reported instead of silently shifting table columns.

use std::fmt;
use std::io::BufRead;
use std::path::PathBuf;

use crate::Base;
use crate::Base::*;
use crate::REAL_BASES;
use crate::FORBIDDEN;
use crate::NucleotideVec;
use crate::BaseGrid;
use crate::SentinelRule;
use crate::ParameterTable;
use crate::SpecialLoops;
use crate::MAX_LOOP;
use crate::MAX_SPECIAL_LOOPS;

#[derive(Debug)]
pub enum ParamError {
    Io(std::io::Error),
    MissingParameterFile(PathBuf),
    MalformedParameterFile { file: String, reason: String },
}

impl std::error::Error for ParamError {}

impl From<std::io::Error> for ParamError {
    fn from(e: std::io::Error) -> Self {
        ParamError::Io(e)
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::Io(e) => write!(f, "I/O error: {}", e),
            ParamError::MissingParameterFile(path) => {
                write!(f, "Missing parameter file: {}", path.display())
            }
            ParamError::MalformedParameterFile { file, reason } => {
                write!(f, "Malformed parameter file '{}': {}", file, reason)
            }
        }
    }
}

fn malformed(file: &str, reason: impl Into<String>) -> ParamError {
    ParamError::MalformedParameterFile {
        file: file.to_string(),
        reason: reason.into(),
    }
}

/// The closing pairs of the small internal loop tables, in file order.
pub const PAIR_ORDER: [(Base, Base); 6] = [(A, U), (C, G), (G, C), (U, A), (G, U), (U, G)];

/// Convert a value in kcal/mol to an integer in dcal/mol, rounding half up.
pub fn to_energy(x: f64) -> i32 {
    (100.0 * x + 0.5).floor() as i32
}

pub fn tokenize<R: BufRead>(reader: R) -> Result<Vec<String>, ParamError> {
    let mut tokens = Vec::new();
    for line in reader.lines() {
        tokens.extend(line?.split_whitespace().map(String::from));
    }
    Ok(tokens)
}

pub fn is_cell(token: &str) -> bool {
    token == "."
        || (token.chars().any(|c| c.is_ascii_digit())
            && token.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+')))
}

pub fn parse_cell(file: &str, token: &str) -> Result<i32, ParamError> {
    if token == "." {
        return Ok(FORBIDDEN);
    }
    token.parse::<f64>()
        .map(to_energy)
        .map_err(|_| malformed(file, format!("cannot parse value '{}'", token)))
}

/// All cells of a grid file, which must hold exactly `expected` of them.
fn grid_cells(file: &str, tokens: &[String], expected: usize) -> Result<Vec<i32>, ParamError> {
    let cells = tokens.iter()
        .filter(|t| is_cell(t))
        .map(|t| parse_cell(file, t))
        .collect::<Result<Vec<_>, _>>()?;
    if cells.len() != expected {
        return Err(malformed(file, format!(
            "expected {} table entries, found {}", expected, cells.len())));
    }
    Ok(cells)
}

/// Position right after the first token matching `marker`.
fn after_marker<F: Fn(&str) -> bool>(
    file: &str,
    tokens: &[String],
    marker: F,
    what: &str,
) -> Result<usize, ParamError> {
    tokens.iter()
        .position(|t| marker(t))
        .map(|p| p + 1)
        .ok_or_else(|| malformed(file, format!("missing {} header marker", what)))
}

// Cell layouts. Every function maps the n-th cell of a file to its
// table key.

/// Blocks by i, rows by k, column blocks by j, columns by l.
pub(crate) fn stack_key(n: usize) -> [Base; 4] {
    let (i, k, j, l) = (n / 64, (n / 16) % 4, (n / 4) % 4, n % 4);
    [REAL_BASES[i], REAL_BASES[j], REAL_BASES[k], REAL_BASES[l]]
}

/// Same order as `stack_key`, but stored with the first two indices swapped.
pub(crate) fn coaxial_key(n: usize) -> [Base; 4] {
    let [i, j, k, l] = stack_key(n);
    [j, i, k, l]
}

/// 3' dangles in the first 64 cells, 5' dangles in the next 64.
pub(crate) fn dangle_key(n: usize) -> (bool, [Base; 3]) {
    let (i, j, k) = ((n / 16) % 4, (n / 4) % 4, n % 4);
    (n < 64, [REAL_BASES[i], REAL_BASES[j], REAL_BASES[k]])
}

pub(crate) fn int11_key(n: usize) -> [Base; 6] {
    let (a, d) = PAIR_ORDER[n / 96];
    let b = REAL_BASES[(n / 24) % 4];
    let (c, f) = PAIR_ORDER[(n / 4) % 6];
    let e = REAL_BASES[n % 4];
    [a, b, c, d, e, f]
}

pub(crate) fn int21_key(n: usize) -> [Base; 7] {
    let (a, b) = PAIR_ORDER[n / 384];
    let e = REAL_BASES[(n / 96) % 4];
    let c = REAL_BASES[(n / 24) % 4];
    let (f, g) = PAIR_ORDER[(n / 4) % 6];
    let d = REAL_BASES[n % 4];
    [a, b, c, d, e, f, g]
}

/// 36 blocks (outer pair, inner pair), each 16 rows (j, k) by 16 columns (l, m).
pub(crate) fn int22_key(n: usize) -> [Base; 8] {
    let block = n / 256;
    let (a, c) = PAIR_ORDER[block / 6];
    let (b, d) = PAIR_ORDER[block % 6];
    let r = n % 256;
    let (j, k, l, m) = (r / 64, (r / 16) % 4, (r / 4) % 4, r % 4);
    [a, b, c, d, REAL_BASES[j], REAL_BASES[l], REAL_BASES[k], REAL_BASES[m]]
}

pub(crate) const STACK_CELLS: usize = 256;
pub(crate) const DANGLE_CELLS: usize = 128;
pub(crate) const INT11_CELLS: usize = 576;
pub(crate) const INT21_CELLS: usize = 2304;
pub(crate) const INT22_CELLS: usize = 9216;

macro_rules! impl_grid_parser {
    ($name:ident, $field:ident, $cells:expr, $key:ident, $rule:ident, $fill:expr) => {
        pub fn $name<R: BufRead>(
            file: &str,
            reader: R,
            table: &mut ParameterTable,
        ) -> Result<(), ParamError> {
            let tokens = tokenize(reader)?;
            let cells = grid_cells(file, &tokens, $cells)?;
            let mut grid = BaseGrid::new(SentinelRule::$rule, $fill);
            for (n, en) in cells.into_iter().enumerate() {
                grid.set($key(n), en);
            }
            table.$field = grid;
            Ok(())
        }
    };
}

impl_grid_parser!(parse_stack, stack, STACK_CELLS, stack_key, Strict, 0);
impl_grid_parser!(parse_tstackh, mismatch_hairpin, STACK_CELLS, stack_key, PairStrict, 0);
impl_grid_parser!(parse_tstacki, mismatch_interior, STACK_CELLS, stack_key, PairStrict, 0);
impl_grid_parser!(parse_tstackm, mismatch_multi, STACK_CELLS, stack_key, Neutral, 0);
impl_grid_parser!(parse_tstack, mismatch_exterior, STACK_CELLS, stack_key, PairStrict, 0);
impl_grid_parser!(parse_tstackcoax, mismatch_coaxial, STACK_CELLS, stack_key, Neutral, 0);
impl_grid_parser!(parse_coaxstack, coaxial_mismatch, STACK_CELLS, stack_key, Neutral, 0);
impl_grid_parser!(parse_coaxial, coaxial, STACK_CELLS, coaxial_key, Strict, 0);
impl_grid_parser!(parse_int11, int11, INT11_CELLS, int11_key, Strict, FORBIDDEN);
impl_grid_parser!(parse_int21, int21, INT21_CELLS, int21_key, Strict, FORBIDDEN);
impl_grid_parser!(parse_int22, int22, INT22_CELLS, int22_key, Strict, FORBIDDEN);

pub fn parse_dangle<R: BufRead>(
    file: &str,
    reader: R,
    table: &mut ParameterTable,
) -> Result<(), ParamError> {
    let tokens = tokenize(reader)?;
    let cells = grid_cells(file, &tokens, DANGLE_CELLS)?;
    let mut dangle3 = BaseGrid::new(SentinelRule::PairStrict, 0);
    let mut dangle5 = BaseGrid::new(SentinelRule::PairStrict, 0);
    for (n, en) in cells.into_iter().enumerate() {
        match dangle_key(n) {
            (true, key) => dangle3.set(key, en),
            (false, key) => dangle5.set(key, en),
        }
    }
    table.dangle3 = dangle3;
    table.dangle5 = dangle5;
    Ok(())
}

/// `loop.dat`: 30 rows of `size internal bulge hairpin` after a dashed line.
pub fn parse_loop<R: BufRead>(
    file: &str,
    reader: R,
    table: &mut ParameterTable,
) -> Result<(), ParamError> {
    let tokens = tokenize(reader)?;
    let start = after_marker(file, &tokens, |t| t.starts_with("-----"), "dashed")?;
    let cells: Vec<&str> = tokens[start..].iter()
        .map(String::as_str)
        .filter(|t| is_cell(t))
        .take(4 * MAX_LOOP)
        .collect();
    if cells.len() < 4 * MAX_LOOP {
        return Err(malformed(file, format!(
            "expected {} rows of 4 columns, found {} entries", MAX_LOOP, cells.len())));
    }

    for (row, chunk) in cells.chunks(4).enumerate() {
        let size = row + 1;
        if chunk[0].parse::<usize>().ok() != Some(size) {
            return Err(malformed(file, format!(
                "row {} is labelled '{}'", size, chunk[0])));
        }
        table.interior[size] = parse_cell(file, chunk[1])?;
        table.bulge[size] = parse_cell(file, chunk[2])?;
        table.hairpin[size] = parse_cell(file, chunk[3])?;
    }
    Ok(())
}

fn parse_special_loops<R: BufRead>(
    file: &str,
    reader: R,
    length: usize,
) -> Result<SpecialLoops, ParamError> {
    let tokens = tokenize(reader)?;
    let start = after_marker(file, &tokens, |t| t.starts_with("---"), "dashed")?;
    let body = &tokens[start..];
    if body.len() % 2 != 0 {
        return Err(malformed(file, "sequence without a bonus energy"));
    }

    let mut loops = SpecialLoops::default();
    for entry in body.chunks(2) {
        let seq = NucleotideVec::try_from(entry[0].as_str())
            .map_err(|e| malformed(file, e.to_string()))?;
        if seq.len() != length || !seq.iter().all(|b| b.is_real()) {
            return Err(malformed(file, format!(
                "'{}' is not a sequence of {} nucleotides", entry[0], length)));
        }
        if !is_cell(&entry[1]) {
            return Err(malformed(file, format!("'{}' is not an energy", entry[1])));
        }
        if loops.len() == MAX_SPECIAL_LOOPS {
            return Err(malformed(file, format!("more than {} entries", MAX_SPECIAL_LOOPS)));
        }
        loops.insert(SpecialLoops::key(&seq), parse_cell(file, &entry[1])?);
    }
    Ok(loops)
}

pub fn parse_tloop<R: BufRead>(
    file: &str,
    reader: R,
    table: &mut ParameterTable,
) -> Result<(), ParamError> {
    table.tetraloops = parse_special_loops(file, reader, 6)?;
    Ok(())
}

pub fn parse_triloop<R: BufRead>(
    file: &str,
    reader: R,
    table: &mut ParameterTable,
) -> Result<(), ParamError> {
    table.triloops = parse_special_loops(file, reader, 5)?;
    Ok(())
}

/// The `-->` records of `miscloop.dat` and how many values each needs.
const MISC_RECORDS: [(&str, usize); 12] = [
    ("large loop extrapolation", 1),
    ("maximum asymmetry penalty", 1),
    ("asymmetry array", 4),
    ("multibranched loop", 3),
    ("efn2 multibranched loop", 3),
    ("terminal AU penalty", 1),
    ("GGG hairpin bonus", 1),
    ("poly-C hairpin slope", 1),
    ("poly-C hairpin intercept", 1),
    ("poly-C triloop penalty", 1),
    ("intermolecular initiation", 1),
    ("GAIL rule", 1),
];

pub fn parse_miscloop<R: BufRead>(
    file: &str,
    reader: R,
    table: &mut ParameterTable,
) -> Result<(), ParamError> {
    let tokens = tokenize(reader)?;
    let records: Vec<Vec<&str>> = tokens.iter()
        .enumerate()
        .filter(|(_, t)| *t == "-->")
        .map(|(p, _)| {
            tokens[p + 1..].iter()
                .map(String::as_str)
                .take_while(|t| is_cell(t))
                .collect()
        })
        .collect();

    for (k, (name, needed)) in MISC_RECORDS.iter().enumerate() {
        let Some(record) = records.get(k) else {
            return Err(malformed(file, format!("missing '{}' record", name)));
        };
        if record.len() < *needed {
            let mut reason = format!(
                "'{}' record needs {} values, found {}", name, needed, record.len());
            if k == 4 {
                reason.push_str(" (outdated energy rules)");
            }
            return Err(malformed(file, reason));
        }
    }

    let value = |k: usize, v: usize| parse_cell(file, records[k][v]);
    let misc = &mut table.misc;
    misc.prelog = records[0][0].parse::<f64>()
        .map(|x| 100.0 * x)
        .map_err(|_| malformed(file, format!("cannot parse value '{}'", records[0][0])))?;
    misc.max_asymmetry = value(1, 0)?;
    for v in 0..4 {
        misc.asymmetry[v] = value(2, v)?;
    }
    misc.multi_offset = value(3, 0)?;
    misc.multi_per_base = value(3, 1)?;
    misc.multi_per_helix = value(3, 2)?;
    misc.efn2_offset = value(4, 0)?;
    misc.efn2_per_base = value(4, 1)?;
    misc.efn2_per_helix = value(4, 2)?;
    misc.terminal_au = value(5, 0)?;
    misc.gu_closure = value(6, 0)?;
    misc.poly_c_slope = value(7, 0)?;
    misc.poly_c_intercept = value(8, 0)?;
    misc.poly_c_triloop = value(9, 0)?;
    misc.intermolecular_init = value(10, 0)?;
    misc.gail = records[11][0].parse::<f64>()
        .map(|x| (x + 0.5).floor() as i32 != 0)
        .map_err(|_| malformed(file, format!("cannot parse value '{}'", records[11][0])))?;
    Ok(())
}

macro_rules! param_files {
    ($($variant:ident => $file:literal, $parser:ident;)*) => {
        /// The parameter files a [`ParameterTable`] is assembled from.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum ParamFile { $($variant),* }

        impl ParamFile {
            pub const ALL: &'static [ParamFile] = &[$(ParamFile::$variant),*];

            pub fn file_name(&self) -> &'static str {
                match self {
                    $(ParamFile::$variant => $file),*
                }
            }

            /// Parse this file's content into the matching fields of `table`.
            pub fn parse_into<R: BufRead>(
                &self,
                reader: R,
                table: &mut ParameterTable,
            ) -> Result<(), ParamError> {
                match self {
                    $(ParamFile::$variant => $parser(self.file_name(), reader, table)),*
                }
            }
        }
    };
}

param_files! {
    Loop => "loop.dat", parse_loop;
    Stack => "stack.dat", parse_stack;
    MismatchHairpin => "tstackh.dat", parse_tstackh;
    MismatchInterior => "tstacki.dat", parse_tstacki;
    Tetraloop => "tloop.dat", parse_tloop;
    Misc => "miscloop.dat", parse_miscloop;
    Dangle => "dangle.dat", parse_dangle;
    Int22 => "int22.dat", parse_int22;
    Int21 => "int21.dat", parse_int21;
    Int11 => "int11.dat", parse_int11;
    Coaxial => "coaxial.dat", parse_coaxial;
    Triloop => "triloop.dat", parse_triloop;
    MismatchCoaxial => "tstackcoax.dat", parse_tstackcoax;
    CoaxialMismatch => "coaxstack.dat", parse_coaxstack;
    MismatchExterior => "tstack.dat", parse_tstack;
    MismatchMulti => "tstackm.dat", parse_tstackm;
}
