//! Synthetic parameter files for tests.
//!
//! The values follow the magnitude of published RNA parameters, with a few
//! entries pinned to the numbers used in the unit tests.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::Base;
use crate::Base::*;
use crate::PairTypeRNA;
use crate::ParameterTable;
use crate::parameter_parsing::*;

fn pairs(a: Base, b: Base) -> bool {
    PairTypeRNA::from((a, b)).can_pair()
}

fn render<K, F, V>(title: &str, cells: usize, key: F, value: V) -> String
where
    F: Fn(usize) -> K,
    V: Fn(K) -> String,
{
    let mut s = format!("{}\n 5' --> 3'\n 3' <-- 5'\n", title);
    for n in 0..cells {
        if n % 16 == 0 {
            s.push_str("\n  ");
        }
        s.push_str(&format!(" {:>6}", value(key(n))));
    }
    s.push('\n');
    s
}

fn kcal(x: f64) -> String {
    format!("{:.2}", x)
}

/// Watson-Crick stacks of outer pair (i, j) on inner pair (k, l).
fn stack_value([i, j, k, l]: [Base; 4]) -> String {
    if !pairs(i, j) || !pairs(k, l) {
        return ".".to_string();
    }
    let order = [(A, U), (C, G), (G, C), (U, A), (G, U), (U, G)];
    let idx = |p: (Base, Base)| order.iter().position(|&q| q == p).unwrap_or(0);
    const STACKS: [[f64; 6]; 6] = [
        [-0.9, -2.2, -2.1, -1.1, -0.6, -1.4],
        [-2.1, -3.3, -2.4, -2.1, -1.4, -2.1],
        [-2.4, -3.4, -3.3, -2.2, -1.5, -2.5],
        [-1.3, -2.4, -2.1, -0.9, -1.0, -1.3],
        [-1.3, -2.5, -2.1, -1.4, -0.5, 1.3],
        [-1.0, -1.5, -1.4, -0.6, 0.3, -0.5],
    ];
    kcal(STACKS[idx((i, j))][idx((k, l))])
}

fn mismatch_value(pinned: &[([Base; 4], f64)], default: f64) -> impl Fn([Base; 4]) -> String + '_ {
    move |key| {
        if !pairs(key[0], key[1]) {
            return ".".to_string();
        }
        let en = pinned.iter().find(|(k, _)| *k == key).map_or(default, |(_, en)| *en);
        kcal(en)
    }
}

const HAIRPIN_MISMATCHES: [([Base; 4], f64); 2] = [
    ([G, C, C, U], -0.5),
    ([C, G, A, A], -1.5),
];

pub fn loop_file() -> String {
    let mut s = String::from(
        "DESTABILIZING ENERGIES BY SIZE OF LOOP\n\nSIZE  INTERNAL  BULGE  HAIRPIN\n-------------------------------\n");
    for size in 1..=30usize {
        let internal = if size < 4 { ".".to_string() } else {
            kcal(1.7 + (size - 4) as f64 * 2.0 / 26.0)
        };
        let bulge = match size {
            1 => 3.8,
            2 => 2.8,
            _ => 3.2 + (size - 3) as f64 * 0.1,
        };
        let hairpin = match size {
            1 | 2 => ".".to_string(),
            3 => kcal(5.4),
            _ => kcal(5.6 + (size - 4) as f64 * 2.1 / 26.0),
        };
        s.push_str(&format!("{:>4} {:>8} {:>8} {:>8}\n", size, internal, kcal(bulge), hairpin));
    }
    s
}

pub const MISCLOOP: &str = r#"Miscellaneous free energy rules
-------------------------------
Extrapolation for large loops (Jacobson-Stockmayer):
-->
1.07857764
Asymmetric internal loops: the ninio equation
the maximum correction
-->
3.0
the f(m) array (see Ninio for details)
-->
0.5 0.5 0.5 0.5
multibranched loops
offset = a, per nuc penalty = b, helix penalty = c
-->
3.4 0 0.4
efn2 multibranched loops
offset = a, per nuc penalty = b, helix penalty = c
-->
9.3 0 -0.9
terminal AU penalty
-->
0.5
GGG hairpin bonus
-->
-2.2
c hairpin slope
-->
0.3
c hairpin intercept
-->
1.6
c hairpin of 3
-->
1.4
Intermolecular initiation free energy
-->
4.1
GAIL Rule
-->
1
"#;

/// The content of every parameter file.
pub fn parameter_files() -> Vec<(&'static str, String)> {
    let no_pins: &[([Base; 4], f64)] = &[];
    let dangle = |(three, [i, j, _]): (bool, [Base; 3])| {
        if !pairs(i, j) {
            ".".to_string()
        } else if three {
            kcal(-0.4)
        } else {
            kcal(-0.2)
        }
    };
    let coaxial = |[i, j, k, l]: [Base; 4]| {
        if pairs(i, j) && pairs(k, l) { kcal(-2.0) } else { ".".to_string() }
    };
    vec![
        ("loop.dat", loop_file()),
        ("stack.dat", render("STACKING ENERGIES", STACK_CELLS, stack_key, stack_value)),
        ("tstackh.dat", render("HAIRPIN MISMATCHES", STACK_CELLS, stack_key,
            mismatch_value(&HAIRPIN_MISMATCHES, -0.8))),
        ("tstacki.dat", render("INTERIOR MISMATCHES", STACK_CELLS, stack_key,
            mismatch_value(no_pins, -0.3))),
        ("tloop.dat", "Seq Energy\n------------\nGGGGAC -3.0\nCGAAAG -3.0\n".to_string()),
        ("miscloop.dat", MISCLOOP.to_string()),
        ("dangle.dat", render("DANGLING ENDS", DANGLE_CELLS, dangle_key, dangle)),
        ("int22.dat", render("2x2 INTERNAL LOOPS", INT22_CELLS, int22_key, |_| kcal(0.5))),
        ("int21.dat", render("2x1 INTERNAL LOOPS", INT21_CELLS, int21_key, |_| kcal(1.1))),
        ("int11.dat", render("1x1 INTERNAL LOOPS", INT11_CELLS, int11_key, |_| kcal(0.4))),
        ("coaxial.dat", render("COAXIAL STACKING", STACK_CELLS, coaxial_key, coaxial)),
        ("triloop.dat", "Seq Energy\n------------\nCAACG 6.8\n".to_string()),
        ("tstackcoax.dat", render("COAXIAL MISMATCHES", STACK_CELLS, stack_key, |_| kcal(-0.5))),
        ("coaxstack.dat", render("COAXIAL MISMATCH STACKS", STACK_CELLS, stack_key, |_| kcal(-0.3))),
        ("tstack.dat", render("EXTERIOR MISMATCHES", STACK_CELLS, stack_key,
            mismatch_value(no_pins, -0.8))),
        ("tstackm.dat", render("MULTILOOP MISMATCHES", STACK_CELLS, stack_key,
            mismatch_value(no_pins, -0.6))),
    ]
}

/// A temporary directory holding a complete parameter set, removed on drop.
pub struct ParameterDirectory {
    dir: TempDir,
}

impl ParameterDirectory {
    pub fn new() -> Self {
        let dir = TempDir::with_prefix("ef_energy-").expect("create parameter directory");
        for (file, content) in parameter_files() {
            fs::write(dir.path().join(file), content).expect("write parameter file");
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn remove(&self, file: &str) {
        fs::remove_file(self.path().join(file)).expect("remove parameter file");
    }

    pub fn write(&self, file: &str, content: &str) {
        fs::write(self.path().join(file), content).expect("write parameter file");
    }
}

/// A fully loaded synthetic parameter table.
pub fn parameter_table() -> ParameterTable {
    let dir = ParameterDirectory::new();
    ParameterTable::from_directory(dir.path()).expect("synthetic parameters load")
}
