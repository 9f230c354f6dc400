//! Chemistry tables and rules: the periodic table, implicit-hydrogen inference and
//! formula/weight computation.

pub mod formula;
pub mod periodic;
pub mod valence;
