//! # Core Module
//!
//! The fundamental building blocks of molgraph: the structure graph, the chemistry
//! tables it is interpreted against, and the file format it is exchanged in.
//!
//! ## Architecture
//!
//! - **Structure Representation** ([`models`]) - Atoms, bonds, graphics and the `Mol`
//!   container that owns them, plus traversal, fragment and superatom operations
//! - **Chemistry** ([`chemistry`]) - Periodic table, bond valences, implicit-hydrogen
//!   inference, formula and molecular weight
//! - **Templates** ([`templates`]) - Superatom abbreviation dictionary (e.g. "Boc", "Ms")
//! - **File I/O** ([`io`]) - The V2000 molfile codec and the envelope collaborator for
//!   formats handled elsewhere
//! - **Utilities** ([`utils`]) - 2D geometry primitives

pub mod chemistry;
pub mod io;
pub mod models;
pub mod templates;
pub mod utils;
