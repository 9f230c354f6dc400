//! # Core Models Module
//!
//! Data structures for chemical structure graphs.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom records: element, position, charge, query constraints, nested
//!   superatom and R-group graphs
//! - [`topology`] - Bond records and the bond-type enumeration with its valence semantics
//! - [`graphics`] - Brackets, texts, groups and shapes carried alongside the structure
//! - [`mol`] - The `Mol` arena container, cascading removal, copies and fragments
//! - [`superatom`] - Superatom collapse, expansion and template alignment
//! - [`traversal`] - Breadth-first spanning forests used by ring perception and matching
//! - [`builder`] - Index-addressed construction used by file readers
//! - [`ids`] - Typed arena keys
//!
//! ```ignore
//! use molgraph::core::models::{atom::Atom, mol::Mol, topology::BondType};
//! use molgraph::core::utils::geometry::Point;
//!
//! let mut mol = Mol::new();
//! let c = mol.add_atom(Atom::new("C", Point::new(0.0, 0.0)));
//! let o = mol.add_atom(Atom::new("O", Point::new(1.0, 0.0)));
//! mol.add_bond(c, o, BondType::Double);
//! ```

pub mod atom;
pub mod builder;
pub mod graphics;
pub mod ids;
pub mod mol;
pub mod superatom;
pub mod topology;
pub mod traversal;
