//! # molgraph Core Library
//!
//! A chemical-structure graph model together with the algorithms that are hard to get
//! right on top of it: a bit-exact V2000 molfile codec, ring and aromaticity perception,
//! implicit-hydrogen inference, and substructure / full-structure atom-atom mapping.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Arena-backed graph models (`Mol`, `Atom`, `Bond`,
//!   `Graphic`), 2D geometry, the static periodic table, valence rules, the superatom
//!   template registry and the molfile codec.
//!
//! - **[`engine`]: The Logic Core.** Ring perception, aromaticity detection and the
//!   backtracking matching engine, together with its configuration, error and progress
//!   reporting types.
//!
//! - **[`workflows`]: The Public API.** Complete procedures built from the two layers
//!   below, such as inspecting a structure or searching a set of targets for a query.

pub mod core;
pub mod engine;
pub mod workflows;
