//! # Engine Module
//!
//! Graph algorithms layered on the structure model: ring perception, aromaticity
//! detection and the backtracking atom-atom mapping engine behind substructure and
//! full-structure search.
//!
//! ## Architecture
//!
//! - **Rings** ([`rings`]) - Ring reconstruction from the closures of a BFS spanning forest
//! - **Aromaticity** ([`aromaticity`]) - Fixed-point aromatic ring detection over perceived rings
//! - **Matching** ([`matching`]) - Screening, compatibility predicates and the search itself
//! - **Configuration** ([`config`]) - Match mode, optional constraints and the step budget
//! - **Progress Monitoring** ([`progress`]) - Callback-based reporting for batch work
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! Every algorithm here works on the graph it is given and never mutates a caller's
//! graph except through explicitly mutating entry points such as
//! [`Mol::perceive_rings`](crate::core::models::mol::Mol::perceive_rings).

pub mod aromaticity;
pub mod config;
pub mod error;
pub mod matching;
pub mod progress;
pub mod rings;
