//! # Workflows Module
//!
//! High-level entry points that combine the core model and the engine into complete
//! procedures. Each workflow takes already decoded graphs, works on copies, and returns
//! a plain result value.
//!
//! - **Inspection** ([`inspect`]) - Formula, weight, fragments, rings and valence problems
//!   of a single structure
//! - **Search** ([`search`]) - One query screened and matched against many targets, in
//!   parallel when the `parallel` feature is enabled

pub mod inspect;
pub mod search;
