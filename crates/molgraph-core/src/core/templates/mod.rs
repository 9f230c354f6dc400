//! # Templates Module
//!
//! Superatom abbreviation dictionaries. A template maps an abbreviation such as `Boc`
//! or `Ms` to the structure it stands for, with attachment points marking where the
//! abbreviation connects to the rest of a graph.
//!
//! ## Key Components
//!
//! - [`registry`] - Loading templates from TOML files and the built-in dictionary
//!
//! ## Usage
//!
//! ```ignore
//! use molgraph::core::templates::registry::TemplateRegistry;
//!
//! let registry = TemplateRegistry::builtin()?;
//! let mesyl = registry.lookup("Ms").unwrap();
//! ```

pub mod registry;
