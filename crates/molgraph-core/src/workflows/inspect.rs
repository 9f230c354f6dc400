use crate::core::chemistry::formula::{mol_formula, molecular_weight};
use crate::core::models::mol::Mol;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectConfig {
    /// Expand superatoms before counting atoms, bonds and rings.
    pub expand_superatoms: bool,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            expand_superatoms: true,
        }
    }
}

/// A summary of one structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct InspectReport {
    pub name: String,
    pub formula: String,
    pub molecular_weight: f64,
    pub atoms: usize,
    pub bonds: usize,
    pub fragments: usize,
    pub rings: usize,
    pub aromatic_rings: usize,
    pub superatoms: usize,
    /// 1-based indices of atoms whose valence cannot be satisfied.
    pub valence_errors: Vec<usize>,
    pub properties: BTreeMap<String, String>,
}

#[instrument(skip_all, name = "inspect_workflow", fields(name = %mol.name))]
pub fn run(mol: &Mol, config: &InspectConfig) -> InspectReport {
    let superatoms = mol.atoms_iter().filter(|(_, a)| a.is_superatom()).count();
    let mut work = mol.clone();
    if config.expand_superatoms {
        work.expand_super_atoms();
    }
    let rings = work.perceive_rings();
    work.set_hcounts();

    let valence_errors: Vec<usize> = work
        .atoms_iter()
        .enumerate()
        .filter(|(_, (_, atom))| atom.valence_error)
        .map(|(i, _)| i + 1)
        .collect();
    if !valence_errors.is_empty() {
        warn!(atoms = ?valence_errors, "structure has valence errors");
    }

    let report = InspectReport {
        name: mol.name.clone(),
        formula: mol_formula(&work),
        molecular_weight: molecular_weight(&work),
        atoms: work.atom_count(),
        bonds: work.bond_count(),
        fragments: work.split_fragments(false).len(),
        rings: rings.len(),
        aromatic_rings: rings.iter().filter(|r| r.aromatic).count(),
        superatoms,
        valence_errors,
        properties: mol.props.clone(),
    };
    info!(formula = %report.formula, weight = report.molecular_weight, "inspection finished");
    report
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() { "(unnamed)" } else { &self.name };
        writeln!(f, "Name:             {}", name)?;
        writeln!(f, "Formula:          {}", self.formula)?;
        writeln!(f, "Molecular weight: {:.3}", self.molecular_weight)?;
        writeln!(f, "Atoms / bonds:    {} / {}", self.atoms, self.bonds)?;
        writeln!(f, "Fragments:        {}", self.fragments)?;
        writeln!(f, "Rings:            {} ({} aromatic)", self.rings, self.aromatic_rings)?;
        if self.superatoms > 0 {
            writeln!(f, "Superatoms:       {}", self.superatoms)?;
        }
        if !self.valence_errors.is_empty() {
            let list: Vec<String> = self.valence_errors.iter().map(|i| i.to_string()).collect();
            writeln!(f, "Valence errors:   atoms {}", list.join(", "))?;
        }
        for (key, value) in &self.properties {
            writeln!(f, "<{}> {}", key, value)?;
        }
        Ok(())
    }
}
