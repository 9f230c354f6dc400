//! Molecular formula and average molecular weight.
//!
//! Both are computed on a copy with freshly inferred implicit hydrogens, so callers need
//! not run hydrogen inference first. Superatoms contribute their nested graph; query
//! symbols and R-groups contribute nothing.

use super::periodic::element;
use super::valence::implicit_hydrogens;
use crate::core::models::mol::Mol;
use std::collections::BTreeMap;
use std::fmt::Write;

const HYDROGEN_WEIGHT: f64 = 1.008;

#[derive(Debug, Clone, Default, PartialEq)]
struct Composition {
    counts: BTreeMap<String, u32>,
    weight: f64,
    charge: i32,
}

fn accumulate(mol: &Mol, into: &mut Composition) {
    for (id, atom) in mol.atoms_iter() {
        if let Some(nested) = atom.superatom.as_deref() {
            accumulate(nested, into);
            into.charge += i32::from(atom.charge);
            continue;
        }
        let Some(info) = element(&atom.element) else {
            continue;
        };
        *into.counts.entry(atom.element.clone()).or_default() += 1;
        into.weight += atom.isotope.map_or(info.weight, f64::from);
        into.charge += i32::from(atom.charge);

        let h = u32::from(implicit_hydrogens(mol, id).count().unwrap_or(0));
        if h > 0 {
            *into.counts.entry("H".to_string()).or_default() += h;
            into.weight += f64::from(h) * HYDROGEN_WEIGHT;
        }
    }
}

fn composition(mol: &Mol) -> Composition {
    let mut comp = Composition::default();
    accumulate(mol, &mut comp);
    comp
}

/// Average molecular weight in daltons. Isotope-labelled atoms use their mass number.
pub fn molecular_weight(mol: &Mol) -> f64 {
    composition(mol).weight
}

/// Per-element atom counts including implicit hydrogens.
pub fn element_counts(mol: &Mol) -> BTreeMap<String, u32> {
    composition(mol).counts
}

/// Hill-system formula: C, then H, then the rest alphabetically; without carbon every
/// element is alphabetical. Net charge is appended as `+`, `2+`, `-`, `2-`.
pub fn mol_formula(mol: &Mol) -> String {
    let Composition {
        mut counts, charge, ..
    } = composition(mol);
    let mut result = String::new();

    if let Some(c) = counts.remove("C") {
        append_element(&mut result, "C", c);
        if let Some(h) = counts.remove("H") {
            append_element(&mut result, "H", h);
        }
    }
    for (symbol, count) in &counts {
        append_element(&mut result, symbol, *count);
    }

    match charge {
        0 => {}
        1 => result.push('+'),
        -1 => result.push('-'),
        n if n > 0 => {
            let _ = write!(result, "{n}+");
        }
        n => {
            let _ = write!(result, "{}-", n.unsigned_abs());
        }
    }
    result
}

fn append_element(buf: &mut String, symbol: &str, count: u32) {
    buf.push_str(symbol);
    if count > 1 {
        let _ = write!(buf, "{count}");
    }
}
