use super::compat::is_wildcard;
use crate::core::chemistry::formula::molecular_weight;
use crate::core::models::ids::BondId;
use crate::core::models::mol::Mol;
use crate::core::models::topology::BondOrderClass;
use crate::engine::rings::RingSet;
use std::collections::{BTreeMap, HashSet};

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Histograms compared before any search is attempted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fingerprint {
    pub elements: BTreeMap<String, usize>,
    /// Atoms with a query symbol, atom list or R-group.
    pub wildcard_atoms: usize,
    pub bond_orders: BTreeMap<BondOrderClass, usize>,
    pub query_bonds: usize,
    /// Ring counts indexed by `[size == 6][aromatic]` for five- and six-membered rings.
    pub rings: [[usize; 2]; 2],
    pub atoms: usize,
    pub bonds: usize,
    pub weight: f64,
}

impl Fingerprint {
    pub fn compute(mol: &Mol, rings: &RingSet, aromatic_bonds: &HashSet<BondId>) -> Self {
        let mut fp = Self {
            atoms: mol.atom_count(),
            bonds: mol.bond_count(),
            weight: molecular_weight(mol),
            ..Self::default()
        };
        for (_, atom) in mol.atoms_iter() {
            if is_wildcard(atom) {
                fp.wildcard_atoms += 1;
            } else {
                *fp.elements.entry(atom.element.clone()).or_default() += 1;
            }
        }
        for (id, bond) in mol.bonds_iter() {
            let class = if aromatic_bonds.contains(&id) {
                BondOrderClass::Aromatic
            } else {
                bond.kind.order_class()
            };
            if class == BondOrderClass::Query {
                fp.query_bonds += 1;
            } else {
                *fp.bond_orders.entry(class).or_default() += 1;
            }
        }
        for (size_slot, size) in [(0, 5), (1, 6)] {
            for (aromatic_slot, aromatic) in [(0, false), (1, true)] {
                fp.rings[size_slot][aromatic_slot] = rings.count(size, aromatic);
            }
        }
        fp
    }

    /// Whether a target with fingerprint `target` can possibly contain (or, in full
    /// mode, equal) the query this fingerprint was computed from.
    pub fn admits(&self, target: &Fingerprint, full: bool) -> bool {
        if full {
            return self.atoms == target.atoms
                && self.bonds == target.bonds
                && self.elements == target.elements
                && self.wildcard_atoms == target.wildcard_atoms
                && self.bond_orders == target.bond_orders
                && self.query_bonds == target.query_bonds
                && self.rings == target.rings
                && (self.weight - target.weight).abs() <= WEIGHT_TOLERANCE;
        }

        let elements_fit = self.elements.iter().all(|(element, &count)| {
            count <= target.elements.get(element).copied().unwrap_or(0) + target.wildcard_atoms
        });
        let bonds_fit = self.bond_orders.iter().all(|(class, &count)| {
            count <= target.bond_orders.get(class).copied().unwrap_or(0) + target.query_bonds
        });
        let rings_fit = (0..2).all(|s| (0..2).all(|a| self.rings[s][a] <= target.rings[s][a]));

        self.atoms <= target.atoms && self.bonds <= target.bonds && elements_fit && bonds_fit && rings_fit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rings::fixtures::*;

    fn fingerprint(mol: &Mol) -> Fingerprint {
        let rings = RingSet::perceive(mol);
        Fingerprint::compute(mol, &rings, &rings.aromatic_bonds())
    }

    #[test]
    fn benzene_fingerprint_counts_aromatic_bonds_and_ring() {
        let fp = fingerprint(&benzene());
        assert_eq!(fp.elements.get("C"), Some(&6));
        assert_eq!(fp.bond_orders.get(&BondOrderClass::Aromatic), Some(&6));
        assert_eq!(fp.bond_orders.get(&BondOrderClass::Single), None);
        assert_eq!(fp.rings, [[0, 0], [0, 1]]);
        assert!((fp.weight - 78.114).abs() < 0.01);
    }

    #[test]
    fn substructure_screen_is_monotone_in_target_size() {
        let small = fingerprint(&benzene());
        let large = fingerprint(&naphthalene());
        assert!(small.admits(&large, false));
        assert!(!large.admits(&small, false));
        assert!(!small.admits(&large, true));
        assert!(small.admits(&small.clone(), true));
    }

    #[test]
    fn ring_counts_separate_aromatic_and_saturated_rings() {
        let saturated = fingerprint(&cyclohexane());
        let aromatic = fingerprint(&benzene());
        assert!(!saturated.admits(&aromatic, false));
        assert_eq!(fingerprint(&pyrrole()).rings, [[0, 1], [0, 0]]);
    }
}
