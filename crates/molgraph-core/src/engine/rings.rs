use super::aromaticity::detect_aromatic_rings;
use crate::core::models::ids::{AtomId, BondId};
use crate::core::models::mol::Mol;
use crate::core::models::topology::RingMembership;
use crate::core::models::traversal::BfsForest;
use std::collections::HashSet;
use tracing::debug;

/// A ring in cyclic order: `bonds[i]` joins `atoms[i]` and `atoms[(i + 1) % len]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    pub atoms: Vec<AtomId>,
    pub bonds: Vec<BondId>,
    pub aromatic: bool,
}

impl Ring {
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains_atom(&self, atom: AtomId) -> bool {
        self.atoms.contains(&atom)
    }

    pub fn contains_bond(&self, bond: BondId) -> bool {
        self.bonds.contains(&bond)
    }
}

/// Rings found from the closure bonds of a BFS spanning forest, one per closure.
///
/// The set depends on atom order, which fixes the BFS roots; it is not a canonical
/// minimum cycle basis.
#[derive(Debug, Clone, Default)]
pub struct RingSet {
    pub rings: Vec<Ring>,
}

impl RingSet {
    /// Reconstructs rings and classifies them as aromatic or not.
    pub fn perceive(mol: &Mol) -> Self {
        let forest = BfsForest::build(mol);
        let mut rings = Vec::new();
        for tree in &forest.trees {
            for (bond, from, to) in tree.closures() {
                if let Some((atoms, bonds)) = forest.ring_through(bond, from, to) {
                    rings.push(Ring {
                        atoms,
                        bonds,
                        aromatic: false,
                    });
                }
            }
        }
        let mut set = Self { rings };
        detect_aromatic_rings(mol, &mut set);
        set
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ring> {
        self.rings.iter()
    }

    pub fn ring_bonds(&self) -> HashSet<BondId> {
        self.rings.iter().flat_map(|r| r.bonds.iter().copied()).collect()
    }

    /// Bonds belonging to at least one aromatic ring.
    pub fn aromatic_bonds(&self) -> HashSet<BondId> {
        self.rings
            .iter()
            .filter(|r| r.aromatic)
            .flat_map(|r| r.bonds.iter().copied())
            .collect()
    }

    pub fn is_ring_bond(&self, bond: BondId) -> bool {
        self.rings.iter().any(|r| r.contains_bond(bond))
    }

    /// Number of rings of `size` atoms with the given aromaticity.
    pub fn count(&self, size: usize, aromatic: bool) -> usize {
        self.rings
            .iter()
            .filter(|r| r.len() == size && r.aromatic == aromatic)
            .count()
    }
}

impl Mol {
    /// Perceives rings and aromaticity and records each bond's ring flag.
    pub fn perceive_rings(&mut self) -> RingSet {
        let set = RingSet::perceive(self);
        let in_ring = set.ring_bonds();
        for (id, bond) in self.bonds_iter_mut() {
            bond.ring = if in_ring.contains(&id) {
                RingMembership::Ring
            } else {
                RingMembership::Chain
            };
        }
        debug!(
            rings = set.len(),
            aromatic = set.rings.iter().filter(|r| r.aromatic).count(),
            "perceived rings"
        );
        set
    }
}
