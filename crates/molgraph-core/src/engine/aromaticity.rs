//! Aromatic ring detection.
//!
//! Rings are classified in passes until no ring changes. A bond of a ring already found
//! aromatic counts as order 1.5 in later passes, which is how fused systems such as
//! naphthalene become aromatic one ring at a time.

use super::rings::{Ring, RingSet};
use crate::core::models::ids::BondId;
use crate::core::models::mol::Mol;
use std::collections::HashSet;
use tracing::trace;

const AROMATIC_ORDER: f64 = 1.5;

fn order(mol: &Mol, bond: BondId, aromatic: &HashSet<BondId>) -> Option<f64> {
    if aromatic.contains(&bond) {
        return Some(AROMATIC_ORDER);
    }
    mol.bond(bond)?.valence()
}

fn in_single_double_range(v: f64) -> bool {
    (1.0..=2.0).contains(&v)
}

fn alternates(a: f64, b: f64) -> bool {
    (a == 1.0 && b == 2.0)
        || (a == 2.0 && b == 1.0)
        || (a == AROMATIC_ORDER && in_single_double_range(b))
        || (b == AROMATIC_ORDER && in_single_double_range(a))
}

fn six_ring_is_aromatic(orders: &[f64]) -> bool {
    let n = orders.len();
    (0..n).all(|i| alternates(orders[i], orders[(i + 1) % n]))
}

fn is_double_or_aromatic(v: f64) -> bool {
    v == 2.0 || v == AROMATIC_ORDER
}

/// Whether the atom shared by two ring bonds can donate the lone pair of a
/// five-membered heteroaromatic ring.
fn is_donor(mol: &Mol, ring: &Ring, index: usize, aromatic: &HashSet<BondId>) -> bool {
    let atom_id = ring.atoms[index];
    let Some(atom) = mol.atom(atom_id) else {
        return false;
    };
    match atom.element.as_str() {
        "N" | "O" | "S" | "P" => true,
        "C" => mol.neighbors(atom_id).any(|(bond, _)| {
            !ring.contains_bond(bond)
                && order(mol, bond, aromatic).is_some_and(is_double_or_aromatic)
        }),
        _ => false,
    }
}

fn five_ring_is_aromatic(mol: &Mol, ring: &Ring, orders: &[f64], aromatic: &HashSet<BondId>) -> bool {
    let n = orders.len();
    let single_pairs: Vec<usize> = (0..n)
        .filter(|&i| orders[i] == 1.0 && orders[(i + 1) % n] == 1.0)
        .collect();
    let [i] = single_pairs.as_slice() else {
        return false;
    };
    let i = *i;
    let shared = (i + 1) % n;
    is_donor(mol, ring, shared, aromatic)
        && is_double_or_aromatic(orders[(i + n - 1) % n])
        && is_double_or_aromatic(orders[(i + 2) % n])
}

fn ring_is_aromatic(mol: &Mol, ring: &Ring, aromatic: &HashSet<BondId>) -> bool {
    let all_typed_aromatic = ring
        .bonds
        .iter()
        .all(|&b| mol.bond(b).is_some_and(|bond| bond.kind.is_aromatic()));
    if all_typed_aromatic {
        return true;
    }
    let Some(orders) = ring
        .bonds
        .iter()
        .map(|&b| order(mol, b, aromatic))
        .collect::<Option<Vec<f64>>>()
    else {
        return false;
    };
    match ring.len() {
        6 => six_ring_is_aromatic(&orders),
        5 => five_ring_is_aromatic(mol, ring, &orders, aromatic),
        _ => false,
    }
}

/// Marks the aromatic rings of `rings`, iterating to a fixed point.
pub fn detect_aromatic_rings(mol: &Mol, rings: &mut RingSet) {
    let mut aromatic: HashSet<BondId> = HashSet::new();
    let mut pass = 0;
    loop {
        pass += 1;
        let mut changed = false;
        for ring in rings.rings.iter_mut().filter(|r| !r.aromatic) {
            if ring_is_aromatic(mol, ring, &aromatic) {
                ring.aromatic = true;
                aromatic.extend(ring.bonds.iter().copied());
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    trace!(passes = pass, aromatic_bonds = aromatic.len(), "aromaticity fixed point");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rings::fixtures::*;
    use crate::core::models::topology::BondType;

    #[test]
    fn six_ring_alternation_rules() {
        assert!(six_ring_is_aromatic(&[1.0, 2.0, 1.0, 2.0, 1.0, 2.0]));
        assert!(six_ring_is_aromatic(&[1.5, 1.0, 2.0, 1.0, 2.0, 1.0]));
        assert!(six_ring_is_aromatic(&[1.5; 6]));
        assert!(!six_ring_is_aromatic(&[1.0; 6]));
        assert!(!six_ring_is_aromatic(&[1.0, 2.0, 1.0, 1.0, 2.0, 1.0]));
        assert!(!six_ring_is_aromatic(&[3.0, 1.0, 2.0, 1.0, 2.0, 1.0]));
    }

    #[test]
    fn pyrrole_is_aromatic() {
        let rings = RingSet::perceive(&pyrrole());
        assert_eq!(rings.count(5, true), 1);
    }

    #[test]
    fn cyclopentadiene_carbon_is_not_a_donor() {
        use BondType::{Double as D, Single as S};
        let mut mol = Mol::new();
        add_ring(&mut mol, &["C"; 5], &[S, D, S, D, S]);
        let rings = RingSet::perceive(&mol);
        assert_eq!(rings.count(5, false), 1);
    }

    #[test]
    fn exocyclic_double_bond_makes_carbon_a_donor() {
        use BondType::{Double as D, Single as S};
        let mut mol = Mol::new();
        let atoms = add_ring(&mut mol, &["C"; 5], &[S, D, S, D, S]);
        let exo = mol.add_atom(crate::core::models::atom::Atom::new(
            "C",
            crate::core::utils::geometry::Point::new(3.0, 0.0),
        ));
        mol.add_bond(atoms[0], exo, D).unwrap();
        let rings = RingSet::perceive(&mol);
        assert_eq!(rings.count(5, true), 1);
    }

    #[test]
    fn all_aromatic_typed_ring_is_aromatic_at_any_size() {
        let mut mol = Mol::new();
        add_ring(&mut mol, &["C"; 7], &[BondType::Aromatic; 7]);
        let rings = RingSet::perceive(&mol);
        assert_eq!(rings.len(), 1);
        assert!(rings.rings[0].aromatic);
    }

    #[test]
    fn query_bonds_block_order_based_detection() {
        use BondType::{Double as D, Single as S};
        let mut mol = Mol::new();
        add_ring(&mut mol, &["C"; 6], &[S, D, S, D, S, BondType::SingleOrDouble]);
        let rings = RingSet::perceive(&mol);
        assert_eq!(rings.count(6, true), 0);
    }
}
