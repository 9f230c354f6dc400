use super::atom::Atom;
use super::ids::{AtomId, BondId};
use super::mol::Mol;
use super::topology::Bond;

/// Incremental construction of a [`Mol`] from index-addressed records, as produced by
/// file readers where atoms are referred to by their 1-based position.
#[derive(Debug, Default)]
pub struct MolBuilder {
    mol: Mol,
    atom_index_map: Vec<AtomId>,
    bond_index_map: Vec<BondId>,
}

impl MolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mol(&self) -> &Mol {
        &self.mol
    }

    pub fn mol_mut(&mut self) -> &mut Mol {
        &mut self.mol
    }

    /// Appends an atom and returns its 1-based index.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        let id = self.mol.add_atom(atom);
        self.atom_index_map.push(id);
        self.atom_index_map.len()
    }

    /// Key of the atom at a 1-based index.
    pub fn atom_id(&self, index: usize) -> Option<AtomId> {
        index
            .checked_sub(1)
            .and_then(|i| self.atom_index_map.get(i))
            .copied()
    }

    pub fn atom_mut(&mut self, index: usize) -> Option<&mut Atom> {
        let id = self.atom_id(index)?;
        self.mol.atom_mut(id)
    }

    /// Key of the bond at a 1-based index.
    pub fn bond_id(&self, index: usize) -> Option<BondId> {
        index
            .checked_sub(1)
            .and_then(|i| self.bond_index_map.get(i))
            .copied()
    }

    /// Appends a bond between two 1-based atom indices.
    ///
    /// The endpoints stored in `bond` are overwritten. Returns `None` when an index is out
    /// of range, the endpoints coincide or the pair is already bonded.
    pub fn add_bond(&mut self, index1: usize, index2: usize, mut bond: Bond) -> Option<BondId> {
        bond.atom1_id = self.atom_id(index1)?;
        bond.atom2_id = self.atom_id(index2)?;
        if self.mol.bond_between(bond.atom1_id, bond.atom2_id).is_some() {
            return None;
        }
        let id = self.mol.add_bond_record(bond)?;
        self.bond_index_map.push(id);
        Some(id)
    }

    pub fn atom_count(&self) -> usize {
        self.atom_index_map.len()
    }

    pub fn build(self) -> Mol {
        self.mol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::topology::BondType;
    use crate::core::utils::geometry::Point;

    #[test]
    fn builder_resolves_one_based_indices() {
        let mut builder = MolBuilder::new();
        assert_eq!(builder.add_atom(Atom::new("C", Point::default())), 1);
        assert_eq!(builder.add_atom(Atom::new("O", Point::new(1.0, 0.0))), 2);

        let placeholder = builder.atom_id(1).unwrap();
        let bond = Bond::new(placeholder, placeholder, BondType::Double);
        assert!(builder.add_bond(1, 2, bond.clone()).is_some());
        assert!(builder.add_bond(2, 1, bond.clone()).is_none());
        assert!(builder.add_bond(1, 3, bond.clone()).is_none());
        assert!(builder.add_bond(0, 1, bond).is_none());
        assert!(builder.bond_id(1).is_some());
        assert!(builder.bond_id(2).is_none());

        let mol = builder.build();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 1);
        let (_, only) = mol.bonds_iter().next().unwrap();
        assert_eq!(only.kind, BondType::Double);
    }
}
