use super::periodic::{element, inverts_negative_charge};
use crate::core::models::atom::BASIS_ATTACH_POINT;
use crate::core::models::ids::AtomId;
use crate::core::models::mol::Mol;
use tracing::trace;

/// Outcome of implicit-hydrogen inference for one atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrogenCount {
    Count(u8),
    /// Not computable and not an error: query symbols, metals, superatoms within their
    /// attachment budget, query bonds.
    Undefined,
    /// No valence state accommodates the atom, or an alias has no expansion.
    Invalid,
}

impl HydrogenCount {
    pub fn count(self) -> Option<u8> {
        match self {
            Self::Count(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_invalid(self) -> bool {
        matches!(self, Self::Invalid)
    }
}

/// Valence change from formal charge, to be subtracted from the bond-order sum.
///
/// Electrons split into `paired = max(e - 4, 0)` lone pairs and
/// `single = min(e, 4) - paired` unpaired electrons. Positive charge removes lone pairs
/// first (+1 each) and then unpaired electrons (-1 each); negative charge only pairs up
/// unpaired electrons (-1 each, +1 for B, P and Si).
fn charge_adjustment(symbol: &str, outer_electrons: u8, charge: i8) -> i32 {
    let e = i32::from(outer_electrons);
    let paired = (e - 4).max(0);
    let single = e.min(4) - paired;
    let charge = i32::from(charge);

    if charge > 0 {
        let from_paired = charge.min(paired);
        let from_single = (charge - from_paired).min(single);
        from_paired - from_single
    } else if charge < 0 {
        let n = (-charge).min(single);
        if inverts_negative_charge(symbol) { n } else { -n }
    } else {
        0
    }
}

/// Infers the implicit-hydrogen count of an atom from its bonds, charge, radical and
/// attachment points.
pub fn implicit_hydrogens(mol: &Mol, atom_id: AtomId) -> HydrogenCount {
    let Some(atom) = mol.atom(atom_id) else {
        return HydrogenCount::Undefined;
    };
    let degree = mol.degree(atom_id);

    if let Some(nested) = atom.superatom.as_deref() {
        let budget: usize = nested
            .atoms_iter()
            .map(|(_, a)| a.connecting_attach_points())
            .sum();
        return if degree > budget {
            HydrogenCount::Invalid
        } else {
            HydrogenCount::Undefined
        };
    }
    if atom.alias.is_some() {
        return HydrogenCount::Invalid;
    }
    let Some(info) = element(&atom.element) else {
        return HydrogenCount::Undefined;
    };
    if info.valences.is_empty() || atom.is_rgroup() {
        return HydrogenCount::Undefined;
    }

    let mut sum = 0.0;
    let mut aromatic = 0;
    for (bond_id, _) in mol.neighbors(atom_id) {
        let Some(bond) = mol.bond(bond_id) else {
            continue;
        };
        let Some(valence) = bond.valence() else {
            return HydrogenCount::Undefined;
        };
        if bond.kind.is_aromatic() {
            aromatic += 1;
            sum += if aromatic >= 3 { 1.0 } else { valence };
        } else {
            sum += valence;
        }
    }
    if aromatic == 2 && matches!(atom.element.as_str(), "O" | "S") {
        sum -= 1.0;
    }

    if let Some(explicit) = atom.explicit_valence {
        let h = (f64::from(explicit) - sum).ceil().max(0.0);
        return HydrogenCount::Count(h as u8);
    }

    sum -= f64::from(charge_adjustment(&atom.element, info.outer_electrons, atom.charge));
    sum += atom.radical.valence();
    sum += atom
        .attach_points
        .iter()
        .filter(|&&code| code != BASIS_ATTACH_POINT)
        .count() as f64;

    let needed = sum.ceil() as i32;
    match info
        .valences
        .iter()
        .map(|&v| i32::from(v))
        .find(|&v| v >= needed)
    {
        Some(state) => HydrogenCount::Count((state - needed) as u8),
        None => HydrogenCount::Invalid,
    }
}

impl Mol {
    /// Computes and caches the implicit-hydrogen count and error flag of one atom.
    pub fn set_hcount(&mut self, atom_id: AtomId) -> HydrogenCount {
        let result = implicit_hydrogens(self, atom_id);
        if let Some(atom) = self.atom_mut(atom_id) {
            atom.hcount = result.count();
            atom.valence_error = result.is_invalid();
            if result.is_invalid() {
                trace!(element = %atom.element, charge = atom.charge, "valence error");
            }
        }
        result
    }

    /// Runs [`Mol::set_hcount`] on every atom. Returns the number of atoms flagged with a
    /// valence error.
    pub fn set_hcounts(&mut self) -> usize {
        let ids = self.atom_ids().to_vec();
        ids.into_iter()
            .filter(|&id| self.set_hcount(id).is_invalid())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::{Atom, Radical};
    use crate::core::models::topology::BondType;
    use crate::core::utils::geometry::Point;

    fn star(center: &str, charge: i8, bonds: &[BondType]) -> (Mol, AtomId) {
        let mut mol = Mol::new();
        let c = mol.add_atom(Atom::new(center, Point::default()).with_charge(charge));
        for (i, &kind) in bonds.iter().enumerate() {
            let n = mol.add_atom(Atom::new("C", Point::new(i as f64 + 1.0, 0.0)));
            mol.add_bond(c, n, kind).unwrap();
        }
        (mol, c)
    }

    #[test]
    fn carbon_with_one_single_bond_has_three_hydrogens() {
        let (mut mol, c) = star("C", 0, &[BondType::Single]);
        assert_eq!(mol.set_hcount(c), HydrogenCount::Count(3));
        assert_eq!(mol.atom(c).unwrap().hcount, Some(3));
    }

    #[test]
    fn anionic_nitrogen_with_two_single_bonds_has_no_hydrogens() {
        let (mut mol, n) = star("N", -1, &[BondType::Single, BondType::Single]);
        assert_eq!(mol.set_hcount(n), HydrogenCount::Count(0));
    }

    #[test]
    fn charge_adjustment_follows_electron_budget() {
        assert_eq!(charge_adjustment("N", 5, 1), 1);
        assert_eq!(charge_adjustment("N", 5, -1), -1);
        assert_eq!(charge_adjustment("C", 4, 1), -1);
        assert_eq!(charge_adjustment("C", 4, -1), -1);
        assert_eq!(charge_adjustment("O", 6, 2), 2);
        assert_eq!(charge_adjustment("O", 6, 3), 1);
        assert_eq!(charge_adjustment("B", 3, -1), 1);
        assert_eq!(charge_adjustment("H", 1, -2), -1);
    }

    #[test]
    fn common_ions_get_expected_hydrogens() {
        let (mut ammonium, n) = star("N", 1, &[]);
        assert_eq!(ammonium.set_hcount(n), HydrogenCount::Count(4));

        let (mut borohydride, b) = star("B", -1, &[]);
        assert_eq!(borohydride.set_hcount(b), HydrogenCount::Count(4));

        let (mut alkoxide, o) = star("O", -1, &[BondType::Single]);
        assert_eq!(alkoxide.set_hcount(o), HydrogenCount::Count(0));

        let (mut cation, c) = star("C", 1, &[]);
        assert_eq!(cation.set_hcount(c), HydrogenCount::Count(3));
    }

    #[test]
    fn hypervalent_states_are_chosen_in_order() {
        let (mut mol, s) = star("S", 0, &[BondType::Double, BondType::Double, BondType::Single]);
        assert_eq!(mol.set_hcount(s), HydrogenCount::Count(1));
    }

    #[test]
    fn overbonded_carbon_is_flagged() {
        let (mut mol, c) = star(
            "C",
            0,
            &[BondType::Double, BondType::Double, BondType::Single],
        );
        assert_eq!(mol.set_hcount(c), HydrogenCount::Invalid);
        let atom = mol.atom(c).unwrap();
        assert!(atom.valence_error);
        assert_eq!(atom.hcount, None);
    }

    #[test]
    fn query_bonds_leave_count_undefined_without_error() {
        let (mut mol, c) = star("C", 0, &[BondType::SingleOrDouble]);
        assert_eq!(mol.set_hcount(c), HydrogenCount::Undefined);
        assert!(!mol.atom(c).unwrap().valence_error);
    }

    #[test]
    fn aromatic_rules_apply() {
        let (mut mol, c) = star("C", 0, &[BondType::Aromatic, BondType::Aromatic]);
        assert_eq!(mol.set_hcount(c), HydrogenCount::Count(1));

        let (mut mol, c) = star(
            "C",
            0,
            &[BondType::Aromatic, BondType::Aromatic, BondType::Aromatic],
        );
        assert_eq!(mol.set_hcount(c), HydrogenCount::Count(0));

        let (mut mol, o) = star("O", 0, &[BondType::Aromatic, BondType::Aromatic]);
        assert_eq!(mol.set_hcount(o), HydrogenCount::Count(0));
    }

    #[test]
    fn radicals_and_attach_points_consume_valence() {
        let (mut mol, c) = star("C", 0, &[BondType::Single]);
        mol.atom_mut(c).unwrap().radical = Radical::Doublet;
        assert_eq!(mol.set_hcount(c), HydrogenCount::Count(2));

        mol.atom_mut(c).unwrap().radical = Radical::Singlet;
        assert_eq!(mol.set_hcount(c), HydrogenCount::Count(1));

        mol.atom_mut(c).unwrap().radical = Radical::None;
        mol.atom_mut(c).unwrap().attach_points = vec![1, BASIS_ATTACH_POINT];
        assert_eq!(mol.set_hcount(c), HydrogenCount::Count(2));
    }

    #[test]
    fn explicit_valence_overrides_inference() {
        let (mut mol, n) = star("N", 0, &[BondType::Single]);
        mol.atom_mut(n).unwrap().explicit_valence = Some(4);
        assert_eq!(mol.set_hcount(n), HydrogenCount::Count(3));
        mol.atom_mut(n).unwrap().explicit_valence = Some(0);
        assert_eq!(mol.set_hcount(n), HydrogenCount::Count(0));
    }

    #[test]
    fn aliases_and_superatoms_follow_expansion_rules() {
        let (mut mol, c) = star("C", 0, &[BondType::Single]);
        mol.atom_mut(c).unwrap().alias = Some("Xyz".into());
        assert_eq!(mol.set_hcount(c), HydrogenCount::Invalid);

        let mut nested = Mol::new();
        let mut anchor = Atom::new("C", Point::default());
        anchor.attach_points = vec![1];
        nested.add_atom(anchor);
        mol.atom_mut(c).unwrap().superatom = Some(Box::new(nested));
        assert_eq!(mol.set_hcount(c), HydrogenCount::Undefined);
        assert!(!mol.atom(c).unwrap().valence_error);

        let extra = mol.add_atom(Atom::new("C", Point::new(0.0, 3.0)));
        mol.add_bond(c, extra, BondType::Single).unwrap();
        assert_eq!(mol.set_hcount(c), HydrogenCount::Invalid);
    }

    #[test]
    fn non_elements_and_metals_are_undefined() {
        let (mut mol, q) = star("Q", 0, &[BondType::Single]);
        assert_eq!(mol.set_hcount(q), HydrogenCount::Undefined);
        let (mut mol, fe) = star("Fe", 2, &[]);
        assert_eq!(mol.set_hcount(fe), HydrogenCount::Undefined);
        let (mut mol, r) = star("R", 0, &[BondType::Single]);
        assert_eq!(mol.set_hcount(r), HydrogenCount::Undefined);
    }

    #[test]
    fn set_hcounts_reports_error_total() {
        let (mut mol, _) = star(
            "C",
            0,
            &[BondType::Triple, BondType::Double],
        );
        assert_eq!(mol.set_hcounts(), 1);
    }
}
