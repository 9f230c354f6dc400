//! Substructure and full-structure atom-atom mapping.
//!
//! Both graphs are prepared on copies (superatoms expanded, rings and aromaticity
//! perceived, hydrogens inferred), screened with cheap histograms, and then mapped by a
//! backtracking search along the query's BFS discovery order. The first complete mapping
//! found is returned; it is neither minimal nor canonical.

mod compat;
mod screen;
mod search;

pub use screen::Fingerprint;

use super::config::MatchConfig;
use super::error::EngineError;
use super::rings::RingSet;
use crate::core::models::ids::{AtomId, BondId};
use crate::core::models::mol::Mol;
use crate::core::models::topology::BondOrderClass;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Query-to-target correspondence, in the order the search assigned it.
///
/// Keys refer to the prepared copies. Copies keep the keys of the graph they were made
/// from, so keys of atoms and bonds present in the caller's graphs are valid there too;
/// atoms created by superatom expansion only exist in the copies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomAtomMap {
    pub atoms: Vec<(AtomId, AtomId)>,
    pub bonds: Vec<(BondId, BondId)>,
}

impl AtomAtomMap {
    pub fn target_atom(&self, query_atom: AtomId) -> Option<AtomId> {
        self.atoms
            .iter()
            .find(|(q, _)| *q == query_atom)
            .map(|&(_, t)| t)
    }

    pub fn target_bond(&self, query_bond: BondId) -> Option<BondId> {
        self.bonds
            .iter()
            .find(|(q, _)| *q == query_bond)
            .map(|&(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

/// A graph ready for matching, reusable across many searches.
#[derive(Debug, Clone)]
pub struct PreparedMol {
    mol: Mol,
    rings: RingSet,
    aromatic_bonds: HashSet<BondId>,
    fingerprint: Fingerprint,
}

impl PreparedMol {
    pub fn new(source: &Mol) -> Self {
        let mut mol = source.clone();
        mol.expand_super_atoms();
        let rings = mol.perceive_rings();
        mol.set_hcounts();
        let aromatic_bonds = rings.aromatic_bonds();
        let fingerprint = Fingerprint::compute(&mol, &rings, &aromatic_bonds);
        Self {
            mol,
            rings,
            aromatic_bonds,
            fingerprint,
        }
    }

    pub fn mol(&self) -> &Mol {
        &self.mol
    }

    pub fn rings(&self) -> &RingSet {
        &self.rings
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Order class of a bond, with bonds of aromatic rings treated as aromatic.
    pub(crate) fn bond_class(&self, bond: BondId) -> Option<BondOrderClass> {
        if self.aromatic_bonds.contains(&bond) {
            return Some(BondOrderClass::Aromatic);
        }
        self.mol.bond(bond).map(|b| b.kind.order_class())
    }

    pub(crate) fn ring_bond_count(&self, atom: AtomId) -> usize {
        self.mol
            .bonds_of(atom)
            .iter()
            .filter(|&&b| self.rings.is_ring_bond(b))
            .count()
    }
}

/// Screens and searches for a mapping of `query` onto `target`.
///
/// Returns `Ok(None)` when no mapping exists and
/// [`EngineError::SearchBudgetExceeded`] when the configured step budget ran out first.
pub fn find_match(
    query: &Mol,
    target: &Mol,
    config: &MatchConfig,
) -> Result<Option<AtomAtomMap>, EngineError> {
    let query = PreparedMol::new(query);
    let target = PreparedMol::new(target);
    find_prepared_match(&query, &target, config)
}

#[instrument(skip_all, name = "match", fields(full = config.is_fullstructure()))]
pub fn find_prepared_match(
    query: &PreparedMol,
    target: &PreparedMol,
    config: &MatchConfig,
) -> Result<Option<AtomAtomMap>, EngineError> {
    if !passes_screen(query, target, config) {
        debug!("rejected by screen");
        return Ok(None);
    }
    search_screened(query, target, config)
}

/// Whether the fingerprint screen lets `target` through to the search.
pub fn passes_screen(query: &PreparedMol, target: &PreparedMol, config: &MatchConfig) -> bool {
    query
        .fingerprint
        .admits(&target.fingerprint, config.is_fullstructure())
}

/// Runs the mapping search on a pair that already passed [`passes_screen`].
pub fn search_screened(
    query: &PreparedMol,
    target: &PreparedMol,
    config: &MatchConfig,
) -> Result<Option<AtomAtomMap>, EngineError> {
    let result = search::run(query, target, config)?;
    debug!(found = result.is_some(), "search finished");
    Ok(result)
}

impl Mol {
    /// Maps this graph, as a query, onto part of `target`.
    pub fn substructure_match(&self, target: &Mol) -> Result<Option<AtomAtomMap>, EngineError> {
        find_match(self, target, &MatchConfig::substructure())
    }

    /// Maps this graph onto the whole of `target`.
    pub fn fullstructure_match(&self, target: &Mol) -> Result<Option<AtomAtomMap>, EngineError> {
        find_match(self, target, &MatchConfig::fullstructure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::{Atom, AtomList};
    use crate::core::models::topology::BondType;
    use crate::core::utils::geometry::Point;
    use crate::engine::config::MatchConfigBuilder;
    use crate::engine::rings::fixtures::*;

    fn chain(elements: &[&str], kinds: &[BondType]) -> Mol {
        let mut mol = Mol::new();
        let ids: Vec<AtomId> = elements
            .iter()
            .enumerate()
            .map(|(i, e)| mol.add_atom(Atom::new(e, Point::new(i as f64, 0.0))))
            .collect();
        for (i, &kind) in kinds.iter().enumerate() {
            mol.add_bond(ids[i], ids[i + 1], kind).unwrap();
        }
        mol
    }

    fn assert_valid_mapping(query: &Mol, target: &Mol, map: &AtomAtomMap) {
        let query = PreparedMol::new(query);
        let target = PreparedMol::new(target);
        assert_eq!(map.atoms.len(), query.mol().atom_count());
        assert_eq!(map.bonds.len(), query.mol().bond_count());
        let images: HashSet<AtomId> = map.atoms.iter().map(|&(_, t)| t).collect();
        assert_eq!(images.len(), map.atoms.len(), "mapping must be injective");
        for &(qb, tb) in &map.bonds {
            let q = query.mol().bond(qb).unwrap();
            let t = target.mol().bond(tb).unwrap();
            let ends = [
                map.target_atom(q.atom1_id).unwrap(),
                map.target_atom(q.atom2_id).unwrap(),
            ];
            assert!(t.contains(ends[0]) && t.contains(ends[1]));
        }
    }

    #[test]
    fn screened_search_agrees_with_the_full_pipeline() {
        let config = MatchConfig::substructure();
        let query = PreparedMol::new(&benzene());
        let aromatic = PreparedMol::new(&naphthalene());
        let saturated = PreparedMol::new(&cyclohexane());

        assert!(passes_screen(&query, &aromatic, &config));
        assert_eq!(
            search_screened(&query, &aromatic, &config).unwrap(),
            find_prepared_match(&query, &aromatic, &config).unwrap()
        );
        assert!(!passes_screen(&query, &saturated, &config));
        assert_eq!(find_prepared_match(&query, &saturated, &config).unwrap(), None);
    }

    #[test]
    fn benzene_is_a_substructure_of_naphthalene() {
        let query = benzene();
        let target = naphthalene();
        let map = query.substructure_match(&target).unwrap().unwrap();
        assert_valid_mapping(&query, &target, &map);
    }

    #[test]
    fn naphthalene_is_not_a_substructure_of_benzene() {
        assert!(naphthalene().substructure_match(&benzene()).unwrap().is_none());
    }

    #[test]
    fn cyclohexane_does_not_match_benzene() {
        assert!(cyclohexane().substructure_match(&benzene()).unwrap().is_none());
        assert!(benzene().substructure_match(&cyclohexane()).unwrap().is_none());
    }

    #[test]
    fn kekule_forms_match_through_aromaticity() {
        use BondType::{Double as D, Single as S};
        let mut shifted = Mol::new();
        add_ring(&mut shifted, &["C"; 6], &[D, S, D, S, D, S]);
        assert!(benzene().fullstructure_match(&shifted).unwrap().is_some());

        let mut typed = Mol::new();
        add_ring(&mut typed, &["C"; 6], &[BondType::Aromatic; 6]);
        assert!(benzene().fullstructure_match(&typed).unwrap().is_some());
    }

    #[test]
    fn fullstructure_self_match_of_a_clone() {
        let mol = naphthalene();
        let copy = mol.clone();
        let map = mol.fullstructure_match(&copy).unwrap().unwrap();
        assert_eq!(map.len(), 10);
        assert_valid_mapping(&mol, &copy, &map);
    }

    #[test]
    fn fullstructure_rejects_a_larger_target() {
        let ethane = chain(&["C", "C"], &[BondType::Single]);
        let propane = chain(&["C", "C", "C"], &[BondType::Single, BondType::Single]);
        assert!(ethane.substructure_match(&propane).unwrap().is_some());
        assert!(ethane.fullstructure_match(&propane).unwrap().is_none());
    }

    #[test]
    fn charge_and_isotope_must_agree() {
        let plain = chain(&["C", "O"], &[BondType::Single]);
        let mut charged = chain(&["C", "O"], &[BondType::Single]);
        let o = charged.atom_ids()[1];
        charged.atom_mut(o).unwrap().charge = -1;
        assert!(plain.substructure_match(&charged).unwrap().is_none());

        let mut labelled = chain(&["C", "O"], &[BondType::Single]);
        let c = labelled.atom_ids()[0];
        labelled.atom_mut(c).unwrap().isotope = Some(13);
        assert!(labelled.substructure_match(&plain).unwrap().is_none());
    }

    #[test]
    fn wildcards_and_atom_lists_match_by_rule() {
        let target = chain(&["C", "Cl"], &[BondType::Single]);
        for symbol in ["*", "A", "X"] {
            let query = chain(&["C", symbol], &[BondType::Single]);
            assert!(
                query.substructure_match(&target).unwrap().is_some(),
                "{symbol} should match Cl"
            );
        }
        let q = chain(&["C", "Q"], &[BondType::Single]);
        assert!(q.substructure_match(&target).unwrap().is_some());
        let q_on_carbon = chain(&["C", "Q"], &[BondType::Single]);
        let ethane = chain(&["C", "C"], &[BondType::Single]);
        assert!(q_on_carbon.substructure_match(&ethane).unwrap().is_none());

        let mut listed = chain(&["C", "L"], &[BondType::Single]);
        let l = listed.atom_ids()[1];
        listed.atom_mut(l).unwrap().query.atom_list =
            Some(AtomList::new(false, vec!["Br".into(), "Cl".into()]));
        assert!(listed.substructure_match(&target).unwrap().is_some());
        listed.atom_mut(l).unwrap().query.atom_list = Some(AtomList::new(true, vec!["Cl".into()]));
        assert!(listed.substructure_match(&target).unwrap().is_none());
    }

    #[test]
    fn query_bonds_accept_matching_orders() {
        let query = chain(&["C", "C"], &[BondType::SingleOrDouble]);
        let double = chain(&["C", "C"], &[BondType::Double]);
        let triple = chain(&["C", "C"], &[BondType::Triple]);
        assert!(query.substructure_match(&double).unwrap().is_some());
        assert!(query.substructure_match(&triple).unwrap().is_none());
    }

    #[test]
    fn substitution_count_query_is_honored_when_enabled() {
        let mut query = chain(&["C", "O"], &[BondType::Single]);
        let c = query.atom_ids()[0];
        query.atom_mut(c).unwrap().query.substitution_count = Some(1);
        let methanol = chain(&["C", "O"], &[BondType::Single]);
        let ethanol = chain(&["C", "C", "O"], &[BondType::Single, BondType::Single]);

        assert!(query.substructure_match(&methanol).unwrap().is_some());
        assert!(query.substructure_match(&ethanol).unwrap().is_none());

        let lenient = MatchConfigBuilder::new()
            .fullstructure(false)
            .honor_query_features(false)
            .build()
            .unwrap();
        assert!(find_match(&query, &ethanol, &lenient).unwrap().is_some());
    }

    #[test]
    fn stereo_bonds_are_compared_only_when_requested() {
        let query = chain(&["C", "O"], &[BondType::Wedge]);
        let target = chain(&["C", "O"], &[BondType::Hash]);
        assert!(query.substructure_match(&target).unwrap().is_some());

        let strict = MatchConfigBuilder::new()
            .fullstructure(false)
            .match_stereo_bonds(true)
            .build()
            .unwrap();
        assert!(find_match(&query, &target, &strict).unwrap().is_none());
        assert!(find_match(&query, &query.clone(), &strict).unwrap().is_some());
    }

    #[test]
    fn superatoms_are_expanded_before_matching() {
        let mut abbreviated = chain(&["C", "O", "C"], &[BondType::Single, BondType::Single]);
        let ids = abbreviated.atom_ids().to_vec();
        abbreviated.collapse_super_atom(&ids[1..], "OMe").unwrap();
        let full = chain(&["C", "O", "C"], &[BondType::Single, BondType::Single]);
        assert!(abbreviated.fullstructure_match(&full).unwrap().is_some());
    }

    #[test]
    fn exhausted_budget_is_an_error_not_a_miss() {
        let query = chain(&["C", "C", "C", "N"], &[BondType::Single; 3]);
        let target = {
            let mut mol = Mol::new();
            let hub = mol.add_atom(Atom::new("C", Point::default()));
            for i in 0..12 {
                let spoke = mol.add_atom(Atom::new("C", Point::new(i as f64, 1.0)));
                mol.add_bond(hub, spoke, BondType::Single).unwrap();
            }
            let tail = mol.add_atom(Atom::new("N", Point::new(0.0, -1.0)));
            mol.add_bond(hub, tail, BondType::Single).unwrap();
            mol
        };
        let tight = MatchConfigBuilder::new()
            .fullstructure(false)
            .max_steps(3)
            .build()
            .unwrap();
        assert!(matches!(
            find_match(&query, &target, &tight),
            Err(EngineError::SearchBudgetExceeded { limit: 3 })
        ));
    }
}
