use super::compat::{atoms_compatible, bonds_compatible};
use super::{AtomAtomMap, PreparedMol};
use crate::core::models::ids::{AtomId, BondId};
use crate::core::models::traversal::{BfsEvent, BfsForest};
use crate::engine::config::MatchConfig;
use crate::engine::error::EngineError;
use std::collections::{HashMap, HashSet};
use tracing::trace;

struct Search<'a> {
    query: &'a PreparedMol,
    target: &'a PreparedMol,
    config: &'a MatchConfig,
    /// Query BFS events in discovery order.
    path: Vec<BfsEvent>,
    atom_map: HashMap<AtomId, AtomId>,
    used_atoms: HashSet<AtomId>,
    used_bonds: HashSet<BondId>,
    assigned_atoms: Vec<(AtomId, AtomId)>,
    assigned_bonds: Vec<(BondId, BondId)>,
    steps: u64,
}

impl Search<'_> {
    fn tick(&mut self) -> Result<(), EngineError> {
        self.steps += 1;
        match self.config.max_steps {
            Some(limit) if self.steps > limit => Err(EngineError::SearchBudgetExceeded { limit }),
            _ => Ok(()),
        }
    }

    fn bind_atom(&mut self, q: AtomId, t: AtomId) {
        self.atom_map.insert(q, t);
        self.used_atoms.insert(t);
        self.assigned_atoms.push((q, t));
    }

    fn unbind_atom(&mut self, q: AtomId, t: AtomId) {
        self.atom_map.remove(&q);
        self.used_atoms.remove(&t);
        self.assigned_atoms.pop();
    }

    fn bind_bond(&mut self, q: BondId, t: BondId) {
        self.used_bonds.insert(t);
        self.assigned_bonds.push((q, t));
    }

    fn unbind_bond(&mut self, t: BondId) {
        self.used_bonds.remove(&t);
        self.assigned_bonds.pop();
    }

    /// Whether the query bond's first atom maps onto the target bond's first atom.
    fn aligned(&self, query_bond: BondId, target_bond: BondId) -> bool {
        match (
            self.query.mol().bond(query_bond),
            self.target.mol().bond(target_bond),
        ) {
            (Some(qb), Some(tb)) => self.atom_map.get(&qb.atom1_id) == Some(&tb.atom1_id),
            _ => false,
        }
    }

    /// Extends the partial mapping from path position `pos`; `true` once complete.
    fn extend(&mut self, pos: usize) -> Result<bool, EngineError> {
        let Some(&event) = self.path.get(pos) else {
            return Ok(true);
        };
        match event {
            BfsEvent::Start(q) => {
                let candidates: Vec<AtomId> = self.target.mol().atom_ids().to_vec();
                for t in candidates {
                    if self.used_atoms.contains(&t) {
                        continue;
                    }
                    self.tick()?;
                    if !atoms_compatible(self.query, q, self.target, t, self.config) {
                        continue;
                    }
                    self.bind_atom(q, t);
                    if self.extend(pos + 1)? {
                        return Ok(true);
                    }
                    self.unbind_atom(q, t);
                }
                Ok(false)
            }
            BfsEvent::Tree { bond, from, to } => {
                let Some(&t_from) = self.atom_map.get(&from) else {
                    return Err(EngineError::Internal("tree bond from an unmapped atom".into()));
                };
                let candidates: Vec<(BondId, AtomId)> = self.target.mol().neighbors(t_from).collect();
                for (t_bond, t_to) in candidates {
                    if self.used_atoms.contains(&t_to) || self.used_bonds.contains(&t_bond) {
                        continue;
                    }
                    self.tick()?;
                    if !atoms_compatible(self.query, to, self.target, t_to, self.config) {
                        continue;
                    }
                    self.bind_atom(to, t_to);
                    let aligned = self.aligned(bond, t_bond);
                    if !bonds_compatible(self.query, bond, self.target, t_bond, aligned, self.config) {
                        self.unbind_atom(to, t_to);
                        continue;
                    }
                    self.bind_bond(bond, t_bond);
                    if self.extend(pos + 1)? {
                        return Ok(true);
                    }
                    self.unbind_bond(t_bond);
                    self.unbind_atom(to, t_to);
                }
                Ok(false)
            }
            BfsEvent::Closure { bond, from, to } => {
                let (Some(&t_from), Some(&t_to)) = (self.atom_map.get(&from), self.atom_map.get(&to)) else {
                    return Err(EngineError::Internal("ring closure between unmapped atoms".into()));
                };
                self.tick()?;
                let Some(t_bond) = self.target.mol().bond_between(t_from, t_to) else {
                    return Ok(false);
                };
                if self.used_bonds.contains(&t_bond) {
                    return Ok(false);
                }
                let aligned = self.aligned(bond, t_bond);
                if !bonds_compatible(self.query, bond, self.target, t_bond, aligned, self.config) {
                    return Ok(false);
                }
                self.bind_bond(bond, t_bond);
                if self.extend(pos + 1)? {
                    return Ok(true);
                }
                self.unbind_bond(t_bond);
                Ok(false)
            }
        }
    }
}

/// Backtracking search along the query's BFS discovery order. Candidates are tried in
/// target order and the first complete mapping wins.
pub(super) fn run(
    query: &PreparedMol,
    target: &PreparedMol,
    config: &MatchConfig,
) -> Result<Option<AtomAtomMap>, EngineError> {
    let path: Vec<BfsEvent> = BfsForest::build(query.mol()).events().copied().collect();
    let mut search = Search {
        query,
        target,
        config,
        path,
        atom_map: HashMap::new(),
        used_atoms: HashSet::new(),
        used_bonds: HashSet::new(),
        assigned_atoms: Vec::new(),
        assigned_bonds: Vec::new(),
        steps: 0,
    };
    let found = search.extend(0)?;
    trace!(steps = search.steps, found, "backtracking finished");
    if !found {
        return Ok(None);
    }
    if config.is_fullstructure()
        && (search.used_atoms.len() != target.mol().atom_count()
            || search.used_bonds.len() != target.mol().bond_count())
    {
        return Ok(None);
    }
    Ok(Some(AtomAtomMap {
        atoms: search.assigned_atoms,
        bonds: search.assigned_bonds,
    }))
}
