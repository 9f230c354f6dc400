use super::atom::{Atom, BASIS_ATTACH_POINT};
use super::ids::AtomId;
use super::mol::Mol;
use super::topology::Bond;
use crate::core::templates::registry::TemplateRegistry;
use crate::core::utils::geometry::Point;
use nalgebra::Rotation2;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuperatomError {
    #[error("No atoms of the graph were given to collapse")]
    NoAtoms,
    #[error("{0} bonds cross the superatom boundary, more than attachment points can number")]
    TooManyAttachments(usize),
}

impl Mol {
    /// Moves and orients this graph for attachment at `position`.
    ///
    /// The graph is first scaled around `anchor` so its median bond length equals
    /// `bond_length` (when both are known), then rotated so the direction from `anchor`
    /// to the centroid of the remaining atoms points along `direction_deg`, and finally
    /// translated so `anchor` sits on `position`.
    pub fn align_mol(
        &mut self,
        anchor: AtomId,
        position: Point,
        direction_deg: f64,
        bond_length: Option<f64>,
    ) {
        let Some(origin) = self.atom(anchor).map(|a| a.position) else {
            return;
        };

        if let (Some(target), Some(current)) = (bond_length, self.median_bond_length()) {
            if current > 0.0 && target > 0.0 {
                self.scale(target / current, origin);
            }
        }

        let others: Vec<Point> = self
            .atoms_iter()
            .filter(|&(id, _)| id != anchor)
            .map(|(_, a)| a.position)
            .collect();
        if !others.is_empty() {
            let n = others.len() as f64;
            let sum = others.iter().fold(Point::default(), |acc, p| acc + *p);
            let centroid = Point::new(sum.x / n, sum.y / n);
            if centroid.distance(&origin) > f64::EPSILON {
                let delta = direction_deg - origin.angle_to(&centroid);
                let rotation = Rotation2::new(delta.to_radians());
                for (_, atom) in self.atoms_iter_mut() {
                    atom.position = atom.position.rotated_by(&rotation, origin);
                }
            }
        }

        self.offset(position.x - origin.x, position.y - origin.y);
    }

    /// Replaces a set of atoms by a single superatom that owns them as a nested graph.
    ///
    /// Bonds crossing the boundary are re-pointed to the new atom. The inner endpoint of
    /// the k-th crossing bond (in bond order) receives attachment point k in the nested
    /// graph. Returns the new atom's key. The graph is left untouched when `atoms` names
    /// no atom or when the crossing bonds would need codes up to the basis code.
    pub fn collapse_super_atom(
        &mut self,
        atoms: &[AtomId],
        label: &str,
    ) -> Result<AtomId, SuperatomError> {
        let inside: HashSet<AtomId> = atoms
            .iter()
            .copied()
            .filter(|&id| self.atom(id).is_some())
            .collect();
        if inside.is_empty() {
            return Err(SuperatomError::NoAtoms);
        }

        let crossing: Vec<(Bond, bool)> = self
            .bonds_iter()
            .filter_map(|(_, bond)| {
                let in1 = inside.contains(&bond.atom1_id);
                let in2 = inside.contains(&bond.atom2_id);
                (in1 != in2).then(|| (bond.clone(), in1))
            })
            .collect();
        let attach_count = u8::try_from(crossing.len())
            .ok()
            .filter(|&n| n < BASIS_ATTACH_POINT)
            .ok_or(SuperatomError::TooManyAttachments(crossing.len()))?;

        let members: Vec<AtomId> = self
            .atom_ids()
            .iter()
            .copied()
            .filter(|id| inside.contains(id))
            .collect();
        let (mut nested, remap) = self.extract(&members);
        nested.name = label.to_string();
        nested.props.clear();

        for (code, (bond, first_inside)) in (1..=attach_count).zip(&crossing) {
            let inner = if *first_inside { bond.atom1_id } else { bond.atom2_id };
            if let Some(atom) = remap.get(&inner).and_then(|&id| nested.atom_mut(id)) {
                atom.attach_points.push(code);
            }
        }

        let position = crossing
            .first()
            .and_then(|(bond, first_inside)| {
                let inner = if *first_inside { bond.atom1_id } else { bond.atom2_id };
                self.atom(inner).map(|a| a.position)
            })
            .or_else(|| nested.centroid())
            .unwrap_or_default();

        for id in &members {
            self.remove_atom(*id);
        }

        let mut superatom = Atom::new(label, position);
        superatom.alias = Some(label.to_string());
        superatom.superatom = Some(Box::new(nested));
        let new_id = self.add_atom(superatom);

        for (mut bond, first_inside) in crossing {
            if first_inside {
                bond.atom1_id = new_id;
            } else {
                bond.atom2_id = new_id;
            }
            self.add_bond_record(bond);
        }
        trace!(label, atoms = members.len(), "collapsed superatom");
        Ok(new_id)
    }

    /// Expands one superatom in place into its nested graph.
    ///
    /// The nested graph is aligned on a copy with [`Mol::align_mol`], merged, and each
    /// crossing bond is re-pointed to the nested atom carrying the matching attachment
    /// point (or the anchor when none does). Consumed attachment points are cleared.
    ///
    /// # Return
    ///
    /// The map from nested atom keys to their new keys, or `None` if the atom is not a
    /// superatom.
    pub fn expand_super_atom(&mut self, atom_id: AtomId) -> Option<HashMap<AtomId, AtomId>> {
        let atom = self.atom(atom_id)?;
        let mut nested = atom.superatom.as_deref()?.clone();
        let position = atom.position;
        if nested.is_empty() {
            return None;
        }

        let crossing: Vec<(Bond, bool)> = self
            .bonds_of(atom_id)
            .iter()
            .filter_map(|&b| self.bond(b))
            .map(|bond| (bond.clone(), bond.atom1_id == atom_id))
            .collect();

        let attach_atom = |mol: &Mol, code: u8| {
            mol.atoms_iter()
                .find(|(_, a)| a.attach_points.contains(&code))
                .map(|(id, _)| id)
        };
        let anchor = attach_atom(&nested, 1)
            .or_else(|| {
                nested
                    .atoms_iter()
                    .find(|(_, a)| !a.attach_points.is_empty())
                    .map(|(id, _)| id)
            })
            .or_else(|| nested.atom_ids().first().copied())?;

        let direction = crossing
            .first()
            .and_then(|(bond, first_is_super)| {
                let outer = if *first_is_super { bond.atom2_id } else { bond.atom1_id };
                self.atom(outer).map(|a| a.position.angle_to(&position))
            })
            .unwrap_or(0.0);
        nested.align_mol(anchor, position, direction, self.effective_bond_length());

        let targets: Vec<AtomId> = (1..=crossing.len())
            .map(|k| {
                u8::try_from(k)
                    .ok()
                    .and_then(|code| attach_atom(&nested, code))
                    .unwrap_or(anchor)
            })
            .collect();

        self.remove_atom(atom_id);
        let remap = self.merge(&nested);
        for new_id in remap.values() {
            if let Some(atom) = self.atom_mut(*new_id) {
                atom.attach_points.clear();
            }
        }

        for ((mut bond, first_is_super), inner) in crossing.into_iter().zip(targets) {
            let inner = remap[&inner];
            if first_is_super {
                bond.atom1_id = inner;
            } else {
                bond.atom2_id = inner;
            }
            self.add_bond_record(bond);
        }
        Some(remap)
    }

    /// Expands every superatom, including superatoms exposed by earlier expansions.
    ///
    /// Returns the number of superatoms expanded.
    pub fn expand_super_atoms(&mut self) -> usize {
        let mut expanded = 0;
        loop {
            let pending: Vec<AtomId> = self
                .atoms_iter()
                .filter(|(_, a)| a.is_superatom())
                .map(|(id, _)| id)
                .collect();
            if pending.is_empty() {
                break;
            }
            let mut progressed = false;
            for id in pending {
                if self.expand_super_atom(id).is_some() {
                    expanded += 1;
                    progressed = true;
                } else if let Some(atom) = self.atom_mut(id) {
                    atom.superatom = None;
                }
            }
            if !progressed {
                break;
            }
        }
        if expanded > 0 {
            debug!(expanded, "expanded superatoms");
        }
        expanded
    }

    /// Labels an atom with an abbreviation.
    ///
    /// When the registry knows the abbreviation, the atom becomes a superatom owning a
    /// copy of the template graph. Otherwise only the alias text is set, which hydrogen
    /// inference reports as an error. Returns whether a template was found.
    pub fn set_atom_alias(
        &mut self,
        atom_id: AtomId,
        alias: &str,
        templates: &TemplateRegistry,
    ) -> bool {
        let template = templates.lookup(alias).map(|t| Box::new(t.mol.clone()));
        let Some(atom) = self.atom_mut(atom_id) else {
            return false;
        };
        let found = template.is_some();
        atom.alias = Some(alias.to_string());
        atom.superatom = template;
        if found {
            atom.element = alias.to_string();
        }
        found
    }
}
