use super::atom::{Atom, Radical};
use super::graphics::Graphic;
use super::ids::{AtomId, BondId, GraphicId};
use super::topology::{Bond, BondType};
use crate::core::utils::geometry::{Point, Rect};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::{BTreeMap, HashMap, HashSet};

/// A chemical structure graph: atoms, bonds and drawing objects plus scalar properties.
///
/// Storage is arena based. Atoms, bonds and graphics live in slot maps keyed by
/// [`AtomId`], [`BondId`] and [`GraphicId`], and a parallel order list keeps the
/// insertion order that file formats and traversals depend on. Keys stay unique for
/// the lifetime of the graph; a removed key is never handed out again.
///
/// Cloning is a deep copy that keeps every key, so bonds and graphics in the clone
/// refer to the clone's own atoms.
#[derive(Debug, Clone, Default)]
pub struct Mol {
    atoms: SlotMap<AtomId, Atom>,
    atom_order: Vec<AtomId>,
    bonds: SlotMap<BondId, Bond>,
    bond_order: Vec<BondId>,
    graphics: SlotMap<GraphicId, Graphic>,
    graphic_order: Vec<GraphicId>,
    /// Bonds incident to each atom, in bond insertion order.
    adjacency: SecondaryMap<AtomId, Vec<BondId>>,

    pub name: String,
    /// Program/timestamp line of a molfile header.
    pub program: String,
    pub comment: String,
    pub chiral: bool,
    /// Nominal drawing bond length; the median observed length is used when unset.
    pub bond_length: Option<f64>,
    /// Free-form string properties (SD data items).
    pub props: BTreeMap<String, String>,
}

impl Mol {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    pub fn bond(&self, id: BondId) -> Option<&Bond> {
        self.bonds.get(id)
    }

    pub fn bond_mut(&mut self, id: BondId) -> Option<&mut Bond> {
        self.bonds.get_mut(id)
    }

    pub fn graphic(&self, id: GraphicId) -> Option<&Graphic> {
        self.graphics.get(id)
    }

    pub fn graphic_mut(&mut self, id: GraphicId) -> Option<&mut Graphic> {
        self.graphics.get_mut(id)
    }

    /// Atom keys in insertion order.
    pub fn atom_ids(&self) -> &[AtomId] {
        &self.atom_order
    }

    /// Bond keys in insertion order.
    pub fn bond_ids(&self) -> &[BondId] {
        &self.bond_order
    }

    pub fn graphic_ids(&self) -> &[GraphicId] {
        &self.graphic_order
    }

    /// Returns an iterator over all atoms in insertion order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atom_order.iter().map(move |&id| (id, &self.atoms[id]))
    }

    /// Returns a mutable iterator over all atoms, in arena order.
    pub fn atoms_iter_mut(&mut self) -> impl Iterator<Item = (AtomId, &mut Atom)> {
        self.atoms.iter_mut()
    }

    /// Returns an iterator over all bonds in insertion order.
    pub fn bonds_iter(&self) -> impl Iterator<Item = (BondId, &Bond)> {
        self.bond_order.iter().map(move |&id| (id, &self.bonds[id]))
    }

    pub fn bonds_iter_mut(&mut self) -> impl Iterator<Item = (BondId, &mut Bond)> {
        self.bonds.iter_mut()
    }

    pub fn graphics_iter(&self) -> impl Iterator<Item = (GraphicId, &Graphic)> {
        self.graphic_order
            .iter()
            .map(move |&id| (id, &self.graphics[id]))
    }

    pub fn atom_count(&self) -> usize {
        self.atom_order.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bond_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atom_order.is_empty()
    }

    /// Position of an atom in insertion order, as used for 1-based file indices.
    pub fn atom_index(&self, id: AtomId) -> Option<usize> {
        self.atom_order.iter().position(|&a| a == id)
    }

    /// Adds an atom and returns its key.
    pub fn add_atom(&mut self, atom: Atom) -> AtomId {
        let id = self.atoms.insert(atom);
        self.atom_order.push(id);
        self.adjacency.insert(id, Vec::new());
        id
    }

    /// Adds a bond of the given type between two atoms.
    ///
    /// # Arguments
    ///
    /// * `atom1_id` - Key of the first atom.
    /// * `atom2_id` - Key of the second atom.
    /// * `kind` - The bond type.
    ///
    /// # Return
    ///
    /// Returns the new bond's key, or the existing key when the two atoms are already
    /// bonded. Returns `None` if either atom is not part of this graph or both keys are
    /// the same atom.
    pub fn add_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId, kind: BondType) -> Option<BondId> {
        self.add_bond_record(Bond::new(atom1_id, atom2_id, kind))
    }

    /// Adds a fully populated bond record; see [`Mol::add_bond`].
    pub fn add_bond_record(&mut self, bond: Bond) -> Option<BondId> {
        let (a1, a2) = (bond.atom1_id, bond.atom2_id);
        if a1 == a2 || !self.atoms.contains_key(a1) || !self.atoms.contains_key(a2) {
            return None;
        }
        if let Some(existing) = self.bond_between(a1, a2) {
            return Some(existing);
        }
        let id = self.bonds.insert(bond);
        self.bond_order.push(id);
        self.adjacency[a1].push(id);
        self.adjacency[a2].push(id);
        Some(id)
    }

    pub fn add_graphic(&mut self, graphic: Graphic) -> GraphicId {
        let id = self.graphics.insert(graphic);
        self.graphic_order.push(id);
        id
    }

    /// Removes an atom together with its bonds and every graphic reference to it.
    ///
    /// # Return
    ///
    /// Returns `Some(Atom)` if the atom existed and was removed, otherwise `None`.
    pub fn remove_atom(&mut self, atom_id: AtomId) -> Option<Atom> {
        let atom = self.atoms.remove(atom_id)?;
        self.atom_order.retain(|&id| id != atom_id);

        let incident = self.adjacency.remove(atom_id).unwrap_or_default();
        for bond_id in incident {
            self.detach_bond(bond_id);
        }

        for graphic in self.graphics.values_mut() {
            if let Some(atoms) = graphic.atoms_mut() {
                atoms.retain(|&id| id != atom_id);
            }
        }
        Some(atom)
    }

    /// Removes a bond.
    ///
    /// When `prune_isolated` is set, an endpoint left without bonds is removed as well if
    /// it has no remaining structural role (see [`Mol::is_disposable_atom`]).
    pub fn remove_bond(&mut self, bond_id: BondId, prune_isolated: bool) -> Option<Bond> {
        let bond = self.detach_bond(bond_id)?;
        if prune_isolated {
            for atom_id in [bond.atom1_id, bond.atom2_id] {
                if self.degree(atom_id) == 0 && self.is_disposable_atom(atom_id) {
                    self.remove_atom(atom_id);
                }
            }
        }
        Some(bond)
    }

    fn detach_bond(&mut self, bond_id: BondId) -> Option<Bond> {
        let bond = self.bonds.remove(bond_id)?;
        self.bond_order.retain(|&id| id != bond_id);
        for atom_id in [bond.atom1_id, bond.atom2_id] {
            if let Some(incident) = self.adjacency.get_mut(atom_id) {
                incident.retain(|&id| id != bond_id);
            }
        }
        Some(bond)
    }

    /// Removes a graphic and drops it from any group that lists it.
    pub fn remove_graphic(&mut self, graphic_id: GraphicId) -> Option<Graphic> {
        let graphic = self.graphics.remove(graphic_id)?;
        self.graphic_order.retain(|&id| id != graphic_id);
        for other in self.graphics.values_mut() {
            if let Some(members) = other.graphics_mut() {
                members.retain(|&id| id != graphic_id);
            }
        }
        Some(graphic)
    }

    /// An atom with no structural role: a plain, uncharged carbon vertex with no
    /// annotations, not referenced by any graphic.
    pub fn is_disposable_atom(&self, atom_id: AtomId) -> bool {
        let Some(atom) = self.atoms.get(atom_id) else {
            return false;
        };
        let referenced = self
            .graphics
            .values()
            .any(|g| g.atoms().contains(&atom_id));
        atom.element == "C"
            && atom.charge == 0
            && atom.isotope.is_none()
            && atom.radical == Radical::None
            && atom.alias.is_none()
            && atom.value.is_none()
            && atom.superatom.is_none()
            && atom.rgroup.is_none()
            && atom.attach_points.is_empty()
            && atom.query.is_empty()
            && !referenced
    }

    /// Bonds incident to an atom, in bond insertion order.
    pub fn bonds_of(&self, atom_id: AtomId) -> &[BondId] {
        self.adjacency
            .get(atom_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn degree(&self, atom_id: AtomId) -> usize {
        self.bonds_of(atom_id).len()
    }

    /// Bonded neighbors of an atom as `(bond, neighbor)` pairs.
    pub fn neighbors(&self, atom_id: AtomId) -> impl Iterator<Item = (BondId, AtomId)> + '_ {
        self.bonds_of(atom_id).iter().filter_map(move |&bond_id| {
            self.bonds
                .get(bond_id)
                .and_then(|bond| bond.partner(atom_id))
                .map(|other| (bond_id, other))
        })
    }

    pub fn bond_between(&self, atom1_id: AtomId, atom2_id: AtomId) -> Option<BondId> {
        self.neighbors(atom1_id)
            .find(|&(_, other)| other == atom2_id)
            .map(|(bond_id, _)| bond_id)
    }

    /// Translates every atom and graphic.
    pub fn offset(&mut self, dx: f64, dy: f64) {
        for atom in self.atoms.values_mut() {
            atom.position.offset(dx, dy);
        }
        for graphic in self.graphics.values_mut() {
            graphic.offset(dx, dy);
        }
    }

    /// Scales every atom and graphic around `origin`, updating the nominal bond length.
    pub fn scale(&mut self, factor: f64, origin: Point) {
        for atom in self.atoms.values_mut() {
            atom.position.scale(factor, origin);
        }
        for graphic in self.graphics.values_mut() {
            graphic.scale(factor, origin);
        }
        if let Some(length) = self.bond_length.as_mut() {
            *length *= factor;
        }
    }

    /// Length of a bond as drawn.
    pub fn bond_geometric_length(&self, bond_id: BondId) -> Option<f64> {
        let bond = self.bonds.get(bond_id)?;
        let p1 = self.atoms.get(bond.atom1_id)?.position;
        let p2 = self.atoms.get(bond.atom2_id)?.position;
        Some(p1.distance(&p2))
    }

    /// Median drawn bond length, or `None` for a graph without bonds.
    pub fn median_bond_length(&self) -> Option<f64> {
        let mut lengths: Vec<f64> = self
            .bond_order
            .iter()
            .filter_map(|&id| self.bond_geometric_length(id))
            .collect();
        if lengths.is_empty() {
            return None;
        }
        lengths.sort_by(f64::total_cmp);
        Some(lengths[lengths.len() / 2])
    }

    /// The nominal bond length if set, else the median drawn length.
    pub fn effective_bond_length(&self) -> Option<f64> {
        self.bond_length.or_else(|| self.median_bond_length())
    }

    /// Bounding rectangle of all atom positions.
    pub fn bounding_rect(&self) -> Option<Rect> {
        Rect::bounding(self.atoms_iter().map(|(_, a)| a.position))
    }

    pub fn centroid(&self) -> Option<Point> {
        if self.atom_order.is_empty() {
            return None;
        }
        let n = self.atom_order.len() as f64;
        let sum = self
            .atoms_iter()
            .fold(Point::default(), |acc, (_, a)| acc + a.position);
        Some(Point::new(sum.x / n, sum.y / n))
    }

    /// Copies a subset of atoms into a new graph.
    ///
    /// Bonds with both endpoints in the subset are copied, as are graphics whose atom
    /// references all lie in the subset (shapes are not copied). Scalar properties are
    /// carried over.
    ///
    /// # Return
    ///
    /// The new graph and the map from source atom keys to new atom keys.
    pub fn extract(&self, atom_ids: &[AtomId]) -> (Mol, HashMap<AtomId, AtomId>) {
        let wanted: HashSet<AtomId> = atom_ids.iter().copied().collect();
        let mut out = Mol {
            name: self.name.clone(),
            program: self.program.clone(),
            comment: self.comment.clone(),
            chiral: self.chiral,
            bond_length: self.bond_length,
            props: self.props.clone(),
            ..Mol::default()
        };

        let mut remap = HashMap::with_capacity(wanted.len());
        for &id in &self.atom_order {
            if wanted.contains(&id) {
                remap.insert(id, out.add_atom(self.atoms[id].clone()));
            }
        }
        for &bond_id in &self.bond_order {
            let bond = &self.bonds[bond_id];
            if let (Some(&a1), Some(&a2)) = (remap.get(&bond.atom1_id), remap.get(&bond.atom2_id)) {
                let mut copy = bond.clone();
                copy.atom1_id = a1;
                copy.atom2_id = a2;
                out.add_bond_record(copy);
            }
        }

        let mut graphic_remap = HashMap::new();
        let mut copied = Vec::new();
        for &graphic_id in &self.graphic_order {
            let graphic = &self.graphics[graphic_id];
            let inside = !graphic.atoms().is_empty()
                && graphic.atoms().iter().all(|a| remap.contains_key(a));
            if inside {
                let new_id = out.add_graphic(graphic.clone());
                graphic_remap.insert(graphic_id, new_id);
                copied.push(new_id);
            }
        }
        for new_id in copied {
            if let Some(graphic) = out.graphics.get_mut(new_id) {
                graphic.remap(
                    |a| remap.get(&a).copied(),
                    |g| graphic_remap.get(&g).copied(),
                );
            }
        }

        (out, remap)
    }

    /// Copies every atom, bond and graphic of `other` into this graph.
    ///
    /// # Return
    ///
    /// The map from `other`'s atom keys to the new keys in `self`.
    pub fn merge(&mut self, other: &Mol) -> HashMap<AtomId, AtomId> {
        let mut remap = HashMap::with_capacity(other.atom_count());
        for (id, atom) in other.atoms_iter() {
            remap.insert(id, self.add_atom(atom.clone()));
        }
        for (_, bond) in other.bonds_iter() {
            let mut copy = bond.clone();
            copy.atom1_id = remap[&bond.atom1_id];
            copy.atom2_id = remap[&bond.atom2_id];
            self.add_bond_record(copy);
        }

        let mut graphic_remap = HashMap::new();
        for (id, graphic) in other.graphics_iter() {
            graphic_remap.insert(id, self.add_graphic(graphic.clone()));
        }
        for new_id in graphic_remap.values() {
            if let Some(graphic) = self.graphics.get_mut(*new_id) {
                graphic.remap(
                    |a| remap.get(&a).copied(),
                    |g| graphic_remap.get(&g).copied(),
                );
            }
        }
        remap
    }

    /// Splits the graph into its connected fragments.
    ///
    /// Fragments are discovered by flood fill from each not yet assigned bond, in bond
    /// order, followed by one single-atom graph per atom without bonds. With
    /// `skip_hidden`, hidden atoms neither join nor bridge fragments and are dropped.
    pub fn split_fragments(&self, skip_hidden: bool) -> Vec<Mol> {
        let visible = |id: AtomId| !(skip_hidden && self.atoms[id].hidden);
        let mut fragment_of: SecondaryMap<AtomId, usize> = SecondaryMap::new();
        let mut fragments: Vec<Vec<AtomId>> = Vec::new();

        for &bond_id in &self.bond_order {
            let bond = &self.bonds[bond_id];
            if !visible(bond.atom1_id) || !visible(bond.atom2_id) {
                continue;
            }
            if fragment_of.contains_key(bond.atom1_id) {
                continue;
            }
            let index = fragments.len();
            let mut members = Vec::new();
            let mut stack = vec![bond.atom1_id];
            fragment_of.insert(bond.atom1_id, index);
            while let Some(current) = stack.pop() {
                members.push(current);
                for (_, next) in self.neighbors(current) {
                    if visible(next) && !fragment_of.contains_key(next) {
                        fragment_of.insert(next, index);
                        stack.push(next);
                    }
                }
            }
            fragments.push(members);
        }

        for &id in &self.atom_order {
            if visible(id) && !fragment_of.contains_key(id) {
                fragments.push(vec![id]);
            }
        }

        fragments
            .iter()
            .map(|members| self.extract(members).0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::graphics::{Bracket, Text};

    fn ring(mol: &mut Mol, element: &str, size: usize, kinds: &[BondType]) -> Vec<AtomId> {
        let ids: Vec<AtomId> = (0..size)
            .map(|i| {
                let angle = (i as f64) * std::f64::consts::TAU / size as f64;
                mol.add_atom(Atom::new(element, Point::new(angle.cos(), angle.sin())))
            })
            .collect();
        for i in 0..size {
            let kind = kinds[i % kinds.len()];
            mol.add_bond(ids[i], ids[(i + 1) % size], kind).unwrap();
        }
        ids
    }

    fn ethanol() -> (Mol, [AtomId; 3]) {
        let mut mol = Mol::with_name("ethanol");
        let c1 = mol.add_atom(Atom::new("C", Point::new(0.0, 0.0)));
        let c2 = mol.add_atom(Atom::new("C", Point::new(1.0, 0.0)));
        let o = mol.add_atom(Atom::new("O", Point::new(1.5, 0.8)));
        mol.add_bond(c1, c2, BondType::Single).unwrap();
        mol.add_bond(c2, o, BondType::Single).unwrap();
        (mol, [c1, c2, o])
    }

    #[test]
    fn add_bond_rejects_foreign_and_self_bonds_and_is_idempotent() {
        let (mut mol, [c1, c2, _]) = ethanol();
        let existing = mol.bond_between(c1, c2).unwrap();
        assert_eq!(mol.add_bond(c2, c1, BondType::Double), Some(existing));
        assert_eq!(mol.add_bond(c1, c1, BondType::Single), None);

        let mut other = Mol::new();
        let foreign = other.add_atom(Atom::new("N", Point::default()));
        assert_eq!(mol.add_bond(c1, foreign, BondType::Single), None);
        assert_eq!(mol.bond_count(), 2);
    }

    #[test]
    fn neighbors_follow_bond_order() {
        let (mol, [c1, c2, o]) = ethanol();
        let neighbors: Vec<AtomId> = mol.neighbors(c2).map(|(_, a)| a).collect();
        assert_eq!(neighbors, vec![c1, o]);
        assert_eq!(mol.degree(c1), 1);
    }

    #[test]
    fn removing_an_atom_cascades_to_bonds_and_graphics() {
        let (mut mol, [c1, c2, o]) = ethanol();
        let bracket = mol.add_graphic(Graphic::Bracket(Bracket {
            rect: Rect::default(),
            kind: "SRU".into(),
            subscript: None,
            connectivity: None,
            atoms: vec![c2, o],
        }));
        mol.remove_atom(c2).unwrap();

        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 0);
        assert_eq!(mol.degree(c1), 0);
        assert_eq!(mol.graphic(bracket).unwrap().atoms(), &[o]);
        assert!(mol.atom(c2).is_none());
    }

    #[test]
    fn removed_keys_are_never_reused() {
        let (mut mol, [_, _, o]) = ethanol();
        mol.remove_atom(o);
        let fresh = mol.add_atom(Atom::new("O", Point::default()));
        assert_ne!(fresh, o);
        assert!(mol.atom(o).is_none());
    }

    #[test]
    fn remove_bond_prunes_only_bare_endpoints_when_asked() {
        let (mut mol, [c1, c2, o]) = ethanol();
        let c1c2 = mol.bond_between(c1, c2).unwrap();
        mol.remove_bond(c1c2, true).unwrap();
        assert!(mol.atom(c1).is_none(), "bare carbon left isolated is pruned");
        assert!(mol.atom(c2).is_some(), "c2 is still bonded to o");

        let c2o = mol.bond_between(c2, o).unwrap();
        mol.remove_bond(c2o, true).unwrap();
        assert!(mol.atom(c2).is_none());
        assert!(mol.atom(o).is_some(), "heteroatoms keep a structural role");

        let (mut mol, [c1, c2, _]) = ethanol();
        let c1c2 = mol.bond_between(c1, c2).unwrap();
        mol.remove_bond(c1c2, false).unwrap();
        assert!(mol.atom(c1).is_some());
    }

    #[test]
    fn clone_is_isolated_from_source() {
        let (mol, [c1, _, _]) = ethanol();
        let mut copy = mol.clone();
        copy.atom_mut(c1).unwrap().position = Point::new(9.0, 9.0);
        assert_eq!(mol.atom(c1).unwrap().position, Point::new(0.0, 0.0));
        assert_eq!(copy.atom(c1).unwrap().position, Point::new(9.0, 9.0));
    }

    #[test]
    fn clone_preserves_referential_integrity() {
        let (mut mol, [c1, c2, o]) = ethanol();
        mol.add_graphic(Graphic::Text(Text {
            text: "note".into(),
            field_name: None,
            position: Point::default(),
            anchors: vec![o],
        }));
        let copy = mol.clone();
        for (_, bond) in copy.bonds_iter() {
            assert!(copy.atom(bond.atom1_id).is_some());
            assert!(copy.atom(bond.atom2_id).is_some());
        }
        let (_, text) = copy.graphics_iter().next().unwrap();
        assert_eq!(text.atoms(), &[o]);
        assert!(copy.bond_between(c1, c2).is_some());
    }

    #[test]
    fn merge_re_points_all_references() {
        let (source, [_, _, o]) = ethanol();
        let mut source = source;
        source.add_graphic(Graphic::Text(Text {
            text: "OH".into(),
            field_name: None,
            position: Point::default(),
            anchors: vec![o],
        }));

        let mut target = Mol::new();
        target.add_atom(Atom::new("N", Point::default()));
        let remap = target.merge(&source);

        assert_eq!(target.atom_count(), 4);
        assert_eq!(target.bond_count(), 2);
        let (_, text) = target.graphics_iter().next().unwrap();
        assert_eq!(text.atoms(), &[remap[&o]]);
        for (_, bond) in target.bonds_iter() {
            assert!(target.atom(bond.atom1_id).is_some());
        }
    }

    #[test]
    fn extract_keeps_internal_bonds_and_contained_graphics() {
        let (mut mol, [c1, c2, o]) = ethanol();
        mol.add_graphic(Graphic::Text(Text {
            text: "x".into(),
            field_name: None,
            position: Point::default(),
            anchors: vec![c1, o],
        }));
        let (part, remap) = mol.extract(&[c1, c2]);
        assert_eq!(part.atom_count(), 2);
        assert_eq!(part.bond_count(), 1);
        assert_eq!(part.graphics_iter().count(), 0);
        assert!(part.bond_between(remap[&c1], remap[&c2]).is_some());
    }

    #[test]
    fn two_disconnected_benzenes_split_into_two_fragments() {
        let mut mol = Mol::new();
        let kinds = [BondType::Single, BondType::Double];
        ring(&mut mol, "C", 6, &kinds);
        ring(&mut mol, "C", 6, &kinds);

        let fragments = mol.split_fragments(false);
        assert_eq!(fragments.len(), 2);
        for fragment in &fragments {
            assert_eq!(fragment.atom_count(), 6);
            assert_eq!(fragment.bond_count(), 6);
        }
    }

    #[test]
    fn split_fragments_emits_lone_atoms_and_skips_hidden() {
        let (mut mol, [_, c2, _]) = ethanol();
        mol.add_atom(Atom::new("Na", Point::new(5.0, 5.0)));
        assert_eq!(mol.split_fragments(false).len(), 2);

        mol.atom_mut(c2).unwrap().hidden = true;
        let fragments = mol.split_fragments(true);
        assert_eq!(fragments.len(), 3);
        assert!(fragments.iter().all(|f| f.bond_count() == 0));
    }

    #[test]
    fn median_bond_length_and_scale() {
        let (mut mol, _) = ethanol();
        let median = mol.median_bond_length().unwrap();
        assert_eq!(median, 1.0, "upper median of an even count");
        mol.bond_length = Some(2.0);
        mol.scale(0.5, Point::default());
        assert_eq!(mol.bond_length, Some(1.0));
        assert_eq!(mol.effective_bond_length(), Some(1.0));
        assert!(Mol::new().median_bond_length().is_none());
    }
}
