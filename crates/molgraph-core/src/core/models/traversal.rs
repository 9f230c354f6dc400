use super::ids::{AtomId, BondId};
use super::mol::Mol;
use slotmap::SecondaryMap;
use std::collections::{HashSet, VecDeque};

/// One step of a breadth-first traversal, in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BfsEvent {
    /// The traversal starts a new tree at this atom.
    Start(AtomId),
    /// A first-visit bond from an already visited atom to a newly discovered one.
    Tree { bond: BondId, from: AtomId, to: AtomId },
    /// A bond between two visited atoms that closes a ring.
    Closure { bond: BondId, from: AtomId, to: AtomId },
}

#[derive(Debug, Clone, Default)]
pub struct BfsTree {
    pub root: Option<AtomId>,
    /// Atoms in discovery order.
    pub atoms: Vec<AtomId>,
    pub events: Vec<BfsEvent>,
}

impl BfsTree {
    pub fn closures(&self) -> impl Iterator<Item = (BondId, AtomId, AtomId)> + '_ {
        self.events.iter().filter_map(|event| match *event {
            BfsEvent::Closure { bond, from, to } => Some((bond, from, to)),
            _ => None,
        })
    }
}

/// Spanning BFS trees covering every atom of a graph, rooted in atom order.
#[derive(Debug, Clone, Default)]
pub struct BfsForest {
    pub trees: Vec<BfsTree>,
    parent: SecondaryMap<AtomId, (AtomId, BondId)>,
}

impl BfsForest {
    /// Builds one tree per connected fragment, each rooted at the first not yet visited
    /// atom in insertion order.
    pub fn build(mol: &Mol) -> Self {
        let mut forest = BfsForest::default();
        let mut visited: HashSet<AtomId> = HashSet::with_capacity(mol.atom_count());
        let mut seen_bonds: HashSet<BondId> = HashSet::with_capacity(mol.bond_count());

        for &root in mol.atom_ids() {
            if !visited.insert(root) {
                continue;
            }
            let mut tree = BfsTree {
                root: Some(root),
                atoms: vec![root],
                events: vec![BfsEvent::Start(root)],
            };
            let mut queue = VecDeque::from([root]);
            while let Some(current) = queue.pop_front() {
                for (bond, next) in mol.neighbors(current) {
                    if !seen_bonds.insert(bond) {
                        continue;
                    }
                    if visited.insert(next) {
                        forest.parent.insert(next, (current, bond));
                        tree.atoms.push(next);
                        tree.events.push(BfsEvent::Tree {
                            bond,
                            from: current,
                            to: next,
                        });
                        queue.push_back(next);
                    } else {
                        tree.events.push(BfsEvent::Closure {
                            bond,
                            from: current,
                            to: next,
                        });
                    }
                }
            }
            forest.trees.push(tree);
        }
        forest
    }

    /// The tree parent of an atom and the bond leading to it; `None` for roots.
    pub fn parent(&self, atom: AtomId) -> Option<(AtomId, BondId)> {
        self.parent.get(atom).copied()
    }

    /// Every event of every tree, in discovery order.
    pub fn events(&self) -> impl Iterator<Item = &BfsEvent> {
        self.trees.iter().flat_map(|t| t.events.iter())
    }

    fn ancestry(&self, atom: AtomId) -> Vec<AtomId> {
        let mut chain = vec![atom];
        let mut current = atom;
        while let Some((up, _)) = self.parent(current) {
            chain.push(up);
            current = up;
        }
        chain
    }

    /// Reconstructs the ring closed by a non-tree bond between `from` and `to`.
    ///
    /// Both parent chains are walked up to their common ancestor and spliced. The atoms
    /// come back in cyclic order starting at `from`, and `bonds[i]` joins `atoms[i]` to
    /// `atoms[i + 1]`, with the closure bond last.
    pub fn ring_through(
        &self,
        closure: BondId,
        from: AtomId,
        to: AtomId,
    ) -> Option<(Vec<AtomId>, Vec<BondId>)> {
        let up_from = self.ancestry(from);
        let on_from_path: HashSet<AtomId> = up_from.iter().copied().collect();

        let mut up_to = Vec::new();
        let mut current = to;
        while !on_from_path.contains(&current) {
            up_to.push(current);
            current = self.parent(current)?.0;
        }
        let ancestor = current;

        let mut atoms = Vec::new();
        let mut bonds = Vec::new();
        for &atom in &up_from {
            atoms.push(atom);
            if atom == ancestor {
                break;
            }
            bonds.push(self.parent(atom)?.1);
        }
        for &atom in up_to.iter().rev() {
            atoms.push(atom);
            bonds.push(self.parent(atom)?.1);
        }
        bonds.push(closure);
        Some((atoms, bonds))
    }
}
