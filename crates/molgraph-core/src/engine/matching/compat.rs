use super::PreparedMol;
use crate::core::chemistry::periodic::{is_element, is_halogen};
use crate::core::models::atom::Atom;
use crate::core::models::ids::{AtomId, BondId};
use crate::core::models::topology::{BondOrderClass, BondType};
use crate::engine::config::MatchConfig;

/// Whether an atom stands for more than one element.
pub(crate) fn is_wildcard(atom: &Atom) -> bool {
    atom.query.atom_list.is_some() || atom.is_rgroup() || !is_element(&atom.element)
}

/// Whether a pattern symbol accepts a concrete element.
fn symbol_accepts(pattern: &Atom, element: &str) -> Option<bool> {
    if let Some(list) = &pattern.query.atom_list {
        return Some(list.accepts(element));
    }
    if pattern.is_rgroup() {
        return Some(true);
    }
    match pattern.element.as_str() {
        "*" | "A" => Some(true),
        "X" => Some(is_halogen(element)),
        "Q" => Some(element != "H" && element != "C"),
        _ => None,
    }
}

fn elements_compatible(query: &Atom, target: &Atom) -> bool {
    match (&query.query.atom_list, &target.query.atom_list) {
        (Some(q), Some(t)) => return q.intersects(t),
        (Some(q), None) if !is_wildcard_symbol(&target.element) => return q.accepts(&target.element),
        _ => {}
    }
    if let Some(accepted) = symbol_accepts(query, &target.element) {
        return accepted;
    }
    if let Some(accepted) = symbol_accepts(target, &query.element) {
        return accepted;
    }
    query.element == target.element
}

fn is_wildcard_symbol(symbol: &str) -> bool {
    matches!(symbol, "*" | "A" | "Q" | "X" | "R")
}

/// Compares a query count constraint with an observed value. `-1` demands zero, `-2`
/// demands the value drawn in the query, and the highest code means "at least".
fn count_constraint_holds(constraint: i8, observed: usize, as_drawn: usize, at_least_from: i8) -> bool {
    match constraint {
        -1 => observed == 0,
        -2 => observed == as_drawn,
        n if n >= at_least_from => observed >= n as usize,
        n if n > 0 => observed == n as usize,
        _ => true,
    }
}

fn query_features_hold(
    query: &PreparedMol,
    query_atom: AtomId,
    atom: &Atom,
    target: &PreparedMol,
    target_atom: AtomId,
) -> bool {
    let features = &atom.query;
    if let Some(sub) = features.substitution_count {
        let observed = target.mol().degree(target_atom);
        if !count_constraint_holds(sub, observed, query.mol().degree(query_atom), 6) {
            return false;
        }
    }
    if let Some(rbc) = features.ring_bond_count {
        let observed = target.ring_bond_count(target_atom);
        if !count_constraint_holds(rbc, observed, query.ring_bond_count(query_atom), 4) {
            return false;
        }
    }
    if features.unsaturated {
        let unsaturated = target.mol().bonds_of(target_atom).iter().any(|&b| {
            !matches!(
                target.bond_class(b),
                Some(BondOrderClass::Single) | Some(BondOrderClass::Zero) | None
            )
        });
        if !unsaturated {
            return false;
        }
    }
    if let Some(min_h) = features.hydrogen_count {
        let observed = target
            .mol()
            .atom(target_atom)
            .and_then(|a| a.hcount)
            .unwrap_or(0);
        let holds = if min_h == 0 { observed == 0 } else { observed >= min_h };
        if !holds {
            return false;
        }
    }
    true
}

pub(super) fn atoms_compatible(
    query: &PreparedMol,
    query_atom: AtomId,
    target: &PreparedMol,
    target_atom: AtomId,
    config: &MatchConfig,
) -> bool {
    let (Some(q), Some(t)) = (query.mol().atom(query_atom), target.mol().atom(target_atom)) else {
        return false;
    };
    if (q.bio.is_some() || t.bio.is_some()) && q.bio != t.bio {
        return false;
    }
    if q.isotope != t.isotope || q.charge != t.charge {
        return false;
    }
    if !elements_compatible(q, t) {
        return false;
    }
    !config.honor_query_features || query_features_hold(query, query_atom, q, target, target_atom)
}

fn is_stereo(kind: BondType) -> bool {
    matches!(
        kind,
        BondType::Wedge | BondType::Hash | BondType::Wiggly | BondType::Either
    )
}

/// Order compatibility of two bonds, plus stereo agreement when requested.
///
/// `aligned` tells whether the query bond's first atom maps onto the target bond's
/// first atom, which matters for wedge and hash direction.
pub(super) fn bonds_compatible(
    query: &PreparedMol,
    query_bond: BondId,
    target: &PreparedMol,
    target_bond: BondId,
    aligned: bool,
    config: &MatchConfig,
) -> bool {
    let (Some(qb), Some(tb)) = (query.mol().bond(query_bond), target.mol().bond(target_bond)) else {
        return false;
    };
    let (Some(q_class), Some(t_class)) = (query.bond_class(query_bond), target.bond_class(target_bond))
    else {
        return false;
    };

    let orders_agree = if qb.kind.is_query() {
        qb.kind.accepts(t_class)
    } else if tb.kind.is_query() {
        tb.kind.accepts(q_class)
    } else {
        q_class == t_class
    };
    if !orders_agree {
        return false;
    }

    if config.match_stereo_bonds && (is_stereo(qb.kind) || is_stereo(tb.kind)) {
        if qb.kind != tb.kind {
            return false;
        }
        if matches!(qb.kind, BondType::Wedge | BondType::Hash) && !aligned {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomList;
    use crate::core::utils::geometry::Point;

    fn atom(symbol: &str) -> Atom {
        Atom::new(symbol, Point::default())
    }

    #[test]
    fn wildcard_symbols_follow_their_rules() {
        assert!(elements_compatible(&atom("*"), &atom("U")));
        assert!(elements_compatible(&atom("A"), &atom("H")));
        assert!(elements_compatible(&atom("X"), &atom("Br")));
        assert!(!elements_compatible(&atom("X"), &atom("O")));
        assert!(elements_compatible(&atom("Q"), &atom("N")));
        assert!(!elements_compatible(&atom("Q"), &atom("C")));
        assert!(!elements_compatible(&atom("Q"), &atom("H")));
        assert!(elements_compatible(&atom("C"), &atom("*")));
        assert!(!elements_compatible(&atom("C"), &atom("N")));
    }

    #[test]
    fn atom_lists_use_set_logic() {
        let mut include = atom("L");
        include.query.atom_list = Some(AtomList::new(false, vec!["N".into(), "O".into()]));
        let mut exclude = atom("L");
        exclude.query.atom_list = Some(AtomList::new(true, vec!["N".into()]));

        assert!(elements_compatible(&include, &atom("O")));
        assert!(!elements_compatible(&include, &atom("S")));
        assert!(!elements_compatible(&exclude, &atom("N")));
        assert!(elements_compatible(&exclude, &atom("C")));
        assert!(elements_compatible(&include, &exclude));
    }

    #[test]
    fn count_constraints_decode_molfile_conventions() {
        assert!(count_constraint_holds(-1, 0, 3, 6));
        assert!(!count_constraint_holds(-1, 1, 3, 6));
        assert!(count_constraint_holds(-2, 3, 3, 6));
        assert!(count_constraint_holds(6, 7, 0, 6));
        assert!(count_constraint_holds(2, 2, 0, 6));
        assert!(!count_constraint_holds(2, 3, 0, 6));
    }

    #[test]
    fn wildcard_detection() {
        assert!(is_wildcard(&atom("*")));
        assert!(is_wildcard(&atom("R")));
        assert!(!is_wildcard(&atom("Cl")));
        let mut listed = atom("L");
        listed.query.atom_list = Some(AtomList::default());
        assert!(is_wildcard(&listed));
    }
}
