use super::sgroup::{OutgoingSgroup, emit_sgroups};
use super::{ENCODED_BOND_LENGTH, MolfileError, V2000_MAX_COUNT};
use crate::core::models::atom::{Atom, Radical};
use crate::core::models::graphics::Graphic;
use crate::core::models::ids::AtomId;
use crate::core::models::mol::Mol;
use crate::core::utils::geometry::Point;
use std::collections::HashMap;
use std::fmt::Write;
use tracing::debug;

const PAIRS_PER_LINE: usize = 8;
const DEFAULT_PROGRAM_LINE: &str = "  molgraph          2D";

pub(super) fn requires_v3000(mol: &Mol) -> bool {
    mol.atom_count() > V2000_MAX_COUNT
        || mol.bond_count() > V2000_MAX_COUNT
        || mol.atoms_iter().any(|(_, a)| a.stereo_group.is_some())
}

/// Appends `tag` property lines holding `(index, value)` pairs, eight per line.
pub(super) fn push_pairs(out: &mut String, tag: &str, entries: &[(usize, String)]) {
    for chunk in entries.chunks(PAIRS_PER_LINE) {
        let _ = write!(out, "{}{:>3}", tag, chunk.len());
        for (index, value) in chunk {
            let _ = write!(out, " {:>3} {:>3}", index, value);
        }
        out.push('\n');
    }
}

fn positive_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

fn charge_code(charge: i8) -> u8 {
    match charge {
        3 => 1,
        2 => 2,
        1 => 3,
        -1 => 5,
        -2 => 6,
        -3 => 7,
        _ => 0,
    }
}

fn apo_codes(atom: &Atom) -> Vec<u8> {
    let has1 = atom.attach_points.contains(&1);
    let has2 = atom.attach_points.contains(&2);
    let mut codes = match (has1, has2) {
        (true, true) => vec![3],
        (true, false) => vec![1],
        (false, true) => vec![2],
        (false, false) => Vec::new(),
    };
    codes.extend(atom.attach_points.iter().copied().filter(|&c| c != 1 && c != 2));
    codes
}

/// Expands superatoms on `work`, returning each expansion's atoms and label.
fn expand_for_output(work: &mut Mol) -> Vec<(Vec<AtomId>, String)> {
    let mut groups = Vec::new();
    loop {
        let next = work
            .atoms_iter()
            .find(|(_, a)| a.is_superatom())
            .map(|(id, _)| id);
        let Some(id) = next else { break };
        let label = work
            .atom(id)
            .map(|a| a.alias.clone().unwrap_or_else(|| a.element.clone()))
            .unwrap_or_default();
        match work.expand_super_atom(id) {
            Some(remap) => groups.push((remap.into_values().collect(), label)),
            None => {
                if let Some(atom) = work.atom_mut(id) {
                    atom.superatom = None;
                }
            }
        }
    }
    groups
}

pub(super) fn write(mol: &Mol) -> Result<String, MolfileError> {
    let mut work = mol.clone();
    let superatom_groups = expand_for_output(&mut work);

    let length = work
        .effective_bond_length()
        .filter(|l| *l > 0.0)
        .unwrap_or(1.0);
    let scale = ENCODED_BOND_LENGTH / length;
    let to_file = |p: Point| Point::new(positive_zero(p.x * scale), positive_zero(-p.y * scale));
    debug!(atoms = work.atom_count(), bonds = work.bond_count(), scale, "encoding molfile");

    let index: HashMap<AtomId, usize> = work
        .atom_ids()
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, i + 1))
        .collect();
    let index_of = |id: AtomId| {
        index
            .get(&id)
            .copied()
            .ok_or_else(|| MolfileError::Inconsistency("bond endpoint is not an atom of the graph".into()))
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", work.name.lines().next().unwrap_or(""));
    if work.program.is_empty() {
        let _ = writeln!(out, "{}", DEFAULT_PROGRAM_LINE);
    } else {
        let _ = writeln!(out, "{}", work.program.lines().next().unwrap_or(""));
    }
    let _ = writeln!(out, "{}", work.comment.lines().next().unwrap_or(""));
    let _ = writeln!(
        out,
        "{:>3}{:>3}  0  0{:>3}  0  0  0  0  0999 V2000",
        work.atom_count(),
        work.bond_count(),
        u8::from(work.chiral)
    );

    let mut long_symbols: Vec<(usize, String)> = Vec::new();
    for (i, (_, atom)) in work.atoms_iter().enumerate() {
        let p = to_file(atom.position);
        let symbol = if atom.rgroup.is_some() {
            "R#".to_string()
        } else if atom.query.atom_list.is_some() {
            "L".to_string()
        } else if atom.element.chars().count() > 3 {
            long_symbols.push((i + 1, atom.element.clone()));
            "*".to_string()
        } else {
            atom.element.clone()
        };
        let hhh = atom.query.hydrogen_count.map_or(0, |h| u16::from(h) + 1);
        let vvv = match atom.explicit_valence {
            Some(0) => 15,
            Some(v) => v,
            None => 0,
        };
        let _ = writeln!(
            out,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0{:>3}  0{:>3}  0{:>3}  0  0  0{:>3}  0  0",
            p.x,
            p.y,
            0.0,
            symbol,
            charge_code(atom.charge),
            hhh,
            vvv,
            atom.atom_map.unwrap_or(0)
        );
    }

    for (_, bond) in work.bonds_iter() {
        let (order, stereo) = bond.kind.molfile_codes();
        let _ = writeln!(
            out,
            "{:>3}{:>3}{:>3}{:>3}  0{:>3}{:>3}",
            index_of(bond.atom1_id)?,
            index_of(bond.atom2_id)?,
            order,
            stereo,
            bond.ring.code(),
            bond.reaction_center
        );
    }

    let mut charges = Vec::new();
    let mut radicals = Vec::new();
    let mut isotopes = Vec::new();
    let mut rgroups = Vec::new();
    let mut substitution = Vec::new();
    let mut unsaturated = Vec::new();
    let mut ring_bonds = Vec::new();
    let mut attach = Vec::new();
    for (i, (_, atom)) in work.atoms_iter().enumerate() {
        let n = i + 1;
        if atom.charge != 0 {
            charges.push((n, atom.charge.to_string()));
        }
        if atom.radical != Radical::None {
            radicals.push((n, atom.radical.code().to_string()));
        }
        if let Some(isotope) = atom.isotope {
            isotopes.push((n, isotope.to_string()));
        }
        if let Some(rgroup) = &atom.rgroup {
            rgroups.push((n, rgroup.number.to_string()));
        }
        if let Some(count) = atom.query.substitution_count {
            substitution.push((n, count.to_string()));
        }
        if atom.query.unsaturated {
            unsaturated.push((n, "1".to_string()));
        }
        if let Some(count) = atom.query.ring_bond_count {
            ring_bonds.push((n, count.to_string()));
        }
        for code in apo_codes(atom) {
            attach.push((n, code.to_string()));
        }
    }
    push_pairs(&mut out, "M  CHG", &charges);
    push_pairs(&mut out, "M  RAD", &radicals);
    push_pairs(&mut out, "M  ISO", &isotopes);
    push_pairs(&mut out, "M  RGP", &rgroups);

    for (i, (_, atom)) in work.atoms_iter().enumerate() {
        if let Some(list) = &atom.query.atom_list {
            let _ = write!(
                out,
                "M  ALS {:>3}{:>3} {} ",
                i + 1,
                list.elements.len(),
                if list.exclude { 'T' } else { 'F' }
            );
            for element in &list.elements {
                let _ = write!(out, "{:<4}", element);
            }
            out.push('\n');
        }
    }
    push_pairs(&mut out, "M  SUB", &substitution);
    push_pairs(&mut out, "M  UNS", &unsaturated);
    push_pairs(&mut out, "M  RBC", &ring_bonds);
    push_pairs(&mut out, "M  APO", &attach);

    for (i, (_, atom)) in work.atoms_iter().enumerate() {
        let alias = atom.alias.clone().or_else(|| {
            long_symbols
                .iter()
                .find(|(n, _)| *n == i + 1)
                .map(|(_, s)| s.clone())
        });
        if let Some(alias) = alias {
            let _ = writeln!(out, "A  {:>3}", i + 1);
            let _ = writeln!(out, "{}", alias);
        }
        if let Some(value) = &atom.value {
            let _ = writeln!(out, "V  {:>3} {}", i + 1, value);
        }
    }

    let mut sgroups = Vec::new();
    for (atoms, label) in superatom_groups {
        let mut indices: Vec<usize> = atoms.iter().filter_map(|id| index.get(id).copied()).collect();
        indices.sort_unstable();
        if indices.is_empty() {
            continue;
        }
        sgroups.push(OutgoingSgroup {
            kind: "SUP".into(),
            subscript: Some(label),
            atoms: indices,
            ..OutgoingSgroup::default()
        });
    }
    for (_, graphic) in work.graphics_iter() {
        let atoms: Vec<usize> = graphic
            .atoms()
            .iter()
            .filter_map(|id| index.get(id).copied())
            .collect();
        match graphic {
            Graphic::Bracket(bracket) => {
                let r = bracket.rect;
                let left = (
                    to_file(Point::new(r.left, r.top)),
                    to_file(Point::new(r.left, r.bottom())),
                );
                let right = (
                    to_file(Point::new(r.right(), r.top)),
                    to_file(Point::new(r.right(), r.bottom())),
                );
                sgroups.push(OutgoingSgroup {
                    kind: bracket.kind.clone(),
                    subscript: bracket.subscript.clone(),
                    connectivity: bracket.connectivity.clone(),
                    atoms,
                    brackets: vec![left, right],
                    ..OutgoingSgroup::default()
                });
            }
            Graphic::Text(text) if !atoms.is_empty() => {
                sgroups.push(OutgoingSgroup {
                    kind: "DAT".into(),
                    atoms,
                    field_name: text.field_name.clone(),
                    field_value: Some(text.text.clone()),
                    data_position: Some(to_file(text.position)),
                    ..OutgoingSgroup::default()
                });
            }
            _ => {}
        }
    }
    emit_sgroups(&mut out, &sgroups);
    out.push_str("M  END\n");

    if !work.props.is_empty() {
        for (key, value) in &work.props {
            let _ = writeln!(out, "> <{}>", key);
            for line in value.lines() {
                let _ = writeln!(out, "{}", line);
            }
            out.push('\n');
        }
        out.push_str("$$$$\n");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::topology::BondType;

    fn ethanol() -> Mol {
        let mut mol = Mol::with_name("ethanol");
        let c1 = mol.add_atom(Atom::new("C", Point::new(0.0, 0.0)));
        let c2 = mol.add_atom(Atom::new("C", Point::new(1.0, 0.0)));
        let o = mol.add_atom(Atom::new("O", Point::new(1.5, -0.8)));
        mol.add_bond(c1, c2, BondType::Single).unwrap();
        mol.add_bond(c2, o, BondType::Single).unwrap();
        mol
    }

    #[test]
    fn counts_atom_and_bond_lines_use_fixed_columns() {
        let mut mol = ethanol();
        mol.bond_length = Some(1.0);
        let text = write(&mol).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ethanol");
        assert_eq!(lines[2], "");
        assert_eq!(&lines[3][0..6], "  3  2");
        assert!(lines[3].ends_with("V2000"));
        assert_eq!(
            lines[5],
            "    1.5600    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0"
        );
        assert_eq!(&lines[6][0..30], "    2.3400    1.2480    0.0000");
        assert_eq!(&lines[6][31..34], "O  ");
        assert_eq!(lines[7], "  1  2  1  0  0  0  0");
        assert_eq!(*lines.last().unwrap(), "M  END");
    }

    #[test]
    fn push_pairs_wraps_after_eight_entries() {
        let entries: Vec<(usize, String)> = (1..=9).map(|i| (i, "1".to_string())).collect();
        let mut out = String::new();
        push_pairs(&mut out, "M  CHG", &entries);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("M  CHG  8   1   1"));
        assert_eq!(lines[1], "M  CHG  1   9   1");
    }

    #[test]
    fn charge_codes_cover_the_v2000_range() {
        assert_eq!(charge_code(1), 3);
        assert_eq!(charge_code(-3), 7);
        assert_eq!(charge_code(5), 0);
    }

    #[test]
    fn attach_point_codes_combine_first_and_second() {
        let mut atom = Atom::new("C", Point::default());
        atom.attach_points = vec![2, 1];
        assert_eq!(apo_codes(&atom), vec![3]);
        atom.attach_points = vec![2, 99];
        assert_eq!(apo_codes(&atom), vec![2, 99]);
    }

    #[test]
    fn properties_are_written_as_sd_items() {
        let mut mol = ethanol();
        mol.props.insert("CAS".into(), "64-17-5".into());
        let text = write(&mol).unwrap();
        assert!(text.contains("M  END\n> <CAS>\n64-17-5\n\n$$$$\n"));
    }
}
