use super::sgroup::SgroupTable;
use super::{Molfile, MolfileError, MolfileParseErrorKind, float_field, int_field, slice_and_trim, tail};
use crate::core::chemistry::periodic;
use crate::core::io::envelope::Envelope;
use crate::core::models::atom::{Atom, AtomList, RGroup, Radical};
use crate::core::models::builder::MolBuilder;
use crate::core::models::mol::Mol;
use crate::core::models::topology::{Bond, BondType, RingMembership};
use crate::core::utils::geometry::Point;
use tracing::{debug, trace, warn};

/// Splits molfile text into lines, accepting the `|`-joined single-line variant.
fn split_lines(text: &str) -> Vec<&str> {
    let body = text.trim_end_matches(['\r', '\n']);
    if !body.contains('\n') && body.contains('|') {
        body.split('|').collect()
    } else {
        text.lines().map(|l| l.trim_end_matches('\r')).collect()
    }
}

/// Line cursor that reports 1-based line numbers.
struct Lines<'t> {
    lines: Vec<&'t str>,
    next: usize,
}

impl<'t> Lines<'t> {
    fn next_line(&mut self) -> Option<(usize, &'t str)> {
        let line = *self.lines.get(self.next)?;
        self.next += 1;
        Some((self.next, line))
    }

    fn expect_line(&mut self, block: &'static str) -> Result<(usize, &'t str), MolfileError> {
        self.next_line().ok_or(MolfileError::Parse {
            line: self.next + 1,
            kind: MolfileParseErrorKind::UnexpectedEof { block },
        })
    }
}

fn parse_error(line: usize, kind: MolfileParseErrorKind) -> MolfileError {
    MolfileError::Parse { line, kind }
}

fn atom_at<'b>(
    builder: &'b mut MolBuilder,
    index: i32,
    line: usize,
) -> Result<&'b mut Atom, MolfileError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| builder.atom_mut(i))
        .ok_or(parse_error(line, MolfileParseErrorKind::AtomIndexOutOfRange(index)))
}

fn index_list(line: &str, line_num: usize, count: i32, first: usize) -> Result<Vec<usize>, MolfileError> {
    let mut entries = Vec::new();
    for k in 0..count.max(0) as usize {
        let start = first + 4 * k;
        let value = int_field(line, line_num, start, start + 4)?;
        if value > 0 {
            entries.push(value as usize);
        }
    }
    Ok(entries)
}

/// `(index, value)` pairs of an `M  XXXnn8 aaa vvv ...` line.
fn pairs(line: &str, line_num: usize) -> Result<Vec<(i32, i32)>, MolfileError> {
    let count = int_field(line, line_num, 6, 9)?;
    let mut entries = Vec::new();
    for k in 0..count.max(0) as usize {
        let start = 9 + 8 * k;
        let index = int_field(line, line_num, start, start + 4)?;
        let value = int_field(line, line_num, start + 4, start + 8)?;
        entries.push((index, value));
    }
    Ok(entries)
}

/// Like [`pairs`], for sgroup pairs whose value is text (`M  STY`, `M  SCN`).
fn text_pairs(line: &str, line_num: usize) -> Result<Vec<(i32, String)>, MolfileError> {
    let count = int_field(line, line_num, 6, 9)?;
    let mut entries = Vec::new();
    for k in 0..count.max(0) as usize {
        let start = 9 + 8 * k;
        let index = int_field(line, line_num, start, start + 4)?;
        let value = slice_and_trim(line, start + 4, start + 8).to_string();
        entries.push((index, value));
    }
    Ok(entries)
}

fn optional_count(value: i32) -> Option<i8> {
    if value == 0 {
        None
    } else {
        i8::try_from(value).ok()
    }
}

fn parse_atom_line(codec: &Molfile, line: &str, line_num: usize) -> Result<Atom, MolfileError> {
    let x = float_field(line, line_num, 0, 10)?;
    let y = float_field(line, line_num, 10, 20)?;
    let symbol = slice_and_trim(line, 31, 34);

    let mut atom = if symbol == "R#" {
        let mut atom = Atom::new("R", Point::new(x, -y));
        atom.rgroup = Some(RGroup::new(0));
        atom
    } else {
        Atom::new(symbol, Point::new(x, -y))
    };

    let mass_diff = int_field(line, line_num, 34, 36)?;
    if mass_diff != 0 {
        match periodic::atomic_weight(&atom.element) {
            Some(weight) => {
                let mass = weight.round() as i32 + mass_diff;
                atom.isotope = u16::try_from(mass).ok();
            }
            None => trace!(line = line_num, symbol, "mass difference on a non-element ignored"),
        }
    }

    let charge_code = int_field(line, line_num, 36, 39)?;
    atom.charge = match charge_code {
        0 | 4 => 0,
        1 => 3,
        2 => 2,
        3 => 1,
        5 => -1,
        6 => -2,
        7 => -3,
        other => return Err(parse_error(line_num, MolfileParseErrorKind::InvalidChargeCode(other))),
    };
    if charge_code == 4 {
        atom.radical = Radical::Doublet;
    }

    let hhh = int_field(line, line_num, 42, 45)?;
    if hhh > 0 {
        atom.query.hydrogen_count = u8::try_from(hhh - 1).ok();
    }
    atom.explicit_valence = match int_field(line, line_num, 48, 51)? {
        0 => None,
        15 => Some(0),
        v => u8::try_from(v).ok(),
    };

    if codec.reaction() {
        let map = int_field(line, line_num, 60, 63)?;
        if map > 0 {
            atom.atom_map = Some(map as u32);
        }
    }
    Ok(atom)
}

fn parse_bond_line(builder: &mut MolBuilder, line: &str, line_num: usize) -> Result<(), MolfileError> {
    let a1 = int_field(line, line_num, 0, 3)?;
    let a2 = int_field(line, line_num, 3, 6)?;
    let order = int_field(line, line_num, 6, 9)?;
    let stereo = int_field(line, line_num, 9, 12)?;
    let topology = int_field(line, line_num, 15, 18)?;
    let center = int_field(line, line_num, 18, 21)?;

    let count = builder.atom_count() as i32;
    for index in [a1, a2] {
        if index < 1 || index > count {
            return Err(parse_error(line_num, MolfileParseErrorKind::AtomIndexOutOfRange(index)));
        }
    }
    let kind = u8::try_from(order)
        .ok()
        .zip(u8::try_from(stereo).ok())
        .and_then(|(o, s)| BondType::from_molfile_codes(o, s))
        .ok_or(parse_error(
            line_num,
            MolfileParseErrorKind::InvalidBondCodes { order, stereo },
        ))?;

    let mut bond = Bond::new(Default::default(), Default::default(), kind);
    bond.ring = RingMembership::from_code(topology);
    bond.reaction_center = i8::try_from(center).unwrap_or(0);
    builder
        .add_bond(a1 as usize, a2 as usize, bond)
        .ok_or(parse_error(line_num, MolfileParseErrorKind::InvalidBond(a1, a2)))?;
    Ok(())
}

/// Reads the property block up to `M  END` (or end of input).
fn parse_properties(
    lines: &mut Lines,
    builder: &mut MolBuilder,
    sgroups: &mut SgroupTable,
    aliases: &mut Vec<(usize, String)>,
) -> Result<(), MolfileError> {
    let mut charges_reset = false;
    let mut radicals_reset = false;

    while let Some((n, line)) = lines.next_line() {
        if line.starts_with("M  END") {
            return Ok(());
        }
        if line.starts_with("$$$$") {
            lines.next -= 1;
            return Ok(());
        }
        if line.starts_with("A  ") {
            let index = int_field(line, n, 3, 6)?;
            let (_, text) = lines.expect_line("alias")?;
            atom_at(builder, index, n)?;
            aliases.push((index as usize, text.trim().to_string()));
            continue;
        }
        if line.starts_with("V  ") {
            let index = int_field(line, n, 3, 6)?;
            atom_at(builder, index, n)?.value = Some(tail(line, 7).to_string());
            continue;
        }
        if line.starts_with("S  SKP") {
            let skip = int_field(line, n, 6, 9)?;
            for _ in 0..skip.max(0) {
                lines.next_line();
            }
            continue;
        }
        if !line.starts_with("M  ") {
            trace!(line = n, "skipping unrecognized line");
            continue;
        }

        let tag = line.get(3..6).unwrap_or("");
        match tag {
            "CHG" => {
                if !charges_reset {
                    for (_, atom) in builder.mol_mut().atoms_iter_mut() {
                        atom.charge = 0;
                    }
                    charges_reset = true;
                }
                for (index, value) in pairs(line, n)? {
                    let charge = i8::try_from(value)
                        .map_err(|_| parse_error(n, MolfileParseErrorKind::InvalidChargeCode(value)))?;
                    atom_at(builder, index, n)?.charge = charge;
                }
            }
            "RAD" => {
                if !radicals_reset {
                    for (_, atom) in builder.mol_mut().atoms_iter_mut() {
                        atom.radical = Radical::None;
                    }
                    radicals_reset = true;
                }
                for (index, value) in pairs(line, n)? {
                    let radical = Radical::from_code(value)
                        .ok_or(parse_error(n, MolfileParseErrorKind::InvalidRadicalCode(value)))?;
                    atom_at(builder, index, n)?.radical = radical;
                }
            }
            "ISO" => {
                for (index, value) in pairs(line, n)? {
                    atom_at(builder, index, n)?.isotope = u16::try_from(value).ok().filter(|&m| m > 0);
                }
            }
            "RGP" => {
                for (index, value) in pairs(line, n)? {
                    let atom = atom_at(builder, index, n)?;
                    atom.element = "R".into();
                    let number = u32::try_from(value).unwrap_or(0);
                    match atom.rgroup.as_mut() {
                        Some(rgroup) => rgroup.number = number,
                        None => atom.rgroup = Some(RGroup::new(number)),
                    }
                }
            }
            "APO" => {
                for (index, value) in pairs(line, n)? {
                    let atom = atom_at(builder, index, n)?;
                    match value {
                        3 => atom.attach_points.extend([1, 2]),
                        v => {
                            if let Ok(code) = u8::try_from(v) {
                                atom.attach_points.push(code);
                            }
                        }
                    }
                }
            }
            "SUB" => {
                for (index, value) in pairs(line, n)? {
                    atom_at(builder, index, n)?.query.substitution_count = optional_count(value);
                }
            }
            "UNS" => {
                for (index, value) in pairs(line, n)? {
                    atom_at(builder, index, n)?.query.unsaturated = value != 0;
                }
            }
            "RBC" => {
                for (index, value) in pairs(line, n)? {
                    atom_at(builder, index, n)?.query.ring_bond_count = optional_count(value);
                }
            }
            "ALS" => {
                let index = int_field(line, n, 7, 10)?;
                let count = int_field(line, n, 10, 13)?;
                let exclude = line.get(14..15) == Some("T");
                let elements = (0..count.max(0) as usize)
                    .map(|k| slice_and_trim(line, 16 + 4 * k, 20 + 4 * k).to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                let atom = atom_at(builder, index, n)?;
                atom.element = "L".into();
                atom.query.atom_list = Some(AtomList::new(exclude, elements));
            }
            "STY" => {
                for (index, kind) in text_pairs(line, n)? {
                    sgroups.entry(index, n).kind = Some(kind);
                }
            }
            "SCN" => {
                for (index, connectivity) in text_pairs(line, n)? {
                    sgroups.entry(index, n).connectivity = Some(connectivity);
                }
            }
            "SPL" => {
                for (index, parent) in pairs(line, n)? {
                    sgroups.entry(index, n).parent = Some(parent);
                }
            }
            "SNC" => {
                for (index, component) in pairs(line, n)? {
                    sgroups.entry(index, n).component = Some(component);
                }
            }
            "SMT" => {
                let index = int_field(line, n, 7, 10)?;
                sgroups.entry(index, n).subscript = Some(tail(line, 11).to_string());
            }
            "SCL" => {
                let index = int_field(line, n, 7, 10)?;
                sgroups.entry(index, n).class = Some(tail(line, 11).to_string());
            }
            "SED" => {
                let index = int_field(line, n, 7, 10)?;
                let text = tail(line, 11);
                let record = sgroups.entry(index, n);
                match record.field_value.as_mut() {
                    Some(value) => {
                        value.push('\n');
                        value.push_str(text);
                    }
                    None => record.field_value = Some(text.to_string()),
                }
            }
            "SAL" | "SPA" | "SBL" => {
                let index = int_field(line, n, 7, 10)?;
                let count = int_field(line, n, 10, 13)?;
                let entries = index_list(line, n, count, 13)?;
                let record = sgroups.entry(index, n);
                match tag {
                    "SAL" => record.atoms.extend(entries),
                    "SPA" => record.paradigm_atoms.extend(entries),
                    _ => record.bonds.extend(entries),
                }
            }
            "SDI" => {
                let index = int_field(line, n, 7, 10)?;
                let x1 = float_field(line, n, 13, 23)?;
                let y1 = float_field(line, n, 23, 33)?;
                let x2 = float_field(line, n, 33, 43)?;
                let y2 = float_field(line, n, 43, 53)?;
                sgroups
                    .entry(index, n)
                    .brackets
                    .push((Point::new(x1, -y1), Point::new(x2, -y2)));
            }
            "SDT" => {
                let index = int_field(line, n, 7, 10)?;
                sgroups.entry(index, n).field_name = Some(slice_and_trim(line, 11, 41).to_string());
            }
            "SDD" => {
                let index = int_field(line, n, 7, 10)?;
                let x = float_field(line, n, 11, 21)?;
                let y = float_field(line, n, 21, 31)?;
                sgroups.entry(index, n).data_position = Some(Point::new(x, -y));
            }
            _ => trace!(line = n, tag, "skipping unsupported property"),
        }
    }
    Ok(())
}

/// Reads `> <key>` data items up to `$$$$` into the property bag.
fn parse_data_items(lines: &mut Lines, mol: &mut Mol) {
    let mut current: Option<(String, Vec<&str>)> = None;
    while let Some((_, line)) = lines.next_line() {
        if line.starts_with("$$$$") {
            break;
        }
        if let Some((key, values)) = current.as_mut() {
            if line.trim().is_empty() {
                mol.props.insert(std::mem::take(key), values.join("\n"));
                current = None;
            } else {
                values.push(line);
            }
            continue;
        }
        if line.starts_with('>') {
            let key = line
                .find('<')
                .and_then(|open| line[open + 1..].find('>').map(|close| &line[open + 1..open + 1 + close]));
            match key {
                Some(key) => current = Some((key.to_string(), Vec::new())),
                None => warn!("data item header without a <key>: {}", line),
            }
        }
    }
    if let Some((key, values)) = current {
        mol.props.insert(key, values.join("\n"));
    }
}

pub(super) fn read(codec: &Molfile, text: &str) -> Result<Mol, MolfileError> {
    let mut lines = Lines {
        lines: split_lines(text),
        next: 0,
    };

    let (_, name) = lines.expect_line("header")?;
    let (_, program) = lines.expect_line("header")?;
    let (_, comment) = lines.expect_line("header")?;
    let (counts_num, counts) = lines.expect_line("counts")?;
    if counts.contains("V3000") {
        return codec.delegate_decode(Envelope::V3000, text);
    }
    let atom_count = int_field(counts, counts_num, 0, 3)?;
    let bond_count = int_field(counts, counts_num, 3, 6)?;
    let chiral = int_field(counts, counts_num, 12, 15)? == 1;
    debug!(atoms = atom_count, bonds = bond_count, "decoding molfile");

    let mut builder = MolBuilder::new();
    {
        let mol = builder.mol_mut();
        mol.name = name.trim_end().to_string();
        mol.program = program.trim_end().to_string();
        mol.comment = comment.trim_end().to_string();
        mol.chiral = chiral;
    }

    for _ in 0..atom_count.max(0) {
        let (n, line) = lines.expect_line("atom")?;
        let atom = parse_atom_line(codec, line, n)?;
        builder.add_atom(atom);
    }
    for _ in 0..bond_count.max(0) {
        let (n, line) = lines.expect_line("bond")?;
        parse_bond_line(&mut builder, line, n)?;
    }

    let mut sgroups = SgroupTable::default();
    let mut aliases = Vec::new();
    parse_properties(&mut lines, &mut builder, &mut sgroups, &mut aliases)?;

    for (index, alias) in aliases {
        let Some(id) = builder.atom_id(index) else {
            continue;
        };
        match codec.templates() {
            Some(templates) => {
                if !builder.mol_mut().set_atom_alias(id, &alias, templates) {
                    trace!(atom = ?id, %alias, "alias has no template");
                }
            }
            None => {
                if let Some(atom) = builder.mol_mut().atom_mut(id) {
                    atom.alias = Some(alias);
                }
            }
        }
    }

    if !sgroups.is_empty() {
        sgroups.materialize(&mut builder)?;
    }

    let mut mol = builder.build();
    parse_data_items(&mut lines, &mut mol);

    let errors = mol.set_hcounts();
    if errors > 0 {
        debug!(errors, "atoms without an accommodating valence state");
    }
    Ok(mol)
}
