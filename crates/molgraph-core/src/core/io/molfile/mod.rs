//! MDL molfile (V2000 connection table) codec.
//!
//! Fixed-column decoding and encoding of the header, counts line, atom and bond blocks,
//! the `M  ` property block with sgroups, alias and value lines, and trailing SD data
//! items. V3000, Rxnfile and RGfile envelopes are detected and delegated to an
//! [`EnvelopeHandler`].

mod reader;
mod sgroup;
mod writer;

use super::envelope::{Envelope, EnvelopeHandler, StubEnvelopeHandler};
use super::traits::MolecularFile;
use crate::core::models::mol::Mol;
use crate::core::templates::registry::TemplateRegistry;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Drawing bond length that encoded coordinates are normalized to.
pub const ENCODED_BOND_LENGTH: f64 = 1.56;

/// Atom or bond count above which the V3000 envelope is required.
pub const V2000_MAX_COUNT: usize = 999;

#[derive(Debug, Error)]
pub enum MolfileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: MolfileParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("{0} envelope is not supported")]
    UnsupportedEnvelope(Envelope),
}

#[derive(Debug, Error)]
pub enum MolfileParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Unexpected end of input in the {block} block")]
    UnexpectedEof { block: &'static str },
    #[error("Invalid charge code {0}")]
    InvalidChargeCode(i32),
    #[error("Invalid radical code {0}")]
    InvalidRadicalCode(i32),
    #[error("Invalid bond order/stereo codes {order}/{stereo}")]
    InvalidBondCodes { order: i32, stereo: i32 },
    #[error("Atom index {0} is out of range")]
    AtomIndexOutOfRange(i32),
    #[error("Bond index {0} is out of range")]
    BondIndexOutOfRange(i32),
    #[error("Atoms {0} and {1} cannot be bonded (duplicate or self bond)")]
    InvalidBond(i32, i32),
    #[error("Sgroup {0} is referenced but never typed by an M  STY line")]
    UndefinedSgroup(i32),
}

pub(crate) fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len()))
        .or_else(|| line.get(start..))
        .unwrap_or("")
        .trim()
}

/// Text from column `start` to the end of the line, right-trimmed.
pub(crate) fn tail(line: &str, start: usize) -> &str {
    line.get(start..).unwrap_or("").trim_end()
}

fn columns(start: usize, end: usize) -> String {
    format!("{}-{}", start + 1, end)
}

/// Parses an integer field; a blank field reads as zero.
pub(crate) fn int_field(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
) -> Result<i32, MolfileError> {
    let value = slice_and_trim(line, start, end);
    if value.is_empty() {
        return Ok(0);
    }
    value.parse().map_err(|_| MolfileError::Parse {
        line: line_num,
        kind: MolfileParseErrorKind::InvalidInt {
            columns: columns(start, end),
            value: value.into(),
        },
    })
}

/// Parses a required float field.
pub(crate) fn float_field(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
) -> Result<f64, MolfileError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| MolfileError::Parse {
        line: line_num,
        kind: MolfileParseErrorKind::InvalidFloat {
            columns: columns(start, end),
            value: value.into(),
        },
    })
}

/// The V2000 codec with its read-only collaborators.
#[derive(Clone, Copy)]
pub struct Molfile<'a> {
    templates: Option<&'a TemplateRegistry>,
    envelopes: &'a dyn EnvelopeHandler,
    reaction: bool,
}

impl Default for Molfile<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Molfile<'a> {
    pub fn new() -> Self {
        Self {
            templates: None,
            envelopes: &StubEnvelopeHandler,
            reaction: false,
        }
    }

    /// Resolves `A  ` alias lines against a superatom dictionary while decoding.
    pub fn with_templates(mut self, templates: &'a TemplateRegistry) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn with_envelope_handler(mut self, handler: &'a dyn EnvelopeHandler) -> Self {
        self.envelopes = handler;
        self
    }

    /// Reads atom-atom mapping numbers, as when the molfile is part of a reaction.
    pub fn reading_reaction(mut self, reaction: bool) -> Self {
        self.reaction = reaction;
        self
    }

    /// Decodes molfile text into a graph, computing implicit hydrogens.
    ///
    /// Lines may be separated by newlines or, when no newline is present, by `|`.
    pub fn decode(&self, text: &str) -> Result<Mol, MolfileError> {
        if let Some(envelope) = Envelope::from_prefix(text) {
            return self.delegate_decode(envelope, text);
        }
        reader::read(self, text)
    }

    /// Encodes a graph as V2000 text, or through the V3000 envelope handler when the graph
    /// exceeds V2000 limits.
    pub fn encode(&self, mol: &Mol) -> Result<String, MolfileError> {
        if writer::requires_v3000(mol) {
            return self
                .envelopes
                .encode(Envelope::V3000, mol)
                .ok_or(MolfileError::UnsupportedEnvelope(Envelope::V3000));
        }
        writer::write(mol)
    }

    pub(crate) fn templates(&self) -> Option<&'a TemplateRegistry> {
        self.templates
    }

    pub(crate) fn reaction(&self) -> bool {
        self.reaction
    }

    pub(crate) fn delegate_decode(&self, envelope: Envelope, text: &str) -> Result<Mol, MolfileError> {
        self.envelopes
            .decode(envelope, text)
            .ok_or(MolfileError::UnsupportedEnvelope(envelope))
    }
}

impl MolecularFile for Molfile<'_> {
    type Error = MolfileError;

    fn read_from(&self, reader: &mut impl BufRead) -> Result<Mol, Self::Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.decode(&text)
    }

    fn write_to(&self, mol: &Mol, writer: &mut impl Write) -> Result<(), Self::Error> {
        let text = self.encode(mol)?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::{Atom, Radical, StereoGroup};
    use crate::core::models::topology::{BondType, RingMembership};
    use crate::core::utils::geometry::Point;
    use std::io::{BufReader, Cursor};

    /// Kekulé naphthalene with a ring nitrogen cation, a 13C label, a radical and a
    /// ring-only query bond.
    fn decorated_naphthalene() -> Mol {
        let h = 3f64.sqrt() / 2.0;
        let coords = [
            (h, 0.5),
            (0.0, 1.0),
            (-h, 0.5),
            (-h, -0.5),
            (0.0, -1.0),
            (h, -0.5),
            (2.0 * h, 1.0),
            (3.0 * h, 0.5),
            (3.0 * h, -0.5),
            (2.0 * h, -1.0),
        ];
        let mut mol = Mol::with_name("naphthalene");
        let ids: Vec<_> = coords
            .iter()
            .map(|&(x, y)| mol.add_atom(Atom::new("C", Point::new(x, y))))
            .collect();
        let bonds = [
            (0, 1, BondType::Double),
            (1, 2, BondType::Single),
            (2, 3, BondType::Double),
            (3, 4, BondType::Single),
            (4, 5, BondType::Double),
            (5, 0, BondType::Single),
            (0, 6, BondType::Single),
            (6, 7, BondType::Double),
            (7, 8, BondType::SingleOrAromatic),
            (8, 9, BondType::Double),
            (9, 5, BondType::Single),
        ];
        let mut bond_ids = Vec::new();
        for (a, b, kind) in bonds {
            bond_ids.push(mol.add_bond(ids[a], ids[b], kind).unwrap());
        }

        let nitrogen = mol.atom_mut(ids[1]).unwrap();
        nitrogen.element = "N".into();
        nitrogen.charge = 1;
        mol.atom_mut(ids[3]).unwrap().isotope = Some(13);
        mol.atom_mut(ids[8]).unwrap().radical = Radical::Doublet;

        let query = mol.bond_mut(bond_ids[8]).unwrap();
        query.ring = RingMembership::Ring;
        query.reaction_center = -1;
        mol.bond_mut(bond_ids[6]).unwrap().reaction_center = 4;
        mol
    }

    #[test]
    fn slice_and_trim_handles_short_lines() {
        assert_eq!(slice_and_trim("  1  2", 0, 3), "1");
        assert_eq!(slice_and_trim("  1  2", 3, 9), "2");
        assert_eq!(slice_and_trim("  1", 6, 9), "");
        assert_eq!(tail("M  SMT   1 n  ", 11), "n");
    }

    #[test]
    fn int_field_reports_columns() {
        let err = int_field("  x", 4, 0, 3).unwrap_err();
        match err {
            MolfileError::Parse {
                line: 4,
                kind: MolfileParseErrorKind::InvalidInt { columns, value },
            } => {
                assert_eq!(columns, "1-3");
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(int_field("   ", 1, 0, 3).unwrap(), 0);
    }

    #[test]
    fn envelopes_are_delegated_to_the_stub() {
        let codec = Molfile::new();
        assert!(matches!(
            codec.decode("$RXN\n\n\n\n  1  1\n"),
            Err(MolfileError::UnsupportedEnvelope(Envelope::Rxn))
        ));
        assert!(matches!(
            codec.decode("$MDL  REV  1\n"),
            Err(MolfileError::UnsupportedEnvelope(Envelope::RgFile))
        ));
    }

    #[test]
    fn enhanced_stereo_forces_v3000_envelope() {
        let mut mol = Mol::new();
        let mut atom = Atom::new("C", Point::default());
        atom.stereo_group = Some(StereoGroup::Or(1));
        mol.add_atom(atom);
        assert!(matches!(
            Molfile::new().encode(&mol),
            Err(MolfileError::UnsupportedEnvelope(Envelope::V3000))
        ));
    }

    #[test]
    fn custom_envelope_handler_is_consulted() {
        struct Fixed;
        impl EnvelopeHandler for Fixed {
            fn decode(&self, _envelope: Envelope, _text: &str) -> Option<Mol> {
                Some(Mol::with_name("from handler"))
            }
            fn encode(&self, envelope: Envelope, _mol: &Mol) -> Option<String> {
                Some(format!("{envelope}"))
            }
        }
        let handler = Fixed;
        let codec = Molfile::new().with_envelope_handler(&handler);
        assert_eq!(codec.decode("$RXN\n").unwrap().name, "from handler");

        let mut mol = Mol::new();
        for i in 0..1000 {
            mol.add_atom(Atom::new("C", Point::new(i as f64, 0.0)));
        }
        assert_eq!(codec.encode(&mol).unwrap(), "V3000");
    }

    #[test]
    fn fused_ring_with_atom_and_bond_fields_round_trips() {
        let mol = decorated_naphthalene();
        let codec = Molfile::new();
        let back = codec.decode(&codec.encode(&mol).unwrap()).unwrap();

        assert_eq!(back.name, "naphthalene");
        assert_eq!(back.atom_count(), 10);
        assert_eq!(back.bond_count(), 11);
        let scale = ENCODED_BOND_LENGTH / mol.effective_bond_length().unwrap();
        for ((_, a), (_, b)) in mol.atoms_iter().zip(back.atoms_iter()) {
            assert_eq!(a.element, b.element);
            assert_eq!(a.charge, b.charge);
            assert_eq!(a.isotope, b.isotope);
            assert_eq!(a.radical, b.radical);
            assert!((a.position.x * scale - b.position.x).abs() < 1e-4);
            assert!((a.position.y * scale - b.position.y).abs() < 1e-4);
        }
        for ((_, a), (_, b)) in mol.bonds_iter().zip(back.bonds_iter()) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.ring, b.ring);
            assert_eq!(a.reaction_center, b.reaction_center);
            assert_eq!(mol.atom_index(a.atom1_id), back.atom_index(b.atom1_id));
            assert_eq!(mol.atom_index(a.atom2_id), back.atom_index(b.atom2_id));
        }
    }

    #[test]
    fn superatoms_are_expanded_and_recollapsed() {
        let registry = TemplateRegistry::builtin().unwrap();
        let mut mol = Mol::with_name("methyl ether");
        let c = mol.add_atom(Atom::new("C", Point::default()));
        let o = mol.add_atom(Atom::new("O", Point::new(1.0, 0.0)));
        mol.add_bond(c, o, BondType::Single).unwrap();
        assert!(mol.set_atom_alias(o, "OMe", registry));

        let codec = Molfile::new();
        let text = codec.encode(&mol).unwrap();
        let counts = text.lines().nth(3).unwrap();
        assert_eq!(&counts[0..6], "  3  2");
        assert!(text.contains("M  STY  1   1 SUP"));
        assert!(text.contains("M  SMT   1 OMe"));

        let back = codec.decode(&text).unwrap();
        assert_eq!(back.atom_count(), 2);
        assert_eq!(back.bond_count(), 1);
        let sup = back
            .atoms_iter()
            .map(|(_, a)| a)
            .find(|a| a.is_superatom())
            .unwrap();
        assert_eq!(sup.alias.as_deref(), Some("OMe"));
        assert_eq!(sup.superatom.as_ref().unwrap().atom_count(), 2);
    }

    #[test]
    fn molecular_file_reads_and_writes_streams() {
        let mut mol = Mol::with_name("water");
        mol.add_atom(Atom::new("O", Point::default()));
        let codec = Molfile::new();

        let mut buffer = Vec::new();
        codec.write_to(&mol, &mut buffer).unwrap();
        let mut reader = BufReader::new(Cursor::new(buffer));
        let decoded = codec.read_from(&mut reader).unwrap();
        assert_eq!(decoded.name, "water");
        assert_eq!(decoded.atom_count(), 1);
    }

    #[test]
    fn molecular_file_round_trips_through_a_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.mol");
        let mut mol = Mol::with_name("methane");
        mol.add_atom(Atom::new("C", Point::default()));
        let codec = Molfile::new();
        codec.write_to_path(&mol, &path).unwrap();
        let decoded = codec.read_from_path(&path).unwrap();
        assert_eq!(decoded.name, "methane");
        assert_eq!(decoded.atom(decoded.atom_ids()[0]).unwrap().hcount, Some(4));
    }
}
