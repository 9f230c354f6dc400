use super::mol::Mol;
use crate::core::utils::geometry::Point;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Attachment-point code that marks the basis of a template rather than a real
/// connection; it does not consume a hydrogen.
pub const BASIS_ATTACH_POINT: u8 = 99;

/// Radical state as encoded by molfile `M  RAD` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Radical {
    #[default]
    None = 0,
    Singlet = 1,
    Doublet = 2,
    Triplet = 3,
}

impl Radical {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Singlet),
            2 => Some(Self::Doublet),
            3 => Some(Self::Triplet),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Number of bonding electrons the radical occupies.
    pub fn valence(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Singlet | Self::Triplet => 2.0,
            Self::Doublet => 1.0,
        }
    }
}

/// An `L` atom-list query: the atom matches any (include) or none (exclude) of the
/// listed element symbols.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AtomList {
    pub exclude: bool,
    pub elements: Vec<String>,
}

impl AtomList {
    pub fn new(exclude: bool, elements: Vec<String>) -> Self {
        Self { exclude, elements }
    }

    pub fn contains(&self, element: &str) -> bool {
        self.elements.iter().any(|e| e == element)
    }

    /// Whether a concrete element satisfies the list.
    pub fn accepts(&self, element: &str) -> bool {
        self.contains(element) != self.exclude
    }

    /// Whether two lists can be satisfied by a common element.
    pub fn intersects(&self, other: &AtomList) -> bool {
        match (self.exclude, other.exclude) {
            (false, false) => self.elements.iter().any(|e| other.contains(e)),
            (false, true) => self.elements.iter().any(|e| !other.contains(e)),
            (true, false) => other.elements.iter().any(|e| !self.contains(e)),
            (true, true) => true,
        }
    }
}

impl fmt::Display for AtomList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exclude {
            write!(f, "NOT ")?;
        }
        write!(f, "[{}]", self.elements.join(","))
    }
}

/// Query constraints carried by an atom when the graph is used as a search query.
///
/// Counts follow molfile conventions: `-1` means "zero", `-2` means "as drawn".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryFeatures {
    pub atom_list: Option<AtomList>,
    pub substitution_count: Option<i8>,
    pub unsaturated: bool,
    pub ring_bond_count: Option<i8>,
    /// Minimum hydrogen count (molfile `hhh` field minus one).
    pub hydrogen_count: Option<u8>,
}

impl QueryFeatures {
    pub fn is_empty(&self) -> bool {
        self.atom_list.is_none()
            && self.substitution_count.is_none()
            && !self.unsaturated
            && self.ring_bond_count.is_none()
            && self.hydrogen_count.is_none()
    }
}

/// Monomer class of a biologics placeholder atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BioType {
    AminoAcid,
    Base,
    Sugar,
    Linker,
    Chem,
}

#[derive(Debug, Error)]
#[error("Invalid biologics type string")]
pub struct ParseBioTypeError;

impl FromStr for BioType {
    type Err = ParseBioTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aminoacid" | "amino-acid" | "aa" => Ok(Self::AminoAcid),
            "base" => Ok(Self::Base),
            "sugar" => Ok(Self::Sugar),
            "linker" => Ok(Self::Linker),
            "chem" => Ok(Self::Chem),
            _ => Err(ParseBioTypeError),
        }
    }
}

/// Enhanced stereochemistry group of a stereocenter. Only representable in V3000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StereoGroup {
    Absolute,
    And(u8),
    Or(u8),
}

/// A generic substituent placeholder with its alternative member graphs.
#[derive(Debug, Clone, Default)]
pub struct RGroup {
    pub number: u32,
    pub members: Vec<Mol>,
}

impl RGroup {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            members: Vec::new(),
        }
    }
}

/// A node of the structure graph.
///
/// Element symbols are stored as written (`"C"`, `"Cl"`); query symbols such as `"*"`,
/// `"A"`, `"Q"`, `"X"` and `"L"` and the R-group symbol `"R"` are stored the same way.
#[derive(Debug, Clone)]
pub struct Atom {
    pub element: String,
    pub position: Point,
    pub charge: i8,
    /// Mass number; `None` means natural abundance.
    pub isotope: Option<u16>,
    pub radical: Radical,
    /// Cached implicit-hydrogen count, set by hydrogen inference.
    pub hcount: Option<u8>,
    /// Set by hydrogen inference when no valence state accommodates the atom.
    pub valence_error: bool,
    /// Valence override from the molfile `vvv` field.
    pub explicit_valence: Option<u8>,
    pub alias: Option<String>,
    /// Free text attached by a molfile `V  ` line.
    pub value: Option<String>,
    pub query: QueryFeatures,
    /// Attachment-point codes (1, 2, ... or [`BASIS_ATTACH_POINT`]).
    pub attach_points: Vec<u8>,
    /// Atom-atom mapping number, read when a molfile is decoded as part of a reaction.
    pub atom_map: Option<u32>,
    pub superatom: Option<Box<Mol>>,
    pub rgroup: Option<RGroup>,
    pub bio: Option<BioType>,
    pub stereo_group: Option<StereoGroup>,
    pub hidden: bool,
}

impl Atom {
    pub fn new(element: &str, position: Point) -> Self {
        Self {
            element: element.to_string(),
            position,
            charge: 0,
            isotope: None,
            radical: Radical::None,
            hcount: None,
            valence_error: false,
            explicit_valence: None,
            alias: None,
            value: None,
            query: QueryFeatures::default(),
            attach_points: Vec::new(),
            atom_map: None,
            superatom: None,
            rgroup: None,
            bio: None,
            stereo_group: None,
            hidden: false,
        }
    }

    pub fn with_charge(mut self, charge: i8) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_isotope(mut self, isotope: u16) -> Self {
        self.isotope = Some(isotope);
        self
    }

    pub fn is_superatom(&self) -> bool {
        self.superatom.is_some()
    }

    pub fn is_rgroup(&self) -> bool {
        self.element == "R" || self.rgroup.is_some()
    }

    /// Number of attachment points that stand for a real external connection.
    pub fn connecting_attach_points(&self) -> usize {
        self.attach_points
            .iter()
            .filter(|&&code| code != BASIS_ATTACH_POINT)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_expected_defaults() {
        let atom = Atom::new("N", Point::new(1.0, 2.0));
        assert_eq!(atom.element, "N");
        assert_eq!(atom.position, Point::new(1.0, 2.0));
        assert_eq!(atom.charge, 0);
        assert_eq!(atom.isotope, None);
        assert_eq!(atom.radical, Radical::None);
        assert_eq!(atom.hcount, None);
        assert!(!atom.valence_error);
        assert!(atom.query.is_empty());
        assert!(!atom.is_superatom());
        assert!(!atom.is_rgroup());
    }

    #[test]
    fn radical_codes_map_to_bonding_electrons() {
        assert_eq!(Radical::from_code(1), Some(Radical::Singlet));
        assert_eq!(Radical::from_code(4), None);
        assert_eq!(Radical::Singlet.valence(), 2.0);
        assert_eq!(Radical::Doublet.valence(), 1.0);
        assert_eq!(Radical::Triplet.valence(), 2.0);
        assert_eq!(Radical::Triplet.code(), 3);
    }

    #[test]
    fn atom_list_accepts_honors_exclude_flag() {
        let include = AtomList::new(false, vec!["N".into(), "O".into()]);
        let exclude = AtomList::new(true, vec!["N".into(), "O".into()]);
        assert!(include.accepts("N"));
        assert!(!include.accepts("C"));
        assert!(!exclude.accepts("O"));
        assert!(exclude.accepts("S"));
    }

    #[test]
    fn atom_list_intersection_covers_all_flag_combinations() {
        let no = AtomList::new(false, vec!["N".into(), "O".into()]);
        let os = AtomList::new(false, vec!["O".into(), "S".into()]);
        let cl = AtomList::new(false, vec!["Cl".into()]);
        let not_no = AtomList::new(true, vec!["N".into(), "O".into()]);
        assert!(no.intersects(&os));
        assert!(!no.intersects(&cl));
        assert!(!no.intersects(&not_no));
        assert!(os.intersects(&not_no));
        assert!(not_no.intersects(&os));
        assert!(not_no.intersects(&not_no));
    }

    #[test]
    fn attach_points_ignore_basis_code() {
        let mut atom = Atom::new("C", Point::default());
        atom.attach_points = vec![1, BASIS_ATTACH_POINT, 2];
        assert_eq!(atom.connecting_attach_points(), 2);
    }

    #[test]
    fn bio_type_parses_case_insensitively() {
        assert_eq!("AminoAcid".parse::<BioType>().unwrap(), BioType::AminoAcid);
        assert_eq!("SUGAR".parse::<BioType>().unwrap(), BioType::Sugar);
        assert!("peptide".parse::<BioType>().is_err());
    }
}
