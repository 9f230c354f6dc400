use super::ids::AtomId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondType {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
    Delocalized,
    Wedge,
    Hash,
    Wiggly,
    Either,
    Dummy,
    Unknown,
    Peptide,
    Nucleotide,
    Disulfide,
    Amide,
    Bold,
    BoldHash,
    SingleOrDouble,
    SingleOrAromatic,
    DoubleOrAromatic,
}

impl BondType {
    /// Bond-order contribution to an atom's valence sum.
    ///
    /// Query bond types have no defined order and return `None`.
    pub fn valence(self) -> Option<f64> {
        match self {
            Self::Single
            | Self::Wedge
            | Self::Hash
            | Self::Wiggly
            | Self::Peptide
            | Self::Nucleotide
            | Self::Disulfide
            | Self::Amide
            | Self::Bold
            | Self::BoldHash => Some(1.0),
            Self::Aromatic | Self::Delocalized => Some(1.5),
            Self::Double | Self::Either => Some(2.0),
            Self::Triple => Some(3.0),
            Self::Dummy | Self::Unknown => Some(0.0),
            Self::SingleOrDouble | Self::SingleOrAromatic | Self::DoubleOrAromatic => None,
        }
    }

    pub fn is_aromatic(self) -> bool {
        matches!(self, Self::Aromatic | Self::Delocalized)
    }

    /// Query bond types that match more than one concrete order.
    pub fn is_query(self) -> bool {
        matches!(
            self,
            Self::SingleOrDouble | Self::SingleOrAromatic | Self::DoubleOrAromatic | Self::Unknown
        )
    }

    /// Bond types that have no V2000 code and are written as plain single bonds.
    pub fn is_display_only(self) -> bool {
        matches!(
            self,
            Self::Peptide
                | Self::Nucleotide
                | Self::Disulfide
                | Self::Amide
                | Self::Bold
                | Self::BoldHash
        )
    }

    /// The order class used for bond compatibility and histograms.
    pub fn order_class(self) -> BondOrderClass {
        match self {
            Self::Double | Self::Either => BondOrderClass::Double,
            Self::Triple => BondOrderClass::Triple,
            Self::Aromatic | Self::Delocalized => BondOrderClass::Aromatic,
            Self::SingleOrDouble | Self::SingleOrAromatic | Self::DoubleOrAromatic | Self::Unknown => {
                BondOrderClass::Query
            }
            Self::Dummy => BondOrderClass::Zero,
            _ => BondOrderClass::Single,
        }
    }

    /// Whether this (query) bond type accepts a target bond of order class `class`.
    pub fn accepts(self, class: BondOrderClass) -> bool {
        match self {
            Self::Unknown => true,
            Self::SingleOrDouble => matches!(class, BondOrderClass::Single | BondOrderClass::Double),
            Self::SingleOrAromatic => {
                matches!(class, BondOrderClass::Single | BondOrderClass::Aromatic)
            }
            Self::DoubleOrAromatic => {
                matches!(class, BondOrderClass::Double | BondOrderClass::Aromatic)
            }
            other => other.order_class() == class,
        }
    }

    /// V2000 bond block `(order, stereo)` codes.
    pub fn molfile_codes(self) -> (u8, u8) {
        match self {
            Self::Single => (1, 0),
            Self::Double => (2, 0),
            Self::Triple => (3, 0),
            Self::Aromatic | Self::Delocalized => (4, 0),
            Self::Wedge => (1, 1),
            Self::Wiggly => (1, 4),
            Self::Hash => (1, 6),
            Self::Either => (2, 3),
            Self::SingleOrDouble => (5, 0),
            Self::SingleOrAromatic => (6, 0),
            Self::DoubleOrAromatic => (7, 0),
            Self::Unknown => (8, 0),
            Self::Dummy => (9, 0),
            Self::Peptide
            | Self::Nucleotide
            | Self::Disulfide
            | Self::Amide
            | Self::Bold
            | Self::BoldHash => (1, 0),
        }
    }

    /// Inverse of [`BondType::molfile_codes`]; `None` for an unknown order code.
    pub fn from_molfile_codes(order: u8, stereo: u8) -> Option<Self> {
        let kind = match (order, stereo) {
            (1, 1) => Self::Wedge,
            (1, 4) => Self::Wiggly,
            (1, 6) => Self::Hash,
            (1, _) => Self::Single,
            (2, 3) => Self::Either,
            (2, _) => Self::Double,
            (3, _) => Self::Triple,
            (4, _) => Self::Aromatic,
            (5, _) => Self::SingleOrDouble,
            (6, _) => Self::SingleOrAromatic,
            (7, _) => Self::DoubleOrAromatic,
            (8, _) => Self::Unknown,
            (9, _) => Self::Dummy,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond type string")]
pub struct ParseBondTypeError;

impl FromStr for BondType {
    type Err = ParseBondTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "s" | "single" => Ok(Self::Single),
            "2" | "d" | "double" => Ok(Self::Double),
            "3" | "t" | "triple" => Ok(Self::Triple),
            "ar" | "aromatic" => Ok(Self::Aromatic),
            "delocalized" => Ok(Self::Delocalized),
            "wedge" => Ok(Self::Wedge),
            "hash" => Ok(Self::Hash),
            "wiggly" => Ok(Self::Wiggly),
            "either" => Ok(Self::Either),
            "dummy" => Ok(Self::Dummy),
            "unknown" | "any" => Ok(Self::Unknown),
            "peptide" => Ok(Self::Peptide),
            "nucleotide" => Ok(Self::Nucleotide),
            "disulfide" => Ok(Self::Disulfide),
            "amide" => Ok(Self::Amide),
            "bold" => Ok(Self::Bold),
            "boldhash" => Ok(Self::BoldHash),
            "single-or-double" => Ok(Self::SingleOrDouble),
            "single-or-aromatic" => Ok(Self::SingleOrAromatic),
            "double-or-aromatic" => Ok(Self::DoubleOrAromatic),
            _ => Err(ParseBondTypeError),
        }
    }
}

impl fmt::Display for BondType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Single => "Single",
            Self::Double => "Double",
            Self::Triple => "Triple",
            Self::Aromatic => "Aromatic",
            Self::Delocalized => "Delocalized",
            Self::Wedge => "Wedge",
            Self::Hash => "Hash",
            Self::Wiggly => "Wiggly",
            Self::Either => "Either",
            Self::Dummy => "Dummy",
            Self::Unknown => "Unknown",
            Self::Peptide => "Peptide",
            Self::Nucleotide => "Nucleotide",
            Self::Disulfide => "Disulfide",
            Self::Amide => "Amide",
            Self::Bold => "Bold",
            Self::BoldHash => "BoldHash",
            Self::SingleOrDouble => "SingleOrDouble",
            Self::SingleOrAromatic => "SingleOrAromatic",
            Self::DoubleOrAromatic => "DoubleOrAromatic",
        };
        write!(f, "{}", name)
    }
}

/// Coarse bond-order bucket shared by screening and compatibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrderClass {
    Single,
    Double,
    Triple,
    Aromatic,
    Zero,
    Query,
}

/// Tri-state ring flag, mirroring the molfile topology column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RingMembership {
    #[default]
    Unknown,
    Ring,
    Chain,
}

impl RingMembership {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Ring,
            2 => Self::Chain,
            _ => Self::Unknown,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Ring => 1,
            Self::Chain => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    pub atom1_id: AtomId,
    pub atom2_id: AtomId,
    pub kind: BondType,
    pub ring: RingMembership,
    /// Molfile reacting-center code.
    pub reaction_center: i8,
    /// R-group attachment labels at each end.
    pub r1: Option<u8>,
    pub r2: Option<u8>,
    pub ratio1: Option<f64>,
    pub ratio2: Option<f64>,
}

impl Bond {
    pub fn new(atom1_id: AtomId, atom2_id: AtomId, kind: BondType) -> Self {
        Self {
            atom1_id,
            atom2_id,
            kind,
            ring: RingMembership::Unknown,
            reaction_center: 0,
            r1: None,
            r2: None,
            ratio1: None,
            ratio2: None,
        }
    }

    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.atom1_id == atom_id || self.atom2_id == atom_id
    }

    /// The endpoint opposite `atom_id`, or `None` if the bond does not touch it.
    pub fn partner(&self, atom_id: AtomId) -> Option<AtomId> {
        if self.atom1_id == atom_id {
            Some(self.atom2_id)
        } else if self.atom2_id == atom_id {
            Some(self.atom1_id)
        } else {
            None
        }
    }

    pub fn valence(&self) -> Option<f64> {
        self.kind.valence()
    }
}
