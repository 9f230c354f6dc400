use crate::core::models::mol::Mol;
use std::fmt;

/// File variants that share the molfile family but are outside the V2000 codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Envelope {
    V3000,
    Rxn,
    RgFile,
}

impl Envelope {
    /// Detects an envelope from the leading bytes of a file (`$RXN`, `$MDL`).
    pub fn from_prefix(text: &str) -> Option<Self> {
        let head = text.trim_start_matches('\u{feff}');
        if head.starts_with("$RXN") {
            Some(Self::Rxn)
        } else if head.starts_with("$MDL") {
            Some(Self::RgFile)
        } else {
            None
        }
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::V3000 => "V3000",
            Self::Rxn => "Rxnfile",
            Self::RgFile => "RGfile",
        };
        write!(f, "{}", name)
    }
}

/// Collaborator that decodes and encodes envelopes the V2000 codec delegates.
///
/// Returning `None` means the envelope is not supported.
pub trait EnvelopeHandler: Send + Sync {
    fn decode(&self, envelope: Envelope, text: &str) -> Option<Mol>;
    fn encode(&self, envelope: Envelope, mol: &Mol) -> Option<String>;
}

/// Handler that supports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubEnvelopeHandler;

impl EnvelopeHandler for StubEnvelopeHandler {
    fn decode(&self, _envelope: Envelope, _text: &str) -> Option<Mol> {
        None
    }

    fn encode(&self, _envelope: Envelope, _mol: &Mol) -> Option<String> {
        None
    }
}
