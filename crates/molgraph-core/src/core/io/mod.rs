//! Reading and writing structure files.
//!
//! The V2000 molfile codec lives in [`molfile`]. Envelopes it does not handle itself
//! (V3000, Rxnfile, RGfile) are detected and handed to an [`envelope::EnvelopeHandler`].
//! [`traits::MolecularFile`] gives every codec the same reader/writer/path API.

pub mod envelope;
pub mod molfile;
pub mod traits;
