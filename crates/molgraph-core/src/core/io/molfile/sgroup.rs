use super::writer::push_pairs;
use super::{MolfileError, MolfileParseErrorKind};
use crate::core::models::builder::MolBuilder;
use crate::core::models::graphics::{Bracket, Graphic, Text};
use crate::core::models::ids::AtomId;
use crate::core::models::superatom::SuperatomError;
use crate::core::utils::geometry::{Point, Rect};
use std::collections::BTreeMap;
use std::fmt::Write;
use tracing::trace;

/// Sgroup data accumulated from `M  S..` lines. Lines may refer to an sgroup before its
/// `M  STY` declaration, so records are created on first mention and resolved once the
/// property block is complete.
#[derive(Debug, Clone, Default)]
pub(super) struct PendingSgroup {
    pub first_line: usize,
    pub kind: Option<String>,
    pub subscript: Option<String>,
    pub class: Option<String>,
    pub connectivity: Option<String>,
    pub parent: Option<i32>,
    pub component: Option<i32>,
    pub atoms: Vec<usize>,
    pub paradigm_atoms: Vec<usize>,
    pub bonds: Vec<usize>,
    /// Bracket segments in drawing coordinates.
    pub brackets: Vec<(Point, Point)>,
    pub field_name: Option<String>,
    pub field_value: Option<String>,
    pub data_position: Option<Point>,
}

#[derive(Debug, Default)]
pub(super) struct SgroupTable {
    records: BTreeMap<i32, PendingSgroup>,
}

impl SgroupTable {
    pub fn entry(&mut self, index: i32, line: usize) -> &mut PendingSgroup {
        self.records.entry(index).or_insert_with(|| PendingSgroup {
            first_line: line,
            ..PendingSgroup::default()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Turns pending records into graphics and superatoms on the builder's graph.
    ///
    /// `SUP` groups collapse into superatoms after every other sgroup has been placed, so
    /// that brackets and data fields still see the original atoms.
    pub fn materialize(self, builder: &mut MolBuilder) -> Result<(), MolfileError> {
        let mut superatoms: Vec<(Vec<AtomId>, String)> = Vec::new();

        for (index, record) in self.records {
            let kind = record.kind.clone().ok_or(MolfileError::Parse {
                line: record.first_line,
                kind: MolfileParseErrorKind::UndefinedSgroup(index),
            })?;
            let atoms: Vec<AtomId> = record
                .atoms
                .iter()
                .filter_map(|&i| builder.atom_id(i))
                .collect();

            match kind.as_str() {
                "SUP" => {
                    let label = record.subscript.clone().unwrap_or_else(|| "SUP".into());
                    superatoms.push((atoms, label));
                }
                "DAT" => {
                    let position = record
                        .data_position
                        .or_else(|| centroid(builder, &atoms))
                        .unwrap_or_default();
                    builder.mol_mut().add_graphic(Graphic::Text(Text {
                        text: record.field_value.unwrap_or_default(),
                        field_name: record.field_name,
                        position,
                        anchors: atoms,
                    }));
                }
                _ => {
                    let rect = Rect::bounding(record.brackets.iter().flat_map(|&(a, b)| [a, b]))
                        .or_else(|| {
                            Rect::bounding(
                                atoms
                                    .iter()
                                    .filter_map(|&id| builder.mol().atom(id))
                                    .map(|a| a.position),
                            )
                        })
                        .unwrap_or_default();
                    builder.mol_mut().add_graphic(Graphic::Bracket(Bracket {
                        rect,
                        kind,
                        subscript: record.subscript,
                        connectivity: record.connectivity,
                        atoms,
                    }));
                }
            }
        }

        for (atoms, label) in superatoms {
            trace!(%label, atoms = atoms.len(), "collapsing SUP sgroup");
            match builder.mol_mut().collapse_super_atom(&atoms, &label) {
                Ok(_) => {}
                Err(SuperatomError::NoAtoms) => trace!(%label, "SUP sgroup without atoms ignored"),
                Err(e) => return Err(MolfileError::Inconsistency(e.to_string())),
            }
        }
        Ok(())
    }
}

fn centroid(builder: &MolBuilder, atoms: &[AtomId]) -> Option<Point> {
    let points: Vec<Point> = atoms
        .iter()
        .filter_map(|&id| builder.mol().atom(id))
        .map(|a| a.position)
        .collect();
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let sum = points.iter().fold(Point::default(), |acc, p| acc + *p);
    Some(Point::new(sum.x / n, sum.y / n))
}

/// An sgroup ready to be written, with atom indices and coordinates in file space.
#[derive(Debug, Clone, Default)]
pub(super) struct OutgoingSgroup {
    pub kind: String,
    pub subscript: Option<String>,
    pub connectivity: Option<String>,
    /// 1-based atom indices.
    pub atoms: Vec<usize>,
    /// Bracket segments in file coordinates.
    pub brackets: Vec<(Point, Point)>,
    pub field_name: Option<String>,
    pub field_value: Option<String>,
    pub data_position: Option<Point>,
}

const SAL_ENTRIES_PER_LINE: usize = 15;

/// Appends the sgroup property lines for `sgroups`, numbered from 1.
pub(super) fn emit_sgroups(out: &mut String, sgroups: &[OutgoingSgroup]) {
    if sgroups.is_empty() {
        return;
    }
    let types: Vec<(usize, String)> = sgroups
        .iter()
        .enumerate()
        .map(|(i, s)| (i + 1, s.kind.clone()))
        .collect();
    push_pairs(out, "M  STY", &types);

    let connectivity: Vec<(usize, String)> = sgroups
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.connectivity.clone().map(|c| (i + 1, c)))
        .collect();
    push_pairs(out, "M  SCN", &connectivity);

    for (i, sgroup) in sgroups.iter().enumerate() {
        let index = i + 1;
        for chunk in sgroup.atoms.chunks(SAL_ENTRIES_PER_LINE) {
            let _ = write!(out, "M  SAL {:>3}{:>3}", index, chunk.len());
            for atom in chunk {
                let _ = write!(out, " {:>3}", atom);
            }
            out.push('\n');
        }
        if let Some(subscript) = &sgroup.subscript {
            let _ = writeln!(out, "M  SMT {:>3} {}", index, subscript);
        }
        for (p1, p2) in &sgroup.brackets {
            let _ = writeln!(
                out,
                "M  SDI {:>3}  4{:>10.4}{:>10.4}{:>10.4}{:>10.4}",
                index, p1.x, p1.y, p2.x, p2.y
            );
        }
        if sgroup.kind == "DAT" {
            let field = sgroup.field_name.as_deref().unwrap_or("");
            let _ = writeln!(out, "M  SDT {:>3} {:<30}", index, field);
            if let Some(p) = sgroup.data_position {
                let _ = writeln!(
                    out,
                    "M  SDD {:>3} {:>10.4}{:>10.4}    DA    ALL  1       5",
                    index, p.x, p.y
                );
            }
            if let Some(value) = &sgroup.field_value {
                for line in value.lines() {
                    let _ = writeln!(out, "M  SED {:>3} {}", index, line);
                }
            }
        }
    }
}
