use super::ids::{AtomId, GraphicId};
use crate::core::utils::geometry::{Point, Rect};

/// Bracket annotation carried by a non-superatom, non-data sgroup.
#[derive(Debug, Clone, PartialEq)]
pub struct Bracket {
    pub rect: Rect,
    /// Sgroup type as written in `M  STY` (e.g. `SRU`, `MUL`, `GEN`).
    pub kind: String,
    pub subscript: Option<String>,
    /// Head-to-tail connectivity code from `M  SCN` (`HH`, `HT`, `EU`).
    pub connectivity: Option<String>,
    pub atoms: Vec<AtomId>,
}

/// Free or atom-anchored text; anchored texts are written as `DAT` sgroups.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
    pub field_name: Option<String>,
    pub position: Point,
    pub anchors: Vec<AtomId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: Option<String>,
    pub atoms: Vec<AtomId>,
    pub graphics: Vec<GraphicId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Line,
    Arrow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub rect: Rect,
}

/// Non-structural drawing objects owned by a `Mol`.
///
/// The graph keeps ids consistent across removals and copies; it does not interpret
/// the drawing itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Graphic {
    Bracket(Bracket),
    Text(Text),
    Group(Group),
    Shape(Shape),
}

impl Graphic {
    /// Atom references held by this graphic.
    pub fn atoms(&self) -> &[AtomId] {
        match self {
            Self::Bracket(b) => &b.atoms,
            Self::Text(t) => &t.anchors,
            Self::Group(g) => &g.atoms,
            Self::Shape(_) => &[],
        }
    }

    pub fn atoms_mut(&mut self) -> Option<&mut Vec<AtomId>> {
        match self {
            Self::Bracket(b) => Some(&mut b.atoms),
            Self::Text(t) => Some(&mut t.anchors),
            Self::Group(g) => Some(&mut g.atoms),
            Self::Shape(_) => None,
        }
    }

    pub fn graphics_mut(&mut self) -> Option<&mut Vec<GraphicId>> {
        match self {
            Self::Group(g) => Some(&mut g.graphics),
            _ => None,
        }
    }

    /// Re-points every atom and graphic reference through the given maps, dropping
    /// references that have no image.
    pub fn remap<FA, FG>(&mut self, mut atom_map: FA, mut graphic_map: FG)
    where
        FA: FnMut(AtomId) -> Option<AtomId>,
        FG: FnMut(GraphicId) -> Option<GraphicId>,
    {
        if let Some(atoms) = self.atoms_mut() {
            *atoms = atoms.iter().filter_map(|&a| atom_map(a)).collect();
        }
        if let Some(graphics) = self.graphics_mut() {
            *graphics = graphics.iter().filter_map(|&g| graphic_map(g)).collect();
        }
    }

    pub fn offset(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Bracket(b) => {
                b.rect.offset(dx, dy);
            }
            Self::Text(t) => {
                t.position.offset(dx, dy);
            }
            Self::Shape(s) => {
                s.rect.offset(dx, dy);
            }
            Self::Group(_) => {}
        }
    }

    pub fn scale(&mut self, factor: f64, origin: Point) {
        let scale_rect = |rect: &mut Rect| {
            let mut tl = Point::new(rect.left, rect.top);
            tl.scale(factor, origin);
            *rect = Rect::new(tl.x, tl.y, rect.width * factor, rect.height * factor);
        };
        match self {
            Self::Bracket(b) => scale_rect(&mut b.rect),
            Self::Shape(s) => scale_rect(&mut s.rect),
            Self::Text(t) => {
                t.position.scale(factor, origin);
            }
            Self::Group(_) => {}
        }
    }
}
