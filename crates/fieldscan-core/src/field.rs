//! Field descriptor types.
//!
//! Provides [`FieldDescriptor`], the only entity fieldscan emits, together
//! with [`FieldCandidate`], the unnamed per-page form a descriptor takes
//! before the document-level reduction assigns sequential names.

use crate::PixelBox;

/// Input type of a field. Detection only infers plain text inputs; check
/// boxes come from hand-edited field lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum FieldType {
    #[default]
    Text,
    Checkbox,
}

/// Horizontal text alignment of a proposed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum FieldAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl std::fmt::Display for FieldAlign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Center => write!(f, "center"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Which shape heuristic admitted a box. A box may satisfy both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKind {
    /// Tall enough to be a table cell.
    pub table_cell: bool,
    /// Wide and short enough to be an underscore blank.
    pub underscore: bool,
}

/// A classified, normalized box on one page, not yet named.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCandidate {
    /// 0-based page index.
    pub page: usize,
    /// Source box in raster pixels.
    pub pixel_box: PixelBox,
    /// Shape class that admitted the box.
    pub kind: FieldKind,
    /// Logical left edge, margin applied.
    pub x: f64,
    /// Logical top edge, margin applied.
    pub y: f64,
    /// Logical width, margin applied.
    pub w: f64,
    /// Logical height, margin applied.
    pub h: f64,
}

/// A proposed fillable field in logical page coordinates.
///
/// Serializes to the object shape downstream form builders consume:
/// `id, type, page, x, y, w, h, name, required, fontSize, align`. When read
/// back, only `x, y, w, h` are mandatory; edited lists often drop the rest.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDescriptor {
    /// `<prefix>_<page>_<pixel x>_<pixel y>`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: String,
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub field_type: FieldType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub page: usize,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Sequential label, unique within the document.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub required: bool,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "fontSize", default = "default_font_size")
    )]
    pub font_size: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub align: FieldAlign,
}

#[cfg(feature = "serde")]
fn default_font_size() -> u32 {
    crate::DetectOptions::default().font_size
}
