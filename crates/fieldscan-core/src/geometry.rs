/// Upright bounding box in raster pixel units.
///
/// Coordinates use a top-left origin:
/// - `x`: left edge (column of the leftmost pixel)
/// - `y`: top edge (row of the topmost pixel)
/// - `width`, `height`: pixel extent, always at least 1 for a traced region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box containing every point, or `None` for an empty slice.
    pub fn enclosing(points: &[(u32, u32)]) -> Option<Self> {
        let (&(first_x, first_y), rest) = points.split_first()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first_x, first_y, first_x, first_y);
        for &(x, y) in rest {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        Some(Self::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1))
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether the box lies fully inside a `width` × `height` raster.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}
