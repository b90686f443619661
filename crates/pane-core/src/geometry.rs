#![forbid(unsafe_code)]

//! Grid coordinates.

use std::fmt;

/// A cell position inside a pane.
///
/// Uses grid coordinates (0-indexed, origin at top-left). `x` is the column,
/// `y` is the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Slot {
    /// Column (0-indexed).
    pub x: u16,
    /// Row (0-indexed).
    pub y: u16,
}

impl Slot {
    /// Create a new slot.
    #[inline]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Convert a row-major index into a slot for a grid `columns` wide.
    ///
    /// Returns `None` when `columns` is zero.
    #[inline]
    pub const fn from_index(index: usize, columns: u16) -> Option<Self> {
        if columns == 0 {
            return None;
        }
        let columns = columns as usize;
        let y = index / columns;
        if y > u16::MAX as usize {
            return None;
        }
        Some(Self::new((index % columns) as u16, y as u16))
    }

    /// Row-major index of this slot in a grid `columns` wide.
    #[inline]
    pub const fn index(&self, columns: u16) -> usize {
        self.y as usize * columns as usize + self.x as usize
    }

    /// Check if the slot lies inside a `columns` x `rows` grid.
    #[inline]
    pub const fn is_within(&self, columns: u16, rows: u16) -> bool {
        self.x < columns && self.y < rows
    }

    /// Check if the slot is on the outer ring of a `columns` x `rows` grid.
    #[inline]
    pub const fn is_border(&self, columns: u16, rows: u16) -> bool {
        self.is_within(columns, rows)
            && (self.x == 0 || self.y == 0 || self.x + 1 == columns || self.y + 1 == rows)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(u16, u16)> for Slot {
    fn from((x, y): (u16, u16)) -> Self {
        Self::new(x, y)
    }
}
