#![forbid(unsafe_code)]

//! Reference row-major grid pane.

use crate::geometry::Slot;
use crate::pane::{Element, ElementAction, Pane};

/// A `columns` x `rows` grid of optional [`Element`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPane {
    rows: u16,
    columns: u16,
    cells: Vec<Option<Element>>,
}

impl GridPane {
    /// Create an empty grid.
    #[must_use]
    pub fn new(rows: u16, columns: u16) -> Self {
        Self {
            rows,
            columns,
            cells: vec![None; rows as usize * columns as usize],
        }
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub const fn columns(&self) -> u16 {
        self.columns
    }

    /// Total number of slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the grid has no slots at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Element at `slot`, or `None` if empty or out of bounds.
    #[must_use]
    pub fn get(&self, slot: impl Into<Slot>) -> Option<&Element> {
        let slot = slot.into();
        if !slot.is_within(self.columns, self.rows) {
            return None;
        }
        self.cells[slot.index(self.columns)].as_ref()
    }

    /// Place an element. Returns `false` (and changes nothing) when `slot` is
    /// out of bounds.
    pub fn set(&mut self, slot: impl Into<Slot>, element: Element) -> bool {
        let slot = slot.into();
        if !slot.is_within(self.columns, self.rows) {
            tracing::debug!(target: "pane.grid", %slot, "set outside grid ignored");
            return false;
        }
        let index = slot.index(self.columns);
        self.cells[index] = Some(element);
        true
    }

    /// Empty a slot, returning what was there.
    pub fn clear(&mut self, slot: impl Into<Slot>) -> Option<Element> {
        let slot = slot.into();
        if !slot.is_within(self.columns, self.rows) {
            return None;
        }
        let index = slot.index(self.columns);
        self.cells[index].take()
    }

    /// Put `element` in every slot.
    pub fn fill(&mut self, element: &Element) {
        for cell in &mut self.cells {
            *cell = Some(element.clone());
        }
    }

    /// Put `element` in every slot of the outer ring.
    pub fn fill_border(&mut self, element: &Element) {
        for (index, cell) in self.cells.iter_mut().enumerate() {
            let Some(slot) = Slot::from_index(index, self.columns) else {
                continue;
            };
            if slot.is_border(self.columns, self.rows) {
                *cell = Some(element.clone());
            }
        }
    }

    /// The middle slot (rounded toward the top-left).
    #[must_use]
    pub fn center(&self) -> Slot {
        Slot::new(
            self.columns.saturating_sub(1) / 2,
            self.rows.saturating_sub(1) / 2,
        )
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Iterate over occupied slots in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &Element)> + '_ {
        self.cells.iter().enumerate().filter_map(|(index, cell)| {
            let element = cell.as_ref()?;
            Some((Slot::from_index(index, self.columns)?, element))
        })
    }
}

impl Pane for GridPane {
    fn blank(rows: u16, columns: u16) -> Self {
        Self::new(rows, columns)
    }

    fn element_action(&self, slot: Slot) -> Option<ElementAction> {
        self.get(slot).and_then(|e| e.action().cloned())
    }
}
