#![forbid(unsafe_code)]

//! Canonical click events.
//!
//! Hosts translate their raw input into a [`ClickEvent`] before handing it to
//! a view. All events derive `Clone`, `PartialEq`, and `Eq` for use in tests
//! and pattern matching.

use bitflags::bitflags;

use crate::geometry::Slot;

/// A click on a pane slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// The slot that was clicked.
    pub slot: Slot,

    /// What kind of click it was.
    pub kind: ClickKind,

    /// Modifier keys held during the click.
    pub modifiers: Modifiers,
}

impl ClickEvent {
    /// Create a new click event with no modifiers.
    #[must_use]
    pub const fn new(slot: Slot, kind: ClickKind) -> Self {
        Self {
            slot,
            kind,
            modifiers: Modifiers::NONE,
        }
    }

    /// Shorthand for a plain left click.
    #[must_use]
    pub const fn left(slot: Slot) -> Self {
        Self::new(slot, ClickKind::Left)
    }

    /// Shorthand for a plain right click.
    #[must_use]
    pub const fn right(slot: Slot) -> Self {
        Self::new(slot, ClickKind::Right)
    }

    /// Create a click event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if Shift was held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Check if Ctrl was held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Returns `true` for clicks that would move content on an unmanaged
    /// surface (everything except a middle click).
    #[must_use]
    pub const fn moves_content(&self) -> bool {
        !matches!(self.kind, ClickKind::Middle)
    }
}

/// The kind of click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickKind {
    /// Primary button.
    Left,

    /// Secondary button.
    Right,

    /// Middle button.
    Middle,

    /// Two primary clicks in quick succession.
    DoubleClick,

    /// Drop key pressed while hovering the slot.
    Drop,

    /// A number key (0-based hotbar index) pressed while hovering the slot.
    NumberKey(u8),
}

bitflags! {
    /// Modifier keys that can be held during a click.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}
