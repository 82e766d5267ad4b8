//! Damage accumulation
//!
//! The interpreter reports every rectangle it changes. Reports between two
//! renders are merged into their bounding box, so each frame blits at most
//! one region.

use crate::bitmap::BitmapSize;

/// Damage tracking errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DamageError {
    /// Reported rectangle is not inside the display bitmap
    OutOfBounds {
        /// Offending rectangle
        rect: DirtyRect,
        /// Display bitmap size at the time of the report
        bounds: BitmapSize,
    },
}

impl core::fmt::Display for DamageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfBounds { rect, bounds } => write!(
                f,
                "damage ({}, {}, {}x{}) outside {}x{} display",
                rect.x, rect.y, rect.width, rect.height, bounds.width, bounds.height
            ),
        }
    }
}

/// Rectangle in bitmap pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirtyRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl DirtyRect {
    /// Nothing to redraw
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    /// Create a rectangle
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole bitmap
    pub const fn covering(size: BitmapSize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// A rectangle without area
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// One past the rightmost column
    pub const fn right(&self) -> u32 {
        self.x as u32 + self.width as u32
    }

    /// One past the bottom row
    pub const fn bottom(&self) -> u32 {
        self.y as u32 + self.height as u32
    }

    /// Whether the rectangle lies inside `bounds`
    pub const fn fits(&self, bounds: BitmapSize) -> bool {
        self.x < bounds.width
            && self.y < bounds.height
            && self.right() <= bounds.width as u32
            && self.bottom() <= bounds.height as u32
    }

    /// Bounding box of both rectangles
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, (right - x as u32) as u16, (bottom - y as u32) as u16)
    }
}

/// Accumulates damage between renders
#[derive(Debug, Clone, Default)]
pub struct DamageTracker {
    rect: DirtyRect,
}

impl DamageTracker {
    /// Create a tracker with no damage
    pub const fn new() -> Self {
        Self {
            rect: DirtyRect::EMPTY,
        }
    }

    /// Record a changed rectangle
    ///
    /// The first report after a render replaces the empty rectangle; later
    /// ones grow it to the bounding box.
    ///
    /// # Arguments
    /// - `rect`: Changed region
    /// - `bounds`: Current display bitmap size
    pub fn report(&mut self, rect: DirtyRect, bounds: BitmapSize) -> Result<(), DamageError> {
        if !rect.fits(bounds) {
            return Err(DamageError::OutOfBounds { rect, bounds });
        }

        self.rect = if self.rect.is_empty() {
            rect
        } else {
            self.rect.union(&rect)
        };
        Ok(())
    }

    /// Mark the whole display as changed
    pub fn mark_all(&mut self, bounds: BitmapSize) {
        self.rect = DirtyRect::covering(bounds);
    }

    /// Current accumulated damage
    pub fn current(&self) -> DirtyRect {
        self.rect
    }

    /// Whether anything needs redrawing
    pub fn is_dirty(&self) -> bool {
        !self.rect.is_empty()
    }

    /// Return the accumulated damage and start over
    pub fn take_and_clear(&mut self) -> DirtyRect {
        core::mem::take(&mut self.rect)
    }
}
