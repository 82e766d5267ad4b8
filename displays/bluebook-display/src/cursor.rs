//! Software cursor overlay
//!
//! There is no back buffer. Before the cursor moves, the band of rows it
//! covered is redrawn from the source bitmap, then the glyph is stamped at
//! the new position.

use embedded_graphics::pixelcolor::PixelColor;
use embedded_graphics::prelude::{DrawTarget, Point};
use embedded_graphics::Pixel;

use crate::bitmap::{BitmapSize, DisplayBitmap, WORD_BITS};
use crate::blitter::Blitter;

/// Cursor glyph edge length in pixels
pub const CURSOR_SIZE: u16 = 16;

/// 16 rows of 16 pixels, bit 15 leftmost
pub type CursorGlyph = [u16; CURSOR_SIZE as usize];

/// Arrow shown until the interpreter installs its own cursor
pub const DEFAULT_CURSOR: CursorGlyph = [
    0x8000, 0xC000, 0xE000, 0xF000, 0xF800, 0xFC00, 0xFE00, 0xF800, //
    0xD800, 0x8C00, 0x0C00, 0x0600, 0x0600, 0x0300, 0x0300, 0x0000,
];

/// Cursor glyph and where it was last drawn
#[derive(Debug, Clone)]
pub struct CursorOverlay {
    glyph: CursorGlyph,
    previous: (u16, u16),
    /// Glyph changed since the last render
    stale: bool,
}

impl Default for CursorOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorOverlay {
    /// Create an overlay with the default arrow at the origin
    pub const fn new() -> Self {
        Self {
            glyph: DEFAULT_CURSOR,
            previous: (0, 0),
            stale: true,
        }
    }

    /// Replace the cursor glyph
    pub fn set_glyph(&mut self, glyph: CursorGlyph) {
        self.glyph = glyph;
        self.stale = true;
    }

    /// Current glyph
    pub fn glyph(&self) -> &CursorGlyph {
        &self.glyph
    }

    /// Position of the last render
    pub fn previous(&self) -> (u16, u16) {
        self.previous
    }

    /// Whether drawing at `position` would change the screen
    pub fn needs_redraw(&self, position: (u16, u16)) -> bool {
        self.stale || position != self.previous
    }

    /// Restore the previous cursor band and draw the cursor at `position`
    pub fn render<B, C, D>(
        &mut self,
        blitter: &Blitter<C>,
        bitmap: &B,
        size: BitmapSize,
        position: (u16, u16),
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        B: DisplayBitmap + ?Sized,
        C: PixelColor,
        D: DrawTarget<Color = C>,
    {
        self.restore(blitter, bitmap, size, target)?;
        self.stamp(blitter, size, position, target)?;
        self.previous = position;
        self.stale = false;
        Ok(())
    }

    fn restore<B, C, D>(
        &self,
        blitter: &Blitter<C>,
        bitmap: &B,
        size: BitmapSize,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        B: DisplayBitmap + ?Sized,
        C: PixelColor,
        D: DrawTarget<Color = C>,
    {
        let (x, y) = (self.previous.0 as usize, self.previous.1);
        let first = x / WORD_BITS as usize;
        let last = (x + CURSOR_SIZE as usize - 1) / WORD_BITS as usize;
        for row in y..y.saturating_add(CURSOR_SIZE) {
            blitter.draw_words(bitmap, size, row, first..last + 1, target)?;
        }
        Ok(())
    }

    fn stamp<C, D>(
        &self,
        blitter: &Blitter<C>,
        size: BitmapSize,
        position: (u16, u16),
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        C: PixelColor,
        D: DrawTarget<Color = C>,
    {
        let color = blitter.palette().cursor;
        let origin = blitter.origin();
        let (x, y) = (position.0 as u32, position.1 as u32);
        let pixels = self.glyph.iter().enumerate().flat_map(move |(v, &bits)| {
            let row = y + v as u32;
            (0..CURSOR_SIZE).filter_map(move |bit| {
                let column = x + (CURSOR_SIZE - 1 - bit) as u32;
                let visible = bits & (1 << bit) != 0
                    && column < size.width as u32
                    && row < size.height as u32;
                visible.then(|| Pixel(origin + Point::new(column as i32, row as i32), color))
            })
        });
        target.draw_iter(pixels)
    }
}
